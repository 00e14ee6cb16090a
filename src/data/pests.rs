//! Built-in pest catalog.
//!
//! Pests arrive on the schedule generated at session start; each definition
//! bounds when and how hard an outbreak can hit, and which plant families
//! it touches. `visual` is the scouting description shown by the CLI.

use crate::shared::*;

pub fn populate_pests(registry: &mut PestRegistry) {
    let pests: Vec<PestDef> = vec![
        PestDef {
            id: "aphids".into(),
            name: "Aphids".into(),
            target_families: vec![
                PlantFamily::Solanaceae,
                PlantFamily::Brassicaceae,
                PlantFamily::Asteraceae,
                PlantFamily::Lamiaceae,
            ],
            severity_range: (0.3, 0.7),
            duration_range: (2, 4),
            earliest_week: 4,
            min_gap_weeks: 3,
            visual: "clusters of soft green bodies on new growth".into(),
        },
        PestDef {
            id: "hornworms".into(),
            name: "Tomato hornworms".into(),
            target_families: vec![PlantFamily::Solanaceae],
            severity_range: (0.4, 0.8),
            duration_range: (2, 3),
            earliest_week: 8,
            min_gap_weeks: 4,
            visual: "fat green caterpillars with white chevrons".into(),
        },
        PestDef {
            id: "cucumber_beetles".into(),
            name: "Striped cucumber beetles".into(),
            target_families: vec![PlantFamily::Cucurbitaceae],
            severity_range: (0.3, 0.6),
            duration_range: (2, 4),
            earliest_week: 6,
            min_gap_weeks: 3,
            visual: "yellow beetles with black racing stripes".into(),
        },
        PestDef {
            id: "cabbage_moths".into(),
            name: "Cabbage moths".into(),
            target_families: vec![PlantFamily::Brassicaceae],
            severity_range: (0.3, 0.6),
            duration_range: (2, 4),
            earliest_week: 5,
            min_gap_weeks: 3,
            visual: "white moths fluttering over the brassicas".into(),
        },
        PestDef {
            id: "spider_mites".into(),
            name: "Spider mites".into(),
            target_families: vec![
                PlantFamily::Solanaceae,
                PlantFamily::Lamiaceae,
                PlantFamily::Cucurbitaceae,
                PlantFamily::Rosaceae,
            ],
            severity_range: (0.2, 0.5),
            duration_range: (2, 5),
            earliest_week: 10,
            min_gap_weeks: 4,
            visual: "fine stippling and dusty webbing under leaves".into(),
        },
        PestDef {
            id: "squash_bugs".into(),
            name: "Squash bugs".into(),
            target_families: vec![PlantFamily::Cucurbitaceae],
            severity_range: (0.4, 0.7),
            duration_range: (2, 3),
            earliest_week: 9,
            min_gap_weeks: 4,
            visual: "gray shield-shaped bugs hiding at stem bases".into(),
        },
    ];

    for pest in pests {
        registry.pests.insert(pest.id.clone(), pest);
    }
}
