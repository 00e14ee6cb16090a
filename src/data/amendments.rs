//! Built-in soil amendments.
//!
//! Effects are flat field deltas applied by the soil system once the
//! amendment's delay has elapsed. Slow amendments (lime, sulfur, bone meal)
//! model the real lag between application and soil chemistry moving.

use crate::shared::*;

pub fn populate_amendments(registry: &mut AmendmentRegistry) {
    let amendments: Vec<AmendmentDef> = vec![
        AmendmentDef {
            id: "compost".into(),
            name: "Compost".into(),
            effect_delay_weeks: 1,
            effects: vec![
                (SoilField::Nitrogen, 0.08),
                (SoilField::Phosphorus, 0.05),
                (SoilField::Potassium, 0.06),
                (SoilField::OrganicMatter, 0.15),
                (SoilField::Biology, 0.05),
            ],
        },
        AmendmentDef {
            id: "lime".into(),
            name: "Garden lime".into(),
            effect_delay_weeks: 2,
            effects: vec![(SoilField::Ph, 0.6)],
        },
        AmendmentDef {
            id: "sulfur".into(),
            name: "Elemental sulfur".into(),
            effect_delay_weeks: 2,
            effects: vec![(SoilField::Ph, -0.6)],
        },
        AmendmentDef {
            id: "fertilizer_npk".into(),
            name: "Balanced fertilizer".into(),
            effect_delay_weeks: 0,
            effects: vec![
                (SoilField::Nitrogen, 0.25),
                (SoilField::Phosphorus, 0.2),
                (SoilField::Potassium, 0.25),
            ],
        },
        AmendmentDef {
            id: "mulch".into(),
            name: "Straw mulch".into(),
            effect_delay_weeks: 0,
            effects: vec![
                (SoilField::OrganicMatter, 0.1),
                (SoilField::Moisture, 0.1),
                (SoilField::Compaction, -0.05),
            ],
        },
        AmendmentDef {
            id: "bone_meal".into(),
            name: "Bone meal".into(),
            effect_delay_weeks: 2,
            effects: vec![
                (SoilField::Phosphorus, 0.25),
                (SoilField::Nitrogen, 0.05),
            ],
        },
    ];

    for amendment in amendments {
        registry.amendments.insert(amendment.id.clone(), amendment);
    }
}
