//! Condition catalog, treatment catalog, and the diagnosis lookup tables.
//!
//! The overlay→tag table and the similar-condition groups are static: the
//! diagnosis engine depends on their ordering being identical across runs.

use crate::shared::*;

pub fn populate_conditions(registry: &mut ConditionRegistry) {
    let conditions: Vec<ConditionDef> = vec![
        ConditionDef { id: "early_blight".into(), name: "Early blight".into(), category: ConditionCategory::Fungal },
        ConditionDef { id: "powdery_mildew".into(), name: "Powdery mildew".into(), category: ConditionCategory::Fungal },
        ConditionDef { id: "downy_mildew".into(), name: "Downy mildew".into(), category: ConditionCategory::Fungal },
        ConditionDef { id: "root_rot".into(), name: "Root rot".into(), category: ConditionCategory::Fungal },
        ConditionDef { id: "bacterial_wilt".into(), name: "Bacterial wilt".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "aphid_infestation".into(), name: "Aphid infestation".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "hornworm_damage".into(), name: "Hornworm damage".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "spider_mites".into(), name: "Spider mites".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "cabbage_worms".into(), name: "Cabbage worms".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "squash_bug_damage".into(), name: "Squash bug damage".into(), category: ConditionCategory::Pest },
        ConditionDef { id: "blossom_end_rot".into(), name: "Blossom end rot".into(), category: ConditionCategory::Abiotic },
        ConditionDef { id: "nitrogen_deficiency".into(), name: "Nitrogen deficiency".into(), category: ConditionCategory::Abiotic },
        ConditionDef { id: "sunscald".into(), name: "Sunscald".into(), category: ConditionCategory::Abiotic },
        ConditionDef { id: "transplant_shock".into(), name: "Transplant shock".into(), category: ConditionCategory::Abiotic },
    ];

    for condition in conditions {
        registry.conditions.insert(condition.id.clone(), condition);
    }
}

pub fn populate_treatments(registry: &mut TreatmentRegistry) {
    let treatments: Vec<TreatmentDef> = vec![
        TreatmentDef {
            id: "spray_fungicide".into(),
            name: "Spray fungicide".into(),
            counters: vec!["early_blight".into(), "powdery_mildew".into(), "downy_mildew".into()],
            feedback_delay_weeks: 2,
        },
        TreatmentDef {
            id: "spray_insecticidal_soap".into(),
            name: "Spray insecticidal soap".into(),
            counters: vec!["aphid_infestation".into(), "spider_mites".into()],
            feedback_delay_weeks: 1,
        },
        TreatmentDef {
            id: "hand_pick".into(),
            name: "Hand-pick pests".into(),
            counters: vec![
                "hornworm_damage".into(),
                "cabbage_worms".into(),
                "squash_bug_damage".into(),
            ],
            feedback_delay_weeks: 1,
        },
        TreatmentDef {
            id: "amend_soil".into(),
            name: "Amend soil".into(),
            counters: vec!["nitrogen_deficiency".into(), "blossom_end_rot".into()],
            feedback_delay_weeks: 2,
        },
        TreatmentDef {
            id: "adjust_watering".into(),
            name: "Adjust watering".into(),
            counters: vec!["root_rot".into(), "blossom_end_rot".into()],
            feedback_delay_weeks: 2,
        },
        TreatmentDef {
            id: "monitor".into(),
            name: "Monitor closely".into(),
            counters: vec!["transplant_shock".into(), "sunscald".into()],
            feedback_delay_weeks: 1,
        },
        // No counter list: resolution is the special case that marks the
        // plant dead.
        TreatmentDef {
            id: "pull_plant".into(),
            name: "Pull the plant".into(),
            counters: vec![],
            feedback_delay_weeks: 1,
        },
    ];

    for treatment in treatments {
        registry.treatments.insert(treatment.id.clone(), treatment);
    }
}

/// Visible tags for a symptom overlay key. Unknown overlays map to nothing,
/// which keeps them out of every similarity score.
pub fn overlay_tags(overlay: &str) -> &'static [&'static str] {
    match overlay {
        "brown_spots" => &["spots", "brown", "leaves"],
        "yellow_halo" => &["spots", "yellow", "leaves"],
        "defoliation" => &["leaf_loss"],
        "fruit_rot" => &["fruit", "rot", "dark"],
        "holes" => &["holes", "leaves"],
        "wilt" => &["wilt"],
        "leaf_scorch" => &["brown", "leaf_edge"],
        "yellow_leaves" => &["yellow", "leaves"],
        "gray_fuzz" => &["fungal_growth", "gray", "leaves"],
        "white_powder" => &["fungal_growth", "white", "leaves"],
        "sticky_residue" => &["sticky", "insects"],
        "curled_leaves" => &["curled", "leaves"],
        "stippling" => &["spots", "pale", "leaves"],
        "webbing" => &["webbing", "insects"],
        "brown_rot" => &["rot", "brown", "base"],
        "collapse" => &["wilt", "collapse"],
        "frass" => &["insects", "droppings"],
        "pale_leaves" => &["pale", "yellow", "leaves"],
        "bleached_patch" => &["pale", "fruit"],
        _ => &[],
    }
}

/// Groups of conditions that present alike. The red-herring picker walks
/// these in order, so the grouping (and its order) is part of determinism.
pub const SIMILAR_CONDITIONS: &[&[&str]] = &[
    &["early_blight", "downy_mildew", "nitrogen_deficiency"],
    &["powdery_mildew", "downy_mildew", "spider_mites"],
    &["root_rot", "bacterial_wilt", "transplant_shock"],
    &["aphid_infestation", "spider_mites", "cabbage_worms"],
    &["hornworm_damage", "cabbage_worms", "squash_bug_damage"],
    &["blossom_end_rot", "sunscald"],
];
