//! Built-in species catalog.
//!
//! Stage durations are (min, max) week ranges; the midpoints set each
//! stage's share of the progress axis, so lengthening a late stage makes a
//! species reach fruiting *earlier* as a fraction of its life. Companion and
//! antagonist entries are owned by the receiving species: tomato listing
//! basil means tomato gets the buff when basil grows nearby.

use crate::shared::*;

fn stage(stage: Stage, lo: f32, hi: f32) -> StageDef {
    StageDef { stage, weeks: (lo, hi) }
}

fn trigger(kind: TriggerKind, threshold: f32) -> TriggerDef {
    TriggerDef { kind, threshold, pest: None }
}

fn vector(pest: &str, threshold: f32) -> TriggerDef {
    TriggerDef {
        kind: TriggerKind::PestVector,
        threshold,
        pest: Some(pest.into()),
    }
}

fn symptom(week: u32, description: &str, overlay: &str) -> SymptomStage {
    SymptomStage {
        week,
        description: description.into(),
        overlay: overlay.into(),
    }
}

fn buff(species: &str, kind: CompanionEffectKind, modifier: f32, radius: i32) -> CompanionRule {
    CompanionRule {
        species: species.into(),
        effects: vec![CompanionEffect { kind, modifier, radius }],
    }
}

pub fn populate_species(registry: &mut SpeciesRegistry) {
    let species: Vec<SpeciesDef> = vec![
        // ── Tomato — the season's anchor crop ──────────────────────────────
        SpeciesDef {
            id: "tomato_cherokee_purple".into(),
            name: "Cherokee Purple tomato".into(),
            family: PlantFamily::Solanaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.5),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 2.5, 3.5),
                stage(Stage::Flowering, 2.0, 3.0),
                stage(Stage::Fruiting, 3.0, 4.0),
                stage(Stage::Senescence, 3.5, 4.5),
            ],
            needs: Needs {
                ph: 6.5,
                moisture: 0.6,
                soil_temp_c: 21.0,
                nitrogen: 0.6,
                phosphorus: 0.5,
                potassium: 0.6,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Broad,
                water_band: ToleranceBand::Broad,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.2,
            },
            season_window: (2, 8),
            companions: vec![
                buff("basil_genovese", CompanionEffectKind::GrowthRate, 0.08, 1),
                buff("marigold_french", CompanionEffectKind::PestDeterrent, 0.4, 1),
            ],
            antagonists: vec![buff("kale_lacinato", CompanionEffectKind::Allelopathy, 0.05, 1)],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "early_blight".into(),
                    susceptibility: 0.35,
                    triggers: vec![
                        trigger(TriggerKind::HumidityHigh, 0.7),
                        trigger(TriggerKind::Overwater, 0.2),
                    ],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "dark concentric rings on the lower leaves", "brown_spots"),
                        symptom(2, "spots spreading upward with yellow halos", "yellow_halo"),
                        symptom(4, "the lower canopy is defoliating", "defoliation"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(2),
                },
                VulnerabilityDef {
                    condition: "blossom_end_rot".into(),
                    susceptibility: 0.3,
                    triggers: vec![
                        trigger(TriggerKind::Underwater, 0.15),
                        trigger(TriggerKind::NutrientDeficiency, 0.35),
                    ],
                    min_stage: Some(Stage::Fruiting),
                    symptoms: vec![
                        symptom(0, "sunken leathery patches on fruit bottoms", "fruit_rot"),
                        symptom(2, "most developing fruit carries the scar", "fruit_rot"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "hornworm_damage".into(),
                    susceptibility: 0.5,
                    triggers: vec![vector("hornworms", 0.3)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "ragged holes chewed through upper leaves", "holes"),
                        symptom(1, "stripped stems and dark frass", "frass"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "transplant_shock".into(),
                    susceptibility: 0.25,
                    triggers: vec![trigger(TriggerKind::TempLow, 10.0)],
                    min_stage: Some(Stage::Seedling),
                    symptoms: vec![
                        symptom(0, "drooping despite moist soil", "wilt"),
                        symptom(1, "outer leaves papery at the edges", "leaf_scorch"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (9, 26),
                yield_potential: 8,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::None,
        },
        // ── Basil — companion herb ─────────────────────────────────────────
        SpeciesDef {
            id: "basil_genovese".into(),
            name: "Genovese basil".into(),
            family: PlantFamily::Lamiaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.0),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 0.5, 1.5),
                stage(Stage::Vegetative, 2.0, 3.0),
                stage(Stage::Flowering, 1.5, 2.5),
                stage(Stage::Fruiting, 2.0, 3.0),
                stage(Stage::Senescence, 2.5, 3.5),
            ],
            needs: Needs {
                ph: 6.5,
                moisture: 0.6,
                soil_temp_c: 21.0,
                nitrogen: 0.5,
                phosphorus: 0.45,
                potassium: 0.5,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Typical,
                water_band: ToleranceBand::Broad,
                nutrient_band: ToleranceBand::Broad,
                nutrient_demand: 0.8,
            },
            season_window: (3, 10),
            companions: vec![],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "downy_mildew".into(),
                    susceptibility: 0.4,
                    triggers: vec![trigger(TriggerKind::HumidityHigh, 0.75)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "yellowing between the leaf veins", "yellow_leaves"),
                        symptom(1, "gray fuzz on the leaf undersides", "gray_fuzz"),
                        symptom(3, "leaves browning and dropping", "defoliation"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(1),
                },
                VulnerabilityDef {
                    condition: "aphid_infestation".into(),
                    susceptibility: 0.3,
                    triggers: vec![vector("aphids", 0.3)],
                    min_stage: None,
                    symptoms: vec![
                        symptom(0, "sticky film on the newest growth", "sticky_residue"),
                        symptom(2, "curled, distorted leaf tips", "curled_leaves"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (6, 22),
                yield_potential: 6,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::None,
        },
        // ── Mint — aggressive runner ───────────────────────────────────────
        SpeciesDef {
            id: "mint_spearmint".into(),
            name: "Spearmint".into(),
            family: PlantFamily::Lamiaceae,
            plant_type: PlantType::Perennial,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.5),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 3.0, 4.0),
                stage(Stage::Flowering, 2.0, 3.0),
                stage(Stage::Fruiting, 2.0, 3.0),
                stage(Stage::Senescence, 2.0, 3.0),
            ],
            needs: Needs {
                ph: 6.5,
                moisture: 0.65,
                soil_temp_c: 18.0,
                nitrogen: 0.5,
                phosphorus: 0.4,
                potassium: 0.5,
                sun: SunExposure::Partial,
                temp_band: ToleranceBand::Broad,
                water_band: ToleranceBand::Broad,
                nutrient_band: ToleranceBand::Broad,
                nutrient_demand: 0.9,
            },
            season_window: (1, 12),
            companions: vec![],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "spider_mites".into(),
                    susceptibility: 0.3,
                    triggers: vec![vector("spider_mites", 0.3)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "fine pale stippling across the leaves", "stippling"),
                        symptom(2, "dusty webbing along the stems", "webbing"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "powdery_mildew".into(),
                    susceptibility: 0.25,
                    triggers: vec![trigger(TriggerKind::HumidityHigh, 0.7)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "white powder dusting the older leaves", "white_powder"),
                        symptom(2, "powder on both faces of the leaves", "white_powder"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(1),
                },
            ],
            spreading: Some(SpreadingDef {
                runner: Some(RunnerSpread {
                    rate: 0.5,
                    radius: 1,
                    min_stage: Stage::Vegetative,
                }),
                self_seed: None,
            }),
            harvest: HarvestDef {
                window: (5, 26),
                yield_potential: 10,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::Moderate,
        },
        // ── Butternut squash ───────────────────────────────────────────────
        SpeciesDef {
            id: "squash_butternut".into(),
            name: "Butternut squash".into(),
            family: PlantFamily::Cucurbitaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.5),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 2.5, 3.5),
                stage(Stage::Flowering, 2.0, 3.0),
                stage(Stage::Fruiting, 3.5, 4.5),
                stage(Stage::Senescence, 2.0, 3.0),
            ],
            needs: Needs {
                ph: 6.2,
                moisture: 0.65,
                soil_temp_c: 23.0,
                nitrogen: 0.65,
                phosphorus: 0.55,
                potassium: 0.65,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Typical,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.4,
            },
            season_window: (4, 10),
            companions: vec![buff("marigold_french", CompanionEffectKind::PestDeterrent, 0.4, 1)],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "powdery_mildew".into(),
                    susceptibility: 0.45,
                    triggers: vec![trigger(TriggerKind::HumidityHigh, 0.65)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "white powder dusting the older leaves", "white_powder"),
                        symptom(2, "powder on both faces of the leaves", "white_powder"),
                        symptom(4, "leaves browning at the margins", "leaf_scorch"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(2),
                },
                VulnerabilityDef {
                    condition: "squash_bug_damage".into(),
                    susceptibility: 0.45,
                    triggers: vec![vector("squash_bugs", 0.3)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "bronze egg clusters under the leaves", "holes"),
                        symptom(1, "whole runs of leaves wilting", "wilt"),
                    ],
                    weeks_to_death: Some(8),
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (12, 26),
                yield_potential: 4,
                continuous_harvest: false,
            },
            frost_tolerance: FrostTolerance::None,
        },
        // ── Lettuce — quick, cool-season ───────────────────────────────────
        SpeciesDef {
            id: "lettuce_buttercrunch".into(),
            name: "Buttercrunch lettuce".into(),
            family: PlantFamily::Asteraceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.0),
                stage(Stage::Germination, 0.5, 1.0),
                stage(Stage::Seedling, 0.5, 1.5),
                stage(Stage::Vegetative, 2.0, 3.0),
                stage(Stage::Flowering, 1.0, 2.0),
                stage(Stage::Fruiting, 1.0, 2.0),
                stage(Stage::Senescence, 0.5, 1.5),
            ],
            needs: Needs {
                ph: 6.3,
                moisture: 0.65,
                soil_temp_c: 15.0,
                nitrogen: 0.55,
                phosphorus: 0.45,
                potassium: 0.5,
                sun: SunExposure::Partial,
                temp_band: ToleranceBand::Narrow,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 0.9,
            },
            season_window: (0, 6),
            companions: vec![],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "root_rot".into(),
                    susceptibility: 0.35,
                    triggers: vec![
                        trigger(TriggerKind::Overwater, 0.2),
                        trigger(TriggerKind::HumidityHigh, 0.75),
                    ],
                    min_stage: None,
                    symptoms: vec![
                        symptom(0, "outer leaves wilting at midday", "wilt"),
                        symptom(1, "browning at the base, leaves limp", "brown_rot"),
                        symptom(2, "the head is collapsing", "collapse"),
                    ],
                    weeks_to_death: Some(6),
                    spread_radius: Some(1),
                },
                VulnerabilityDef {
                    condition: "aphid_infestation".into(),
                    susceptibility: 0.4,
                    triggers: vec![vector("aphids", 0.3)],
                    min_stage: None,
                    symptoms: vec![
                        symptom(0, "sticky film deep in the inner leaves", "sticky_residue"),
                        symptom(2, "curled, distorted new growth", "curled_leaves"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (4, 14),
                yield_potential: 3,
                continuous_harvest: false,
            },
            frost_tolerance: FrostTolerance::Light,
        },
        // ── Alpine strawberry — perennial, runners + self-seed ─────────────
        SpeciesDef {
            id: "strawberry_alpine".into(),
            name: "Alpine strawberry".into(),
            family: PlantFamily::Rosaceae,
            plant_type: PlantType::Perennial,
            stages: vec![
                stage(Stage::Seed, 1.0, 1.5),
                stage(Stage::Germination, 1.0, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 2.5, 3.5),
                stage(Stage::Flowering, 1.5, 2.5),
                stage(Stage::Fruiting, 2.5, 3.5),
                stage(Stage::Senescence, 1.5, 2.5),
            ],
            needs: Needs {
                ph: 6.0,
                moisture: 0.6,
                soil_temp_c: 18.0,
                nitrogen: 0.55,
                phosphorus: 0.5,
                potassium: 0.6,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Typical,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.0,
            },
            season_window: (1, 8),
            companions: vec![buff("marigold_french", CompanionEffectKind::PestDeterrent, 0.3, 1)],
            antagonists: vec![buff("kale_lacinato", CompanionEffectKind::Allelopathy, 0.04, 1)],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "powdery_mildew".into(),
                    susceptibility: 0.3,
                    triggers: vec![trigger(TriggerKind::HumidityHigh, 0.7)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "white powder dusting the older leaves", "white_powder"),
                        symptom(2, "leaf edges curling upward", "curled_leaves"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(1),
                },
                VulnerabilityDef {
                    condition: "spider_mites".into(),
                    susceptibility: 0.35,
                    triggers: vec![vector("spider_mites", 0.3)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "fine pale stippling across the leaves", "stippling"),
                        symptom(2, "dusty webbing along the crowns", "webbing"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "root_rot".into(),
                    susceptibility: 0.3,
                    triggers: vec![trigger(TriggerKind::Overwater, 0.2)],
                    min_stage: None,
                    symptoms: vec![
                        symptom(0, "crowns wilting despite wet soil", "wilt"),
                        symptom(2, "crowns browning at the base", "brown_rot"),
                    ],
                    weeks_to_death: Some(8),
                    spread_radius: None,
                },
            ],
            spreading: Some(SpreadingDef {
                runner: Some(RunnerSpread {
                    rate: 0.25,
                    radius: 1,
                    min_stage: Stage::Vegetative,
                }),
                self_seed: Some(SelfSeedSpread { rate: 0.15 }),
            }),
            harvest: HarvestDef {
                window: (8, 24),
                yield_potential: 6,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::Moderate,
        },
        // ── French marigold — pest deterrent ───────────────────────────────
        SpeciesDef {
            id: "marigold_french".into(),
            name: "French marigold".into(),
            family: PlantFamily::Asteraceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.0),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 0.5, 1.5),
                stage(Stage::Vegetative, 2.0, 3.0),
                stage(Stage::Flowering, 3.0, 4.0),
                stage(Stage::Fruiting, 2.0, 3.0),
                stage(Stage::Senescence, 1.5, 2.0),
            ],
            needs: Needs {
                ph: 6.5,
                moisture: 0.5,
                soil_temp_c: 20.0,
                nitrogen: 0.4,
                phosphorus: 0.4,
                potassium: 0.4,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Broad,
                water_band: ToleranceBand::Broad,
                nutrient_band: ToleranceBand::Broad,
                nutrient_demand: 0.6,
            },
            season_window: (2, 10),
            companions: vec![],
            antagonists: vec![],
            vulnerabilities: vec![VulnerabilityDef {
                condition: "aphid_infestation".into(),
                susceptibility: 0.2,
                triggers: vec![vector("aphids", 0.3)],
                min_stage: None,
                symptoms: vec![
                    symptom(0, "sticky film on the flower buds", "sticky_residue"),
                    symptom(2, "buds opening distorted", "curled_leaves"),
                ],
                weeks_to_death: None,
                spread_radius: None,
            }],
            spreading: None,
            harvest: HarvestDef {
                window: (8, 24),
                yield_potential: 5,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::None,
        },
        // ── Jalapeño pepper ────────────────────────────────────────────────
        SpeciesDef {
            id: "pepper_jalapeno".into(),
            name: "Jalapeño pepper".into(),
            family: PlantFamily::Solanaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.5),
                stage(Stage::Germination, 1.0, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 2.5, 3.5),
                stage(Stage::Flowering, 2.0, 3.0),
                stage(Stage::Fruiting, 3.0, 4.0),
                stage(Stage::Senescence, 2.0, 3.0),
            ],
            needs: Needs {
                ph: 6.4,
                moisture: 0.55,
                soil_temp_c: 24.0,
                nitrogen: 0.55,
                phosphorus: 0.5,
                potassium: 0.6,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Typical,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.1,
            },
            season_window: (3, 9),
            companions: vec![
                buff("basil_genovese", CompanionEffectKind::GrowthRate, 0.05, 1),
                buff("marigold_french", CompanionEffectKind::PestDeterrent, 0.4, 1),
            ],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "sunscald".into(),
                    susceptibility: 0.3,
                    triggers: vec![trigger(TriggerKind::TempHigh, 30.0)],
                    min_stage: Some(Stage::Fruiting),
                    symptoms: vec![
                        symptom(0, "pale soft patches on exposed fruit", "bleached_patch"),
                        symptom(1, "patches sinking and wrinkling", "fruit_rot"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "aphid_infestation".into(),
                    susceptibility: 0.35,
                    triggers: vec![vector("aphids", 0.3)],
                    min_stage: None,
                    symptoms: vec![
                        symptom(0, "sticky film on the newest growth", "sticky_residue"),
                        symptom(2, "curled, distorted leaf tips", "curled_leaves"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "transplant_shock".into(),
                    susceptibility: 0.3,
                    triggers: vec![trigger(TriggerKind::TempLow, 12.0)],
                    min_stage: Some(Stage::Seedling),
                    symptoms: vec![
                        symptom(0, "drooping despite moist soil", "wilt"),
                        symptom(1, "outer leaves papery at the edges", "leaf_scorch"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (11, 26),
                yield_potential: 10,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::None,
        },
        // ── Lacinato kale — frost-hard workhorse ───────────────────────────
        SpeciesDef {
            id: "kale_lacinato".into(),
            name: "Lacinato kale".into(),
            family: PlantFamily::Brassicaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.5),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 1.0, 2.0),
                stage(Stage::Vegetative, 3.5, 4.5),
                stage(Stage::Flowering, 2.0, 3.0),
                stage(Stage::Fruiting, 2.0, 3.0),
                stage(Stage::Senescence, 2.0, 3.0),
            ],
            needs: Needs {
                ph: 6.6,
                moisture: 0.6,
                soil_temp_c: 16.0,
                nitrogen: 0.65,
                phosphorus: 0.5,
                potassium: 0.55,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Broad,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.2,
            },
            season_window: (0, 8),
            companions: vec![],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "cabbage_worms".into(),
                    susceptibility: 0.45,
                    triggers: vec![vector("cabbage_moths", 0.3)],
                    min_stage: Some(Stage::Seedling),
                    symptoms: vec![
                        symptom(0, "round holes punched through the leaves", "holes"),
                        symptom(1, "green droppings along the midribs", "frass"),
                        symptom(3, "leaves skeletonized to the veins", "defoliation"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "nitrogen_deficiency".into(),
                    susceptibility: 0.4,
                    triggers: vec![trigger(TriggerKind::NutrientDeficiency, 0.3)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "the oldest leaves fading to pale yellow", "pale_leaves"),
                        symptom(2, "yellowing climbing the plant", "yellow_leaves"),
                    ],
                    weeks_to_death: None,
                    spread_radius: None,
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (5, 29),
                yield_potential: 12,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::Hard,
        },
        // ── Marketmore cucumber ────────────────────────────────────────────
        SpeciesDef {
            id: "cucumber_marketmore".into(),
            name: "Marketmore cucumber".into(),
            family: PlantFamily::Cucurbitaceae,
            plant_type: PlantType::Annual,
            stages: vec![
                stage(Stage::Seed, 0.5, 1.0),
                stage(Stage::Germination, 0.5, 1.5),
                stage(Stage::Seedling, 1.0, 1.5),
                stage(Stage::Vegetative, 2.0, 3.0),
                stage(Stage::Flowering, 1.5, 2.5),
                stage(Stage::Fruiting, 2.5, 3.5),
                stage(Stage::Senescence, 1.5, 2.5),
            ],
            needs: Needs {
                ph: 6.3,
                moisture: 0.7,
                soil_temp_c: 23.0,
                nitrogen: 0.6,
                phosphorus: 0.5,
                potassium: 0.6,
                sun: SunExposure::Full,
                temp_band: ToleranceBand::Typical,
                water_band: ToleranceBand::Typical,
                nutrient_band: ToleranceBand::Typical,
                nutrient_demand: 1.2,
            },
            season_window: (4, 10),
            companions: vec![buff("marigold_french", CompanionEffectKind::PestDeterrent, 0.3, 1)],
            antagonists: vec![],
            vulnerabilities: vec![
                VulnerabilityDef {
                    condition: "bacterial_wilt".into(),
                    susceptibility: 0.4,
                    triggers: vec![vector("cucumber_beetles", 0.25)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "single runs wilting in the afternoon heat", "wilt"),
                        symptom(1, "wilt no longer recovering overnight", "wilt"),
                        symptom(2, "vines collapsing from the crown", "collapse"),
                    ],
                    weeks_to_death: Some(4),
                    spread_radius: None,
                },
                VulnerabilityDef {
                    condition: "powdery_mildew".into(),
                    susceptibility: 0.4,
                    triggers: vec![trigger(TriggerKind::HumidityHigh, 0.65)],
                    min_stage: Some(Stage::Vegetative),
                    symptoms: vec![
                        symptom(0, "white powder dusting the older leaves", "white_powder"),
                        symptom(2, "powder on both faces of the leaves", "white_powder"),
                        symptom(4, "leaves browning at the margins", "leaf_scorch"),
                    ],
                    weeks_to_death: None,
                    spread_radius: Some(2),
                },
            ],
            spreading: None,
            harvest: HarvestDef {
                window: (9, 24),
                yield_potential: 9,
                continuous_harvest: true,
            },
            frost_tolerance: FrostTolerance::None,
        },
    ];

    for def in species {
        registry.species.insert(def.id.clone(), def);
    }
}
