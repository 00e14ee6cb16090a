//! Diagnosis engine — ranked hypotheses with deliberate ambiguity.
//!
//! Observations come from the symptom stage each condition is actually in;
//! hypotheses come from the species' own vulnerability list plus one or two
//! red herrings drawn from visually similar conditions. The red-herring
//! draw runs on its own RNG sub-stream so diagnosing never perturbs the
//! simulation stream.

use std::collections::BTreeSet;

use crate::data::{overlay_tags, SIMILAR_CONDITIONS};
use crate::rng::GardenRng;
use crate::shared::*;

pub const MAX_HYPOTHESES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub condition: ConditionId,
    pub confidence: f32,
    pub red_herring: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisReport {
    pub observations: Vec<String>,
    pub hypotheses: Vec<Hypothesis>,
}

/// Diagnose one plant. Deterministic in (plant state, species, rng state).
pub fn diagnose(
    def: &SpeciesDef,
    conditions: &ActiveConditions,
    registry: &SpeciesRegistry,
    rng: &mut GardenRng,
) -> DiagnosisReport {
    let mut report = DiagnosisReport::default();

    // ── Observations & visible tags ────────────────────────────────────
    let mut visible: BTreeSet<&'static str> = BTreeSet::new();
    for entry in &conditions.0 {
        let Some(vuln) = def.vulnerability(&entry.condition_id) else {
            continue;
        };
        let Some(stage) = vuln.symptoms.get(entry.current_stage) else {
            continue;
        };
        report.observations.push(stage.description.clone());
        visible.extend(overlay_tags(&stage.overlay));
    }

    // ── Species-vulnerability hypotheses ───────────────────────────────
    for vuln in &def.vulnerabilities {
        if let Some(entry) = conditions.get(&vuln.condition) {
            let max_stage = vuln.symptoms.len().saturating_sub(1);
            let ratio = if max_stage == 0 {
                0.0
            } else {
                entry.current_stage as f32 / max_stage as f32
            };
            let confidence =
                (0.4 + 0.35 * ratio + 0.15 * entry.severity).clamp(0.3, 0.95);
            report.hypotheses.push(Hypothesis {
                condition: vuln.condition.clone(),
                confidence,
                red_herring: false,
            });
        } else {
            let tags = vulnerability_tags(vuln);
            let similarity = jaccard(&visible, &tags);
            if similarity > 0.15 {
                report.hypotheses.push(Hypothesis {
                    condition: vuln.condition.clone(),
                    confidence: (0.7 * similarity).clamp(0.1, 0.6),
                    red_herring: false,
                });
            }
        }
    }

    // ── Red herrings ───────────────────────────────────────────────────
    let included: BTreeSet<&str> = report
        .hypotheses
        .iter()
        .map(|h| h.condition.as_str())
        .collect();
    let mut candidates: Vec<&str> = Vec::new();
    for group in SIMILAR_CONDITIONS {
        if !group.iter().any(|c| conditions.has(c)) {
            continue;
        }
        for candidate in group.iter().copied() {
            if conditions.has(candidate)
                || included.contains(candidate)
                || candidates.contains(&candidate)
            {
                continue;
            }
            candidates.push(candidate);
        }
    }
    if !candidates.is_empty() {
        let herrings = rng.next_int(1, 2) as usize;
        for _ in 0..herrings {
            if candidates.is_empty() {
                break;
            }
            let idx = rng.next_int(0, candidates.len() as i64 - 1) as usize;
            let condition = candidates.remove(idx);
            let tags = condition_tags(registry, condition);
            let confidence = (0.6 * jaccard(&visible, &tags) + 0.1).clamp(0.1, 0.55);
            report.hypotheses.push(Hypothesis {
                condition: condition.to_string(),
                confidence,
                red_herring: true,
            });
        }
    }

    // Rank and cap. The sort is stable, so equal confidences keep their
    // insertion order.
    report.hypotheses.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    report.hypotheses.truncate(MAX_HYPOTHESES);
    report
}

/// Every tag a vulnerability can present, across all its symptom stages.
fn vulnerability_tags(vuln: &VulnerabilityDef) -> BTreeSet<&'static str> {
    vuln.symptoms
        .iter()
        .flat_map(|s| overlay_tags(&s.overlay).iter().copied())
        .collect()
}

/// Union of the condition's tags across the whole catalog. Collected into
/// an ordered set so registry iteration order cannot leak out.
fn condition_tags(registry: &SpeciesRegistry, condition: &str) -> BTreeSet<&'static str> {
    let mut tags = BTreeSet::new();
    for def in registry.species.values() {
        if let Some(vuln) = def.vulnerability(condition) {
            tags.extend(vulnerability_tags(vuln));
        }
    }
    tags
}

fn jaccard(a: &BTreeSet<&'static str>, b: &BTreeSet<&'static str>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f32;
    let union = a.union(b).count() as f32;
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use bevy::prelude::World;

    fn registry() -> SpeciesRegistry {
        let mut world = World::new();
        data::insert_registries(&mut world);
        world.resource::<SpeciesRegistry>().clone()
    }

    fn tomato_with_blight(severity: f32, stage: usize) -> ActiveConditions {
        ActiveConditions(vec![ConditionEntry {
            condition_id: "early_blight".into(),
            onset_week: 3,
            current_stage: stage,
            severity,
        }])
    }

    #[test]
    fn active_condition_leads_the_ranking() {
        let registry = registry();
        let def = registry.get("tomato_cherokee_purple").unwrap();
        let conditions = tomato_with_blight(0.6, 2);
        let mut rng = GardenRng::new(5);
        let report = diagnose(def, &conditions, &registry, &mut rng);

        assert!(!report.observations.is_empty());
        assert!(report.hypotheses.len() <= MAX_HYPOTHESES);
        let top = &report.hypotheses[0];
        assert_eq!(top.condition, "early_blight");
        assert!(!top.red_herring);
        assert!(top.confidence >= 0.3 && top.confidence <= 0.95);
    }

    #[test]
    fn red_herrings_come_from_similar_conditions() {
        let registry = registry();
        let def = registry.get("tomato_cherokee_purple").unwrap();
        let conditions = tomato_with_blight(0.3, 0);
        let mut rng = GardenRng::new(9);
        let report = diagnose(def, &conditions, &registry, &mut rng);

        let herrings: Vec<&Hypothesis> =
            report.hypotheses.iter().filter(|h| h.red_herring).collect();
        assert!(!herrings.is_empty());
        for herring in herrings {
            assert_ne!(herring.condition, "early_blight");
            assert!(herring.confidence <= 0.55);
            let similar = SIMILAR_CONDITIONS
                .iter()
                .any(|group| group.contains(&herring.condition.as_str()));
            assert!(similar);
        }
    }

    #[test]
    fn same_rng_state_means_same_output() {
        let registry = registry();
        let def = registry.get("tomato_cherokee_purple").unwrap();
        let conditions = tomato_with_blight(0.4, 1);
        let a = diagnose(def, &conditions, &registry, &mut GardenRng::new(31));
        let b = diagnose(def, &conditions, &registry, &mut GardenRng::new(31));
        assert_eq!(a, b);
    }

    #[test]
    fn a_clean_plant_yields_no_observations() {
        let registry = registry();
        let def = registry.get("basil_genovese").unwrap();
        let mut rng = GardenRng::new(2);
        let report = diagnose(def, &ActiveConditions::default(), &registry, &mut rng);
        assert!(report.observations.is_empty());
        assert!(report.hypotheses.iter().all(|h| !h.red_herring));
    }
}
