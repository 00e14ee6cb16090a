//! Disease system — onset from environmental triggers, staged progression,
//! and lethal conditions.

use bevy::prelude::*;

use crate::rng::GardenRng;
use crate::shared::*;

pub fn disease_check(
    ctx: Res<TickContext>,
    mut rng: ResMut<GardenRng>,
    species: Res<SpeciesRegistry>,
    pests: Res<PestRegistry>,
    map: Res<GardenMap>,
    soils: Query<&Soil>,
    mut report: ResMut<TickReport>,
    mut commands: Commands,
    mut plants: Query<
        (
            Entity,
            &PlotSlot,
            &PlantSpecies,
            &Growth,
            &Health,
            &mut ActiveConditions,
        ),
        Without<Dead>,
    >,
) {
    let week = ctx.week;

    // Living positions for the crowding trigger.
    let occupied: Vec<(i32, i32)> = plants.iter().map(|(_, slot, ..)| slot.pos()).collect();

    for (entity, slot, plant, growth, health, mut conditions) in &mut plants {
        let Some(def) = species.get(&plant.0) else {
            continue;
        };
        let Some(soil) = map.plots.get(&slot.pos()).and_then(|e| soils.get(*e).ok()) else {
            continue;
        };

        let neighbors = occupied
            .iter()
            .filter(|pos| **pos != slot.pos() && chebyshev(**pos, slot.pos()) <= 1)
            .count();

        // ── Onset ──────────────────────────────────────────────────────
        // Seeds and germinating plants are always immune.
        if !matches!(growth.stage, Stage::Seed | Stage::Germination) {
            for vuln in &def.vulnerabilities {
                if growth.stage < vuln.effective_min_stage() {
                    continue;
                }
                if conditions.has(&vuln.condition) {
                    continue;
                }
                let score = trigger_score(vuln, def, soil, &ctx, &pests, neighbors);
                let probability = vuln.susceptibility * score * (1.0 + health.stress);
                if probability > 0.0 && rng.chance(f64::from(probability)) {
                    conditions
                        .0
                        .push(ConditionEntry::onset(vuln.condition.clone(), week));
                    report
                        .new_conditions
                        .push((slot.row, slot.col, vuln.condition.clone()));
                    debug!(
                        "[Disease] {} onset on {} at ({}, {})",
                        vuln.condition, plant.0, slot.row, slot.col
                    );
                }
            }
        }

        // ── Progression ────────────────────────────────────────────────
        // Entries that appeared this very week keep their onset state.
        let mut fatal = false;
        for entry in conditions.0.iter_mut() {
            if entry.onset_week == week {
                continue;
            }
            let Some(vuln) = def.vulnerability(&entry.condition_id) else {
                continue;
            };
            let elapsed = week - entry.onset_week;
            entry.current_stage = vuln
                .symptoms
                .iter()
                .enumerate()
                .filter(|(_, s)| s.week <= elapsed)
                .map(|(i, _)| i)
                .last()
                .unwrap_or(0);
            entry.severity = (entry.severity + 0.05).min(1.0);

            if let Some(weeks_to_death) = vuln.weeks_to_death {
                if elapsed >= weeks_to_death {
                    fatal = true;
                }
            }
        }

        if fatal {
            commands.entity(entity).insert(Dead);
            report
                .deaths
                .push((slot.row, slot.col, plant.0.clone(), DeathCause::Disease));
            warn!("[Disease] {} died at ({}, {})", plant.0, slot.row, slot.col);
        }
    }
}

/// Average score across the vulnerability's configured triggers.
fn trigger_score(
    vuln: &VulnerabilityDef,
    def: &SpeciesDef,
    soil: &Soil,
    ctx: &TickContext,
    pests: &PestRegistry,
    neighbors: usize,
) -> f32 {
    if vuln.triggers.is_empty() {
        return 0.0;
    }
    let total: f32 = vuln
        .triggers
        .iter()
        .map(|t| single_trigger_score(t, def, soil, ctx, pests, neighbors))
        .sum();
    total / vuln.triggers.len() as f32
}

/// Score one trigger: 1.0 once the measurement passes the threshold,
/// ramping linearly from zero across a per-kind width below it.
fn single_trigger_score(
    trigger: &TriggerDef,
    def: &SpeciesDef,
    soil: &Soil,
    ctx: &TickContext,
    pests: &PestRegistry,
    neighbors: usize,
) -> f32 {
    let weather = &ctx.weather;
    let needs = &def.needs;
    let threshold = trigger.threshold;
    match trigger.kind {
        TriggerKind::HumidityHigh => ramp_up(weather.humidity, threshold, 0.2),
        TriggerKind::HumidityLow => ramp_down(weather.humidity, threshold, 0.2),
        TriggerKind::TempHigh => ramp_up(weather.temp_high_c, threshold, 5.0),
        TriggerKind::TempLow => ramp_down(weather.temp_low_c, threshold, 5.0),
        TriggerKind::Overwater => ramp_up(soil.moisture - needs.moisture, threshold, 0.15),
        TriggerKind::Underwater => ramp_up(needs.moisture - soil.moisture, threshold, 0.15),
        TriggerKind::PhHigh => ramp_up(soil.ph, threshold, 1.0),
        TriggerKind::PhLow => ramp_down(soil.ph, threshold, 1.0),
        TriggerKind::NutrientDeficiency => {
            let deficit = [
                (soil.nitrogen, needs.nitrogen),
                (soil.phosphorus, needs.phosphorus),
                (soil.potassium, needs.potassium),
            ]
            .into_iter()
            .map(|(value, ideal)| {
                let floor = 0.5 * ideal;
                if floor <= 0.0 {
                    0.0
                } else {
                    ((floor - value) / floor).clamp(0.0, 1.0)
                }
            })
            .fold(0.0_f32, f32::max);
            ramp_up(deficit, threshold, 0.25)
        }
        TriggerKind::NutrientExcess => {
            let excess = [
                soil.nitrogen - needs.nitrogen,
                soil.phosphorus - needs.phosphorus,
                soil.potassium - needs.potassium,
            ]
            .into_iter()
            .fold(0.0_f32, f32::max);
            ramp_up(excess, threshold, 0.2)
        }
        TriggerKind::Crowding => ramp_up(neighbors as f32, threshold, 2.0),
        TriggerKind::PestVector => {
            let worst = ctx
                .active_pests
                .iter()
                .filter(|event| match &trigger.pest {
                    Some(id) => &event.pest_id == id,
                    // No named vector: any active pest that targets this
                    // plant's family counts.
                    None => pests
                        .pests
                        .get(&event.pest_id)
                        .is_some_and(|p| p.target_families.contains(&def.family)),
                })
                .map(|event| event.severity)
                .fold(0.0_f32, f32::max);
            if worst <= 0.0 {
                0.0
            } else {
                ramp_up(worst, threshold, 0.2)
            }
        }
    }
}

fn ramp_up(value: f32, threshold: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return if value >= threshold { 1.0 } else { 0.0 };
    }
    ((value - (threshold - width)) / width).clamp(0.0, 1.0)
}

fn ramp_down(value: f32, threshold: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return if value <= threshold { 1.0 } else { 0.0 };
    }
    (((threshold + width) - value) / width).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_saturate_at_their_thresholds() {
        assert_eq!(ramp_up(0.8, 0.7, 0.2), 1.0);
        assert_eq!(ramp_up(0.5, 0.7, 0.2), 0.0);
        assert!((ramp_up(0.6, 0.7, 0.2) - 0.5).abs() < 1e-6);
        assert_eq!(ramp_down(0.5, 0.6, 0.2), 1.0);
        assert_eq!(ramp_down(0.9, 0.6, 0.2), 0.0);
    }
}
