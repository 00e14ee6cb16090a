//! Treatment feedback — delayed evaluation of player interventions.
//!
//! The verdict matrix: a correct diagnosis with an effective treatment
//! resolves (mild) or stabilizes (severe); an effective-but-misaimed spray
//! does nothing; a wrong diagnosis lets every condition worsen while the
//! player was treating the wrong thing.

use bevy::prelude::*;

use crate::shared::*;

pub fn treatment_feedback(
    ctx: Res<TickContext>,
    treatments: Res<TreatmentRegistry>,
    mut report: ResMut<TickReport>,
    mut commands: Commands,
    mut plants: Query<(
        Entity,
        &PlotSlot,
        &PlantSpecies,
        &mut ActiveTreatments,
        &mut ActiveConditions,
        Option<&Dead>,
    )>,
) {
    let week = ctx.week;

    for (entity, slot, plant, mut active, mut conditions, dead) in &mut plants {
        if active.0.is_empty() {
            continue;
        }

        // Consume everything due this week, in application order.
        let due: Vec<TreatmentEntry> = {
            let (ready, waiting): (Vec<_>, Vec<_>) =
                active.0.drain(..).partition(|t| t.feedback_week <= week);
            active.0 = waiting;
            ready
        };

        for entry in due {
            // A plant that died while waiting consumes its treatments
            // without feedback.
            if dead.is_some() {
                continue;
            }

            // pull_plant resolves unconditionally by killing the plant.
            if entry.action == "pull_plant" {
                commands.entity(entity).insert(Dead);
                report
                    .deaths
                    .push((slot.row, slot.col, plant.0.clone(), DeathCause::Pulled));
                report.treatment_outcomes.push(TreatmentOutcome {
                    row: slot.row,
                    col: slot.col,
                    species: plant.0.clone(),
                    action: entry.action,
                    target_condition: entry.target_condition,
                    result: TreatmentResult::Resolved,
                });
                continue;
            }

            let Some(def) = treatments.treatments.get(&entry.action) else {
                continue;
            };

            let diagnosis_correct = entry
                .target_condition
                .as_deref()
                .is_some_and(|target| conditions.has(target));

            let result = if !diagnosis_correct {
                // Treating a phantom: every real condition kept developing.
                for condition in conditions.0.iter_mut() {
                    condition.severity = (condition.severity + 0.1).min(1.0);
                }
                TreatmentResult::Worsened
            } else {
                let target = entry.target_condition.as_deref().unwrap_or_default();
                let effective = def.counters.iter().any(|c| c == target);
                if !effective {
                    TreatmentResult::Ineffective
                } else {
                    let severity = conditions
                        .get(target)
                        .map(|c| c.severity)
                        .unwrap_or_default();
                    if severity <= 0.3 {
                        conditions.0.retain(|c| c.condition_id != target);
                        TreatmentResult::Resolved
                    } else {
                        if let Some(condition) = conditions
                            .0
                            .iter_mut()
                            .find(|c| c.condition_id == target)
                        {
                            condition.severity = (condition.severity - 0.15).max(0.0);
                        }
                        TreatmentResult::Stabilized
                    }
                }
            };

            info!(
                "[Treatment] {} on {} at ({}, {}): {}",
                entry.action,
                plant.0,
                slot.row,
                slot.col,
                result.label()
            );
            report.treatment_outcomes.push(TreatmentOutcome {
                row: slot.row,
                col: slot.col,
                species: plant.0.clone(),
                action: entry.action,
                target_condition: entry.target_condition,
                result,
            });
        }
    }
}
