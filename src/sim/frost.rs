//! Frost system — the probabilistic end of the season.
//!
//! One roll decides whether a killing frost arrives; each living plant
//! then rolls its own severity against its tolerance tier. Perennials that
//! would die go dormant instead.

use bevy::prelude::*;

use crate::rng::GardenRng;
use crate::shared::*;

pub fn frost_check(
    ctx: Res<TickContext>,
    mut rng: ResMut<GardenRng>,
    species: Res<SpeciesRegistry>,
    mut report: ResMut<TickReport>,
    mut commands: Commands,
    mut plants: Query<
        (Entity, &PlotSlot, &PlantSpecies, Option<&mut Perennial>),
        Without<Dead>,
    >,
) {
    let probability = ctx.frost_probability();
    let roll = rng.next();
    let early_frost = matches!(ctx.weather.special, Some(SpecialEvent::EarlyFrost));
    let killing = early_frost || roll < f64::from(probability);

    report.frost.killing_frost = killing;
    if !killing {
        return;
    }
    info!("[Frost] killing frost on week {}", ctx.week);

    for (entity, slot, plant, perennial) in &mut plants {
        // Per-plant severity in [0.5, 1.0).
        let severity = 0.5 + rng.next() as f32 * 0.5;

        let tolerance = species
            .get(&plant.0)
            .map(|d| d.frost_tolerance)
            .unwrap_or(FrostTolerance::None);
        let Some(threshold) = tolerance.kill_threshold() else {
            continue; // hard-frost crops shrug it off
        };
        if severity <= threshold {
            continue;
        }

        match perennial {
            Some(mut perennial) => {
                // The top growth dies back; the crown survives to next year.
                perennial.dormant = true;
                debug!("[Frost] {} went dormant at ({}, {})", plant.0, slot.row, slot.col);
            }
            None => {
                commands.entity(entity).insert(Dead);
                report.frost.killed.push(plant.0.clone());
                report
                    .deaths
                    .push((slot.row, slot.col, plant.0.clone(), DeathCause::Frost));
            }
        }
    }
}
