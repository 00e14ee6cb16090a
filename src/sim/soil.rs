//! Soil system — weather, amendments, plant uptake, and slow biology.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

/// Per-tick organic matter decay.
const OM_DECAY: f32 = 0.02;

/// Per-tick biology drift rate toward the organic matter level.
const BIOLOGY_DRIFT: f32 = 0.03;

pub fn soil_update(
    ctx: Res<TickContext>,
    species: Res<SpeciesRegistry>,
    mut plots: Query<(&PlotSlot, &mut Soil, &mut PendingAmendments)>,
    plants: Query<(&PlotSlot, &PlantSpecies, &Growth), Without<Dead>>,
) {
    let week = ctx.week;
    let weather = &ctx.weather;
    let avg_temp = (weather.temp_high_c + weather.temp_low_c) * 0.5;
    // Evaporation rate per unit of wetness; scales with the weekly mean
    // temperature, and wet soil loses water faster than dry soil.
    let evaporation_rate = 0.08 + 0.0045 * avg_temp.max(0.0);

    // Living plants keyed by position for the uptake step.
    let mut feeders: HashMap<(i32, i32), Vec<(&SpeciesId, f32)>> = HashMap::new();
    for (slot, plant, growth) in &plants {
        feeders
            .entry(slot.pos())
            .or_default()
            .push((&plant.0, growth.progress));
    }

    for (slot, mut soil, mut pending) in &mut plots {
        // 1. Mature amendments apply their deltas, then leave the queue.
        let due: Vec<PendingAmendment> = {
            let (ready, waiting): (Vec<_>, Vec<_>) = pending
                .0
                .drain(..)
                .partition(|a| a.applied_week + a.effect_delay_weeks <= week);
            pending.0 = waiting;
            ready
        };
        for amendment in due {
            for (field, delta) in &amendment.effects {
                soil.apply_delta(*field, *delta);
            }
            debug!(
                "[Soil] {} matured on ({}, {})",
                amendment.amendment_id, slot.row, slot.col
            );
        }

        // 2. Moisture: rain in, evaporation out, droughts on top.
        soil.moisture += weather.precipitation_mm / 100.0;
        soil.moisture -= evaporation_rate * (0.5 + soil.moisture);
        if let Some(SpecialEvent::Drought { moisture_penalty }) = weather.special {
            soil.moisture -= moisture_penalty;
        }

        // 3. Soil temperature tracks the weekly mean, damped by organic
        //    matter insulation.
        let insulation = 0.5 - 0.3 * soil.organic_matter;
        soil.temperature_c += (avg_temp - soil.temperature_c) * insulation;

        // 4. Nutrient uptake for every living plant on the plot.
        if let Some(plot_feeders) = feeders.get(&slot.pos()) {
            for &(species_id, progress) in plot_feeders {
                let Some(def) = species.get(species_id) else {
                    continue;
                };
                let base = (0.01 + 0.02 * progress) * def.needs.nutrient_demand;
                soil.nitrogen -= base * (def.needs.nitrogen / 0.6);
                soil.phosphorus -= base * (def.needs.phosphorus / 0.6);
                soil.potassium -= base * (def.needs.potassium / 0.6);
            }
        }

        // 5-6. Organic matter decays; biology drifts toward it.
        soil.organic_matter -= OM_DECAY;
        if soil.biology < soil.organic_matter {
            soil.biology += BIOLOGY_DRIFT;
        } else if soil.biology > soil.organic_matter {
            soil.biology -= BIOLOGY_DRIFT;
        }

        // 7. Everything back into range.
        soil.clamp_all();
    }
}
