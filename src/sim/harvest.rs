//! Harvest system — ripening, quality decay, and continuous-harvest
//! refresh.

use bevy::prelude::*;

use crate::shared::*;

/// Quality lost per week a ripe harvest hangs unpicked.
const NEGLECT_DECAY: f32 = 0.15;
const QUALITY_FLOOR: f32 = 0.1;

pub fn harvest_check(
    ctx: Res<TickContext>,
    species: Res<SpeciesRegistry>,
    mut report: ResMut<TickReport>,
    mut commands: Commands,
    mut plants: Query<
        (
            Entity,
            &PlotSlot,
            &PlantSpecies,
            &Growth,
            &Health,
            Option<&mut HarvestState>,
            Option<&Perennial>,
        ),
        Without<Dead>,
    >,
) {
    let week = ctx.week;

    for (entity, slot, plant, growth, health, state, perennial) in &mut plants {
        if perennial.is_some_and(|p| p.dormant) {
            continue;
        }
        let Some(def) = species.get(&plant.0) else {
            continue;
        };
        let in_window = def.harvest.in_window(week);
        let eligible = !growth.stage.is_immature() && health.value >= 0.3;

        match state {
            None => {
                // First week inside the window with a mature, healthy
                // plant: everything comes ripe at full quality.
                if in_window && eligible {
                    commands.entity(entity).insert(HarvestState {
                        ripe: true,
                        remaining: def.harvest.yield_potential,
                        quality: 1.0,
                    });
                    report.ripened.push((slot.row, slot.col, plant.0.clone()));
                }
            }
            Some(mut state) => {
                if !in_window {
                    state.ripe = false;
                } else if def.harvest.continuous_harvest
                    && !state.ripe
                    && state.remaining > 0
                    && eligible
                {
                    // The player picked; the plant pushes a fresh flush.
                    state.ripe = true;
                    report.ripened.push((slot.row, slot.col, plant.0.clone()));
                } else if state.ripe {
                    state.quality = (state.quality - NEGLECT_DECAY).max(QUALITY_FLOOR);
                }
            }
        }
    }
}
