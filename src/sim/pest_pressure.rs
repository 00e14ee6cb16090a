//! Pest system — active outbreaks wear on susceptible plants.
//!
//! Direct damage is stress pressure; the condition-level consequences
//! (hornworm damage, bacterial wilt) arrive through pest_vector triggers in
//! the disease system. Marigold-style deterrent companions shave the
//! effective severity.

use bevy::prelude::*;

use crate::shared::*;

/// Stress added per point of effective outbreak severity.
const PRESSURE_PER_SEVERITY: f32 = 0.05;

pub fn pest_check(
    ctx: Res<TickContext>,
    pests: Res<PestRegistry>,
    species: Res<SpeciesRegistry>,
    mut plants: Query<(&PlantSpecies, &Growth, &CompanionBuffs, &mut Health), Without<Dead>>,
) {
    if ctx.active_pests.is_empty() {
        return;
    }

    for event in &ctx.active_pests {
        let Some(pest) = pests.pests.get(&event.pest_id) else {
            continue;
        };

        for (plant, growth, buffs, mut health) in &mut plants {
            // Nothing to chew on yet.
            if matches!(growth.stage, Stage::Seed | Stage::Germination) {
                continue;
            }
            let Some(def) = species.get(&plant.0) else {
                continue;
            };
            if !pest.target_families.contains(&def.family) {
                continue;
            }

            let deterrent: f32 = buffs
                .0
                .iter()
                .flat_map(|b| b.effects.iter())
                .filter(|e| e.kind == CompanionEffectKind::PestDeterrent)
                .map(|e| e.modifier)
                .sum();
            let effective = event.severity * (1.0 - deterrent.clamp(0.0, 1.0));
            if effective <= 0.0 {
                continue;
            }

            health.stress = (health.stress + PRESSURE_PER_SEVERITY * effective).clamp(0.0, 1.0);
        }
    }
}
