//! Companion system — rebuilds every plant's neighbor buffs each tick.
//!
//! Buffs never accumulate: the component is cleared and rebuilt from the
//! current neighborhood, so pulling a companion takes effect the very next
//! week.

use bevy::prelude::*;

use crate::shared::*;

pub fn companion_effects(
    species: Res<SpeciesRegistry>,
    mut plants: Query<(Entity, &PlotSlot, &PlantSpecies, &mut CompanionBuffs), Without<Dead>>,
) {
    // Snapshot the living neighborhood in query order.
    let neighborhood: Vec<(Entity, (i32, i32), SpeciesId)> = plants
        .iter()
        .map(|(entity, slot, plant, _)| (entity, slot.pos(), plant.0.clone()))
        .collect();

    for (entity, slot, plant, mut buffs) in &mut plants {
        buffs.0.clear();

        let Some(def) = species.get(&plant.0) else {
            continue;
        };

        for (other_entity, other_pos, other_species) in &neighborhood {
            if *other_entity == entity {
                continue;
            }
            let distance = chebyshev(slot.pos(), *other_pos);

            // Companion and antagonist rules are both keyed by the
            // neighbor's species; effects apply only inside their radius.
            let rules = def
                .companions
                .iter()
                .chain(def.antagonists.iter())
                .filter(|rule| &rule.species == other_species);

            for rule in rules {
                let effects: Vec<CompanionEffect> = rule
                    .effects
                    .iter()
                    .filter(|effect| distance <= effect.radius)
                    .copied()
                    .collect();
                if !effects.is_empty() {
                    buffs.0.push(CompanionBuff {
                        source: other_species.clone(),
                        effects,
                    });
                }
            }
        }
    }
}
