//! Growth system — limiting-factor progress and stage advancement.

use bevy::prelude::*;

use crate::shared::*;

pub fn growth_tick(
    species: Res<SpeciesRegistry>,
    map: Res<GardenMap>,
    soils: Query<&Soil>,
    mut plants: Query<
        (
            &PlotSlot,
            &PlantSpecies,
            &Health,
            &CompanionBuffs,
            &mut Growth,
            Option<&Perennial>,
        ),
        Without<Dead>,
    >,
) {
    for (slot, plant, health, buffs, mut growth, perennial) in &mut plants {
        if perennial.is_some_and(|p| p.dormant) {
            continue;
        }
        let Some(def) = species.get(&plant.0) else {
            continue;
        };
        let Some(soil) = map.plots.get(&slot.pos()).and_then(|e| soils.get(*e).ok()) else {
            continue;
        };

        let limiting = limiting_factor(&def.needs, soil);

        let mut companion_bonus = 0.0;
        let mut allelopathy = 0.0;
        for buff in &buffs.0 {
            for effect in &buff.effects {
                match effect.kind {
                    CompanionEffectKind::GrowthRate => companion_bonus += effect.modifier,
                    CompanionEffectKind::Allelopathy => allelopathy += effect.modifier,
                    CompanionEffectKind::PestDeterrent => {}
                }
            }
        }

        let delta = def.base_rate()
            * limiting
            * (1.0 - 0.7 * health.stress)
            * (1.0 + companion_bonus)
            * (1.0 - allelopathy.min(1.0))
            * growth.rate_modifier;

        growth.progress = (growth.progress + delta.max(0.0)).clamp(0.0, 1.0);
        growth.stage = def.stage_for_progress(growth.progress);
    }
}

/// Liebig's law: growth runs at the rate of the scarcest input. Each input
/// is a Gaussian fit of the observed value against the species ideal, with
/// the width set by the species' tolerance bands.
pub fn limiting_factor(needs: &Needs, soil: &Soil) -> f32 {
    let fits = [
        gaussian_fit(soil.ph, needs.ph, ToleranceBand::Typical.ph_sigma()),
        gaussian_fit(soil.moisture, needs.moisture, needs.water_band.moisture_sigma()),
        gaussian_fit(soil.temperature_c, needs.soil_temp_c, needs.temp_band.temp_sigma()),
        gaussian_fit(soil.nitrogen, needs.nitrogen, needs.nutrient_band.nutrient_sigma()),
        gaussian_fit(soil.phosphorus, needs.phosphorus, needs.nutrient_band.nutrient_sigma()),
        gaussian_fit(soil.potassium, needs.potassium, needs.nutrient_band.nutrient_sigma()),
    ];
    fits.into_iter().fold(1.0_f32, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs() -> Needs {
        Needs {
            ph: 6.5,
            moisture: 0.6,
            soil_temp_c: 21.0,
            nitrogen: 0.6,
            phosphorus: 0.5,
            potassium: 0.6,
            sun: SunExposure::Full,
            temp_band: ToleranceBand::Typical,
            water_band: ToleranceBand::Typical,
            nutrient_band: ToleranceBand::Typical,
            nutrient_demand: 1.0,
        }
    }

    #[test]
    fn ideal_soil_scores_near_one() {
        let soil = Soil {
            ph: 6.5,
            nitrogen: 0.6,
            phosphorus: 0.5,
            potassium: 0.6,
            organic_matter: 0.5,
            moisture: 0.6,
            compaction: 0.3,
            biology: 0.5,
            temperature_c: 21.0,
        };
        assert!(limiting_factor(&needs(), &soil) > 0.99);
    }

    #[test]
    fn the_worst_input_dominates() {
        let mut soil = Soil {
            ph: 6.5,
            nitrogen: 0.6,
            phosphorus: 0.5,
            potassium: 0.6,
            organic_matter: 0.5,
            moisture: 0.6,
            compaction: 0.3,
            biology: 0.5,
            temperature_c: 21.0,
        };
        soil.nitrogen = 0.05;
        let factor = limiting_factor(&needs(), &soil);
        let nitrogen_fit = gaussian_fit(0.05, 0.6, ToleranceBand::Typical.nutrient_sigma());
        assert!((factor - nitrogen_fit).abs() < 1e-6);
    }
}
