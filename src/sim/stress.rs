//! Stress system — accumulate environmental stress, recover when
//! conditions are good, derive health.

use bevy::prelude::*;

use crate::shared::*;

/// Weekly recovery with no stressors at all.
const FULL_RECOVERY: f32 = 0.06;

/// Weekly recovery when the combined stress delta stays under this bar.
const MINOR_STRESS_BAR: f32 = 0.04;
const MINOR_RECOVERY: f32 = 0.02;

pub fn stress_accumulate(
    species: Res<SpeciesRegistry>,
    map: Res<GardenMap>,
    soils: Query<&Soil>,
    mut plants: Query<
        (&PlotSlot, &PlantSpecies, &ActiveConditions, &mut Health),
        Without<Dead>,
    >,
) {
    for (slot, plant, conditions, mut health) in &mut plants {
        let Some(def) = species.get(&plant.0) else {
            continue;
        };
        let Some(soil) = map.plots.get(&slot.pos()).and_then(|e| soils.get(*e).ok()) else {
            continue;
        };

        let delta = stress_delta(&def.needs, soil);

        if delta <= 0.0 {
            health.stress -= FULL_RECOVERY;
        } else if delta < MINOR_STRESS_BAR {
            health.stress -= MINOR_RECOVERY;
        } else {
            health.stress += delta;
        }
        health.stress = health.stress.clamp(0.0, 1.0);

        // Health folds stress together with how far along each active
        // condition is.
        let condition_load: f32 = conditions
            .0
            .iter()
            .map(|c| c.current_stage as f32)
            .sum();
        health.value = (1.0 - 0.7 * health.stress - 0.1 * condition_load).clamp(0.0, 1.0);
    }
}

/// Combined stress contribution for one week.
pub fn stress_delta(needs: &Needs, soil: &Soil) -> f32 {
    let mut delta = 0.0;

    // pH drift beyond the comfortable band.
    let ph_dev = (soil.ph - needs.ph).abs();
    if ph_dev > 0.8 {
        delta += (0.06 * (ph_dev - 0.8)).min(0.12);
    }

    // Moisture, split: drowning is slow, drying out is fast.
    if soil.moisture > needs.moisture + 0.25 {
        delta += 0.08;
    } else if soil.moisture < needs.moisture - 0.25 {
        delta += 0.10;
    }

    // Soil temperature contributes only past 10 °C of deviation.
    let temp_dev = (soil.temperature_c - needs.soil_temp_c).abs();
    if temp_dev > 10.0 {
        delta += (0.04 + 0.004 * (temp_dev - 10.0)).min(0.12);
    }

    // Each nutrient below half its ideal.
    for (value, ideal) in [
        (soil.nitrogen, needs.nitrogen),
        (soil.phosphorus, needs.phosphorus),
        (soil.potassium, needs.potassium),
    ] {
        if value < 0.5 * ideal {
            delta += 0.06;
        }
    }

    delta
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

    fn comfortable_soil() -> Soil {
        Soil {
            ph: 6.5,
            nitrogen: 0.6,
            phosphorus: 0.5,
            potassium: 0.6,
            organic_matter: 0.5,
            moisture: 0.6,
            compaction: 0.3,
            biology: 0.5,
            temperature_c: 21.0,
        }
    }

    #[test]
    fn comfortable_soil_adds_no_stress() {
        assert_eq!(stress_delta(&needs(), &comfortable_soil()), 0.0);
    }

    #[test]
    fn underwatering_outweighs_overwatering() {
        let mut dry = comfortable_soil();
        dry.moisture = 0.2;
        let mut wet = comfortable_soil();
        wet.moisture = 0.95;
        assert!(stress_delta(&needs(), &dry) > stress_delta(&needs(), &wet));
    }

    #[test]
    fn each_starved_nutrient_stacks() {
        let mut soil = comfortable_soil();
        soil.nitrogen = 0.1;
        let one = stress_delta(&needs(), &soil);
        soil.phosphorus = 0.1;
        soil.potassium = 0.1;
        let three = stress_delta(&needs(), &soil);
        assert!((three - one - 0.12).abs() < 1e-6);
    }
}
