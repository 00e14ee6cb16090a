//! Pest schedule generation.
//!
//! Runs on its own RNG sub-stream (game seed XOR a fixed mask) so the
//! schedule is identical whether or not weather was generated first. Zone
//! pest ids with no catalog entry are skipped without consuming rolls.

use crate::rng::{GardenRng, PEST_STREAM_MASK};
use crate::shared::*;

pub fn generate_pest_schedule(
    zone: &ZoneDef,
    registry: &PestRegistry,
    seed: u64,
) -> Vec<PestEvent> {
    let mut rng = GardenRng::sub_stream(seed, PEST_STREAM_MASK);
    let mut schedule: Vec<PestEvent> = Vec::new();

    for (pest_id, weight) in &zone.pests {
        let Some(def) = registry.pests.get(pest_id) else {
            continue;
        };
        // (arrival, duration) of the most recent accepted outbreak.
        let mut last: Option<(u32, u32)> = None;

        for week in def.earliest_week..SEASON_WEEKS {
            if !rng.chance(f64::from(*weight)) {
                continue;
            }
            if let Some((arrival, duration)) = last {
                if week < arrival + duration + def.min_gap_weeks {
                    continue;
                }
            }
            let severity = rng.next_float(
                f64::from(def.severity_range.0),
                f64::from(def.severity_range.1),
            ) as f32;
            let duration_weeks = rng.next_int(
                i64::from(def.duration_range.0),
                i64::from(def.duration_range.1),
            ) as u32;
            schedule.push(PestEvent {
                pest_id: pest_id.clone(),
                arrival_week: week,
                severity,
                duration_weeks,
            });
            last = Some((week, duration_weeks));
        }
    }

    schedule.sort_by_key(|event| event.arrival_week);
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use crate::weather::generate_weather;
    use bevy::prelude::World;

    fn fixtures(id: &str) -> (ZoneDef, PestRegistry) {
        let mut world = World::new();
        data::insert_registries(&mut world);
        let zone = world.resource::<ZoneRegistry>().zones[id].clone();
        let pests = world.resource::<PestRegistry>().clone();
        (zone, pests)
    }

    #[test]
    fn schedule_is_independent_of_weather_generation() {
        let (zone, pests) = fixtures("zone_8a");

        let alone = generate_pest_schedule(&zone, &pests, 777);

        let mut rng = GardenRng::new(777);
        let _weather = generate_weather(&zone, &mut rng);
        let after_weather = generate_pest_schedule(&zone, &pests, 777);

        assert_eq!(alone, after_weather);
    }

    #[test]
    fn events_arrive_sorted_with_gaps_respected() {
        let (zone, pests) = fixtures("zone_10b");
        for seed in [0u64, 42, 777, 4096] {
            let schedule = generate_pest_schedule(&zone, &pests, seed);
            for pair in schedule.windows(2) {
                assert!(pair[0].arrival_week <= pair[1].arrival_week);
            }
            for (pest_id, _) in &zone.pests {
                let Some(def) = pests.pests.get(pest_id) else { continue };
                let mine: Vec<&PestEvent> =
                    schedule.iter().filter(|e| &e.pest_id == pest_id).collect();
                for pair in mine.windows(2) {
                    assert!(
                        pair[1].arrival_week
                            >= pair[0].arrival_week + pair[0].duration_weeks + def.min_gap_weeks
                    );
                    assert!(pair[1].arrival_week >= def.earliest_week);
                }
            }
        }
    }

    #[test]
    fn unknown_zone_pests_are_silently_ignored() {
        // zone_5b lists leaf_miners, which has no catalog entry.
        let (zone, pests) = fixtures("zone_5b");
        assert!(zone.pests.iter().any(|(id, _)| id == "leaf_miners"));
        for seed in [0u64, 9, 1234] {
            let schedule = generate_pest_schedule(&zone, &pests, seed);
            assert!(schedule.iter().all(|e| e.pest_id != "leaf_miners"));
        }
    }

    #[test]
    fn severities_and_durations_stay_in_their_ranges() {
        let (zone, pests) = fixtures("zone_8a");
        let schedule = generate_pest_schedule(&zone, &pests, 123);
        for event in &schedule {
            let def = &pests.pests[&event.pest_id];
            assert!(event.severity >= def.severity_range.0);
            assert!(event.severity <= def.severity_range.1);
            assert!(event.duration_weeks >= def.duration_range.0);
            assert!(event.duration_weeks <= def.duration_range.1);
        }
    }
}
