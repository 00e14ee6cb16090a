//! Weather generation — the 30-week schedule fixed at session start.
//!
//! Everything is drawn from the session RNG in one fixed pass, so a given
//! `(zone, seed)` always produces the same season. Special events are rolled
//! at the top of each week: a new event's temperature bonus and
//! precipitation multiplier apply to the week it starts.

use crate::rng::GardenRng;
use crate::shared::*;

/// Weekly wind distribution: calm / light / moderate / strong.
const WIND_WEIGHTS: [f32; 4] = [0.25, 0.4, 0.25, 0.1];

const WIND_TABLE: [Wind; 4] = [Wind::Calm, Wind::Light, Wind::Moderate, Wind::Strong];

pub fn generate_weather(zone: &ZoneDef, rng: &mut GardenRng) -> Vec<WeekWeather> {
    let mut schedule = Vec::with_capacity(SEASON_WEEKS as usize);
    // Active special event and how many weeks it has left (including the
    // current one).
    let mut active: Option<(SpecialEvent, u32)> = None;

    for week in 0..SEASON_WEEKS {
        // ── Special events ─────────────────────────────────────────────
        // An active event suppresses new rolls until it expires.
        if active.is_none() {
            for candidate in &zone.events {
                if !event_eligible(&candidate.event, week, zone) {
                    continue;
                }
                if rng.chance(f64::from(candidate.weight)) {
                    active = Some((candidate.event, candidate.duration_weeks.max(1)));
                    break;
                }
            }
        }
        let special = active.map(|(event, _)| event);

        // ── Temperature ────────────────────────────────────────────────
        let bonus = special.map(|e| e.temp_bonus_c()).unwrap_or(0.0);
        let mean_high = zone.temp_curve_c[week as usize];
        let high = mean_high + rng.next_gaussian(0.0, f64::from(zone.variance)) as f32 + bonus;
        let low = high - rng.next_float(8.0, 14.0) as f32;

        // ── Precipitation ──────────────────────────────────────────────
        let mut precip = 20.0 * pattern_multiplier(zone.precip_pattern, week);
        match special {
            Some(SpecialEvent::Drought { moisture_penalty }) => {
                precip *= 1.0 - moisture_penalty;
            }
            Some(SpecialEvent::HeavyRain { flood_risk }) => {
                precip *= 2.0 + flood_risk;
            }
            _ => {}
        }
        precip *= rng.next() as f32 * 2.0;
        precip = precip.max(0.0);

        // ── Humidity ───────────────────────────────────────────────────
        let mut humidity = zone.humidity_baseline + rng.next_gaussian(0.0, 0.08) as f32;
        if precip > 15.0 {
            humidity += 0.1;
        }
        humidity = humidity.clamp(0.0, 1.0);

        // ── Wind ───────────────────────────────────────────────────────
        let wind = WIND_TABLE[rng.weighted_index(&WIND_WEIGHTS)];

        // ── Frost ──────────────────────────────────────────────────────
        // The roll always happens so the stream shape is week-invariant;
        // an active early frost overrides it, and the frost-free window
        // zeroes the probability.
        let roll = rng.next();
        let frost = matches!(special, Some(SpecialEvent::EarlyFrost))
            || roll < f64::from(zone.frost_probability(week));

        schedule.push(WeekWeather {
            week,
            temp_high_c: round1(high),
            temp_low_c: round1(low),
            precipitation_mm: round1(precip),
            humidity,
            wind,
            frost,
            special,
        });

        if let Some((event, remaining)) = active {
            active = match remaining - 1 {
                0 => None,
                left => Some((event, left)),
            };
        }
    }

    schedule
}

fn event_eligible(event: &SpecialEvent, week: u32, zone: &ZoneDef) -> bool {
    match event {
        SpecialEvent::EarlyFrost => week > zone.frost_free.0 + 10,
        SpecialEvent::IndianSummer { .. } => week > 15,
        _ => true,
    }
}

/// Seasonal precipitation shape. `winter_wet` is a U across the season,
/// `summer_wet` the inverse, `even` flat, `arid` a flat trickle.
fn pattern_multiplier(pattern: PrecipPattern, week: u32) -> f32 {
    let t = week as f32 / (SEASON_WEEKS - 1) as f32;
    let u = (2.0 * t - 1.0).powi(2);
    match pattern {
        PrecipPattern::WinterWet => 0.6 + 0.4 * u,
        PrecipPattern::SummerWet => 1.0 - 0.4 * u,
        PrecipPattern::Even => 1.0,
        PrecipPattern::Arid => 0.3,
    }
}

fn round1(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use bevy::prelude::World;

    fn zone(id: &str) -> ZoneDef {
        let mut world = World::new();
        data::insert_registries(&mut world);
        world.resource::<ZoneRegistry>().zones[id].clone()
    }

    #[test]
    fn thirty_weeks_and_no_more() {
        let zone = zone("zone_8a");
        let mut rng = GardenRng::new(42);
        let schedule = generate_weather(&zone, &mut rng);
        assert_eq!(schedule.len(), 30);
        assert_eq!(schedule.first().unwrap().week, 0);
        assert_eq!(schedule.last().unwrap().week, 29);
    }

    #[test]
    fn same_seed_same_season() {
        let zone = zone("zone_8a");
        let a = generate_weather(&zone, &mut GardenRng::new(1234));
        let b = generate_weather(&zone, &mut GardenRng::new(1234));
        assert_eq!(a, b);
    }

    #[test]
    fn lows_stay_below_highs_and_values_stay_sane() {
        let zone = zone("zone_5b");
        for seed in [0, 7, 42, 999] {
            let schedule = generate_weather(&zone, &mut GardenRng::new(seed));
            for week in &schedule {
                assert!(week.temp_low_c < week.temp_high_c);
                assert!(week.precipitation_mm >= 0.0);
                assert!((0.0..=1.0).contains(&week.humidity));
            }
        }
    }

    #[test]
    fn no_frost_before_the_window_ends_without_an_early_frost() {
        let zone = zone("zone_8a");
        for seed in [0, 7, 42, 999, 31337] {
            let schedule = generate_weather(&zone, &mut GardenRng::new(seed));
            for week in &schedule {
                if week.week < zone.frost_free.1 {
                    let early = matches!(week.special, Some(SpecialEvent::EarlyFrost));
                    assert!(!week.frost || early, "frost at week {} without early frost", week.week);
                }
            }
        }
    }

    #[test]
    fn frost_probability_hits_half_at_the_average_week() {
        let zone = zone("zone_8a");
        let p = zone.frost_probability(zone.first_frost_week_avg as u32);
        assert!((p - 0.5).abs() < 1e-6);
        assert_eq!(zone.frost_probability(zone.frost_free.1 - 1), 0.0);
    }

    #[test]
    fn active_events_persist_and_suppress_new_ones() {
        let zone = zone("zone_10b");
        for seed in 0..20u64 {
            let schedule = generate_weather(&zone, &mut GardenRng::new(seed));
            let mut runs: Vec<(usize, &SpecialEvent)> = Vec::new();
            for week in &schedule {
                if let Some(event) = &week.special {
                    match runs.last_mut() {
                        Some((count, last)) if *last == event => *count += 1,
                        _ => runs.push((1, event)),
                    }
                }
            }
            for (count, event) in runs {
                let max = zone
                    .events
                    .iter()
                    .filter(|s| s.event.label() == event.label())
                    .map(|s| s.duration_weeks as usize)
                    .max()
                    .unwrap_or(1);
                // Back-to-back rolls of the same kind can chain runs, so a
                // run is only ever a multiple of a single duration.
                assert!(count <= max * 3, "event ran {count} weeks");
            }
        }
    }
}
