//! Built-in climate zones.
//!
//! Each zone carries a 30-week mean-high curve, a precipitation pattern,
//! its frost geometry, and weighted special-event / pest maps. Event and
//! pest lists are ordered: the weather and pest generators roll them in
//! list order, so reordering entries changes seeds' outcomes.

use crate::shared::*;

pub fn populate_zones(registry: &mut ZoneRegistry) {
    let zones: Vec<ZoneDef> = vec![
        // ── zone_8a — maritime, mild, winter-wet ───────────────────────────
        ZoneDef {
            id: "zone_8a".into(),
            name: "Zone 8a (maritime)".into(),
            temp_curve_c: vec![
                19.0, 19.5, 20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, // 0-9
                27.5, 28.0, 28.5, 28.5, 28.0, 27.5, 27.0, 26.0, 25.0, 23.5, // 10-19
                22.0, 20.5, 19.0, 17.5, 16.0, 15.0, 14.0, 13.0, 12.5, 12.0, // 20-29
            ],
            variance: 1.5,
            precip_pattern: PrecipPattern::WinterWet,
            frost_free: (2, 21),
            first_frost_week_avg: 24.0,
            humidity_baseline: 0.6,
            events: vec![
                ZoneEventSpec {
                    event: SpecialEvent::HeavyRain { flood_risk: 0.5 },
                    weight: 0.08,
                    duration_weeks: 1,
                },
                ZoneEventSpec {
                    event: SpecialEvent::Drought { moisture_penalty: 0.15 },
                    weight: 0.05,
                    duration_weeks: 2,
                },
                ZoneEventSpec {
                    event: SpecialEvent::Heatwave { temp_bonus_c: 5.0 },
                    weight: 0.06,
                    duration_weeks: 1,
                },
                ZoneEventSpec {
                    event: SpecialEvent::IndianSummer { temp_bonus_c: 4.0 },
                    weight: 0.05,
                    duration_weeks: 2,
                },
            ],
            pests: vec![
                ("aphids".into(), 0.12),
                ("hornworms".into(), 0.10),
                ("cucumber_beetles".into(), 0.08),
                ("cabbage_moths".into(), 0.08),
                ("spider_mites".into(), 0.05),
            ],
        },
        // ── zone_5b — continental, short season, early frost ───────────────
        ZoneDef {
            id: "zone_5b".into(),
            name: "Zone 5b (continental)".into(),
            temp_curve_c: vec![
                15.0, 16.0, 17.0, 19.0, 21.0, 23.0, 25.0, 26.0, 27.0, 27.0, // 0-9
                26.0, 25.0, 24.0, 23.0, 22.0, 20.0, 18.0, 16.0, 14.0, 12.0, // 10-19
                11.0, 10.0, 9.0, 8.0, 8.0, 7.0, 7.0, 6.0, 6.0, 5.0, // 20-29
            ],
            variance: 2.0,
            precip_pattern: PrecipPattern::Even,
            frost_free: (4, 17),
            first_frost_week_avg: 19.0,
            humidity_baseline: 0.55,
            events: vec![
                ZoneEventSpec {
                    event: SpecialEvent::EarlyFrost,
                    weight: 0.07,
                    duration_weeks: 1,
                },
                ZoneEventSpec {
                    event: SpecialEvent::Heatwave { temp_bonus_c: 6.0 },
                    weight: 0.05,
                    duration_weeks: 1,
                },
                ZoneEventSpec {
                    event: SpecialEvent::HeavyRain { flood_risk: 0.6 },
                    weight: 0.07,
                    duration_weeks: 1,
                },
                ZoneEventSpec {
                    event: SpecialEvent::IndianSummer { temp_bonus_c: 5.0 },
                    weight: 0.06,
                    duration_weeks: 2,
                },
            ],
            pests: vec![
                ("aphids".into(), 0.10),
                ("cabbage_moths".into(), 0.12),
                ("spider_mites".into(), 0.06),
                // Regional pest with no schedule entry yet; the generator
                // ignores ids it cannot resolve.
                ("leaf_miners".into(), 0.04),
            ],
        },
        // ── zone_10b — hot, arid, effectively frost-free ───────────────────
        ZoneDef {
            id: "zone_10b".into(),
            name: "Zone 10b (arid)".into(),
            temp_curve_c: vec![
                24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0, 33.0, // 0-9
                34.0, 34.0, 34.0, 33.5, 33.0, 32.5, 32.0, 31.0, 30.0, 29.5, // 10-19
                29.0, 28.5, 28.0, 27.5, 27.0, 26.5, 26.0, 25.5, 25.0, 24.5, // 20-29
            ],
            variance: 1.2,
            precip_pattern: PrecipPattern::Arid,
            frost_free: (0, 28),
            first_frost_week_avg: 33.0,
            humidity_baseline: 0.4,
            events: vec![
                ZoneEventSpec {
                    event: SpecialEvent::Drought { moisture_penalty: 0.2 },
                    weight: 0.12,
                    duration_weeks: 3,
                },
                ZoneEventSpec {
                    event: SpecialEvent::Heatwave { temp_bonus_c: 6.0 },
                    weight: 0.10,
                    duration_weeks: 2,
                },
            ],
            pests: vec![
                ("aphids".into(), 0.15),
                ("spider_mites".into(), 0.12),
                ("hornworms".into(), 0.08),
                ("squash_bugs".into(), 0.06),
            ],
        },
    ];

    for zone in zones {
        registry.zones.insert(zone.id.clone(), zone);
    }
}
