//! Headless integration tests for Rootbound.
//!
//! These drive full sessions through the public action API, and in a few
//! places tick the ECS world directly with a synthetic context to pin down
//! boundary behavior. No terminal, no I/O (except the tempfile round
//! trip).
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;

use rootbound::eventlog::{EndReason, GameEvent};
use rootbound::save;
use rootbound::session::GameSession;
use rootbound::shared::*;
use rootbound::sim;

// ─────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────

/// Drive the session from its starting DAWN into the week's ACT phase.
fn to_act(session: &mut GameSession) {
    session.advance_until_act().unwrap();
    assert_eq!(session.phase(), Phase::Act);
}

/// A mild synthetic week for direct-tick tests.
fn mild_weather(week: u32) -> WeekWeather {
    WeekWeather {
        week,
        temp_high_c: 24.0,
        temp_low_c: 14.0,
        precipitation_mm: 10.0,
        humidity: 0.5,
        wind: Wind::Light,
        frost: false,
        special: None,
    }
}

fn mild_ctx(week: u32) -> TickContext {
    TickContext {
        week,
        weather: mild_weather(week),
        // Far enough out that the frost roll can never succeed.
        first_frost_week_avg: 90.0,
        frost_free: (0, 80),
        active_pests: Vec::new(),
    }
}

/// Assert the universal invariants on a session's world.
fn assert_invariants(session: &mut GameSession) {
    for plant in session.plants() {
        assert!((0.0..=1.0).contains(&plant.health), "health out of range");
        assert!((0.0..=1.0).contains(&plant.stress), "stress out of range");
        assert!(
            (0.0..=1.0).contains(&plant.progress),
            "progress out of range"
        );
        let mut seen: Vec<&str> = Vec::new();
        for condition in &plant.conditions {
            assert!(
                (0.0..=1.0).contains(&condition.severity),
                "severity out of range"
            );
            assert!(
                !seen.contains(&condition.condition_id.as_str()),
                "duplicate condition {}",
                condition.condition_id
            );
            seen.push(&condition.condition_id);
        }
    }
    // At most one plant and one weed per cell.
    let plants = session.plants();
    for (i, a) in plants.iter().enumerate() {
        for b in plants.iter().skip(i + 1) {
            assert!(
                (a.row, a.col) != (b.row, b.col),
                "two plants share ({}, {})",
                a.row,
                a.col
            );
        }
    }
    let weeds = session.weeds();
    for (i, a) in weeds.iter().enumerate() {
        for b in weeds.iter().skip(i + 1) {
            assert!((a.row, a.col) != (b.row, b.col));
        }
    }
    // Soil ranges.
    let (rows, cols) = session.grid_size();
    for row in 0..rows {
        for col in 0..cols {
            let soil = session.soil_at(row, col).unwrap();
            assert!((3.0..=10.0).contains(&soil.ph));
            for value in [
                soil.nitrogen,
                soil.phosphorus,
                soil.potassium,
                soil.organic_matter,
                soil.moisture,
                soil.compaction,
                soil.biology,
            ] {
                assert!((0.0..=1.0).contains(&value), "soil field out of range");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario A — deterministic tomato-and-basil harvest
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_a_tomato_and_basil_reach_harvest() {
    let mut session = GameSession::new("zone_8a", 42).unwrap();
    to_act(&mut session);
    assert_eq!(session.current_week(), 0);

    session.plant_action("tomato_cherokee_purple", 0, 0).unwrap();
    session.plant_action("basil_genovese", 0, 1).unwrap();

    // Run full weeks until the ACT of (display) week 16.
    while session.current_week() < 15 {
        session.advance_until_act().unwrap();
        assert_invariants(&mut session);

        if session.current_week() == 14 {
            for pos in [(0, 0), (0, 1)] {
                let plant = session.plant_at(pos.0, pos.1).unwrap();
                assert!(
                    plant.stage >= Stage::Fruiting,
                    "{} only reached {} by week 14",
                    plant.species,
                    plant.stage
                );
            }
        }
    }

    assert!(!session.is_run_ended());
    for pos in [(0, 0), (0, 1)] {
        let plant = session.plant_at(pos.0, pos.1).unwrap();
        assert!(!plant.dead);
        let harvest = plant.harvest.expect("harvest state by week 15");
        assert!(harvest.ripe, "{} not ripe by week 15", plant.species);
    }

    // The log is exactly RUN_START, PLANT, PLANT, ADVANCE_WEEK × 15.
    let labels: Vec<&str> = session
        .log()
        .entries()
        .iter()
        .map(|e| e.event.label())
        .collect();
    let mut expected = vec!["RUN_START", "PLANT", "PLANT"];
    expected.extend(std::iter::repeat("ADVANCE_WEEK").take(15));
    assert_eq!(labels, expected);
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario B — killing frost ends the run
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_b_killing_frost_ends_the_run() {
    // zone_5b: frost-free window ends week 17, average first frost week 19.
    let mut session = GameSession::new("zone_5b", 0).unwrap();
    to_act(&mut session);
    session.plant_action("tomato_cherokee_purple", 1, 1).unwrap();

    let mut frost_week = None;
    let mut killed: Vec<SpeciesId> = Vec::new();
    while !session.is_run_ended() {
        let _ = session.advance_until_act();
        if let Some(report) = session.consume_last_dusk_result() {
            if report.frost.killing_frost {
                frost_week = Some(report.week);
                killed = report.frost.killed.clone();
            }
        }
    }

    let frost_week = frost_week.expect("a killing frost before the season ends");
    // Either the sigmoid fired past the frost-free window, or a scheduled
    // early-frost event overrode it; both paths are gated past week 14.
    assert!(frost_week >= 15, "frost arrived impossibly early");
    assert_eq!(session.end_reason(), Some(EndReason::Frost));
    assert!(killed.contains(&"tomato_cherokee_purple".to_string()));
    assert!(session.plant_at(1, 1).unwrap().dead);

    // The log records the ending, and the session refuses further actions.
    let events = session.log().to_events();
    assert!(matches!(
        events.last(),
        Some(GameEvent::RunEnd {
            reason: EndReason::Frost
        })
    ));
    assert!(matches!(
        session.plant_action("basil_genovese", 0, 0),
        Err(GameError::RunEnded)
    ));
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario C — diagnosis and successful treatment
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_c_correct_treatment_resolves_the_condition() {
    let mut session = GameSession::new("zone_8a", 7).unwrap();
    to_act(&mut session);
    session.plant_action("tomato_cherokee_purple", 0, 0).unwrap();

    // Force a mild early blight onto the plant.
    let week = session.current_week();
    let entity = session.world_mut().resource::<GardenMap>().plants[&(0, 0)];
    session
        .world_mut()
        .get_mut::<ActiveConditions>(entity)
        .unwrap()
        .0
        .push(ConditionEntry {
            condition_id: "early_blight".into(),
            onset_week: week,
            current_stage: 0,
            severity: 0.15,
        });

    session
        .intervene_action("spray_fungicide", 0, 0, Some("early_blight"))
        .unwrap();

    let mut outcome = None;
    for _ in 0..4 {
        session.advance_until_act().unwrap();
        if let Some(report) = session.consume_last_dusk_result() {
            if let Some(result) = report.treatment_outcomes.first() {
                outcome = Some(result.clone());
                break;
            }
        }
    }

    let outcome = outcome.expect("treatment feedback within four weeks");
    assert_eq!(outcome.result, TreatmentResult::Resolved);
    assert_eq!(outcome.target_condition.as_deref(), Some("early_blight"));

    let plant = session.plant_at(0, 0).unwrap();
    assert!(
        !plant.conditions.iter().any(|c| c.condition_id == "early_blight"),
        "early blight should be gone"
    );
    let treatments = session
        .world_mut()
        .get::<ActiveTreatments>(entity)
        .unwrap();
    assert!(treatments.0.is_empty(), "treatment should be consumed");
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario D — wrong diagnosis worsens every condition
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_d_wrong_diagnosis_worsens_every_condition() {
    let mut session = GameSession::new("zone_8a", 9).unwrap();
    to_act(&mut session);
    session.plant_action("tomato_cherokee_purple", 0, 0).unwrap();

    let week = session.current_week();
    let entity = session.world_mut().resource::<GardenMap>().plants[&(0, 0)];
    {
        let mut conditions = session
            .world_mut()
            .get_mut::<ActiveConditions>(entity)
            .unwrap();
        conditions.0.push(ConditionEntry {
            condition_id: "early_blight".into(),
            onset_week: week,
            current_stage: 0,
            severity: 0.3,
        });
        conditions.0.push(ConditionEntry {
            condition_id: "hornworm_damage".into(),
            onset_week: week,
            current_stage: 0,
            severity: 0.2,
        });
    }

    // The tomato does not have nitrogen deficiency.
    session
        .intervene_action("amend_soil", 0, 0, Some("nitrogen_deficiency"))
        .unwrap();

    let mut outcome = None;
    let mut feedback_week = week;
    for _ in 0..4 {
        session.advance_until_act().unwrap();
        if let Some(report) = session.consume_last_dusk_result() {
            if let Some(result) = report.treatment_outcomes.first() {
                outcome = Some(result.clone());
                feedback_week = report.week;
                break;
            }
        }
    }

    let outcome = outcome.expect("treatment feedback within four weeks");
    assert_eq!(outcome.result, TreatmentResult::Worsened);

    // Progression added 0.05 per elapsed week; the botched intervention
    // added 0.1 on top of that to every condition.
    let elapsed = (feedback_week - week) as f32;
    let plant = session.plant_at(0, 0).unwrap();
    let blight = plant
        .conditions
        .iter()
        .find(|c| c.condition_id == "early_blight")
        .unwrap();
    let hornworm = plant
        .conditions
        .iter()
        .find(|c| c.condition_id == "hornworm_damage")
        .unwrap();
    assert!((blight.severity - (0.3 + 0.05 * elapsed + 0.1)).abs() < 1e-4);
    assert!((hornworm.severity - (0.2 + 0.05 * elapsed + 0.1)).abs() < 1e-4);
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario E — runner spread of mint
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_e_mint_runs_into_an_empty_neighbor() {
    let mut session = GameSession::new("zone_10b", 11).unwrap();
    to_act(&mut session);
    session.plant_action("mint_spearmint", 1, 1).unwrap();

    // Force the mint into its vegetative stage, then tick the world
    // directly with a frost-proof synthetic context.
    let entity = session.world_mut().resource::<GardenMap>().plants[&(1, 1)];
    session.world_mut().entity_mut(entity).insert(Growth {
        progress: 0.35,
        stage: Stage::Vegetative,
        rate_modifier: 1.0,
    });

    let mut schedule = sim::build_tick_schedule();
    let mut first_spawn = None;
    for tick in 0..50 {
        let report = sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(10));
        if first_spawn.is_none() {
            if let Some(spawn) = report.runner_spawns.first() {
                first_spawn = Some((spawn.clone(), tick));
            }
        }
    }

    let ((row, col, species), _) = first_spawn.expect("mint should spread within 50 ticks");
    assert_eq!(species, "mint_spearmint");
    assert_eq!(
        chebyshev((row, col), (1, 1)),
        1,
        "first runner must land in a Chebyshev-1 neighbor"
    );

    // Grid uniqueness still holds: no runner ever landed on an occupied
    // plot, and every mint is inside the grid.
    assert_invariants(&mut session);
    for plant in session.plants() {
        assert!((0..3).contains(&plant.row) && (0..3).contains(&plant.col));
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Determinism & event-log laws
// ─────────────────────────────────────────────────────────────────────────

fn scripted_run(seed: u64) -> GameSession {
    let mut session = GameSession::new("zone_8a", seed).unwrap();
    to_act(&mut session);
    session.plant_action("tomato_cherokee_purple", 0, 0).unwrap();
    session.plant_action("basil_genovese", 0, 1).unwrap();
    session.plant_action("kale_lacinato", 2, 2).unwrap();
    session.amend_action(1, 1, "compost").unwrap();
    for _ in 0..12 {
        session.advance_until_act().unwrap();
    }
    session.scout_action("north fence").unwrap();
    session.diagnose_action(0, 0).unwrap();
    session
}

#[test]
fn identical_inputs_produce_identical_worlds() {
    let mut a = scripted_run(99);
    let mut b = scripted_run(99);

    assert_eq!(a.plants(), b.plants());
    assert_eq!(a.weeds(), b.weeds());
    assert_eq!(a.log().to_events(), b.log().to_events());
    assert_eq!(a.score(), b.score());
    let (rows, cols) = a.grid_size();
    for row in 0..rows {
        for col in 0..cols {
            assert_eq!(a.soil_at(row, col), b.soil_at(row, col));
        }
    }
}

#[test]
fn replaying_the_log_rebuilds_the_same_world() {
    let mut original = scripted_run(4242);
    let events = original.log().to_events();

    let mut replayed = GameSession::replay_events(&events).unwrap();

    assert_eq!(original.plants(), replayed.plants());
    assert_eq!(original.weeds(), replayed.weeds());
    assert_eq!(original.current_week(), replayed.current_week());
    assert_eq!(original.phase(), replayed.phase());
    assert_eq!(original.log().to_events(), replayed.log().to_events());
}

#[test]
fn save_load_reserialize_is_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mid_season.json");

    let session = scripted_run(1337);
    save::save_to_path(&session, &path).unwrap();
    let first_json = std::fs::read_to_string(&path).unwrap();

    let loaded = save::load_from_path(&path).unwrap();
    let path2 = dir.path().join("again.json");
    save::save_to_path(&loaded, &path2).unwrap();
    let second_json = std::fs::read_to_string(&path2).unwrap();

    assert_eq!(first_json, second_json);
}

#[test]
fn a_full_season_upholds_the_invariants_and_stops_at_week_30() {
    let mut session = GameSession::new("zone_8a", 123).unwrap();
    to_act(&mut session);
    session.plant_action("kale_lacinato", 0, 0).unwrap();
    session.plant_action("strawberry_alpine", 2, 0).unwrap();

    let mut dead_snapshot: Vec<(i32, i32, Stage, usize)> = Vec::new();
    while !session.is_run_ended() {
        let _ = session.advance_until_act();
        assert_invariants(&mut session);

        // Dead plants never change stage or gain conditions.
        for (row, col, stage, conditions) in &dead_snapshot {
            let plant = session.plant_at(*row, *col).unwrap();
            assert!(plant.dead, "Dead is terminal");
            assert_eq!(plant.stage, *stage);
            assert_eq!(plant.conditions.len(), *conditions);
        }
        dead_snapshot = session
            .plants()
            .iter()
            .filter(|p| p.dead)
            .map(|p| (p.row, p.col, p.stage, p.conditions.len()))
            .collect();
    }

    assert!(session.current_week() <= SEASON_WEEKS);
    assert!(session.end_reason().is_some());
    // Week 30 is never generated.
    assert_eq!(session.weather_schedule().len(), 30);
    assert!(session
        .pest_schedule()
        .iter()
        .all(|p| p.arrival_week < SEASON_WEEKS));
}

// ─────────────────────────────────────────────────────────────────────────
// Boundary behavior (direct ticks)
// ─────────────────────────────────────────────────────────────────────────

/// Spawn a mature, healthy plant directly into the session world.
fn force_plant(session: &mut GameSession, species: &str, row: i32, col: i32) -> Entity {
    let entity = session
        .world_mut()
        .spawn((
            PlotSlot { row, col },
            PlantSpecies(species.to_string()),
            Growth {
                progress: 0.6,
                stage: Stage::Fruiting,
                rate_modifier: 1.0,
            },
            Health {
                value: 1.0,
                stress: 0.0,
            },
            ActiveConditions::default(),
            ActiveTreatments::default(),
            CompanionBuffs::default(),
        ))
        .id();
    session
        .world_mut()
        .resource_mut::<GardenMap>()
        .plants
        .insert((row, col), entity);
    entity
}

#[test]
fn harvest_window_edges_both_ripen() {
    // cucumber_marketmore ripens inside weeks 9..=24.
    let mut session = GameSession::new("zone_10b", 3).unwrap();
    let mut schedule = sim::build_tick_schedule();

    let early = force_plant(&mut session, "cucumber_marketmore", 0, 0);
    let report = sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(9));
    assert!(report.ripened.iter().any(|(r, c, _)| (*r, *c) == (0, 0)));
    assert!(session.world_mut().get::<HarvestState>(early).unwrap().ripe);

    let late = force_plant(&mut session, "cucumber_marketmore", 0, 1);
    let report = sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(24));
    assert!(report.ripened.iter().any(|(r, c, _)| (*r, *c) == (0, 1)));
    assert!(session.world_mut().get::<HarvestState>(late).unwrap().ripe);

    // One week past the window, ripeness drops.
    sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(25));
    assert!(!session.world_mut().get::<HarvestState>(late).unwrap().ripe);
}

#[test]
fn lethal_condition_kills_exactly_on_schedule() {
    // bacterial_wilt kills cucumbers four weeks after onset.
    let mut session = GameSession::new("zone_10b", 5).unwrap();
    let mut schedule = sim::build_tick_schedule();
    let entity = force_plant(&mut session, "cucumber_marketmore", 1, 1);
    session
        .world_mut()
        .get_mut::<ActiveConditions>(entity)
        .unwrap()
        .0
        .push(ConditionEntry {
            condition_id: "bacterial_wilt".into(),
            onset_week: 10,
            current_stage: 0,
            severity: 0.2,
        });

    for week in 11..=13 {
        sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(week));
        assert!(
            session.world_mut().get::<Dead>(entity).is_none(),
            "died early at week {week}"
        );
    }
    let report = sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(14));
    assert!(session.world_mut().get::<Dead>(entity).is_some());
    assert!(report
        .deaths
        .iter()
        .any(|(r, c, _, cause)| (*r, *c) == (1, 1) && *cause == DeathCause::Disease));
}

#[test]
fn pull_plant_resolves_by_killing() {
    let mut session = GameSession::new("zone_8a", 21).unwrap();
    to_act(&mut session);
    session.plant_action("lettuce_buttercrunch", 0, 2).unwrap();
    session.intervene_action("pull_plant", 0, 2, None).unwrap();

    let mut pulled = false;
    for _ in 0..3 {
        session.advance_until_act().unwrap();
        if let Some(report) = session.consume_last_dusk_result() {
            if report
                .treatment_outcomes
                .iter()
                .any(|o| o.action == "pull_plant" && o.result == TreatmentResult::Resolved)
            {
                pulled = true;
                break;
            }
        }
    }
    assert!(pulled);
    assert!(session.plant_at(0, 2).unwrap().dead);
}

// ─────────────────────────────────────────────────────────────────────────
// Error handling — failed actions leave state untouched
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn failed_actions_cost_nothing_and_change_nothing() {
    let mut session = GameSession::new("zone_8a", 15).unwrap();
    to_act(&mut session);
    let energy_before = session.energy();
    let version_before = session.world_version();

    assert!(matches!(
        session.plant_action("dandelion_wish", 0, 0),
        Err(GameError::UnknownSpecies(_))
    ));
    assert!(matches!(
        session.plant_action("basil_genovese", 9, 9),
        Err(GameError::OutOfBounds { .. })
    ));
    assert!(matches!(
        session.diagnose_action(0, 0),
        Err(GameError::NoPlantHere { .. })
    ));
    assert!(matches!(
        session.harvest_action(0, 0),
        Err(GameError::NoPlantHere { .. })
    ));
    assert!(matches!(
        session.intervene_action("prune_vigorously", 0, 0, None),
        Err(GameError::UnknownTreatment(_))
    ));
    assert!(matches!(
        session.amend_action(0, 0, "pixie_dust"),
        Err(GameError::UnknownAmendment(_))
    ));

    assert_eq!(session.energy(), energy_before);
    assert_eq!(session.world_version(), version_before);
    assert!(session.plants().is_empty());

    // Occupying a plot then replanting it is refused.
    session.plant_action("basil_genovese", 0, 0).unwrap();
    assert!(matches!(
        session.plant_action("basil_genovese", 0, 0),
        Err(GameError::PlotOccupied { .. })
    ));

    // Actions outside ACT are phase errors.
    session.end_actions().unwrap();
    assert!(matches!(
        session.plant_action("basil_genovese", 1, 0),
        Err(GameError::WrongPhase { .. })
    ));
}

#[test]
fn exhausting_energy_runs_the_tick_automatically() {
    let mut session = GameSession::new("zone_8a", 33).unwrap();
    to_act(&mut session);
    let budget = session.energy();

    for i in 0..budget {
        session.scout_action(&format!("corner {i}")).unwrap();
    }
    assert_eq!(session.phase(), Phase::Dusk);
    let report = session
        .consume_last_dusk_result()
        .expect("tick ran when energy hit zero");
    assert_eq!(report.week, 0);
    // Consuming is one-shot.
    assert!(session.consume_last_dusk_result().is_none());
}

// ─────────────────────────────────────────────────────────────────────────
// Harvest action & score
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn harvesting_decrements_stock_and_scores_points() {
    let mut session = GameSession::new("zone_8a", 64).unwrap();
    to_act(&mut session);
    let entity = force_plant(&mut session, "kale_lacinato", 2, 1);
    session.world_mut().entity_mut(entity).insert(HarvestState {
        ripe: true,
        remaining: 3,
        quality: 1.0,
    });

    let score_before = session.score();
    let quality = session.harvest_action(2, 1).unwrap();
    assert!((quality - 1.0).abs() < f32::EPSILON);

    let state = *session.world_mut().get::<HarvestState>(entity).unwrap();
    assert_eq!(state.remaining, 2);
    assert!(!state.ripe);

    // 10 points for the pick plus 5 for a first-time species.
    assert_eq!(session.score(), score_before + 15);
    assert!(matches!(
        session.harvest_action(2, 1),
        Err(GameError::NothingToHarvest { .. })
    ));
    assert!(matches!(
        session.log().to_events().last(),
        Some(GameEvent::Harvest { .. })
    ));

    // A kale with stock left re-ripens on the next tick (continuous).
    let mut schedule = sim::build_tick_schedule();
    sim::run_tick(session.world_mut(), &mut schedule, mild_ctx(10));
    assert!(session.world_mut().get::<HarvestState>(entity).unwrap().ripe);
}

// ─────────────────────────────────────────────────────────────────────────
// Abandoning
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn abandoning_ends_the_run_in_the_log() {
    let mut session = GameSession::new("zone_10b", 8).unwrap();
    to_act(&mut session);
    session.abandon().unwrap();
    assert!(session.is_run_ended());
    assert_eq!(session.end_reason(), Some(EndReason::Abandon));
    assert!(matches!(
        session.log().to_events().last(),
        Some(GameEvent::RunEnd {
            reason: EndReason::Abandon
        })
    ));
    assert!(matches!(session.abandon(), Err(GameError::RunEnded)));

    // An abandoned run replays to an ended session.
    let replayed = GameSession::replay_events(&session.log().to_events()).unwrap();
    assert!(replayed.is_run_ended());
    assert_eq!(replayed.end_reason(), Some(EndReason::Abandon));
}
