//! Game session — wires the world, the generators, the turn machine, and
//! the event log together, and exposes the action API.
//!
//! Sessions are plain values: nothing here is process-global, and two
//! sessions never interfere. Action methods validate everything before
//! mutating, so an error leaves the session untouched, energy included.

use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::data;
use crate::diagnosis::{self, DiagnosisReport};
use crate::eventlog::{EndReason, EventLog, GameEvent};
use crate::pests::generate_pest_schedule;
use crate::rng::{GardenRng, DIAGNOSIS_STREAM_MASK};
use crate::shared::*;
use crate::sim;
use crate::turn::{energy_budget, TurnManager};
use crate::weather::generate_weather;

/// Snapshot of one plant for display and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantView {
    pub row: i32,
    pub col: i32,
    pub species: SpeciesId,
    pub name: String,
    pub stage: Stage,
    pub progress: f32,
    pub health: f32,
    pub stress: f32,
    pub dead: bool,
    pub dormant: bool,
    pub conditions: Vec<ConditionEntry>,
    pub harvest: Option<HarvestState>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeedView {
    pub row: i32,
    pub col: i32,
    pub severity: f32,
}

pub struct GameSession {
    world: World,
    tick_schedule: bevy::ecs::schedule::Schedule,
    turn: TurnManager,
    log: EventLog,
    zone: ZoneDef,
    seed: u64,
    weather: Vec<WeekWeather>,
    pest_schedule: Vec<PestEvent>,
    diagnosis_rng: GardenRng,
    last_dusk: Option<TickReport>,
    end_reason: Option<EndReason>,
    harvest_points: u32,
    harvested_species: BTreeSet<SpeciesId>,
    energy_preview: u32,
    world_version: u64,
}

impl GameSession {
    pub fn new(zone_id: &str, seed: u64) -> GameResult<Self> {
        Self::with_grid(zone_id, seed, DEFAULT_GRID_ROWS, DEFAULT_GRID_COLS)
    }

    pub fn with_grid(zone_id: &str, seed: u64, rows: i32, cols: i32) -> GameResult<Self> {
        let mut world = World::new();
        data::insert_registries(&mut world);

        let zone = world
            .resource::<ZoneRegistry>()
            .zones
            .get(zone_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownZone(zone_id.to_string()))?;

        // Weather consumes the head of the shared stream; pests run on
        // their own sub-stream so the two schedules can't couple.
        let mut rng = GardenRng::new(seed);
        let weather = generate_weather(&zone, &mut rng);
        let pest_schedule = generate_pest_schedule(&zone, world.resource::<PestRegistry>(), seed);
        world.insert_resource(rng);
        world.insert_resource(TickReport::default());

        let mut map = GardenMap {
            rows,
            cols,
            ..Default::default()
        };
        for row in 0..rows {
            for col in 0..cols {
                let entity = world
                    .spawn((
                        PlotSlot { row, col },
                        Soil::starting_profile(),
                        SunExposure::Full,
                        PendingAmendments::default(),
                    ))
                    .id();
                map.plots.insert((row, col), entity);
            }
        }
        world.insert_resource(map);

        let mut log = EventLog::new();
        log.append(GameEvent::RunStart {
            seed,
            zone: zone.id.clone(),
        });

        let energy_preview = energy_budget(0, &weather[0]);
        info!("[Session] new run: zone {}, seed {}", zone.id, seed);

        Ok(Self {
            world,
            tick_schedule: sim::build_tick_schedule(),
            turn: TurnManager::new(),
            log,
            zone,
            seed,
            weather,
            pest_schedule,
            diagnosis_rng: GardenRng::sub_stream(seed, DIAGNOSIS_STREAM_MASK),
            last_dusk: None,
            end_reason: None,
            harvest_points: 0,
            harvested_species: BTreeSet::new(),
            energy_preview,
            world_version: 0,
        })
    }

    /// Rebuild a session from a recorded event sequence (a loaded save).
    /// The first event must be RUN_START; anything that cannot be re-played
    /// surfaces as `InvalidSave` without publishing partial state.
    pub fn replay_events(events: &[GameEvent]) -> GameResult<Self> {
        let Some(GameEvent::RunStart { seed, zone }) = events.first() else {
            return Err(GameError::InvalidSave {
                reason: "first event must be RUN_START".into(),
            });
        };
        let mut session = Self::new(zone, *seed)?;
        for event in &events[1..] {
            session.apply_recorded(event).map_err(|e| match e {
                GameError::InvalidSave { .. } => e,
                other => GameError::InvalidSave {
                    reason: other.to_string(),
                },
            })?;
        }
        Ok(session)
    }

    // ───────────────────────────────────────────────────────────────────
    // Snapshot accessors
    // ───────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn current_week(&self) -> u32 {
        self.turn.week()
    }

    pub fn energy(&self) -> u32 {
        self.turn.energy()
    }

    pub fn energy_max(&self) -> u32 {
        self.turn.energy_max()
    }

    /// The week-1 energy estimate computed at session start.
    pub fn energy_preview(&self) -> u32 {
        self.energy_preview
    }

    pub fn is_run_ended(&self) -> bool {
        self.turn.is_ended()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn zone(&self) -> &ZoneDef {
        &self.zone
    }

    pub fn current_weather(&self) -> Option<&WeekWeather> {
        self.weather.get(self.turn.week() as usize)
    }

    pub fn weather_schedule(&self) -> &[WeekWeather] {
        &self.weather
    }

    pub fn pest_schedule(&self) -> &[PestEvent] {
        &self.pest_schedule
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Bumped by every action and tick; UIs rebuild views when it moves.
    pub fn world_version(&self) -> u64 {
        self.world_version
    }

    /// The diff summary of the most recent DUSK tick, consumed once.
    pub fn consume_last_dusk_result(&mut self) -> Option<TickReport> {
        self.last_dusk.take()
    }

    /// Running score: quality-weighted harvests, species variety, and
    /// whatever is still standing.
    pub fn score(&mut self) -> u32 {
        let living = self
            .world
            .query_filtered::<(), (With<PlantSpecies>, Without<Dead>)>()
            .iter(&self.world)
            .count() as u32;
        self.harvest_points + 5 * self.harvested_species.len() as u32 + 2 * living
    }

    pub fn plants(&mut self) -> Vec<PlantView> {
        let species = self.world.resource::<SpeciesRegistry>().clone();
        let mut views: Vec<PlantView> = self
            .world
            .query::<(
                &PlotSlot,
                &PlantSpecies,
                &Growth,
                &Health,
                &ActiveConditions,
                Option<&HarvestState>,
                Option<&Dead>,
                Option<&Perennial>,
            )>()
            .iter(&self.world)
            .map(
                |(slot, plant, growth, health, conditions, harvest, dead, perennial)| PlantView {
                    row: slot.row,
                    col: slot.col,
                    species: plant.0.clone(),
                    name: species
                        .get(&plant.0)
                        .map(|d| d.name.clone())
                        .unwrap_or_else(|| plant.0.clone()),
                    stage: growth.stage,
                    progress: growth.progress,
                    health: health.value,
                    stress: health.stress,
                    dead: dead.is_some(),
                    dormant: perennial.is_some_and(|p| p.dormant),
                    conditions: conditions.0.clone(),
                    harvest: harvest.copied(),
                },
            )
            .collect();
        views.sort_by_key(|v| (v.row, v.col));
        views
    }

    pub fn plant_at(&mut self, row: i32, col: i32) -> Option<PlantView> {
        self.plants()
            .into_iter()
            .find(|p| p.row == row && p.col == col)
    }

    pub fn soil_at(&mut self, row: i32, col: i32) -> Option<Soil> {
        let entity = *self.world.resource::<GardenMap>().plots.get(&(row, col))?;
        self.world.get::<Soil>(entity).copied()
    }

    pub fn sun_exposure_at(&mut self, row: i32, col: i32) -> Option<SunExposure> {
        let entity = *self.world.resource::<GardenMap>().plots.get(&(row, col))?;
        self.world.get::<SunExposure>(entity).copied()
    }

    pub fn weeds(&mut self) -> Vec<WeedView> {
        let mut views: Vec<WeedView> = self
            .world
            .query::<(&PlotSlot, &Weed)>()
            .iter(&self.world)
            .map(|(slot, weed)| WeedView {
                row: slot.row,
                col: slot.col,
                severity: weed.severity,
            })
            .collect();
        views.sort_by_key(|v| (v.row, v.col));
        views
    }

    /// Species that set seed this run — the meta-progression export.
    pub fn self_seeded_species(&mut self) -> Vec<SpeciesId> {
        let mut species: Vec<SpeciesId> = self
            .world
            .query_filtered::<&PlantSpecies, With<SelfSeeded>>()
            .iter(&self.world)
            .map(|p| p.0.clone())
            .collect();
        species.sort();
        species.dedup();
        species
    }

    pub fn grid_size(&self) -> (i32, i32) {
        let map = self.world.resource::<GardenMap>();
        (map.rows, map.cols)
    }

    /// Direct world access for integration tests and advanced tooling.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ───────────────────────────────────────────────────────────────────
    // Actions (ACT phase, 1 energy each)
    // ───────────────────────────────────────────────────────────────────

    pub fn plant_action(&mut self, species_id: &str, row: i32, col: i32) -> GameResult<()> {
        self.turn.ensure_energy(1)?;
        let def = self
            .world
            .resource::<SpeciesRegistry>()
            .get(species_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownSpecies(species_id.to_string()))?;
        {
            let map = self.world.resource::<GardenMap>();
            if !map.in_bounds(row, col) {
                return Err(GameError::OutOfBounds { row, col });
            }
            if map.plants.contains_key(&(row, col)) {
                return Err(GameError::PlotOccupied { row, col });
            }
        }

        let entity = self
            .world
            .spawn((
                PlotSlot { row, col },
                PlantSpecies(def.id.clone()),
                Growth::sown(),
                Health::default(),
                ActiveConditions::default(),
                ActiveTreatments::default(),
                CompanionBuffs::default(),
            ))
            .id();
        if def.plant_type == PlantType::Perennial {
            self.world.entity_mut(entity).insert(Perennial {
                years_established: 0,
                dormant: false,
            });
        }
        self.world
            .resource_mut::<GardenMap>()
            .plants
            .insert((row, col), entity);

        let week = self.turn.week();
        self.finish_action(GameEvent::Plant {
            species: def.id,
            row,
            col,
            week,
        })
    }

    pub fn amend_action(&mut self, row: i32, col: i32, amendment_id: &str) -> GameResult<()> {
        self.turn.ensure_energy(1)?;
        let def = self
            .world
            .resource::<AmendmentRegistry>()
            .amendments
            .get(amendment_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownAmendment(amendment_id.to_string()))?;
        let plot = {
            let map = self.world.resource::<GardenMap>();
            if !map.in_bounds(row, col) {
                return Err(GameError::OutOfBounds { row, col });
            }
            map.plots[&(row, col)]
        };

        let week = self.turn.week();
        if let Some(mut pending) = self.world.get_mut::<PendingAmendments>(plot) {
            pending.0.push(PendingAmendment {
                amendment_id: def.id.clone(),
                applied_week: week,
                effect_delay_weeks: def.effect_delay_weeks,
                effects: def.effects.clone(),
            });
        }

        self.finish_action(GameEvent::Amend {
            amendment: def.id,
            row,
            col,
            week,
        })
    }

    pub fn diagnose_action(&mut self, row: i32, col: i32) -> GameResult<DiagnosisReport> {
        self.turn.ensure_energy(1)?;
        let entity = self.plant_entity(row, col)?;
        let species_id = self
            .world
            .get::<PlantSpecies>(entity)
            .ok_or(GameError::NoPlantHere { row, col })?
            .0
            .clone();
        let conditions = self
            .world
            .get::<ActiveConditions>(entity)
            .cloned()
            .unwrap_or_default();
        let registry = self.world.resource::<SpeciesRegistry>().clone();
        let def = registry
            .get(&species_id)
            .ok_or_else(|| GameError::UnknownSpecies(species_id.clone()))?;

        let report = diagnosis::diagnose(def, &conditions, &registry, &mut self.diagnosis_rng);

        let week = self.turn.week();
        self.finish_action(GameEvent::Diagnose { row, col, week })?;
        Ok(report)
    }

    pub fn intervene_action(
        &mut self,
        action: &str,
        row: i32,
        col: i32,
        target_condition: Option<&str>,
    ) -> GameResult<()> {
        self.turn.ensure_energy(1)?;
        let def = self
            .world
            .resource::<TreatmentRegistry>()
            .treatments
            .get(action)
            .cloned()
            .ok_or_else(|| GameError::UnknownTreatment(action.to_string()))?;
        if let Some(target) = target_condition {
            if !self
                .world
                .resource::<ConditionRegistry>()
                .conditions
                .contains_key(target)
            {
                return Err(GameError::UnknownCondition(target.to_string()));
            }
        }
        let entity = self.plant_entity(row, col)?;

        let week = self.turn.week();
        if let Some(mut treatments) = self.world.get_mut::<ActiveTreatments>(entity) {
            treatments.0.push(TreatmentEntry {
                action: def.id.clone(),
                target_condition: target_condition.map(str::to_string),
                applied_week: week,
                feedback_week: week + def.feedback_delay_weeks,
            });
        }

        self.finish_action(GameEvent::Intervene {
            row,
            col,
            action: def.id,
            target_condition: target_condition.map(str::to_string),
            week,
        })
    }

    pub fn scout_action(&mut self, target: &str) -> GameResult<()> {
        self.turn.ensure_energy(1)?;
        let week = self.turn.week();
        self.finish_action(GameEvent::Scout {
            target: target.to_string(),
            week,
        })
    }

    /// Collect one unit from a ripe plant. Continuous harvesters re-ripen
    /// on the next tick while stock remains.
    pub fn harvest_action(&mut self, row: i32, col: i32) -> GameResult<f32> {
        self.turn.ensure_energy(1)?;
        let entity = self.plant_entity(row, col)?;
        if self.world.get::<Dead>(entity).is_some() {
            return Err(GameError::NothingToHarvest { row, col });
        }
        let species = self
            .world
            .get::<PlantSpecies>(entity)
            .ok_or(GameError::NoPlantHere { row, col })?
            .0
            .clone();

        let quality = {
            let Some(mut state) = self.world.get_mut::<HarvestState>(entity) else {
                return Err(GameError::NothingToHarvest { row, col });
            };
            if !state.ripe || state.remaining == 0 {
                return Err(GameError::NothingToHarvest { row, col });
            }
            state.remaining -= 1;
            state.ripe = false;
            state.quality
        };

        self.harvest_points += (10.0 * quality).round() as u32;
        self.harvested_species.insert(species.clone());

        let week = self.turn.week();
        self.finish_action(GameEvent::Harvest {
            species,
            row,
            col,
            week,
            quality,
        })?;
        Ok(quality)
    }

    /// End the work phase early. ACT → DUSK, running the tick.
    pub fn end_actions(&mut self) -> GameResult<()> {
        self.turn.end_actions()?;
        self.run_dusk_tick();
        self.notify();
        Ok(())
    }

    /// Abandon the run. Appends RUN_END and refuses further actions.
    pub fn abandon(&mut self) -> GameResult<()> {
        if self.turn.is_ended() {
            return Err(GameError::RunEnded);
        }
        self.end_run(EndReason::Abandon);
        self.notify();
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────
    // Phase driving
    // ───────────────────────────────────────────────────────────────────

    /// One phase step. DUSK runs the tick on entry, ADVANCE applies the
    /// frost outcome, and the ADVANCE → DAWN wrap increments the week.
    pub fn advance_one_phase(&mut self) -> GameResult<Phase> {
        if self.turn.is_ended() {
            return Err(GameError::RunEnded);
        }
        match self.turn.phase() {
            Phase::Dawn => {
                self.turn.advance_phase()?;
            }
            Phase::Plan => {
                let weather = self.weather[self.turn.week() as usize].clone();
                self.turn.begin_work(&weather)?;
            }
            Phase::Act => {
                self.turn.end_actions()?;
                self.run_dusk_tick();
            }
            Phase::Dusk => {
                self.turn.advance_phase()?;
                self.apply_advance();
            }
            Phase::Advance => {
                self.turn.advance_phase()?;
                self.log.append(GameEvent::AdvanceWeek);
                // Week 30 is never generated; reaching it closes the
                // season the same way winter would.
                if self.turn.week() >= SEASON_WEEKS && !self.turn.is_ended() {
                    self.end_run(EndReason::Frost);
                }
            }
        }
        self.notify();
        Ok(self.turn.phase())
    }

    /// Drive phases until the next interactive ACT (or the run ends). If
    /// already in ACT, finishes the current week first.
    pub fn advance_until_act(&mut self) -> GameResult<Phase> {
        if self.turn.is_ended() {
            return Err(GameError::RunEnded);
        }
        if self.turn.phase() == Phase::Act {
            self.advance_one_phase()?;
        }
        while !self.turn.is_ended() && self.turn.phase() != Phase::Act {
            self.advance_one_phase()?;
        }
        Ok(self.turn.phase())
    }

    // ───────────────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────────────

    fn plant_entity(&self, row: i32, col: i32) -> GameResult<Entity> {
        let map = self.world.resource::<GardenMap>();
        if !map.in_bounds(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        map.plants
            .get(&(row, col))
            .copied()
            .ok_or(GameError::NoPlantHere { row, col })
    }

    /// Spend the action's energy, record it, and run the tick if the
    /// budget just hit zero.
    fn finish_action(&mut self, event: GameEvent) -> GameResult<()> {
        let transition = self.turn.spend_energy(1)?;
        self.log.append(event);
        self.notify();
        if transition.is_some_and(|t| t.to == Phase::Dusk) {
            self.run_dusk_tick();
        }
        Ok(())
    }

    fn run_dusk_tick(&mut self) {
        let week = self.turn.week();
        let weather = self.weather[week as usize].clone();
        let active_pests = self
            .pest_schedule
            .iter()
            .filter(|p| p.active_during(week))
            .cloned()
            .collect();
        let ctx = TickContext {
            week,
            weather,
            first_frost_week_avg: self.zone.first_frost_week_avg,
            frost_free: self.zone.frost_free,
            active_pests,
        };
        let report = sim::run_tick(&mut self.world, &mut self.tick_schedule, ctx);
        self.last_dusk = Some(report);
        self.world_version += 1;
    }

    /// Entry into ADVANCE: the frost outcome lands, and a garden with no
    /// survivors ends the run.
    fn apply_advance(&mut self) {
        let killing_frost = self
            .last_dusk
            .as_ref()
            .is_some_and(|r| r.frost.killing_frost);
        if killing_frost {
            self.end_run(EndReason::Frost);
            return;
        }

        let total = self
            .world
            .query_filtered::<(), With<PlantSpecies>>()
            .iter(&self.world)
            .count();
        let living = self
            .world
            .query_filtered::<(), (With<PlantSpecies>, Without<Dead>)>()
            .iter(&self.world)
            .count();
        if total > 0 && living == 0 {
            self.end_run(EndReason::Catastrophe);
        }
    }

    fn end_run(&mut self, reason: EndReason) {
        self.turn.end_run();
        self.end_reason = Some(reason);
        self.log.append(GameEvent::RunEnd { reason });
        info!("[Session] run ended: {}", reason.label());
    }

    fn notify(&mut self) {
        self.world_version += 1;
    }

    /// Re-apply one recorded event during replay.
    fn apply_recorded(&mut self, event: &GameEvent) -> GameResult<()> {
        if self.turn.is_ended() {
            // The only legal record after the run ends is the RUN_END the
            // engine already appended on its own.
            return match event {
                GameEvent::RunEnd { .. } => Ok(()),
                other => Err(GameError::InvalidSave {
                    reason: format!("event after run end: {}", other.label()),
                }),
            };
        }
        match event {
            GameEvent::RunStart { .. } => Err(GameError::InvalidSave {
                reason: "duplicate RUN_START".into(),
            }),
            GameEvent::AdvanceWeek => {
                let target = self.turn.week() + 1;
                let mut guard = 0;
                while !self.turn.is_ended()
                    && !(self.turn.phase() == Phase::Dawn && self.turn.week() == target)
                {
                    self.advance_one_phase()?;
                    guard += 1;
                    if guard > 8 {
                        return Err(GameError::InvalidSave {
                            reason: "week boundary did not converge".into(),
                        });
                    }
                }
                Ok(())
            }
            GameEvent::Plant {
                species, row, col, ..
            } => {
                self.ensure_act_for_replay()?;
                self.plant_action(species, *row, *col)
            }
            GameEvent::Amend {
                amendment, row, col, ..
            } => {
                self.ensure_act_for_replay()?;
                self.amend_action(*row, *col, amendment)
            }
            GameEvent::Diagnose { row, col, .. } => {
                self.ensure_act_for_replay()?;
                self.diagnose_action(*row, *col).map(|_| ())
            }
            GameEvent::Intervene {
                row,
                col,
                action,
                target_condition,
                ..
            } => {
                self.ensure_act_for_replay()?;
                self.intervene_action(action, *row, *col, target_condition.as_deref())
            }
            GameEvent::Scout { target, .. } => {
                self.ensure_act_for_replay()?;
                self.scout_action(target)
            }
            GameEvent::Harvest { row, col, .. } => {
                self.ensure_act_for_replay()?;
                self.harvest_action(*row, *col).map(|_| ())
            }
            GameEvent::RunEnd { reason } => {
                // Abandoning is player-driven; adopt it directly. Engine
                // endings (frost, catastrophe) are the tail of a week in
                // flight: drive phases until the engine reproduces the
                // ending itself, so the world state matches the original.
                if *reason == EndReason::Abandon {
                    self.end_run(EndReason::Abandon);
                    return Ok(());
                }
                let mut guard = 0;
                while !self.turn.is_ended() {
                    self.advance_one_phase()?;
                    guard += 1;
                    if guard > 8 {
                        return Err(GameError::InvalidSave {
                            reason: "recorded ending never reproduced".into(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Walk DAWN → PLAN → ACT for a recorded action. Any other phase means
    /// the log is inconsistent.
    fn ensure_act_for_replay(&mut self) -> GameResult<()> {
        loop {
            match self.turn.phase() {
                Phase::Act => return Ok(()),
                Phase::Dawn | Phase::Plan => {
                    self.advance_one_phase()?;
                }
                other => {
                    return Err(GameError::InvalidSave {
                        reason: format!("recorded action during {other}"),
                    });
                }
            }
        }
    }
}
