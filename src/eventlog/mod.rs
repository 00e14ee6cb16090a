//! Append-only event log with a pure replay reducer.
//!
//! The log is the save format: seed + zone + this event sequence fully
//! determines every subsequent world state. Entries carry a monotonic index
//! and a wall-clock timestamp for display; neither is replay-relevant, and
//! `to_json` strips them.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Frost,
    Abandon,
    Catastrophe,
}

impl EndReason {
    pub fn label(self) -> &'static str {
        match self {
            EndReason::Frost => "frost",
            EndReason::Abandon => "abandon",
            EndReason::Catastrophe => "catastrophe",
        }
    }
}

/// Everything a player (or the engine) can do that changes history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    RunStart {
        seed: u64,
        zone: ZoneId,
    },
    RunEnd {
        reason: EndReason,
    },
    AdvanceWeek,
    Plant {
        species: SpeciesId,
        row: i32,
        col: i32,
        week: u32,
    },
    Amend {
        amendment: AmendmentId,
        row: i32,
        col: i32,
        week: u32,
    },
    Diagnose {
        row: i32,
        col: i32,
        week: u32,
    },
    Intervene {
        row: i32,
        col: i32,
        action: TreatmentId,
        target_condition: Option<ConditionId>,
        week: u32,
    },
    Scout {
        target: String,
        week: u32,
    },
    Harvest {
        species: SpeciesId,
        row: i32,
        col: i32,
        week: u32,
        quality: f32,
    },
}

impl GameEvent {
    pub fn label(&self) -> &'static str {
        match self {
            GameEvent::RunStart { .. } => "RUN_START",
            GameEvent::RunEnd { .. } => "RUN_END",
            GameEvent::AdvanceWeek => "ADVANCE_WEEK",
            GameEvent::Plant { .. } => "PLANT",
            GameEvent::Amend { .. } => "AMEND",
            GameEvent::Diagnose { .. } => "DIAGNOSE",
            GameEvent::Intervene { .. } => "INTERVENE",
            GameEvent::Scout { .. } => "SCOUT",
            GameEvent::Harvest { .. } => "HARVEST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub index: u64,
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub event: GameEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from raw events, restamping index and timestamp.
    pub fn from_events(events: Vec<GameEvent>) -> Self {
        let mut log = Self::new();
        for event in events {
            log.append(event);
        }
        log
    }

    pub fn append(&mut self, event: GameEvent) {
        let index = self.entries.len() as u64;
        self.entries.push(LoggedEvent {
            index,
            timestamp_ms: now_ms(),
            event,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    /// The raw event sequence — the save format. No index, no timestamp.
    pub fn to_events(&self) -> Vec<GameEvent> {
        self.entries.iter().map(|e| e.event.clone()).collect()
    }

    /// Fold the whole log through the pure reducer.
    pub fn replay_state(&self) -> ReplaySummary {
        replay(&self.to_events())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// PURE REDUCER
// ═══════════════════════════════════════════════════════════════════════

/// The reduced view of an event sequence. This is bookkeeping state, not
/// the simulation: the engine rebuilds the world by re-running actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub started: bool,
    pub seed: u64,
    pub zone: ZoneId,
    pub current_week: u32,
    pub ended: bool,
    pub end_reason: Option<EndReason>,
    pub plantings: Vec<(SpeciesId, i32, i32, u32)>,
    pub amendments: Vec<(AmendmentId, i32, i32, u32)>,
    pub diagnoses: Vec<(i32, i32, u32)>,
    pub interventions: Vec<(TreatmentId, i32, i32, u32)>,
    pub scouts: Vec<(String, u32)>,
    pub harvests: Vec<(SpeciesId, i32, i32, u32)>,
}

/// Pure: `state × event → state`. `RUN_START` resets everything except the
/// identity it establishes.
pub fn apply_event(mut state: ReplaySummary, event: &GameEvent) -> ReplaySummary {
    match event {
        GameEvent::RunStart { seed, zone } => ReplaySummary {
            started: true,
            seed: *seed,
            zone: zone.clone(),
            ..Default::default()
        },
        GameEvent::RunEnd { reason } => {
            state.ended = true;
            state.end_reason = Some(*reason);
            state
        }
        GameEvent::AdvanceWeek => {
            state.current_week += 1;
            state
        }
        GameEvent::Plant {
            species, row, col, week,
        } => {
            state.plantings.push((species.clone(), *row, *col, *week));
            state
        }
        GameEvent::Amend {
            amendment, row, col, week,
        } => {
            state.amendments.push((amendment.clone(), *row, *col, *week));
            state
        }
        GameEvent::Diagnose { row, col, week } => {
            state.diagnoses.push((*row, *col, *week));
            state
        }
        GameEvent::Intervene {
            action, row, col, week, ..
        } => {
            state.interventions.push((action.clone(), *row, *col, *week));
            state
        }
        GameEvent::Scout { target, week } => {
            state.scouts.push((target.clone(), *week));
            state
        }
        GameEvent::Harvest {
            species, row, col, week, ..
        } => {
            state.harvests.push((species.clone(), *row, *col, *week));
            state
        }
    }
}

/// Fold from an empty state.
pub fn replay(events: &[GameEvent]) -> ReplaySummary {
    events.iter().fold(ReplaySummary::default(), apply_event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<GameEvent> {
        vec![
            GameEvent::RunStart {
                seed: 42,
                zone: "zone_8a".into(),
            },
            GameEvent::Plant {
                species: "tomato_cherokee_purple".into(),
                row: 0,
                col: 0,
                week: 0,
            },
            GameEvent::AdvanceWeek,
            GameEvent::AdvanceWeek,
            GameEvent::RunEnd {
                reason: EndReason::Frost,
            },
        ]
    }

    #[test]
    fn replay_equals_sequential_append() {
        let events = sample_events();
        let log = EventLog::from_events(events.clone());
        assert_eq!(log.replay_state(), replay(&events));
    }

    #[test]
    fn replay_is_idempotent_through_json() {
        let events = sample_events();
        let log = EventLog::from_events(events.clone());
        let json = serde_json::to_string(&log.to_events()).unwrap();
        let parsed: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, events);
        assert_eq!(replay(&parsed), replay(&events));
    }

    #[test]
    fn run_start_resets_everything_but_identity() {
        let mut events = sample_events();
        events.push(GameEvent::RunStart {
            seed: 7,
            zone: "zone_5b".into(),
        });
        let state = replay(&events);
        assert!(state.started);
        assert_eq!(state.seed, 7);
        assert_eq!(state.zone, "zone_5b");
        assert_eq!(state.current_week, 0);
        assert!(!state.ended);
        assert!(state.plantings.is_empty());
    }

    #[test]
    fn events_serialize_with_screaming_tags() {
        let json = serde_json::to_string(&GameEvent::AdvanceWeek).unwrap();
        assert!(json.contains("ADVANCE_WEEK"));
        let json = serde_json::to_string(&GameEvent::RunStart {
            seed: 1,
            zone: "zone_8a".into(),
        })
        .unwrap();
        assert!(json.contains("RUN_START"));
    }

    #[test]
    fn indexes_are_monotonic() {
        let log = EventLog::from_events(sample_events());
        for (i, entry) in log.entries().iter().enumerate() {
            assert_eq!(entry.index, i as u64);
        }
    }
}
