//! Save files — the serialized event log plus the run's identity.
//!
//! A save is not a world snapshot: loading replays the events against a
//! fresh session, which is what makes saves tiny and tamper-evident. Any
//! sequence that cannot be replayed is rejected as a whole.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::eventlog::GameEvent;
use crate::session::GameSession;
use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub zone: ZoneId,
    pub seed: u64,
    pub events: Vec<GameEvent>,
}

impl SaveFile {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            version: SAVE_VERSION,
            zone: session.zone().id.clone(),
            seed: session.seed(),
            events: session.log().to_events(),
        }
    }
}

pub fn save_to_path(session: &GameSession, path: &Path) -> GameResult<()> {
    let file = SaveFile::from_session(session);
    let json = serde_json::to_string_pretty(&file).map_err(|e| GameError::InvalidSave {
        reason: e.to_string(),
    })?;
    fs::write(path, json).map_err(|e| GameError::InvalidSave {
        reason: format!("could not write {}: {e}", path.display()),
    })?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> GameResult<GameSession> {
    let json = fs::read_to_string(path).map_err(|e| GameError::InvalidSave {
        reason: format!("could not read {}: {e}", path.display()),
    })?;
    load_from_json(&json)
}

pub fn load_from_json(json: &str) -> GameResult<GameSession> {
    let file: SaveFile = serde_json::from_str(json).map_err(|e| GameError::InvalidSave {
        reason: e.to_string(),
    })?;
    if file.version != SAVE_VERSION {
        return Err(GameError::InvalidSave {
            reason: format!("unsupported save version {}", file.version),
        });
    }
    match file.events.first() {
        Some(GameEvent::RunStart { seed, zone }) => {
            if *seed != file.seed || *zone != file.zone {
                return Err(GameError::InvalidSave {
                    reason: "header does not match RUN_START".into(),
                });
            }
        }
        _ => {
            return Err(GameError::InvalidSave {
                reason: "first event must be RUN_START".into(),
            });
        }
    }
    GameSession::replay_events(&file.events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_run_start_is_rejected() {
        let json = r#"{"version":1,"zone":"zone_8a","seed":1,"events":[{"type":"ADVANCE_WEEK"}]}"#;
        assert!(matches!(
            load_from_json(json),
            Err(GameError::InvalidSave { .. })
        ));
    }

    #[test]
    fn mismatched_header_is_rejected() {
        let json = r#"{"version":1,"zone":"zone_8a","seed":2,
            "events":[{"type":"RUN_START","seed":1,"zone":"zone_8a"}]}"#;
        assert!(matches!(
            load_from_json(json),
            Err(GameError::InvalidSave { .. })
        ));
    }

    #[test]
    fn fresh_session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let session = GameSession::new("zone_8a", 42).unwrap();
        save_to_path(&session, &path).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.seed(), 42);
        assert_eq!(loaded.zone().id, "zone_8a");
        assert_eq!(loaded.log().to_events(), session.log().to_events());
    }
}
