//! Ledger checkpoints on disk.
//!
//! One file per game, named `<game_id>.json`, holding the ledger's portable
//! state. Files are written to a temporary name and renamed into place so a
//! crash mid-write never leaves a truncated checkpoint behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use puckline_ledger::{GameLedger, from_json, to_json};
use puckline_types::GameId;

use crate::error::EngineError;

/// Path of a game's checkpoint, or `None` if the id is not a safe file name.
pub fn checkpoint_path(dir: &Path, game_id: &GameId) -> Option<PathBuf> {
    let id = game_id.as_str();
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !id.starts_with('.');
    safe.then(|| dir.join(format!("{id}.json")))
}

/// Load every checkpoint in `dir`. A missing directory yields no ledgers.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the directory or a file cannot be read,
/// or [`EngineError::Codec`] if a checkpoint is invalid.
pub fn load_all(dir: &Path) -> Result<Vec<GameLedger>, EngineError> {
    if !dir.exists() {
        info!(dir = %dir.display(), "No checkpoint directory, starting fresh");
        return Ok(Vec::new());
    }
    let io_err = |path: &Path, source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let path = entry.map_err(|e| io_err(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut ledgers = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "Skipping checkpoint with non-UTF-8 name");
            continue;
        };
        let game_id = GameId::new(stem);
        let json = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let ledger = from_json(game_id, &json).map_err(|source| EngineError::Codec {
            path: path.clone(),
            source,
        })?;
        ledgers.push(ledger);
    }
    Ok(ledgers)
}

/// Write one checkpoint per ledger into `dir`, creating it if needed.
///
/// Returns the number of checkpoints written.
///
/// # Errors
///
/// Returns [`EngineError::Io`] or [`EngineError::Codec`] on the first failure.
pub fn write_all(dir: &Path, ledgers: &BTreeMap<GameId, GameLedger>) -> Result<usize, EngineError> {
    std::fs::create_dir_all(dir).map_err(|source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written: usize = 0;
    for (game_id, ledger) in ledgers {
        let Some(path) = checkpoint_path(dir, game_id) else {
            warn!(game_id = %game_id, "Game id is not a safe file name, checkpoint skipped");
            continue;
        };
        let json = to_json(ledger).map_err(|source| EngineError::Codec {
            path: path.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|source| EngineError::Io {
                path: path.clone(),
                source,
            })?;
        written = written.saturating_add(1);
    }
    info!(dir = %dir.display(), written, "Checkpoints written");
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use puckline_analysis::MomentumConfig;
    use puckline_types::{ClockTime, EventId, GameClock, RawEvent, Snapshot, TeamSide};

    use super::*;

    fn played(game: &str) -> GameLedger {
        let hit = RawEvent {
            event_id: Some(EventId::from("e1")),
            type_key: "hit".to_owned(),
            team_side: Some(TeamSide::Home),
            time_remaining: None,
            home_defending_side: None,
            details: serde_json::Value::Null,
            wire_errors: Vec::new(),
        };
        let mut ledger = GameLedger::new(GameId::new(game));
        ledger.apply_snapshot(
            &Snapshot {
                game_id: None,
                clock: GameClock::new(2, ClockTime::new(7, 15)),
                captured_at: None,
                events: vec![hit],
            },
            &MomentumConfig::default(),
        );
        ledger
    }

    #[test]
    fn unsafe_ids_have_no_path() {
        let dir = Path::new("/ckpt");
        assert_eq!(
            checkpoint_path(dir, &GameId::new("2024020001")),
            Some(PathBuf::from("/ckpt/2024020001.json"))
        );
        assert_eq!(checkpoint_path(dir, &GameId::new("../etc/passwd")), None);
        assert_eq!(checkpoint_path(dir, &GameId::new("")), None);
    }

    #[test]
    fn written_checkpoints_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledgers = BTreeMap::new();
        for game in ["a", "b"] {
            ledgers.insert(GameId::new(game), played(game));
        }

        assert_eq!(write_all(dir.path(), &ledgers).unwrap(), 2);
        let loaded = load_all(dir.path()).unwrap();

        assert_eq!(loaded.len(), 2);
        for ledger in loaded {
            assert_eq!(ledgers.get(ledger.game_id()), Some(&ledger));
        }
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_all(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn corrupt_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("g.json"), "{}").unwrap();
        assert!(matches!(load_all(dir.path()), Err(EngineError::Codec { .. })));
    }
}
