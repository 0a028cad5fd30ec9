//! Portable session state.
//!
//! A [`PortableState`] is a plain serializable copy of a [`GameLedger`],
//! used to hand a game across a process boundary. The game id is carried
//! by the caller (typically as the checkpoint's file name) and supplied
//! again on restore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use puckline_types::{
    EventId, GameClock, GameId, GameStatus, GoalRecord, GoalieTally, PenaltyRecord, TeamTally,
};

use crate::CodecError;
use crate::consistency::ConsistencyResult;
use crate::ledger::GameLedger;

/// Current portable format version.
pub const FORMAT_VERSION: u32 = 1;

/// Serializable ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableState {
    /// Format version the state was written with.
    pub format_version: u32,
    /// Unique id of this checkpoint.
    pub checkpoint_id: Uuid,
    /// When the checkpoint was taken.
    pub created_at: DateTime<Utc>,
    /// Live or final.
    pub status: GameStatus,
    /// Goals per team.
    pub score: TeamTally,
    /// Shots per team.
    pub shots: TeamTally,
    /// Latest clock reading.
    pub clock: GameClock,
    /// Goalie lines per team.
    pub goalie_stats: GoalieTally,
    /// Goal log, in arrival order.
    pub goals: Vec<GoalRecord>,
    /// Penalty log, in arrival order.
    pub penalties: Vec<PenaltyRecord>,
    /// Every event id already applied, sorted.
    pub seen_event_ids: Vec<EventId>,
    /// Latest snapshot capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_captured_at: Option<DateTime<Utc>>,
    /// Snapshots applied over the ledger's lifetime.
    #[serde(default)]
    pub snapshots_applied: u64,
}

/// Copy a ledger into its portable form.
pub fn to_portable(ledger: &GameLedger) -> PortableState {
    PortableState {
        format_version: FORMAT_VERSION,
        checkpoint_id: Uuid::now_v7(),
        created_at: Utc::now(),
        status: ledger.status,
        score: ledger.score,
        shots: ledger.shots,
        clock: ledger.clock,
        goalie_stats: ledger.goalie_stats,
        goals: ledger.goals.clone(),
        penalties: ledger.penalties.clone(),
        seen_event_ids: ledger.seen_event_ids.iter().cloned().collect(),
        last_captured_at: ledger.last_captured_at,
        snapshots_applied: ledger.snapshots_applied,
    }
}

/// Rebuild a ledger from its portable form.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedVersion`] for a format this build does
/// not read, and [`CodecError::Inconsistent`] when the score disagrees with
/// the goal log or goalie lines.
pub fn from_portable(game_id: GameId, state: PortableState) -> Result<GameLedger, CodecError> {
    if state.format_version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: state.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let ledger = GameLedger {
        game_id,
        status: state.status,
        score: state.score,
        shots: state.shots,
        clock: state.clock,
        goalie_stats: state.goalie_stats,
        goals: state.goals,
        penalties: state.penalties,
        seen_event_ids: state.seen_event_ids.into_iter().collect(),
        last_captured_at: state.last_captured_at,
        snapshots_applied: state.snapshots_applied,
    };

    match ledger.verify_consistency() {
        ConsistencyResult::Consistent => {
            debug!(
                game_id = %ledger.game_id,
                checkpoint_id = %state.checkpoint_id,
                seen = ledger.seen_event_ids.len(),
                "Restored ledger from portable state"
            );
            Ok(ledger)
        }
        ConsistencyResult::Anomaly(anomaly) => Err(CodecError::Inconsistent(anomaly)),
    }
}

/// Encode a ledger as portable JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn to_json(ledger: &GameLedger) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&to_portable(ledger))?)
}

/// Decode a ledger from portable JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed input, otherwise the errors of
/// [`from_portable`].
pub fn from_json(game_id: GameId, json: &str) -> Result<GameLedger, CodecError> {
    let state: PortableState = serde_json::from_str(json)?;
    from_portable(game_id, state)
}
