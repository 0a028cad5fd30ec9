//! Engine output: the per-snapshot update report and its warnings.
//!
//! The [`UpdateReport`] is the only thing the narration collaborator
//! receives from an `apply_snapshot` call. Nothing in the engine raises an
//! error across that boundary; data problems surface as
//! [`EngineWarning`] entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::clock::GameClock;
use crate::enums::{EventKind, GameStatus, RecommendationTier, TeamSide};
use crate::events::PlayEvent;
use crate::ids::{EventId, GameId};
use crate::records::{GoalRecord, GoalieTally, PenaltyRecord, TeamTally};

/// A data-quality or sequencing problem recovered during a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "warning", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EngineWarning {
    /// The event had no usable id; it was applied but cannot be deduplicated.
    MissingEventId {
        /// Index of the event within the snapshot.
        position: usize,
        /// Upstream type key.
        type_key: String,
    },
    /// The event lacked fields its type requires and was skipped.
    MalformedEvent {
        /// Index of the event within the snapshot.
        position: usize,
        /// Event id, when present.
        event_id: Option<EventId>,
        /// Upstream type key.
        type_key: String,
        /// What was wrong.
        reason: String,
    },
    /// The snapshot reports an earlier period than the ledger; counters and
    /// the clock were not rolled back.
    OutOfOrderSnapshot {
        /// Period in the snapshot.
        snapshot_period: u32,
        /// Period already stored in the ledger.
        ledger_period: u32,
    },
    /// The snapshot names a different game and was not applied.
    GameMismatch {
        /// The ledger's game.
        expected: GameId,
        /// The game named by the snapshot.
        received: GameId,
    },
    /// The snapshot arrived after the game was concluded; it was still applied.
    SnapshotAfterConclusion,
}

/// A newly applied event with its momentum contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoredEvent {
    /// Upstream id, when present.
    pub event_id: Option<EventId>,
    /// Scoring category.
    pub kind: EventKind,
    /// Team attribution, if any.
    pub team: Option<TeamSide>,
    /// Momentum score assigned to this event.
    pub momentum: u32,
    /// Game clock the event was scored against.
    pub game_time: GameClock,
    /// Natural-language location, when the event has coordinates.
    pub location_phrase: Option<String>,
    /// The decoded event.
    pub event: PlayEvent,
}

/// The slice of ledger state the narration collaborator builds context from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateSummary {
    /// Current score.
    pub score: TeamTally,
    /// Current shot totals.
    pub shots: TeamTally,
    /// Latest game clock.
    pub clock: GameClock,
    /// Goaltender lines.
    pub goalie_stats: GoalieTally,
    /// Goals appended by this snapshot.
    pub new_goals: Vec<GoalRecord>,
    /// Penalties appended by this snapshot.
    pub new_penalties: Vec<PenaltyRecord>,
    /// Total goals in the log.
    pub goal_count: usize,
    /// Total penalties in the log.
    pub penalty_count: usize,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Capture time of the newest applied snapshot.
    pub last_captured_at: Option<DateTime<Utc>>,
}

/// Result of applying one snapshot to a game ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpdateReport {
    /// Game the report belongs to.
    pub game_id: GameId,
    /// Events that passed deduplication, including any later skipped as
    /// malformed.
    pub new_event_count: usize,
    /// Events present in the snapshot.
    pub total_event_count: usize,
    /// Sum of per-event momentum scores.
    pub aggregate_momentum_score: u32,
    /// Coverage tier for the aggregate score.
    pub recommendation_tier: RecommendationTier,
    /// Newly applied events in feed order.
    pub events: Vec<ScoredEvent>,
    /// Post-update state.
    pub state: StateSummary,
    /// Problems recovered while applying the snapshot.
    pub warnings: Vec<EngineWarning>,
}

impl UpdateReport {
    /// Whether the snapshot contributed nothing new.
    pub const fn is_quiet(&self) -> bool {
        self.new_event_count == 0
    }
}
