//! Canonical game state for the Puckline engine.
//!
//! Every live game is tracked by one [`GameLedger`]. Snapshots from the
//! feed are folded into it through [`GameLedger::apply_snapshot`], which
//! deduplicates events, updates the score and shot records, scores each new
//! event for momentum, and reports what changed.
//!
//! # Architecture
//!
//! - [`dedup`] -- Filters a snapshot's events down to those not yet applied.
//! - [`decode`] -- Turns a raw feed event into a typed [`PlayEvent`](puckline_types::PlayEvent).
//! - [`ledger`] -- The [`GameLedger`] itself.
//! - [`consistency`] -- Score versus goal-log verification.
//! - [`codec`] -- Lossless portable form for handing a game across sessions.
//!
//! # Consistency
//!
//! For each team T:
//!
//! ```text
//! score[T] == count(goals where goal.team == T)
//! goalie_stats[opponent(T)].goals_allowed == score[T]
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; data
//! problems in snapshots become warnings on the report.
//!
//! # Usage
//!
//! ```
//! use puckline_analysis::MomentumConfig;
//! use puckline_ledger::GameLedger;
//! use puckline_types::{GameClock, GameId, RecommendationTier, Snapshot};
//!
//! let mut ledger = GameLedger::new(GameId::new("2024020001"));
//! let snapshot = Snapshot::empty(GameClock::default());
//!
//! let report = ledger.apply_snapshot(&snapshot, &MomentumConfig::default());
//! assert_eq!(report.new_event_count, 0);
//! assert_eq!(report.recommendation_tier, RecommendationTier::FillerContent);
//! assert!(ledger.verify_consistency().is_consistent());
//! ```

pub mod codec;
pub mod consistency;
pub mod decode;
pub mod dedup;
pub mod ledger;

// Re-export primary types at crate root.
pub use codec::{FORMAT_VERSION, PortableState, from_json, from_portable, to_json, to_portable};
pub use consistency::ConsistencyResult;
pub use decode::{DecodeError, decode};
pub use dedup::{Deduplicated, IndexedEvent, dedupe};
pub use ledger::GameLedger;

use puckline_types::{GameId, TeamSide};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when restoring a ledger from portable state.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The state was written by an unknown format version.
    #[error("unsupported portable state version {found}, expected {supported}")]
    UnsupportedVersion {
        /// Version found in the state.
        found: u32,
        /// Version this build reads.
        supported: u32,
    },

    /// The JSON could not be encoded or decoded.
    #[error("portable state JSON error: {source}")]
    Json {
        /// Underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The restored records disagree with each other.
    #[error("portable state is inconsistent: {0}")]
    Inconsistent(LedgerAnomaly),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// One disagreement between ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// A team's score differs from the number of goals logged for it.
    ScoreVersusGoalLog {
        /// The scoring team.
        team: TeamSide,
        /// Goals on the scoreboard.
        score: u32,
        /// Goals in the log.
        logged: usize,
    },
    /// A goalie's goals-allowed differs from the opposing team's score.
    GoalsAllowedVersusScore {
        /// Team the goalie plays for.
        goalie_team: TeamSide,
        /// Goals allowed on the goalie's line.
        goals_allowed: u32,
        /// The opposing team's score.
        opponent_score: u32,
    },
}

/// A consistency violation detected in a game ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The game whose ledger is inconsistent.
    pub game_id: GameId,
    /// Every disagreement found.
    pub mismatches: Vec<Mismatch>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
