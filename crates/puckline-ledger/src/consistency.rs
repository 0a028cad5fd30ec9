//! Consistency verification for a game ledger.
//!
//! For each team T the ledger must satisfy:
//!
//! ```text
//! score[T] == count(goals where goal.team == T)
//! goalie_stats[opponent(T)].goals_allowed == score[T]
//! ```
//!
//! Every goal updates all three records together, so these hold by
//! construction. The check runs after restoring a ledger from portable
//! state, where the records arrive independently.

use puckline_types::TeamSide;

use crate::ledger::GameLedger;
use crate::{LedgerAnomaly, Mismatch};

/// The result of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyResult {
    /// Score, goal log, and goalie lines agree.
    Consistent,
    /// One or more records disagree.
    Anomaly(LedgerAnomaly),
}

impl ConsistencyResult {
    /// Whether the check passed.
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent)
    }
}

/// Verify the score against the goal log and the goalie lines.
pub fn verify_consistency(ledger: &GameLedger) -> ConsistencyResult {
    let mut mismatches = Vec::new();

    for team in [TeamSide::Home, TeamSide::Away] {
        let score = ledger.score().get(team);
        let logged = ledger
            .goals()
            .iter()
            .filter(|goal| goal.team == team)
            .count();
        if usize::try_from(score).ok() != Some(logged) {
            mismatches.push(Mismatch::ScoreVersusGoalLog {
                team,
                score,
                logged,
            });
        }

        let allowed = ledger.goalie_stats().get(team.opponent()).goals_allowed;
        if allowed != score {
            mismatches.push(Mismatch::GoalsAllowedVersusScore {
                goalie_team: team.opponent(),
                goals_allowed: allowed,
                opponent_score: score,
            });
        }
    }

    if mismatches.is_empty() {
        ConsistencyResult::Consistent
    } else {
        let message = format!(
            "game {} has {} inconsistent record(s)",
            ledger.game_id(),
            mismatches.len()
        );
        tracing::error!(game_id = %ledger.game_id(), mismatches = mismatches.len(), "Ledger inconsistency detected");
        ConsistencyResult::Anomaly(LedgerAnomaly {
            game_id: ledger.game_id().clone(),
            mismatches,
            message,
        })
    }
}
