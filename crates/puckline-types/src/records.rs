//! Ledger records: per-team tallies and the goal and penalty logs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::clock::GameClock;
use crate::enums::TeamSide;

/// A non-negative counter per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamTally {
    /// Home team count.
    pub home: u32,
    /// Away team count.
    pub away: u32,
}

impl TeamTally {
    /// Count for one team.
    pub const fn get(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    /// Add one to a team's count, saturating at the type's maximum.
    pub const fn increment(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home = self.home.saturating_add(1),
            TeamSide::Away => self.away = self.away.saturating_add(1),
        }
    }

    /// Home minus away.
    pub fn differential(&self) -> i64 {
        i64::from(self.home).saturating_sub(i64::from(self.away))
    }
}

/// A goaltender's running line for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GoalieLine {
    /// Goals conceded.
    pub goals_allowed: u32,
    /// Shots on goal stopped.
    pub saves: u32,
}

impl GoalieLine {
    /// Shots faced: saves plus goals allowed.
    pub const fn shots_faced(&self) -> u32 {
        self.saves.saturating_add(self.goals_allowed)
    }
}

/// Goaltender lines for both teams, keyed by the team the goalie plays for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GoalieTally {
    /// The home goaltender.
    pub home: GoalieLine,
    /// The away goaltender.
    pub away: GoalieLine,
}

impl GoalieTally {
    /// Line for the goalie of one team.
    pub const fn get(&self, side: TeamSide) -> &GoalieLine {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Mutable line for the goalie of one team.
    pub const fn get_mut(&mut self, side: TeamSide) -> &mut GoalieLine {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}

/// One entry of the append-only goal log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GoalRecord {
    /// Goal scorer.
    pub scorer: String,
    /// Zero to two assisting players.
    pub assists: Vec<String>,
    /// Scoring team.
    pub team: TeamSide,
    /// When the goal was scored.
    pub game_time: GameClock,
}

/// One entry of the append-only penalty log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PenaltyRecord {
    /// Penalized player.
    pub player: String,
    /// Penalized team.
    pub team: TeamSide,
    /// Penalty length in minutes.
    pub duration_minutes: u32,
    /// When the penalty was called.
    pub game_time: GameClock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_increments_one_side() {
        let mut tally = TeamTally::default();
        tally.increment(TeamSide::Away);
        tally.increment(TeamSide::Away);
        tally.increment(TeamSide::Home);
        assert_eq!(tally.get(TeamSide::Away), 2);
        assert_eq!(tally.get(TeamSide::Home), 1);
        assert_eq!(tally.differential(), -1);
    }

    #[test]
    fn goalie_lines_are_independent() {
        let mut goalies = GoalieTally::default();
        goalies.get_mut(TeamSide::Home).saves = 12;
        goalies.get_mut(TeamSide::Home).goals_allowed = 2;
        assert_eq!(goalies.get(TeamSide::Home).shots_faced(), 14);
        assert_eq!(goalies.get(TeamSide::Away).shots_faced(), 0);
    }
}
