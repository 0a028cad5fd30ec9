//! Game context an event is scored against.

use puckline_types::{ClockTime, GameClock, PeriodType, TeamTally};

/// When an event happened and how close the game was at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameContext {
    /// Type of the period the event happened in.
    pub period_type: PeriodType,
    /// Time left in that period.
    pub period_time_remaining: ClockTime,
    /// Home score minus away score after the event was applied.
    pub score_differential: i64,
}

impl GameContext {
    /// Build a context from a clock and the current score.
    pub fn new(clock: &GameClock, score: &TeamTally) -> Self {
        Self {
            period_type: clock.effective_period_type(),
            period_time_remaining: clock.time_remaining,
            score_differential: score.differential(),
        }
    }

    /// Override the time remaining with an event's own clock, if it has one.
    #[must_use]
    pub fn at(mut self, time_remaining: Option<ClockTime>) -> Self {
        if let Some(time) = time_remaining {
            self.period_time_remaining = time;
        }
        self
    }

    /// Whether the event happened past regulation.
    pub const fn is_overtime(&self) -> bool {
        self.period_type.is_overtime()
    }

    /// Whether the event happened in the closing window of a regulation period.
    pub const fn is_late_regulation(&self, window_seconds: u32) -> bool {
        matches!(self.period_type, PeriodType::Regulation)
            && self.period_time_remaining.total_seconds() <= window_seconds
    }

    /// Whether the goal differential is within `margin`.
    pub fn is_close(&self, margin: u32) -> bool {
        self.score_differential.unsigned_abs() <= u64::from(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(period: u32, minutes: u32, home: u32, away: u32) -> GameContext {
        let clock = GameClock::new(period, ClockTime::new(minutes, 0));
        GameContext::new(&clock, &TeamTally { home, away })
    }

    #[test]
    fn late_window_is_inclusive() {
        assert!(context(3, 5, 0, 0).is_late_regulation(300));
        assert!(!context(3, 6, 0, 0).is_late_regulation(300));
    }

    #[test]
    fn overtime_is_never_late_regulation() {
        let ctx = context(4, 1, 2, 2);
        assert!(ctx.is_overtime());
        assert!(!ctx.is_late_regulation(300));
    }

    #[test]
    fn closeness_uses_absolute_differential() {
        assert!(context(1, 10, 0, 1).is_close(1));
        assert!(context(1, 10, 1, 0).is_close(1));
        assert!(!context(1, 10, 0, 2).is_close(1));
    }

    #[test]
    fn event_clock_overrides_snapshot_clock() {
        let ctx = context(2, 15, 0, 0).at(Some(ClockTime::new(2, 30)));
        assert_eq!(ctx.period_time_remaining, ClockTime::new(2, 30));
        let unchanged = context(2, 15, 0, 0).at(None);
        assert_eq!(unchanged.period_time_remaining, ClockTime::new(15, 0));
    }
}
