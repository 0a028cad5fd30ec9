//! Momentum scoring for a single event.
//!
//! Scoring runs in three stages:
//!
//! 1. **Base** from the event kind ([`BaseScores`]).
//! 2. **Multipliers** for when the event happened: overtime (or, in
//!    regulation only, the late-game window), then close-game on top.
//! 3. **Bonuses** for what exactly happened: iron on a shot, power-play goal.
//!
//! The product is rounded half away from zero. All arithmetic is
//! [`Decimal`] so 1.5 x 1.3 is exact.
//!
//! [`BaseScores`]: crate::config::BaseScores

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use puckline_types::{EventKind, PlayEvent};

use crate::config::MomentumConfig;
use crate::context::GameContext;

/// How an event's momentum score was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentumBreakdown {
    /// Base score for the event kind.
    pub base: u32,
    /// Combined game-state multiplier.
    pub multiplier: Decimal,
    /// Additive bonus.
    pub bonus: u32,
    /// Final rounded score.
    pub total: u32,
}

impl MomentumBreakdown {
    const fn zero() -> Self {
        Self {
            base: 0,
            multiplier: Decimal::ONE,
            bonus: 0,
            total: 0,
        }
    }
}

/// Score one event against its game context.
pub fn score_event(event: &PlayEvent, context: &GameContext, config: &MomentumConfig) -> u32 {
    breakdown(event, context, config).total
}

/// Score one event and return each stage of the computation.
pub fn breakdown(
    event: &PlayEvent,
    context: &GameContext,
    config: &MomentumConfig,
) -> MomentumBreakdown {
    let kind = event.kind();
    if kind == EventKind::Other {
        return MomentumBreakdown::zero();
    }

    let base = config.base_scores.for_kind(kind);
    let multiplier = multiplier_for(context, config);
    let bonus = bonus_for(event, config);

    let raw = Decimal::from(base)
        .checked_mul(multiplier)
        .and_then(|value| value.checked_add(Decimal::from(bonus)))
        .unwrap_or(Decimal::MAX);
    let rounded = raw
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(u32::MAX);

    // Never below the unmultiplied base, whatever the configured factors.
    let total = rounded.max(base);

    MomentumBreakdown {
        base,
        multiplier,
        bonus,
        total,
    }
}

/// Combined game-state multiplier. Overtime supersedes late-game; close-game
/// composes with either.
fn multiplier_for(context: &GameContext, config: &MomentumConfig) -> Decimal {
    let m = &config.multipliers;
    let mut factor = Decimal::ONE;

    if context.is_overtime() {
        factor = factor.checked_mul(m.overtime).unwrap_or(factor);
    } else if context.is_late_regulation(m.late_game_window_seconds) {
        factor = factor.checked_mul(m.late_game).unwrap_or(factor);
    }

    if context.is_close(m.close_game_margin) {
        factor = factor.checked_mul(m.close_game).unwrap_or(factor);
    }

    factor
}

fn bonus_for(event: &PlayEvent, config: &MomentumConfig) -> u32 {
    match event {
        PlayEvent::Goal(goal) if goal.power_play => config.bonuses.power_play_goal,
        PlayEvent::ShotOnGoal(shot) | PlayEvent::MissedShot(shot) if shot.struck_iron => {
            config.bonuses.struck_iron
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use puckline_types::{
        ClockTime, FaceoffEvent, GoalEvent, PeriodType, ShotEvent, TeamSide,
    };
    use rust_decimal_macros::dec;

    use super::*;

    fn goal(power_play: bool) -> PlayEvent {
        PlayEvent::Goal(GoalEvent {
            team: TeamSide::Home,
            scorer: "Nathan MacKinnon".to_owned(),
            assists: vec!["Cale Makar".to_owned()],
            power_play,
            location: None,
        })
    }

    fn shot(struck_iron: bool) -> PlayEvent {
        PlayEvent::MissedShot(ShotEvent {
            team: TeamSide::Away,
            shooter: None,
            struck_iron,
            location: None,
        })
    }

    fn ctx(period_type: PeriodType, minutes: u32, differential: i64) -> GameContext {
        GameContext {
            period_type,
            period_time_remaining: ClockTime::new(minutes, 0),
            score_differential: differential,
        }
    }

    #[test]
    fn close_regulation_goal_scores_65() {
        let config = MomentumConfig::default();
        let score = score_event(&goal(false), &ctx(PeriodType::Regulation, 10, 1), &config);
        assert_eq!(score, 65);
    }

    #[test]
    fn late_close_goal_rounds_half_up_to_98() {
        let config = MomentumConfig::default();
        let detail = breakdown(&goal(false), &ctx(PeriodType::Regulation, 3, 1), &config);
        assert_eq!(detail.multiplier, dec!(1.95));
        assert_eq!(detail.total, 98);
    }

    #[test]
    fn overtime_supersedes_late_game() {
        let config = MomentumConfig::default();
        let detail = breakdown(&goal(false), &ctx(PeriodType::Overtime, 3, 1), &config);
        assert_eq!(detail.multiplier, dec!(3.25));
        assert_eq!(detail.total, 163);
    }

    #[test]
    fn blowout_goal_gets_base_only() {
        let config = MomentumConfig::default();
        let score = score_event(&goal(false), &ctx(PeriodType::Regulation, 10, 4), &config);
        assert_eq!(score, 50);
    }

    #[test]
    fn power_play_bonus_is_added_after_multipliers() {
        let config = MomentumConfig::default();
        // 50 x 1.3 + 25
        let score = score_event(&goal(true), &ctx(PeriodType::Regulation, 10, 0), &config);
        assert_eq!(score, 90);
    }

    #[test]
    fn iron_bonus_applies_to_missed_shots() {
        let config = MomentumConfig::default();
        // 8 + 15, blowout so no multipliers
        let score = score_event(&shot(true), &ctx(PeriodType::Regulation, 12, -3), &config);
        assert_eq!(score, 23);
        let plain = score_event(&shot(false), &ctx(PeriodType::Regulation, 12, -3), &config);
        assert_eq!(plain, 8);
    }

    #[test]
    fn unknown_kinds_score_zero() {
        let config = MomentumConfig::default();
        let event = PlayEvent::Other {
            type_key: "stoppage".to_owned(),
            team: None,
        };
        assert_eq!(score_event(&event, &ctx(PeriodType::Overtime, 1, 0), &config), 0);
    }

    #[test]
    fn faceoff_rounds_small_values() {
        let config = MomentumConfig::default();
        let event = PlayEvent::Faceoff(FaceoffEvent {
            team: None,
            winner: None,
            location: None,
        });
        // 2 x 1.3 = 2.6
        assert_eq!(score_event(&event, &ctx(PeriodType::Regulation, 15, 0), &config), 3);
    }

    #[test]
    fn total_never_drops_below_base() {
        let mut config = MomentumConfig::default();
        config.multipliers.close_game = dec!(0.5);
        let score = score_event(&goal(false), &ctx(PeriodType::Regulation, 10, 0), &config);
        assert_eq!(score, 50);
    }
}
