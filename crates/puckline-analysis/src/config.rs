//! Momentum weights and coverage thresholds.
//!
//! Every number the scorer and classifier use lives here so deployments can
//! tune them from `puckline-config.yaml` without touching the algorithms.
//! Defaults reproduce the broadcast-tested table:
//!
//! | Event | Base |
//! |-------|------|
//! | goal | 50 |
//! | fight | 45 |
//! | penalty | 35 |
//! | shot-on-goal | 15 |
//! | hit | 10 |
//! | missed-shot | 8 |
//! | faceoff | 2 |
//! | anything else | 0 |

use rust_decimal::Decimal;
use serde::Deserialize;

use puckline_types::EventKind;

/// Errors from validating a [`MomentumConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MomentumConfigError {
    /// A multiplier would shrink scores.
    #[error("multiplier `{name}` must be at least 1, got {value}")]
    MultiplierBelowOne {
        /// Which multiplier.
        name: &'static str,
        /// The configured value.
        value: Decimal,
    },

    /// Tier thresholds are inverted.
    #[error(
        "play_by_play threshold ({play_by_play}) must not be below mixed_coverage threshold ({mixed_coverage})"
    )]
    InvertedThresholds {
        /// Configured PLAY_BY_PLAY threshold.
        play_by_play: u32,
        /// Configured MIXED_COVERAGE threshold.
        mixed_coverage: u32,
    },
}

/// All tunable momentum parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MomentumConfig {
    /// Base score per event kind.
    #[serde(default)]
    pub base_scores: BaseScores,

    /// Game-state multipliers.
    #[serde(default)]
    pub multipliers: Multipliers,

    /// Within-event bonuses.
    #[serde(default)]
    pub bonuses: Bonuses,

    /// Coverage tier boundaries.
    #[serde(default)]
    pub tiers: TierThresholds,
}

impl MomentumConfig {
    /// Check the invariants the scorer and classifier rely on.
    ///
    /// # Errors
    ///
    /// Returns [`MomentumConfigError`] for a multiplier below 1 or a
    /// PLAY_BY_PLAY threshold below the MIXED_COVERAGE threshold.
    pub fn validate(&self) -> Result<(), MomentumConfigError> {
        let m = &self.multipliers;
        for (name, value) in [
            ("late_game", m.late_game),
            ("overtime", m.overtime),
            ("close_game", m.close_game),
        ] {
            if value < Decimal::ONE {
                return Err(MomentumConfigError::MultiplierBelowOne { name, value });
            }
        }

        if self.tiers.play_by_play < self.tiers.mixed_coverage {
            return Err(MomentumConfigError::InvertedThresholds {
                play_by_play: self.tiers.play_by_play,
                mixed_coverage: self.tiers.mixed_coverage,
            });
        }

        Ok(())
    }
}

/// Base momentum per recognized event kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseScores {
    /// Goal.
    #[serde(default = "default_goal")]
    pub goal: u32,
    /// Fight.
    #[serde(default = "default_fight")]
    pub fight: u32,
    /// Penalty.
    #[serde(default = "default_penalty")]
    pub penalty: u32,
    /// Shot on goal.
    #[serde(default = "default_shot_on_goal")]
    pub shot_on_goal: u32,
    /// Hit.
    #[serde(default = "default_hit")]
    pub hit: u32,
    /// Missed shot.
    #[serde(default = "default_missed_shot")]
    pub missed_shot: u32,
    /// Faceoff.
    #[serde(default = "default_faceoff")]
    pub faceoff: u32,
}

impl BaseScores {
    /// Base score for an event kind; unrecognized kinds score 0.
    pub const fn for_kind(&self, kind: EventKind) -> u32 {
        match kind {
            EventKind::Goal => self.goal,
            EventKind::Fight => self.fight,
            EventKind::Penalty => self.penalty,
            EventKind::ShotOnGoal => self.shot_on_goal,
            EventKind::Hit => self.hit,
            EventKind::MissedShot => self.missed_shot,
            EventKind::Faceoff => self.faceoff,
            EventKind::Other => 0,
        }
    }
}

impl Default for BaseScores {
    fn default() -> Self {
        Self {
            goal: default_goal(),
            fight: default_fight(),
            penalty: default_penalty(),
            shot_on_goal: default_shot_on_goal(),
            hit: default_hit(),
            missed_shot: default_missed_shot(),
            faceoff: default_faceoff(),
        }
    }
}

/// Multipliers keyed on when an event happens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Multipliers {
    /// Applied in the final window of a regulation period.
    #[serde(default = "default_late_game")]
    pub late_game: Decimal,
    /// Applied in overtime and shootouts, instead of `late_game`.
    #[serde(default = "default_overtime")]
    pub overtime: Decimal,
    /// Applied when the score is within `close_game_margin`.
    #[serde(default = "default_close_game")]
    pub close_game: Decimal,
    /// Seconds remaining at or below which a regulation period is "late".
    #[serde(default = "default_late_game_window_seconds")]
    pub late_game_window_seconds: u32,
    /// Largest absolute goal differential that counts as close.
    #[serde(default = "default_close_game_margin")]
    pub close_game_margin: u32,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            late_game: default_late_game(),
            overtime: default_overtime(),
            close_game: default_close_game(),
            late_game_window_seconds: default_late_game_window_seconds(),
            close_game_margin: default_close_game_margin(),
        }
    }
}

/// Additive bonuses keyed on what exactly happened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bonuses {
    /// Shot that hit the post or crossbar.
    #[serde(default = "default_struck_iron")]
    pub struck_iron: u32,
    /// Goal scored on the power play.
    #[serde(default = "default_power_play_goal")]
    pub power_play_goal: u32,
}

impl Default for Bonuses {
    fn default() -> Self {
        Self {
            struck_iron: default_struck_iron(),
            power_play_goal: default_power_play_goal(),
        }
    }
}

/// Aggregate-score boundaries between coverage tiers (inclusive lower bounds).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TierThresholds {
    /// Minimum aggregate for PLAY_BY_PLAY.
    #[serde(default = "default_play_by_play")]
    pub play_by_play: u32,
    /// Minimum aggregate for MIXED_COVERAGE.
    #[serde(default = "default_mixed_coverage")]
    pub mixed_coverage: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            play_by_play: default_play_by_play(),
            mixed_coverage: default_mixed_coverage(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_goal() -> u32 {
    50
}

const fn default_fight() -> u32 {
    45
}

const fn default_penalty() -> u32 {
    35
}

const fn default_shot_on_goal() -> u32 {
    15
}

const fn default_hit() -> u32 {
    10
}

const fn default_missed_shot() -> u32 {
    8
}

const fn default_faceoff() -> u32 {
    2
}

const fn default_late_game() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 1)
}

const fn default_overtime() -> Decimal {
    Decimal::from_parts(25, 0, 0, false, 1)
}

const fn default_close_game() -> Decimal {
    Decimal::from_parts(13, 0, 0, false, 1)
}

const fn default_late_game_window_seconds() -> u32 {
    5 * 60
}

const fn default_close_game_margin() -> u32 {
    1
}

const fn default_struck_iron() -> u32 {
    15
}

const fn default_power_play_goal() -> u32 {
    25
}

const fn default_play_by_play() -> u32 {
    75
}

const fn default_mixed_coverage() -> u32 {
    25
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_match_table() {
        let config = MomentumConfig::default();
        assert_eq!(config.base_scores.for_kind(EventKind::Goal), 50);
        assert_eq!(config.base_scores.for_kind(EventKind::Fight), 45);
        assert_eq!(config.base_scores.for_kind(EventKind::Penalty), 35);
        assert_eq!(config.base_scores.for_kind(EventKind::ShotOnGoal), 15);
        assert_eq!(config.base_scores.for_kind(EventKind::Hit), 10);
        assert_eq!(config.base_scores.for_kind(EventKind::MissedShot), 8);
        assert_eq!(config.base_scores.for_kind(EventKind::Faceoff), 2);
        assert_eq!(config.base_scores.for_kind(EventKind::Other), 0);
        assert_eq!(config.multipliers.late_game, dec!(1.5));
        assert_eq!(config.multipliers.overtime, dec!(2.5));
        assert_eq!(config.multipliers.close_game, dec!(1.3));
        assert_eq!(config.tiers.play_by_play, 75);
        assert_eq!(config.tiers.mixed_coverage, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "base_scores:\n  hit: 12\ntiers:\n  play_by_play: 90\n";
        let config: Result<MomentumConfig, _> = serde_yml::from_str(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.base_scores.hit, 12);
        assert_eq!(config.base_scores.goal, 50);
        assert_eq!(config.tiers.play_by_play, 90);
        assert_eq!(config.tiers.mixed_coverage, 25);
    }

    #[test]
    fn shrinking_multiplier_rejected() {
        let mut config = MomentumConfig::default();
        config.multipliers.close_game = dec!(0.9);
        assert_eq!(
            config.validate(),
            Err(MomentumConfigError::MultiplierBelowOne {
                name: "close_game",
                value: dec!(0.9),
            })
        );
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let mut config = MomentumConfig::default();
        config.tiers.play_by_play = 20;
        assert!(matches!(
            config.validate(),
            Err(MomentumConfigError::InvertedThresholds { .. })
        ));
    }
}
