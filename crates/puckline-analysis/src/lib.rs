//! Stateless event analysis for the Puckline engine.
//!
//! Everything here is a pure function of its inputs: the engine's game
//! ledger calls into this crate while applying a snapshot, and tests can
//! exercise each stage in isolation with hand-built configuration.
//!
//! # Modules
//!
//! - [`config`] -- [`MomentumConfig`]: base scores, multipliers, bonuses,
//!   and tier thresholds.
//! - [`context`] -- [`GameContext`]: the clock and score an event is scored
//!   against.
//! - [`scorer`] -- Per-event momentum scoring.
//! - [`classifier`] -- Aggregate score to coverage tier.
//! - [`spatial`] -- Rink coordinates to a natural-language location phrase.
//!
//! # Usage
//!
//! ```
//! use puckline_analysis::{classify, score_event, GameContext, MomentumConfig};
//! use puckline_types::{ClockTime, GameClock, GoalEvent, PlayEvent, RecommendationTier, TeamSide, TeamTally};
//!
//! let config = MomentumConfig::default();
//! let goal = PlayEvent::Goal(GoalEvent {
//!     team: TeamSide::Home,
//!     scorer: "Cole Caufield".to_owned(),
//!     assists: Vec::new(),
//!     power_play: false,
//!     location: None,
//! });
//!
//! // Score is 1-0 after the goal, three minutes left in the third.
//! let clock = GameClock::new(3, ClockTime::new(3, 0));
//! let context = GameContext::new(&clock, &TeamTally { home: 1, away: 0 });
//!
//! let momentum = score_event(&goal, &context, &config);
//! assert_eq!(momentum, 98);
//! assert_eq!(classify(momentum, &config.tiers), RecommendationTier::PlayByPlay);
//! ```

pub mod classifier;
pub mod config;
pub mod context;
pub mod scorer;
pub mod spatial;

// Re-export primary types at crate root.
pub use classifier::classify;
pub use config::{
    BaseScores, Bonuses, MomentumConfig, MomentumConfigError, Multipliers, TierThresholds,
};
pub use context::GameContext;
pub use scorer::{MomentumBreakdown, breakdown, score_event};
pub use spatial::{describe, describe_location};
