//! Enumeration types for the Puckline engine.
//!
//! Serialized spellings follow the upstream NHL play-by-play feed where one
//! exists (`REG`/`OT`/`SO` period types, `O`/`D`/`N` zone codes, kebab-case
//! event type keys).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Which of the two teams an event or counter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TeamSide {
    /// The home team.
    Home,
    /// The visiting team.
    Away,
}

impl TeamSide {
    /// The other team.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Lowercase label used in logs and narration context.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// The kind of period currently being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PeriodType {
    /// One of the three regulation periods.
    #[serde(rename = "REG")]
    Regulation,
    /// Sudden-death overtime.
    #[serde(rename = "OT")]
    Overtime,
    /// Shootout.
    #[serde(rename = "SO")]
    Shootout,
}

impl PeriodType {
    /// Derive the period type from a period number when the feed omits it.
    ///
    /// Periods 1--3 are regulation; anything later is overtime.
    pub const fn from_period_number(period: u32) -> Self {
        if period <= 3 {
            Self::Regulation
        } else {
            Self::Overtime
        }
    }

    /// Whether this period is played past regulation (overtime or shootout).
    pub const fn is_overtime(self) -> bool {
        matches!(self, Self::Overtime | Self::Shootout)
    }
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// The scoring category of a play-by-play event.
///
/// Kinds the engine does not recognize map to [`EventKind::Other`]; they are
/// still narratable but carry no momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// A goal.
    Goal,
    /// A fight between players.
    Fight,
    /// A penalty call.
    Penalty,
    /// A shot that reached the goaltender.
    ShotOnGoal,
    /// A body check.
    Hit,
    /// A shot that missed the net.
    MissedShot,
    /// A faceoff.
    Faceoff,
    /// Any other upstream event type.
    Other,
}

impl EventKind {
    /// Map an upstream event type key onto a scoring category.
    pub fn from_type_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "goal" => Self::Goal,
            "fight" | "fighting" => Self::Fight,
            "penalty" => Self::Penalty,
            "shot-on-goal" | "shot_on_goal" | "shot" => Self::ShotOnGoal,
            "hit" => Self::Hit,
            "missed-shot" | "missed_shot" => Self::MissedShot,
            "faceoff" => Self::Faceoff,
            _ => Self::Other,
        }
    }

    /// Whether the event counts toward the team shot total.
    pub const fn is_shot(self) -> bool {
        matches!(self, Self::ShotOnGoal | Self::MissedShot)
    }
}

// ---------------------------------------------------------------------------
// Coverage tiers
// ---------------------------------------------------------------------------

/// How much narration effort a snapshot's new activity warrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum RecommendationTier {
    /// Call the action event by event.
    PlayByPlay,
    /// Mix event calls with color commentary.
    MixedCoverage,
    /// Nothing notable happened; fill with context and storylines.
    FillerContent,
}

// ---------------------------------------------------------------------------
// Rink geometry
// ---------------------------------------------------------------------------

/// Zone of the ice relative to the team that owns the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Zone {
    /// The attacking zone.
    #[serde(rename = "O")]
    Offensive,
    /// The defending zone.
    #[serde(rename = "D")]
    Defensive,
    /// Between the blue lines.
    #[serde(rename = "N")]
    Neutral,
}

impl Zone {
    /// Parse a one-letter feed zone code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "O" | "o" => Some(Self::Offensive),
            "D" | "d" => Some(Self::Defensive),
            "N" | "n" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Adjective used in location phrases.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offensive => "offensive",
            Self::Defensive => "defensive",
            Self::Neutral => "neutral",
        }
    }
}

/// Which end of the rink (in feed coordinates) the home team defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RinkSide {
    /// The negative-x end.
    Left,
    /// The positive-x end.
    Right,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Whether the controlling process still considers the game in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GameStatus {
    /// Snapshots are still expected.
    #[default]
    Live,
    /// The feeding collaborator signalled the end of the game.
    Final,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_symmetric() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Away.opponent().opponent(), TeamSide::Away);
    }

    #[test]
    fn type_keys_map_to_kinds() {
        assert_eq!(EventKind::from_type_key("goal"), EventKind::Goal);
        assert_eq!(EventKind::from_type_key("shot-on-goal"), EventKind::ShotOnGoal);
        assert_eq!(EventKind::from_type_key("Missed-Shot"), EventKind::MissedShot);
        assert_eq!(EventKind::from_type_key("fighting"), EventKind::Fight);
        assert_eq!(EventKind::from_type_key("blocked-shot"), EventKind::Other);
        assert_eq!(EventKind::from_type_key("stoppage"), EventKind::Other);
    }

    #[test]
    fn overtime_derivation() {
        assert_eq!(PeriodType::from_period_number(1), PeriodType::Regulation);
        assert_eq!(PeriodType::from_period_number(3), PeriodType::Regulation);
        assert_eq!(PeriodType::from_period_number(4), PeriodType::Overtime);
        assert!(PeriodType::Shootout.is_overtime());
        assert!(!PeriodType::Regulation.is_overtime());
    }

    #[test]
    fn tier_serializes_screaming_snake() {
        let json = serde_json::to_string(&RecommendationTier::PlayByPlay).ok();
        assert_eq!(json.as_deref(), Some("\"PLAY_BY_PLAY\""));
    }

    #[test]
    fn zone_codes() {
        assert_eq!(Zone::from_code("O"), Some(Zone::Offensive));
        assert_eq!(Zone::from_code("d"), Some(Zone::Defensive));
        assert_eq!(Zone::from_code("X"), None);
    }
}
