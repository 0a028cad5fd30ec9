//! Game clock types: period number, period type, and time remaining.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::PeriodType;

/// Length of a regulation period in seconds.
pub const REGULATION_PERIOD_SECONDS: u32 = 20 * 60;

/// Errors from parsing a `MM:SS` clock string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockParseError {
    /// The string is not two `:`-separated numbers.
    #[error("expected MM:SS, got {0:?}")]
    Format(String),
    /// The seconds component is 60 or more.
    #[error("seconds out of range: {0}")]
    SecondsOutOfRange(u32),
}

/// Minutes and seconds left on the period clock.
///
/// Deserializes from either `{"minutes": 3, "seconds": 12}` or the feed's
/// `"03:12"` string form; always serializes as the structured form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "ClockRepr")]
#[ts(export, export_to = "bindings/")]
pub struct ClockTime {
    /// Whole minutes remaining.
    pub minutes: u32,
    /// Seconds remaining past the whole minutes (0--59).
    pub seconds: u32,
}

impl ClockTime {
    /// Build a clock value.
    pub const fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    /// A full regulation period (20:00).
    pub const fn full_period() -> Self {
        Self::new(20, 0)
    }

    /// Total seconds remaining.
    pub const fn total_seconds(self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::full_period()
    }
}

impl core::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl core::str::FromStr for ClockTime {
    type Err = ClockParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (mins, secs) = raw
            .trim()
            .split_once(':')
            .ok_or_else(|| ClockParseError::Format(raw.to_owned()))?;
        let (Ok(minutes), Ok(seconds)) = (mins.parse::<u32>(), secs.parse::<u32>()) else {
            return Err(ClockParseError::Format(raw.to_owned()));
        };
        if seconds >= 60 {
            return Err(ClockParseError::SecondsOutOfRange(seconds));
        }
        Ok(Self { minutes, seconds })
    }
}

/// Accepted wire forms for [`ClockTime`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ClockRepr {
    Text(String),
    Parts { minutes: u32, seconds: u32 },
}

impl TryFrom<ClockRepr> for ClockTime {
    type Error = ClockParseError;

    fn try_from(repr: ClockRepr) -> Result<Self, Self::Error> {
        match repr {
            ClockRepr::Text(raw) => raw.parse(),
            ClockRepr::Parts { minutes, seconds } => {
                if seconds >= 60 {
                    Err(ClockParseError::SecondsOutOfRange(seconds))
                } else {
                    Ok(Self { minutes, seconds })
                }
            }
        }
    }
}

/// Where the game stands: which period, what kind, and how much time is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameClock {
    /// Period number, starting at 1.
    pub period: u32,
    /// Period type as reported by the feed; derived from `period` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    /// Time left in the period.
    #[serde(default)]
    pub time_remaining: ClockTime,
}

impl GameClock {
    /// A clock at the given period and time, with the period type derived.
    pub const fn new(period: u32, time_remaining: ClockTime) -> Self {
        Self {
            period,
            period_type: None,
            time_remaining,
        }
    }

    /// The reported period type, or the one implied by the period number.
    pub const fn effective_period_type(&self) -> PeriodType {
        match self.period_type {
            Some(kind) => kind,
            None => PeriodType::from_period_number(self.period),
        }
    }

    /// Whether the game is past regulation.
    pub const fn is_overtime(&self) -> bool {
        self.effective_period_type().is_overtime()
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(1, ClockTime::full_period())
    }
}

impl core::fmt::Display for GameClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.effective_period_type() {
            PeriodType::Regulation => write!(f, "P{} {}", self.period, self.time_remaining),
            PeriodType::Overtime => write!(f, "OT {}", self.time_remaining),
            PeriodType::Shootout => f.write_str("SO"),
        }
    }
}
