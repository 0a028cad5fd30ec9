//! Snapshot input: raw events as delivered, and their typed decoded form.
//!
//! Upstream feeds deliver loosely typed events whose fields depend on the
//! event type. The engine accepts them as [`RawEvent`] records and decodes
//! each into a [`PlayEvent`] variant before touching the ledger, so every
//! kind-specific field is handled exhaustively instead of by optional
//! lookups.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::clock::{ClockTime, GameClock};
use crate::enums::{EventKind, RinkSide, TeamSide};
use crate::ids::{EventId, GameId};

// ---------------------------------------------------------------------------
// Wire form
// ---------------------------------------------------------------------------

/// One play-by-play event exactly as the snapshot producer delivered it.
///
/// Deserialization never fails: a field with the wrong shape is left unset
/// and described in [`RawEvent::wire_errors`], so one bad event cannot sink
/// the rest of its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(from = "Value")]
#[ts(export, export_to = "bindings/")]
pub struct RawEvent {
    /// Stable upstream identifier. Missing or empty ids are accepted but
    /// cannot be deduplicated.
    #[serde(default)]
    pub event_id: Option<EventId>,
    /// Upstream event type key (`goal`, `shot-on-goal`, `stoppage`, ...).
    #[serde(rename = "type")]
    pub type_key: String,
    /// Team that owns the event, when the feed attributes one.
    #[serde(default)]
    pub team_side: Option<TeamSide>,
    /// Period clock at the moment of the event, if the feed provides it.
    #[serde(default)]
    pub time_remaining: Option<ClockTime>,
    /// End of the rink the home team is defending during this event.
    #[serde(default)]
    pub home_defending_side: Option<RinkSide>,
    /// Kind-specific payload (scorer, assists, coordinates, ...).
    #[serde(default)]
    pub details: Value,
    /// Problems found while reading the wire form. Non-empty means the event
    /// is malformed and must not be scored.
    #[serde(skip)]
    #[ts(skip)]
    pub wire_errors: Vec<String>,
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        let mut wire_errors = Vec::new();
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                wire_errors.push(format!("expected an object, got {other}"));
                Map::new()
            }
        };
        let event_id = match map.remove("event_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(EventId::new(id)),
            Some(Value::Number(id)) => Some(EventId::new(id.to_string())),
            Some(other) => {
                wire_errors.push(format!("event_id: unsupported value {other}"));
                None
            }
        };
        let type_key = match map.remove("type") {
            Some(Value::String(key)) => key,
            Some(other) => {
                wire_errors.push(format!("type: expected a string, got {other}"));
                String::new()
            }
            None => {
                wire_errors.push("type: missing".to_owned());
                String::new()
            }
        };
        Self {
            event_id,
            type_key,
            team_side: take(&mut map, "team_side", &mut wire_errors),
            time_remaining: take(&mut map, "time_remaining", &mut wire_errors),
            home_defending_side: take(&mut map, "home_defending_side", &mut wire_errors),
            details: map.remove("details").unwrap_or(Value::Null),
            wire_errors,
        }
    }
}

/// Removes `key` and parses it, recording a wire error instead of failing.
fn take<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(format!("{key}: {e}"));
                None
            }
        },
    }
}

impl RawEvent {
    /// The scoring category implied by the type key.
    pub fn kind(&self) -> EventKind {
        EventKind::from_type_key(&self.type_key)
    }

    /// The event id, if present and non-blank.
    pub fn usable_id(&self) -> Option<&EventId> {
        self.event_id.as_ref().filter(|id| !id.is_blank())
    }
}

/// A reported window of play-by-play at a point in game time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Game the snapshot belongs to, when the producer stamps it.
    #[serde(default)]
    pub game_id: Option<GameId>,
    /// Game clock at the time the snapshot was taken.
    pub clock: GameClock,
    /// Wall-clock time the producer captured the snapshot.
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    /// Events in the order supplied by the feed.
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

impl Snapshot {
    /// A snapshot with no events, useful for clock-only updates.
    pub const fn empty(clock: GameClock) -> Self {
        Self {
            game_id: None,
            clock,
            captured_at: None,
            events: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed form
// ---------------------------------------------------------------------------

/// Rink coordinates in feed units (x along the length, y across).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RinkLocation {
    /// Longitudinal coordinate, roughly -100..=100.
    pub x: i32,
    /// Lateral coordinate, roughly -42..=42.
    pub y: i32,
    /// Feed zone code relative to the event owner (`O`, `D`, `N`).
    pub zone_code: Option<String>,
    /// End of the rink the home team defends.
    pub home_defending_side: Option<RinkSide>,
}

/// A goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GoalEvent {
    /// Scoring team.
    pub team: TeamSide,
    /// Goal scorer.
    pub scorer: String,
    /// Zero to two assisting players, primary first.
    pub assists: Vec<String>,
    /// Whether the goal was scored with the man advantage.
    pub power_play: bool,
    /// Where the shot was taken from.
    pub location: Option<RinkLocation>,
}

/// A shot on goal or a missed shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShotEvent {
    /// Shooting team.
    pub team: TeamSide,
    /// Shooter, when reported.
    pub shooter: Option<String>,
    /// Whether the puck hit the post or crossbar.
    pub struck_iron: bool,
    /// Where the shot was taken from.
    pub location: Option<RinkLocation>,
}

/// A penalty call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PenaltyEvent {
    /// Penalized team.
    pub team: TeamSide,
    /// Penalized player.
    pub player: String,
    /// Penalty length in minutes.
    pub duration_minutes: u32,
    /// Infraction description, when reported.
    pub infraction: Option<String>,
    /// Where the infraction happened.
    pub location: Option<RinkLocation>,
}

/// A fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FightEvent {
    /// Team the feed attributes the fight to, if any.
    pub team: Option<TeamSide>,
    /// Players involved.
    pub combatants: Vec<String>,
    /// Where the fight broke out.
    pub location: Option<RinkLocation>,
}

/// A body check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HitEvent {
    /// Hitting team, if reported.
    pub team: Option<TeamSide>,
    /// Player delivering the hit.
    pub hitter: Option<String>,
    /// Player receiving the hit.
    pub hittee: Option<String>,
    /// Where the hit landed.
    pub location: Option<RinkLocation>,
}

/// A faceoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FaceoffEvent {
    /// Team that won the draw, if reported.
    pub team: Option<TeamSide>,
    /// Player who won the draw.
    pub winner: Option<String>,
    /// Faceoff dot location.
    pub location: Option<RinkLocation>,
}

/// A decoded event, one variant per scoring category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum PlayEvent {
    /// See [`GoalEvent`].
    Goal(GoalEvent),
    /// See [`FightEvent`].
    Fight(FightEvent),
    /// See [`PenaltyEvent`].
    Penalty(PenaltyEvent),
    /// See [`ShotEvent`].
    ShotOnGoal(ShotEvent),
    /// See [`ShotEvent`].
    MissedShot(ShotEvent),
    /// See [`HitEvent`].
    Hit(HitEvent),
    /// See [`FaceoffEvent`].
    Faceoff(FaceoffEvent),
    /// An event type the engine passes through without interpretation.
    Other {
        /// The upstream type key.
        type_key: String,
        /// Team attribution, if any.
        team: Option<TeamSide>,
    },
}

impl PlayEvent {
    /// Scoring category of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Goal(_) => EventKind::Goal,
            Self::Fight(_) => EventKind::Fight,
            Self::Penalty(_) => EventKind::Penalty,
            Self::ShotOnGoal(_) => EventKind::ShotOnGoal,
            Self::MissedShot(_) => EventKind::MissedShot,
            Self::Hit(_) => EventKind::Hit,
            Self::Faceoff(_) => EventKind::Faceoff,
            Self::Other { .. } => EventKind::Other,
        }
    }

    /// Team attribution, if the event has one.
    pub const fn team(&self) -> Option<TeamSide> {
        match self {
            Self::Goal(goal) => Some(goal.team),
            Self::Penalty(penalty) => Some(penalty.team),
            Self::ShotOnGoal(shot) | Self::MissedShot(shot) => Some(shot.team),
            Self::Fight(fight) => fight.team,
            Self::Hit(hit) => hit.team,
            Self::Faceoff(faceoff) => faceoff.team,
            Self::Other { team, .. } => *team,
        }
    }

    /// Rink coordinates, if the event has them.
    pub const fn location(&self) -> Option<&RinkLocation> {
        match self {
            Self::Goal(goal) => goal.location.as_ref(),
            Self::Penalty(penalty) => penalty.location.as_ref(),
            Self::ShotOnGoal(shot) | Self::MissedShot(shot) => shot.location.as_ref(),
            Self::Fight(fight) => fight.location.as_ref(),
            Self::Hit(hit) => hit.location.as_ref(),
            Self::Faceoff(faceoff) => faceoff.location.as_ref(),
            Self::Other { .. } => None,
        }
    }
}
