//! Decoding of raw feed events into typed [`PlayEvent`] variants.
//!
//! Each recognized event kind has a details shape with its required fields.
//! A raw event that lacks one is malformed: the ledger skips it and records
//! a warning rather than failing the snapshot.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use puckline_types::{
    EventKind, FaceoffEvent, FightEvent, GoalEvent, HitEvent, PenaltyEvent, PlayEvent, RawEvent,
    RinkLocation, ShotEvent, TeamSide,
};

/// Largest number of assists a goal can carry.
pub const MAX_ASSISTS: usize = 2;

/// Shot `reason` values meaning the puck hit the post or crossbar.
const IRON_REASONS: [&str; 4] = ["hit-crossbar", "hit-left-post", "hit-right-post", "hit-post"];

/// Why a raw event could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The event kind requires a team and none was given.
    #[error("{kind:?} event has no team_side")]
    MissingTeam {
        /// The event kind.
        kind: EventKind,
    },

    /// A required details field is absent or empty.
    #[error("{kind:?} event is missing `{field}`")]
    MissingField {
        /// The event kind.
        kind: EventKind,
        /// The absent field.
        field: &'static str,
    },

    /// A goal lists more than two assists.
    #[error("goal lists {count} assists, at most 2 allowed")]
    TooManyAssists {
        /// Number of assists given.
        count: usize,
    },

    /// A top-level event field could not be read from the wire.
    #[error("unreadable event fields: {message}")]
    InvalidField {
        /// Every field problem, joined.
        message: String,
    },

    /// The details payload has the wrong shape.
    #[error("invalid details for {kind:?}: {message}")]
    InvalidDetails {
        /// The event kind.
        kind: EventKind,
        /// The parser's complaint.
        message: String,
    },
}

/// Coordinates and zone. Unreadable values are dropped, never fatal.
#[derive(Debug, Deserialize)]
struct Spot {
    #[serde(default, deserialize_with = "lenient_coordinate")]
    x: Option<i32>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    y: Option<i32>,
    #[serde(default, deserialize_with = "lenient_zone")]
    zone: Option<String>,
}

/// Accepts integer or fractional feet; fractions round half away from zero.
fn lenient_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coordinate))
}

fn coordinate(value: &serde_json::Value) -> Option<i32> {
    if let Some(whole) = value.as_i64() {
        return i32::try_from(whole).ok();
    }
    value
        .as_f64()
        .and_then(Decimal::from_f64)
        .map(|feet| feet.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|feet| feet.to_i32())
}

fn lenient_zone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(zone)) => Some(zone),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct GoalDetails {
    scorer: Option<String>,
    #[serde(default)]
    assists: Vec<String>,
    #[serde(default)]
    power_play: bool,
    #[serde(flatten)]
    spot: Spot,
}

#[derive(Debug, Deserialize)]
struct ShotDetails {
    shooter: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    struck_iron: bool,
    #[serde(flatten)]
    spot: Spot,
}

#[derive(Debug, Deserialize)]
struct PenaltyDetails {
    player: Option<String>,
    duration: Option<u32>,
    infraction: Option<String>,
    #[serde(flatten)]
    spot: Spot,
}

#[derive(Debug, Deserialize)]
struct FightDetails {
    #[serde(default)]
    combatants: Vec<String>,
    #[serde(flatten)]
    spot: Spot,
}

#[derive(Debug, Deserialize)]
struct HitDetails {
    hitter: Option<String>,
    hittee: Option<String>,
    #[serde(flatten)]
    spot: Spot,
}

#[derive(Debug, Deserialize)]
struct FaceoffDetails {
    winner: Option<String>,
    #[serde(flatten)]
    spot: Spot,
}

/// Decode a raw feed event into its typed variant.
///
/// # Errors
///
/// Returns [`DecodeError`] when a field the kind requires is missing or the
/// details payload cannot be parsed.
pub fn decode(raw: &RawEvent) -> Result<PlayEvent, DecodeError> {
    if !raw.wire_errors.is_empty() {
        return Err(DecodeError::InvalidField {
            message: raw.wire_errors.join("; "),
        });
    }
    let kind = raw.kind();
    let event = match kind {
        EventKind::Goal => {
            let details: GoalDetails = parse_details(raw, kind)?;
            let team = require_team(raw, kind)?;
            let scorer = require_text(details.scorer, kind, "scorer")?;
            if details.assists.len() > MAX_ASSISTS {
                return Err(DecodeError::TooManyAssists {
                    count: details.assists.len(),
                });
            }
            PlayEvent::Goal(GoalEvent {
                team,
                scorer,
                assists: details.assists,
                power_play: details.power_play,
                location: location(details.spot, raw),
            })
        }
        EventKind::ShotOnGoal | EventKind::MissedShot => {
            let details: ShotDetails = parse_details(raw, kind)?;
            let shot = ShotEvent {
                team: require_team(raw, kind)?,
                shooter: non_empty(details.shooter),
                struck_iron: details.struck_iron
                    || details
                        .reason
                        .as_deref()
                        .is_some_and(|reason| IRON_REASONS.contains(&reason)),
                location: location(details.spot, raw),
            };
            if kind == EventKind::ShotOnGoal {
                PlayEvent::ShotOnGoal(shot)
            } else {
                PlayEvent::MissedShot(shot)
            }
        }
        EventKind::Penalty => {
            let details: PenaltyDetails = parse_details(raw, kind)?;
            let team = require_team(raw, kind)?;
            let player = require_text(details.player, kind, "player")?;
            let duration_minutes = details.duration.ok_or(DecodeError::MissingField {
                kind,
                field: "duration",
            })?;
            PlayEvent::Penalty(PenaltyEvent {
                team,
                player,
                duration_minutes,
                infraction: non_empty(details.infraction),
                location: location(details.spot, raw),
            })
        }
        EventKind::Fight => {
            let details: FightDetails = parse_details(raw, kind)?;
            PlayEvent::Fight(FightEvent {
                team: raw.team_side,
                combatants: details.combatants,
                location: location(details.spot, raw),
            })
        }
        EventKind::Hit => {
            let details: HitDetails = parse_details(raw, kind)?;
            PlayEvent::Hit(HitEvent {
                team: raw.team_side,
                hitter: non_empty(details.hitter),
                hittee: non_empty(details.hittee),
                location: location(details.spot, raw),
            })
        }
        EventKind::Faceoff => {
            let details: FaceoffDetails = parse_details(raw, kind)?;
            PlayEvent::Faceoff(FaceoffEvent {
                team: raw.team_side,
                winner: non_empty(details.winner),
                location: location(details.spot, raw),
            })
        }
        EventKind::Other => PlayEvent::Other {
            type_key: raw.type_key.clone(),
            team: raw.team_side,
        },
    };
    Ok(event)
}

fn parse_details<T: DeserializeOwned>(raw: &RawEvent, kind: EventKind) -> Result<T, DecodeError> {
    let value = if raw.details.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        raw.details.clone()
    };
    serde_json::from_value(value).map_err(|e| DecodeError::InvalidDetails {
        kind,
        message: e.to_string(),
    })
}

fn require_team(raw: &RawEvent, kind: EventKind) -> Result<TeamSide, DecodeError> {
    raw.team_side.ok_or(DecodeError::MissingTeam { kind })
}

fn require_text(
    value: Option<String>,
    kind: EventKind,
    field: &'static str,
) -> Result<String, DecodeError> {
    non_empty(value).ok_or(DecodeError::MissingField { kind, field })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn location(spot: Spot, raw: &RawEvent) -> Option<RinkLocation> {
    match (spot.x, spot.y) {
        (Some(x), Some(y)) => Some(RinkLocation {
            x,
            y,
            zone_code: spot.zone,
            home_defending_side: raw.home_defending_side,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(type_key: &str, team: Option<TeamSide>, details: serde_json::Value) -> RawEvent {
        RawEvent {
            event_id: None,
            type_key: type_key.to_owned(),
            team_side: team,
            time_remaining: None,
            home_defending_side: None,
            details,
            wire_errors: Vec::new(),
        }
    }

    #[test]
    fn goal_with_assists_and_location() {
        let event = raw(
            "goal",
            Some(TeamSide::Away),
            json!({"scorer": "Jack Hughes", "assists": ["Jesper Bratt"], "x": 80, "y": 4, "zone": "O"}),
        );
        let decoded = decode(&event);
        assert!(matches!(
            &decoded,
            Ok(PlayEvent::Goal(goal))
                if goal.team == TeamSide::Away && goal.assists.len() == 1 && !goal.power_play
        ));
        let x = match decoded {
            Ok(PlayEvent::Goal(goal)) => goal.location.map(|l| l.x),
            _ => None,
        };
        assert_eq!(x, Some(80));
    }

    #[test]
    fn fractional_coordinates_round_to_the_nearest_foot() {
        let event = raw(
            "goal",
            Some(TeamSide::Home),
            json!({"scorer": "Cole Caufield", "x": 72.5, "y": -8.4, "zone": "O"}),
        );
        let location = match decode(&event) {
            Ok(PlayEvent::Goal(goal)) => goal.location.map(|l| (l.x, l.y)),
            _ => None,
        };
        assert_eq!(location, Some((73, -8)));
    }

    #[test]
    fn unreadable_coordinates_drop_the_location_only() {
        let event = raw(
            "shot-on-goal",
            Some(TeamSide::Away),
            json!({"shooter": "A", "x": "left", "y": 3, "zone": 7}),
        );
        assert!(matches!(
            decode(&event),
            Ok(PlayEvent::ShotOnGoal(ShotEvent { location: None, .. }))
        ));
    }

    #[test]
    fn wire_errors_make_the_event_malformed() {
        let mut event = raw("goal", None, json!({"scorer": "A"}));
        event.wire_errors.push("team_side: unknown variant `neutral`".to_owned());
        assert_eq!(
            decode(&event),
            Err(DecodeError::InvalidField {
                message: "team_side: unknown variant `neutral`".to_owned(),
            })
        );
    }

    #[test]
    fn goal_without_scorer_is_malformed() {
        let event = raw("goal", Some(TeamSide::Home), json!({"assists": []}));
        assert_eq!(
            decode(&event),
            Err(DecodeError::MissingField {
                kind: EventKind::Goal,
                field: "scorer",
            })
        );
    }

    #[test]
    fn goal_without_team_is_malformed() {
        let event = raw("goal", None, json!({"scorer": "A"}));
        assert_eq!(
            decode(&event),
            Err(DecodeError::MissingTeam {
                kind: EventKind::Goal
            })
        );
    }

    #[test]
    fn three_assists_rejected() {
        let event = raw(
            "goal",
            Some(TeamSide::Home),
            json!({"scorer": "A", "assists": ["B", "C", "D"]}),
        );
        assert_eq!(decode(&event), Err(DecodeError::TooManyAssists { count: 3 }));
    }

    #[test]
    fn post_reason_marks_iron() {
        let event = raw("missed-shot", Some(TeamSide::Home), json!({"reason": "hit-left-post"}));
        let decoded = decode(&event);
        assert!(matches!(decoded, Ok(PlayEvent::MissedShot(ShotEvent { struck_iron: true, .. }))));

        let wide = raw("missed-shot", Some(TeamSide::Home), json!({"reason": "wide-of-net"}));
        assert!(matches!(
            decode(&wide),
            Ok(PlayEvent::MissedShot(ShotEvent { struck_iron: false, .. }))
        ));
    }

    #[test]
    fn penalty_requires_duration() {
        let event = raw("penalty", Some(TeamSide::Home), json!({"player": "Tom Wilson"}));
        assert_eq!(
            decode(&event),
            Err(DecodeError::MissingField {
                kind: EventKind::Penalty,
                field: "duration",
            })
        );
    }

    #[test]
    fn hit_needs_nothing() {
        let event = raw("hit", None, serde_json::Value::Null);
        assert!(matches!(decode(&event), Ok(PlayEvent::Hit(_))));
    }

    #[test]
    fn wrong_detail_types_are_invalid() {
        let event = raw("penalty", Some(TeamSide::Away), json!({"player": "X", "duration": "two"}));
        assert!(matches!(decode(&event), Err(DecodeError::InvalidDetails { .. })));
    }

    #[test]
    fn unknown_kind_passes_through() {
        let event = raw("stoppage", None, json!({"reason": "icing"}));
        assert_eq!(
            decode(&event),
            Ok(PlayEvent::Other {
                type_key: "stoppage".to_owned(),
                team: None,
            })
        );
    }
}
