//! Natural-language location phrases from rink coordinates.
//!
//! Feed coordinates put center ice at the origin, the goal lines at
//! `|x| = 89`, the blue lines at `|x| = 25`, and the side boards near
//! `|y| = 42`. Zone codes are relative to the team that owns the event, so
//! the sign of `x` only matters when the zone has to be inferred from the
//! end the home team defends.

use puckline_types::{RinkLocation, RinkSide, Zone};

const BOARDS_Y: u32 = 30;
const NEAR_BOARDS_Y: u32 = 15;
const GOAL_LINE_X: u32 = 89;
const LOW_X: u32 = 69;
const SLOT_X: u32 = 54;
const BLUE_LINE_X: u32 = 25;
const CENTER_ICE_X: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lateral {
    Boards,
    NearBoards,
    Central,
}

impl Lateral {
    const fn from_y(y: i32) -> Self {
        let abs = y.unsigned_abs();
        if abs >= BOARDS_Y {
            Self::Boards
        } else if abs >= NEAR_BOARDS_Y {
            Self::NearBoards
        } else {
            Self::Central
        }
    }

    const fn qualifier(self) -> Option<&'static str> {
        match self {
            Self::Boards => Some("along the boards"),
            Self::NearBoards => Some("near the boards"),
            Self::Central => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    BehindNet,
    Low,
    Slot,
    High,
}

impl Depth {
    const fn from_x(x: i32) -> Self {
        let abs = x.unsigned_abs();
        if abs > GOAL_LINE_X {
            Self::BehindNet
        } else if abs >= LOW_X {
            Self::Low
        } else if abs >= SLOT_X {
            Self::Slot
        } else {
            Self::High
        }
    }
}

/// Describe where on the ice something happened.
///
/// Always returns a non-empty phrase. Unrecognized zone codes fall back to
/// `"in the {zone} zone"`, or `"on the ice"` when nothing is known.
pub fn describe(
    x: i32,
    y: i32,
    zone_code: Option<&str>,
    home_defending_side: Option<RinkSide>,
) -> String {
    let lateral = Lateral::from_y(y);

    match zone_code.and_then(Zone::from_code) {
        Some(Zone::Neutral) => neutral_phrase(x, lateral),
        Some(zone @ (Zone::Offensive | Zone::Defensive)) => end_zone_phrase(zone, x, lateral),
        None => fallback_phrase(x, lateral, zone_code, home_defending_side),
    }
}

/// Describe a decoded event location.
pub fn describe_location(location: &RinkLocation) -> String {
    describe(
        location.x,
        location.y,
        location.zone_code.as_deref(),
        location.home_defending_side,
    )
}

fn neutral_phrase(x: i32, lateral: Lateral) -> String {
    if x.unsigned_abs() <= CENTER_ICE_X {
        return "at center ice".to_owned();
    }
    with_lateral("in the neutral zone", lateral)
}

fn end_zone_phrase(zone: Zone, x: i32, lateral: Lateral) -> String {
    let attacking = zone == Zone::Offensive;
    let depth = Depth::from_x(x);

    let phrase = match (depth, lateral, attacking) {
        (Depth::BehindNet, _, true) => "behind the net",
        (Depth::BehindNet, _, false) => "behind their own net",
        (Depth::Low, Lateral::Boards, true) => "in the offensive zone corner",
        (Depth::Low, Lateral::Boards, false) => "in the defensive zone corner",
        (Depth::Low, Lateral::Central, true) => "right in front of the net",
        (Depth::Low, Lateral::Central, false) => "in front of their own net",
        (Depth::Slot, Lateral::Central, true) => "in the slot",
        (Depth::Slot, Lateral::Boards, _) => {
            return format!("along the half-wall in the {} zone", zone.label());
        }
        (Depth::High, Lateral::Central, true) => "at the point",
        (Depth::High, _, false) => {
            return with_lateral("near their own blue line", lateral);
        }
        (Depth::Low, Lateral::NearBoards, _) => {
            return format!("down low in the {} zone near the boards", zone.label());
        }
        (Depth::High, _, true) => {
            return with_lateral("at the point", lateral);
        }
        (Depth::Slot, _, _) => {
            return with_lateral(&format!("in the {} zone", zone.label()), lateral);
        }
    };
    phrase.to_owned()
}

fn fallback_phrase(
    x: i32,
    lateral: Lateral,
    zone_code: Option<&str>,
    home_defending_side: Option<RinkSide>,
) -> String {
    if x.unsigned_abs() < BLUE_LINE_X {
        return neutral_phrase(x, lateral);
    }

    if let Some(home_end) = home_defending_side {
        let end = if x < 0 { RinkSide::Left } else { RinkSide::Right };
        let owner = if end == home_end { "home" } else { "away" };
        return with_lateral(&format!("in the {owner} team's end"), lateral);
    }

    match zone_code.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => format!("in the {code} zone"),
        None => "on the ice".to_owned(),
    }
}

fn with_lateral(base: &str, lateral: Lateral) -> String {
    match lateral.qualifier() {
        Some(qualifier) => format!("{base} {qualifier}"),
        None => base.to_owned(),
    }
}
