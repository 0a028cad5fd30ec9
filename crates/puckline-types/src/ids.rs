//! Type-safe identifier wrappers around opaque upstream strings.
//!
//! Game and event identifiers come from the snapshot producer (NHL/ESPN
//! feeds) and carry no structure the engine relies on. They are wrapped in
//! distinct newtypes so a game id can never be passed where an event id is
//! expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around an opaque [`String`] identifier.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an upstream identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a single game, stable for the game's lifetime.
    GameId
}

define_id! {
    /// Identifier of a play-by-play event, stable across snapshots that
    /// re-transmit it.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(EventId::new("").is_blank());
        assert!(EventId::new("   ").is_blank());
        assert!(!EventId::new("102").is_blank());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = GameId::new("2023020204");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"2023020204\""));

        let restored: Result<GameId, _> = serde_json::from_str("\"2023020204\"");
        assert_eq!(restored.ok(), Some(id));
    }

    #[test]
    fn display_matches_inner() {
        let id = EventId::from("551");
        assert_eq!(id.to_string(), "551");
        assert_eq!(id.as_str(), "551");
    }
}
