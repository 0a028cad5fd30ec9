//! Shared type definitions for the Puckline live game engine.
//!
//! This crate is the single source of truth for the data flowing through
//! the engine: snapshots in, update reports out, and the records the game
//! ledger keeps in between. Types are exported to `TypeScript` via `ts-rs`
//! for the live front end that displays engine output.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque string identifiers for games and events
//! - [`enums`] -- Teams, period types, event kinds, coverage tiers, rink zones
//! - [`clock`] -- Period clock values
//! - [`events`] -- Raw snapshot events and their typed decoded variants
//! - [`records`] -- Per-team tallies, goal log and penalty log entries
//! - [`report`] -- The [`UpdateReport`] handed to narration

pub mod clock;
pub mod enums;
pub mod events;
pub mod ids;
pub mod records;
pub mod report;

// Re-export all public types at crate root for convenience.
pub use clock::{ClockParseError, ClockTime, GameClock, REGULATION_PERIOD_SECONDS};
pub use enums::{EventKind, GameStatus, PeriodType, RecommendationTier, RinkSide, TeamSide, Zone};
pub use events::{
    FaceoffEvent, FightEvent, GoalEvent, HitEvent, PenaltyEvent, PlayEvent, RawEvent,
    RinkLocation, ShotEvent, Snapshot,
};
pub use ids::{EventId, GameId};
pub use records::{GoalRecord, GoalieLine, GoalieTally, PenaltyRecord, TeamTally};
pub use report::{EngineWarning, ScoredEvent, StateSummary, UpdateReport};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the front end.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::GameId::export_all();
        let _ = crate::ids::EventId::export_all();

        // Enums
        let _ = crate::enums::TeamSide::export_all();
        let _ = crate::enums::PeriodType::export_all();
        let _ = crate::enums::EventKind::export_all();
        let _ = crate::enums::RecommendationTier::export_all();
        let _ = crate::enums::Zone::export_all();
        let _ = crate::enums::RinkSide::export_all();
        let _ = crate::enums::GameStatus::export_all();

        // Clock
        let _ = crate::clock::ClockTime::export_all();
        let _ = crate::clock::GameClock::export_all();

        // Events
        let _ = crate::events::RawEvent::export_all();
        let _ = crate::events::Snapshot::export_all();
        let _ = crate::events::PlayEvent::export_all();

        // Records
        let _ = crate::records::TeamTally::export_all();
        let _ = crate::records::GoalieTally::export_all();
        let _ = crate::records::GoalRecord::export_all();
        let _ = crate::records::PenaltyRecord::export_all();

        // Report
        let _ = crate::report::EngineWarning::export_all();
        let _ = crate::report::StateSummary::export_all();
        let _ = crate::report::UpdateReport::export_all();
    }
}
