//! Event deduplication against a game's high-water mark.
//!
//! The high-water mark is the set of event ids already applied to a game.
//! [`dedupe`] is pure: it returns the unseen events and the set the ledger
//! should commit, and leaves committing to the caller.

use std::collections::BTreeSet;

use puckline_types::{EventId, RawEvent};

/// A snapshot event paired with its index in the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct IndexedEvent<'a> {
    /// Index within the snapshot's event list.
    pub position: usize,
    /// The event as delivered.
    pub event: &'a RawEvent,
}

/// Output of [`dedupe`].
#[derive(Debug, Clone)]
pub struct Deduplicated<'a> {
    /// Unseen events, in snapshot order.
    pub new_events: Vec<IndexedEvent<'a>>,
    /// The prior high-water mark plus the ids of every returned event.
    pub seen: BTreeSet<EventId>,
    /// Positions of returned events that had no usable id.
    pub missing_ids: Vec<usize>,
}

/// Select the events whose ids are not in `seen`, preserving order.
///
/// An id repeated within the same snapshot is only returned once. Events
/// with a missing or blank id are always returned; they cannot be
/// deduplicated later and are listed in [`Deduplicated::missing_ids`].
pub fn dedupe<'a>(seen: &BTreeSet<EventId>, events: &'a [RawEvent]) -> Deduplicated<'a> {
    let mut updated = seen.clone();
    let mut new_events = Vec::new();
    let mut missing_ids = Vec::new();

    for (position, event) in events.iter().enumerate() {
        match event.usable_id() {
            Some(id) => {
                if updated.insert(id.clone()) {
                    new_events.push(IndexedEvent { position, event });
                }
            }
            None => {
                missing_ids.push(position);
                new_events.push(IndexedEvent { position, event });
            }
        }
    }

    Deduplicated {
        new_events,
        seen: updated,
        missing_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: Option<&str>) -> RawEvent {
        RawEvent {
            event_id: id.map(EventId::new),
            type_key: "hit".to_owned(),
            team_side: None,
            time_remaining: None,
            home_defending_side: None,
            details: serde_json::Value::Null,
            wire_errors: Vec::new(),
        }
    }

    fn positions(result: &Deduplicated<'_>) -> Vec<usize> {
        result.new_events.iter().map(|e| e.position).collect()
    }

    #[test]
    fn fresh_mark_returns_everything_in_order() {
        let events = vec![event(Some("3")), event(Some("1")), event(Some("2"))];
        let result = dedupe(&BTreeSet::new(), &events);
        assert_eq!(positions(&result), vec![0, 1, 2]);
        assert_eq!(result.seen.len(), 3);
    }

    #[test]
    fn seen_ids_are_skipped() {
        let seen: BTreeSet<EventId> = [EventId::new("1")].into_iter().collect();
        let events = vec![event(Some("1")), event(Some("2"))];
        let result = dedupe(&seen, &events);
        assert_eq!(positions(&result), vec![1]);
        assert!(result.seen.contains(&EventId::new("1")));
        assert!(result.seen.contains(&EventId::new("2")));
    }

    #[test]
    fn repeat_within_snapshot_counts_once() {
        let events = vec![event(Some("7")), event(Some("7"))];
        let result = dedupe(&BTreeSet::new(), &events);
        assert_eq!(positions(&result), vec![0]);
    }

    #[test]
    fn missing_and_blank_ids_always_pass() {
        let seen: BTreeSet<EventId> = [EventId::new("")].into_iter().collect();
        let events = vec![event(None), event(Some("")), event(Some("9"))];
        let result = dedupe(&seen, &events);
        assert_eq!(positions(&result), vec![0, 1, 2]);
        assert_eq!(result.missing_ids, vec![0, 1]);
        assert!(result.seen.contains(&EventId::new("9")));
        assert_eq!(result.seen.len(), 2);
    }

    #[test]
    fn input_mark_is_untouched() {
        let seen = BTreeSet::new();
        let events = vec![event(Some("1"))];
        let _ = dedupe(&seen, &events);
        assert!(seen.is_empty());
    }
}
