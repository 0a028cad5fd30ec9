//! Snapshot replay loop.
//!
//! [`run_replay`] pulls every snapshot from a [`SnapshotSource`], routes it
//! through a [`GameHub`], and hands each report to a [`ReportSink`] in the
//! order the snapshots were read. Snapshots for different games are in
//! flight together; a game's own snapshots are still applied one at a time.

use std::collections::VecDeque;

use tracing::{info, warn};

use puckline_types::{RecommendationTier, UpdateReport};

use crate::hub::{GameHub, HubError, PendingReport};
use crate::source::{ReportSink, SnapshotSource, SourceError};

/// Errors that end a replay.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The source or sink failed.
    #[error("source error: {source}")]
    Source {
        /// The underlying source error.
        #[from]
        source: SourceError,
    },

    /// A game worker failed.
    #[error("hub error: {source}")]
    Hub {
        /// The underlying hub error.
        #[from]
        source: HubError,
    },
}

/// Counts collected over one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Snapshots read from the source.
    pub snapshots: u64,
    /// Events that passed deduplication, summed over all reports.
    pub new_events: u64,
    /// Warnings raised, summed over all reports.
    pub warnings: u64,
    /// Reports recommending PLAY_BY_PLAY.
    pub play_by_play: u64,
    /// Reports recommending MIXED_COVERAGE.
    pub mixed_coverage: u64,
    /// Reports recommending FILLER_CONTENT.
    pub filler_content: u64,
}

impl ReplaySummary {
    fn record(&mut self, report: &UpdateReport) {
        let new_events = u64::try_from(report.new_event_count).unwrap_or(u64::MAX);
        let warnings = u64::try_from(report.warnings.len()).unwrap_or(u64::MAX);
        self.new_events = self.new_events.saturating_add(new_events);
        self.warnings = self.warnings.saturating_add(warnings);
        let tier = match report.recommendation_tier {
            RecommendationTier::PlayByPlay => &mut self.play_by_play,
            RecommendationTier::MixedCoverage => &mut self.mixed_coverage,
            RecommendationTier::FillerContent => &mut self.filler_content,
        };
        *tier = tier.saturating_add(1);
    }
}

/// Replay every snapshot from `source` through `hub` into `sink`.
///
/// At most `max_in_flight` reports are awaited at once (minimum one).
///
/// # Errors
///
/// Returns [`RunnerError`] if the source, sink, or a worker fails.
pub async fn run_replay(
    source: &mut dyn SnapshotSource,
    sink: &mut dyn ReportSink,
    hub: &mut GameHub,
    max_in_flight: usize,
) -> Result<ReplaySummary, RunnerError> {
    let max_in_flight = max_in_flight.max(1);
    let mut pending: VecDeque<PendingReport> = VecDeque::new();
    let mut summary = ReplaySummary::default();

    info!(max_in_flight, "Replay starting");

    while let Some(routed) = source.next_snapshot()? {
        summary.snapshots = summary.snapshots.saturating_add(1);
        pending.push_back(hub.submit(routed.game_id, routed.snapshot).await?);
        while pending.len() >= max_in_flight {
            if let Some(next) = pending.pop_front() {
                deliver(next, sink, &mut summary).await?;
            }
        }
    }
    while let Some(next) = pending.pop_front() {
        deliver(next, sink, &mut summary).await?;
    }

    info!(
        snapshots = summary.snapshots,
        new_events = summary.new_events,
        warnings = summary.warnings,
        play_by_play = summary.play_by_play,
        mixed_coverage = summary.mixed_coverage,
        filler_content = summary.filler_content,
        "Replay finished"
    );
    Ok(summary)
}

async fn deliver(
    pending: PendingReport,
    sink: &mut dyn ReportSink,
    summary: &mut ReplaySummary,
) -> Result<(), RunnerError> {
    let report = pending.wait().await?;
    if !report.warnings.is_empty() {
        warn!(
            game_id = %report.game_id,
            warnings = report.warnings.len(),
            "Snapshot applied with warnings"
        );
    }
    summary.record(&report);
    sink.emit(&report)?;
    Ok(())
}
