//! The game ledger: canonical, incrementally updated state for one game.
//!
//! A [`GameLedger`] is created empty when a game is first tracked and is
//! mutated only through [`GameLedger::apply_snapshot`]. Each call
//! deduplicates the snapshot's events against the ledger's high-water mark,
//! applies the new ones to the score, shot, goalie, goal, and penalty
//! records, scores them for momentum, and returns an [`UpdateReport`].
//!
//! # Design
//!
//! - **Append-only logs**: goals and penalties are kept in arrival order.
//! - **Monotonic counters**: score, shots, and goalie lines only grow; an
//!   out-of-order snapshot never rolls them or the clock back.
//! - **Never fails**: every data problem becomes an [`EngineWarning`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use puckline_analysis::{GameContext, MomentumConfig, breakdown, classify, describe_location};
use puckline_types::{
    EngineWarning, EventId, GameClock, GameId, GameStatus, GoalRecord, GoalieTally,
    PenaltyRecord, PlayEvent, ScoredEvent, Snapshot, StateSummary, TeamTally, UpdateReport,
};

use crate::consistency::{ConsistencyResult, verify_consistency};
use crate::decode::decode;
use crate::dedup::dedupe;

/// Canonical state for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLedger {
    pub(crate) game_id: GameId,
    pub(crate) status: GameStatus,
    pub(crate) score: TeamTally,
    pub(crate) shots: TeamTally,
    pub(crate) clock: GameClock,
    pub(crate) goalie_stats: GoalieTally,
    pub(crate) goals: Vec<GoalRecord>,
    pub(crate) penalties: Vec<PenaltyRecord>,
    pub(crate) seen_event_ids: BTreeSet<EventId>,
    pub(crate) last_captured_at: Option<DateTime<Utc>>,
    pub(crate) snapshots_applied: u64,
}

/// Records appended while applying one snapshot.
#[derive(Debug, Default)]
struct Appended {
    goals: Vec<GoalRecord>,
    penalties: Vec<PenaltyRecord>,
}

impl GameLedger {
    /// Start tracking a game with an empty, zeroed state.
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            status: GameStatus::Live,
            score: TeamTally::default(),
            shots: TeamTally::default(),
            clock: GameClock::default(),
            goalie_stats: GoalieTally::default(),
            goals: Vec::new(),
            penalties: Vec::new(),
            seen_event_ids: BTreeSet::new(),
            last_captured_at: None,
            snapshots_applied: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The game this ledger tracks.
    pub const fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Lifecycle status.
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether [`conclude`](Self::conclude) has been called.
    pub const fn is_concluded(&self) -> bool {
        matches!(self.status, GameStatus::Final)
    }

    /// Current score.
    pub const fn score(&self) -> &TeamTally {
        &self.score
    }

    /// Current shot totals.
    pub const fn shots(&self) -> &TeamTally {
        &self.shots
    }

    /// Latest game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Current period number.
    pub const fn period(&self) -> u32 {
        self.clock.period
    }

    /// Goaltender lines.
    pub const fn goalie_stats(&self) -> &GoalieTally {
        &self.goalie_stats
    }

    /// Goal log in arrival order.
    pub fn goals(&self) -> &[GoalRecord] {
        &self.goals
    }

    /// Penalty log in arrival order.
    pub fn penalties(&self) -> &[PenaltyRecord] {
        &self.penalties
    }

    /// The high-water mark of applied event ids.
    pub const fn seen_event_ids(&self) -> &BTreeSet<EventId> {
        &self.seen_event_ids
    }

    /// Whether an event id has already been applied.
    pub fn has_seen(&self, event_id: &EventId) -> bool {
        self.seen_event_ids.contains(event_id)
    }

    /// Capture time of the newest applied snapshot.
    pub const fn last_captured_at(&self) -> Option<DateTime<Utc>> {
        self.last_captured_at
    }

    /// Number of snapshots applied over the ledger's lifetime.
    pub const fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied
    }

    /// Current state, with no newly appended records.
    pub fn summary(&self) -> StateSummary {
        self.summary_with(Appended::default())
    }

    /// Check that the score agrees with the goal log and goalie lines.
    pub fn verify_consistency(&self) -> ConsistencyResult {
        verify_consistency(self)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Mark the game as over.
    ///
    /// The ledger has no notion of a final horn on its own; the feeding
    /// collaborator calls this when it stops tracking the game.
    pub fn conclude(&mut self) {
        if !self.is_concluded() {
            info!(
                game_id = %self.game_id,
                score_home = self.score.home,
                score_away = self.score.away,
                "Game concluded"
            );
        }
        self.status = GameStatus::Final;
    }

    /// Apply one snapshot and report what changed.
    ///
    /// Already-applied events are skipped, so re-delivering a snapshot is a
    /// no-op. Malformed events are skipped with a warning; processing of the
    /// remaining events continues.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot, config: &MomentumConfig) -> UpdateReport {
        let total_event_count = snapshot.events.len();
        let mut warnings = Vec::new();

        if let Some(received) = snapshot.game_id.as_ref().filter(|id| **id != self.game_id) {
            warn!(
                expected = %self.game_id,
                received = %received,
                "Snapshot belongs to another game, ignoring"
            );
            warnings.push(EngineWarning::GameMismatch {
                expected: self.game_id.clone(),
                received: received.clone(),
            });
            return self.report(ReportParts {
                new_event_count: 0,
                total_event_count,
                aggregate: 0,
                events: Vec::new(),
                appended: Appended::default(),
                warnings,
                config,
            });
        }

        if self.is_concluded() {
            warn!(game_id = %self.game_id, "Snapshot arrived after the game was concluded");
            warnings.push(EngineWarning::SnapshotAfterConclusion);
        }

        self.advance_clock(snapshot, &mut warnings);

        let deduped = dedupe(&self.seen_event_ids, &snapshot.events);
        for &position in &deduped.missing_ids {
            let type_key = snapshot
                .events
                .get(position)
                .map(|e| e.type_key.clone())
                .unwrap_or_default();
            warn!(
                game_id = %self.game_id,
                position,
                type_key = type_key.as_str(),
                "Event has no id and cannot be deduplicated"
            );
            warnings.push(EngineWarning::MissingEventId { position, type_key });
        }

        let mut appended = Appended::default();
        let mut events = Vec::with_capacity(deduped.new_events.len());
        let mut aggregate: u32 = 0;

        for indexed in &deduped.new_events {
            let raw = indexed.event;
            let play = match decode(raw) {
                Ok(play) => play,
                Err(e) => {
                    warn!(
                        game_id = %self.game_id,
                        position = indexed.position,
                        type_key = raw.type_key.as_str(),
                        error = %e,
                        "Skipping malformed event"
                    );
                    warnings.push(EngineWarning::MalformedEvent {
                        position: indexed.position,
                        event_id: raw.event_id.clone(),
                        type_key: raw.type_key.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let game_time = GameClock {
                time_remaining: raw.time_remaining.unwrap_or(snapshot.clock.time_remaining),
                ..snapshot.clock
            };

            self.record(&play, game_time, &mut appended);

            // Context reflects the score after this event.
            let context = GameContext::new(&snapshot.clock, &self.score).at(raw.time_remaining);
            let detail = breakdown(&play, &context, config);
            aggregate = aggregate.saturating_add(detail.total);

            debug!(
                game_id = %self.game_id,
                event_id = raw.usable_id().map(EventId::as_str),
                kind = ?play.kind(),
                base = detail.base,
                multiplier = %detail.multiplier,
                bonus = detail.bonus,
                momentum = detail.total,
                "Applied event"
            );

            events.push(ScoredEvent {
                event_id: raw.usable_id().cloned(),
                kind: play.kind(),
                team: play.team(),
                momentum: detail.total,
                game_time,
                location_phrase: play.location().map(describe_location),
                event: play,
            });
        }

        let new_event_count = deduped.new_events.len();
        self.seen_event_ids = deduped.seen;
        self.snapshots_applied = self.snapshots_applied.saturating_add(1);

        self.report(ReportParts {
            new_event_count,
            total_event_count,
            aggregate,
            events,
            appended,
            warnings,
            config,
        })
    }

    /// Move the clock forward. An earlier period is flagged; an earlier
    /// reading within the current period is ignored.
    fn advance_clock(&mut self, snapshot: &Snapshot, warnings: &mut Vec<EngineWarning>) {
        let incoming = snapshot.clock;
        if incoming.period > self.clock.period
            || (incoming.period == self.clock.period
                && incoming.time_remaining.total_seconds()
                    <= self.clock.time_remaining.total_seconds())
        {
            self.clock = incoming;
        } else if incoming.period < self.clock.period {
            warn!(
                game_id = %self.game_id,
                snapshot_period = snapshot.clock.period,
                ledger_period = self.clock.period,
                "Out-of-order snapshot; clock and counters not rolled back"
            );
            warnings.push(EngineWarning::OutOfOrderSnapshot {
                snapshot_period: snapshot.clock.period,
                ledger_period: self.clock.period,
            });
        }

        if let Some(captured_at) = snapshot.captured_at {
            let newer = self.last_captured_at.is_none_or(|last| captured_at > last);
            if newer {
                self.last_captured_at = Some(captured_at);
            }
        }
    }

    /// Apply one decoded event to the counters and logs.
    fn record(&mut self, play: &PlayEvent, game_time: GameClock, appended: &mut Appended) {
        if let Some(team) = play.team().filter(|_| play.kind().is_shot()) {
            self.shots.increment(team);
        }
        match play {
            PlayEvent::Goal(goal) => {
                let record = GoalRecord {
                    scorer: goal.scorer.clone(),
                    assists: goal.assists.clone(),
                    team: goal.team,
                    game_time,
                };
                self.score.increment(goal.team);
                let goalie = self.goalie_stats.get_mut(goal.team.opponent());
                goalie.goals_allowed = goalie.goals_allowed.saturating_add(1);
                info!(
                    game_id = %self.game_id,
                    team = goal.team.as_str(),
                    scorer = goal.scorer.as_str(),
                    score_home = self.score.home,
                    score_away = self.score.away,
                    "Goal recorded"
                );
                self.goals.push(record.clone());
                appended.goals.push(record);
            }
            PlayEvent::Penalty(penalty) => {
                let record = PenaltyRecord {
                    player: penalty.player.clone(),
                    team: penalty.team,
                    duration_minutes: penalty.duration_minutes,
                    game_time,
                };
                self.penalties.push(record.clone());
                appended.penalties.push(record);
            }
            PlayEvent::ShotOnGoal(shot) => {
                let goalie = self.goalie_stats.get_mut(shot.team.opponent());
                goalie.saves = goalie.saves.saturating_add(1);
            }
            PlayEvent::MissedShot(_)
            | PlayEvent::Fight(_)
            | PlayEvent::Hit(_)
            | PlayEvent::Faceoff(_)
            | PlayEvent::Other { .. } => {}
        }
    }

    fn summary_with(&self, appended: Appended) -> StateSummary {
        StateSummary {
            score: self.score,
            shots: self.shots,
            clock: self.clock,
            goalie_stats: self.goalie_stats,
            new_goals: appended.goals,
            new_penalties: appended.penalties,
            goal_count: self.goals.len(),
            penalty_count: self.penalties.len(),
            status: self.status,
            last_captured_at: self.last_captured_at,
        }
    }

    fn report(&self, parts: ReportParts<'_>) -> UpdateReport {
        let recommendation_tier = classify(parts.aggregate, &parts.config.tiers);
        info!(
            game_id = %self.game_id,
            new_events = parts.new_event_count,
            total_events = parts.total_event_count,
            momentum = parts.aggregate,
            tier = ?recommendation_tier,
            warnings = parts.warnings.len(),
            "Snapshot applied"
        );
        UpdateReport {
            game_id: self.game_id.clone(),
            new_event_count: parts.new_event_count,
            total_event_count: parts.total_event_count,
            aggregate_momentum_score: parts.aggregate,
            recommendation_tier,
            events: parts.events,
            state: self.summary_with(parts.appended),
            warnings: parts.warnings,
        }
    }
}

/// Everything [`GameLedger::report`] needs besides the ledger itself.
struct ReportParts<'a> {
    new_event_count: usize,
    total_event_count: usize,
    aggregate: u32,
    events: Vec<ScoredEvent>,
    appended: Appended,
    warnings: Vec<EngineWarning>,
    config: &'a MomentumConfig,
}
