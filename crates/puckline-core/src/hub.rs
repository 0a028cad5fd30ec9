//! Per-game workers.
//!
//! A [`GameHub`] owns one tokio task per tracked game. Each task holds that
//! game's [`GameLedger`] and drains a bounded channel of commands, so
//! snapshots for one game are applied strictly in arrival order while
//! different games progress in parallel. The ledger never leaves its task
//! except as a clone ([`GameHub::checkpoint`]) or at
//! [`GameHub::shutdown`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use puckline_analysis::MomentumConfig;
use puckline_ledger::GameLedger;
use puckline_types::{GameId, Snapshot, UpdateReport};

/// Errors from routing work to a game worker.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// No worker exists for the game.
    #[error("game {game_id} is not tracked")]
    UnknownGame {
        /// The requested game.
        game_id: GameId,
    },

    /// A worker already exists for the game.
    #[error("game {game_id} is already tracked")]
    AlreadyTracked {
        /// The duplicate game.
        game_id: GameId,
    },

    /// The worker stopped before answering.
    #[error("worker for game {game_id} has stopped: {reason}")]
    WorkerGone {
        /// The game whose worker is gone.
        game_id: GameId,
        /// The channel error.
        reason: String,
    },

    /// The worker task panicked or was cancelled.
    #[error("worker for game {game_id} failed: {message}")]
    Join {
        /// The game whose worker failed.
        game_id: GameId,
        /// Description of the join failure.
        message: String,
    },
}

enum Command {
    Apply {
        snapshot: Snapshot,
        reply: oneshot::Sender<UpdateReport>,
    },
    Conclude,
    Checkpoint {
        reply: oneshot::Sender<GameLedger>,
    },
}

struct Worker {
    tx: mpsc::Sender<Command>,
    handle: JoinHandle<GameLedger>,
}

/// A report that will arrive once the game's worker reaches the snapshot.
#[derive(Debug)]
pub struct PendingReport {
    game_id: GameId,
    rx: oneshot::Receiver<UpdateReport>,
}

impl PendingReport {
    /// The game the snapshot was routed to.
    pub const fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Wait for the report.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::WorkerGone`] if the worker stopped first.
    pub async fn wait(self) -> Result<UpdateReport, HubError> {
        self.rx.await.map_err(|e| HubError::WorkerGone {
            game_id: self.game_id,
            reason: e.to_string(),
        })
    }
}

/// Routes snapshots to one sequential worker per game.
pub struct GameHub {
    config: Arc<MomentumConfig>,
    channel_capacity: usize,
    workers: BTreeMap<GameId, Worker>,
}

impl GameHub {
    /// Create an empty hub. A zero capacity is raised to one.
    pub fn new(config: MomentumConfig, channel_capacity: usize) -> Self {
        Self {
            config: Arc::new(config),
            channel_capacity: channel_capacity.max(1),
            workers: BTreeMap::new(),
        }
    }

    /// Games with a running worker, in id order.
    pub fn games(&self) -> impl Iterator<Item = &GameId> {
        self.workers.keys()
    }

    /// Whether a worker exists for the game.
    pub fn is_tracked(&self, game_id: &GameId) -> bool {
        self.workers.contains_key(game_id)
    }

    /// Resume a game from an existing ledger, such as a restored checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AlreadyTracked`] if the game already has a worker.
    pub fn restore(&mut self, ledger: GameLedger) -> Result<(), HubError> {
        let game_id = ledger.game_id().clone();
        if self.is_tracked(&game_id) {
            return Err(HubError::AlreadyTracked { game_id });
        }
        info!(
            game_id = %game_id,
            seen_events = ledger.seen_event_ids().len(),
            period = ledger.period(),
            "Resuming game from checkpoint"
        );
        self.spawn(ledger);
        Ok(())
    }

    /// Queue a snapshot for its game, starting a worker on first sight.
    ///
    /// Returns as soon as the snapshot is queued. Await the returned
    /// [`PendingReport`] for the result.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::WorkerGone`] if the game's worker has stopped.
    pub async fn submit(
        &mut self,
        game_id: GameId,
        snapshot: Snapshot,
    ) -> Result<PendingReport, HubError> {
        if !self.is_tracked(&game_id) {
            info!(game_id = %game_id, "Tracking new game");
            self.spawn(GameLedger::new(game_id.clone()));
        }
        let (reply, rx) = oneshot::channel();
        self.send(&game_id, Command::Apply { snapshot, reply }).await?;
        Ok(PendingReport { game_id, rx })
    }

    /// Apply a snapshot and wait for its report.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::WorkerGone`] if the game's worker has stopped.
    pub async fn apply(
        &mut self,
        game_id: GameId,
        snapshot: Snapshot,
    ) -> Result<UpdateReport, HubError> {
        self.submit(game_id, snapshot).await?.wait().await
    }

    /// Mark a game as over once its queued snapshots are applied.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownGame`] or [`HubError::WorkerGone`].
    pub async fn conclude(&self, game_id: &GameId) -> Result<(), HubError> {
        self.send(game_id, Command::Conclude).await
    }

    /// A copy of a game's ledger after its queued snapshots are applied.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownGame`] or [`HubError::WorkerGone`].
    pub async fn checkpoint(&self, game_id: &GameId) -> Result<GameLedger, HubError> {
        let (reply, rx) = oneshot::channel();
        self.send(game_id, Command::Checkpoint { reply }).await?;
        rx.await.map_err(|e| HubError::WorkerGone {
            game_id: game_id.clone(),
            reason: e.to_string(),
        })
    }

    /// Stop every worker after it drains its queue and collect the ledgers.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Join`] for the first worker that panicked.
    pub async fn shutdown(self) -> Result<BTreeMap<GameId, GameLedger>, HubError> {
        let mut ledgers = BTreeMap::new();
        for (game_id, worker) in self.workers {
            drop(worker.tx);
            let ledger = worker.handle.await.map_err(|e| HubError::Join {
                game_id: game_id.clone(),
                message: e.to_string(),
            })?;
            ledgers.insert(game_id, ledger);
        }
        info!(games = ledgers.len(), "Game hub shut down");
        Ok(ledgers)
    }

    fn spawn(&mut self, ledger: GameLedger) {
        let game_id = ledger.game_id().clone();
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let handle = tokio::spawn(run_worker(ledger, Arc::clone(&self.config), rx));
        self.workers.insert(game_id, Worker { tx, handle });
    }

    async fn send(&self, game_id: &GameId, command: Command) -> Result<(), HubError> {
        let worker = self.workers.get(game_id).ok_or_else(|| HubError::UnknownGame {
            game_id: game_id.clone(),
        })?;
        worker
            .tx
            .send(command)
            .await
            .map_err(|e| HubError::WorkerGone {
                game_id: game_id.clone(),
                reason: e.to_string(),
            })
    }
}

async fn run_worker(
    mut ledger: GameLedger,
    config: Arc<MomentumConfig>,
    mut rx: mpsc::Receiver<Command>,
) -> GameLedger {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Apply { snapshot, reply } => {
                let report = ledger.apply_snapshot(&snapshot, &config);
                if reply.send(report).is_err() {
                    debug!(game_id = %ledger.game_id(), "Report receiver dropped");
                }
            }
            Command::Conclude => ledger.conclude(),
            Command::Checkpoint { reply } => {
                if reply.send(ledger.clone()).is_err() {
                    debug!(game_id = %ledger.game_id(), "Checkpoint receiver dropped");
                }
            }
        }
    }
    debug!(game_id = %ledger.game_id(), "Worker stopped");
    ledger
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use puckline_types::{ClockTime, GameClock, GameStatus, RawEvent, RecommendationTier};
    use serde_json::json;

    use super::*;

    fn goal_snapshot(period: u32, minutes: u32, id: &str) -> Snapshot {
        let events: Vec<RawEvent> = serde_json::from_value(json!([{
            "event_id": id,
            "type": "goal",
            "team_side": "home",
            "details": { "scorer": "Scorer" }
        }]))
        .unwrap();
        Snapshot {
            game_id: None,
            clock: GameClock::new(period, ClockTime::new(minutes, 0)),
            captured_at: None,
            events,
        }
    }

    #[tokio::test]
    async fn games_are_tracked_independently() {
        let mut hub = GameHub::new(MomentumConfig::default(), 4);
        let a = GameId::new("a");
        let b = GameId::new("b");

        let pending_a = hub.submit(a.clone(), goal_snapshot(1, 10, "1")).await.unwrap();
        let pending_b = hub.submit(b.clone(), goal_snapshot(4, 2, "1")).await.unwrap();
        let report_b = pending_b.wait().await.unwrap();
        let report_a = pending_a.wait().await.unwrap();

        assert_eq!(report_a.aggregate_momentum_score, 65);
        assert_eq!(report_b.aggregate_momentum_score, 163);
        assert_eq!(hub.games().count(), 2);
    }

    #[tokio::test]
    async fn redelivery_through_the_hub_is_a_no_op() {
        let mut hub = GameHub::new(MomentumConfig::default(), 4);
        let game = GameId::new("g");

        hub.apply(game.clone(), goal_snapshot(1, 3, "g1")).await.unwrap();
        let again = hub.apply(game.clone(), goal_snapshot(1, 3, "g1")).await.unwrap();

        assert_eq!(again.new_event_count, 0);
        assert_eq!(again.recommendation_tier, RecommendationTier::FillerContent);
        let ledger = hub.checkpoint(&game).await.unwrap();
        assert_eq!(ledger.score().home, 1);
    }

    #[tokio::test]
    async fn shutdown_returns_final_ledgers() {
        let mut hub = GameHub::new(MomentumConfig::default(), 1);
        let game = GameId::new("g");
        hub.apply(game.clone(), goal_snapshot(2, 5, "x")).await.unwrap();
        hub.conclude(&game).await.unwrap();

        let ledgers = hub.shutdown().await.unwrap();
        let ledger = ledgers.get(&game).unwrap();
        assert_eq!(ledger.status(), GameStatus::Final);
        assert_eq!(ledger.goals().len(), 1);
    }

    #[tokio::test]
    async fn restore_resumes_from_ledger() {
        let mut first = GameHub::new(MomentumConfig::default(), 2);
        let game = GameId::new("g");
        first.apply(game.clone(), goal_snapshot(1, 12, "e1")).await.unwrap();
        let saved = first.checkpoint(&game).await.unwrap();

        let mut second = GameHub::new(MomentumConfig::default(), 2);
        second.restore(saved.clone()).unwrap();
        assert!(matches!(
            second.restore(saved),
            Err(HubError::AlreadyTracked { .. })
        ));

        let report = second.apply(game.clone(), goal_snapshot(1, 12, "e1")).await.unwrap();
        assert_eq!(report.new_event_count, 0);
    }

    #[tokio::test]
    async fn unknown_game_is_an_error() {
        let hub = GameHub::new(MomentumConfig::default(), 2);
        let err = hub.conclude(&GameId::new("nope")).await.unwrap_err();
        assert!(matches!(err, HubError::UnknownGame { .. }));
    }
}
