//! Snapshot replay binary for the Puckline engine.
//!
//! Replays a directory of snapshot JSON files through per-game workers and
//! prints one [`UpdateReport`](puckline_types::UpdateReport) per snapshot as
//! a JSON line on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$PUCKLINE_CONFIG` or `puckline-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Restore ledgers from the checkpoint directory
//! 4. Replay the snapshot directory in file-name order
//! 5. Stop the workers and write a checkpoint per game

mod checkpoint;
mod error;

use std::path::PathBuf;

use puckline_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, EngineConfig, LoggingConfig};
use puckline_core::hub::GameHub;
use puckline_core::runner::run_replay;
use puckline_core::source::{DirectorySource, JsonLinesSink};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the replay binary.
///
/// # Errors
///
/// Returns an error if configuration, checkpoint I/O, or the replay fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = EngineConfig::from_file_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        snapshot_dir = %config.replay.snapshot_dir.display(),
        checkpoint_dir = %config.replay.checkpoint_dir.display(),
        channel_capacity = config.replay.channel_capacity,
        "puckline-engine starting"
    );

    // 3. Restore checkpoints.
    let mut hub = GameHub::new(config.momentum.clone(), config.replay.channel_capacity);
    let restored = checkpoint::load_all(&config.replay.checkpoint_dir)?;
    let restored_count = restored.len();
    for ledger in restored {
        hub.restore(ledger)?;
    }
    info!(games = restored_count, "Checkpoints restored");

    // 4. Replay snapshots.
    let mut source = DirectorySource::open(&config.replay.snapshot_dir)?;
    let mut sink = JsonLinesSink::new(std::io::stdout().lock());
    let summary = run_replay(
        &mut source,
        &mut sink,
        &mut hub,
        config.replay.channel_capacity,
    )
    .await?;

    // 5. Stop workers and checkpoint.
    let ledgers = hub.shutdown().await?;
    for (game_id, ledger) in &ledgers {
        info!(
            game_id = %game_id,
            score_home = ledger.score().home,
            score_away = ledger.score().away,
            shots_home = ledger.shots().home,
            shots_away = ledger.shots().away,
            period = ledger.period(),
            status = ?ledger.status(),
            "Final ledger"
        );
    }
    checkpoint::write_all(&config.replay.checkpoint_dir, &ledgers)?;

    info!(
        snapshots = summary.snapshots,
        reports = sink.written(),
        games = ledgers.len(),
        "puckline-engine finished"
    );
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
