//! Snapshot sources and report sinks.
//!
//! The engine pulls [`Snapshot`]s from a [`SnapshotSource`] and pushes every
//! [`UpdateReport`] into a [`ReportSink`]. Live fetchers, file replays, and
//! test fixtures all plug in behind these two traits.

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use puckline_types::{GameId, Snapshot, UpdateReport};

/// Errors from reading snapshots or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading a file or directory failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A snapshot file is not a valid snapshot.
    #[error("invalid snapshot in {path}: {source}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A report could not be written.
    #[error("failed to write report: {message}")]
    Sink {
        /// Description of the failure.
        message: String,
    },
}

/// A snapshot addressed to one game.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedSnapshot {
    /// The game the snapshot belongs to.
    pub game_id: GameId,
    /// The snapshot itself.
    pub snapshot: Snapshot,
}

/// A source of snapshots.
///
/// Implementations return snapshots in delivery order and `None` once the
/// source is exhausted.
pub trait SnapshotSource {
    /// Pull the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source fails entirely. A single bad
    /// item should be skipped with a log line rather than ending the stream.
    fn next_snapshot(&mut self) -> Result<Option<RoutedSnapshot>, SourceError>;
}

/// A consumer of update reports.
pub trait ReportSink {
    /// Deliver one report.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Sink`] if the report cannot be delivered.
    fn emit(&mut self, report: &UpdateReport) -> Result<(), SourceError>;
}

// ---------------------------------------------------------------------------
// Directory replay
// ---------------------------------------------------------------------------

/// Replays `*.json` snapshot files from a directory in file-name order.
///
/// Each file holds one snapshot and must carry its `game_id`. Files that
/// fail to parse or lack a game id are skipped with a warning.
#[derive(Debug)]
pub struct DirectorySource {
    files: VecDeque<PathBuf>,
}

impl DirectorySource {
    /// List the snapshot files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the directory cannot be listed.
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        let io_err = |source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        debug!(dir = %dir.display(), files = files.len(), "Listed snapshot files");
        Ok(Self {
            files: files.into(),
        })
    }

    /// Files not yet read.
    pub fn remaining(&self) -> usize {
        self.files.len()
    }

    fn read(path: &Path) -> Result<Snapshot, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SnapshotSource for DirectorySource {
    fn next_snapshot(&mut self) -> Result<Option<RoutedSnapshot>, SourceError> {
        while let Some(path) = self.files.pop_front() {
            let snapshot = match Self::read(&path) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable snapshot file");
                    continue;
                }
            };
            match snapshot.game_id.clone() {
                Some(game_id) if !game_id.is_blank() => {
                    return Ok(Some(RoutedSnapshot { game_id, snapshot }));
                }
                _ => warn!(path = %path.display(), "Skipping snapshot without a game_id"),
            }
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// A source backed by a fixed list, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    items: VecDeque<RoutedSnapshot>,
}

impl VecSource {
    /// Create a source that yields `items` in order.
    pub fn new(items: Vec<RoutedSnapshot>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl SnapshotSource for VecSource {
    fn next_snapshot(&mut self) -> Result<Option<RoutedSnapshot>, SourceError> {
        Ok(self.items.pop_front())
    }
}

// ---------------------------------------------------------------------------
// JSON lines sink
// ---------------------------------------------------------------------------

/// Writes each report as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Reports written so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn emit(&mut self, report: &UpdateReport) -> Result<(), SourceError> {
        serde_json::to_writer(&mut self.writer, report).map_err(|e| SourceError::Sink {
            message: e.to_string(),
        })?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|e| SourceError::Sink {
                message: e.to_string(),
            })?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }
}
