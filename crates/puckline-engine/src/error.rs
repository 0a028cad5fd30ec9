//! Error types for the replay binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, replay, and checkpointing.

use std::path::PathBuf;

/// Top-level error for the replay binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: puckline_core::config::ConfigError,
    },

    /// The snapshot directory could not be opened.
    #[error("source error: {source}")]
    Source {
        /// The underlying source error.
        #[from]
        source: puckline_core::source::SourceError,
    },

    /// A game worker failed.
    #[error("hub error: {source}")]
    Hub {
        /// The underlying hub error.
        #[from]
        source: puckline_core::hub::HubError,
    },

    /// The replay loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: puckline_core::runner::RunnerError,
    },

    /// A checkpoint could not be encoded or decoded.
    #[error("checkpoint {path} is invalid: {source}")]
    Codec {
        /// The checkpoint file.
        path: PathBuf,
        /// The underlying codec error.
        source: puckline_ledger::CodecError,
    },

    /// A checkpoint file could not be read or written.
    #[error("checkpoint I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
