//! Configuration, snapshot sources, and per-game orchestration for the
//! Puckline engine.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `puckline-config.yaml` into
//!   strongly-typed structs, with `PUCKLINE_*` environment overrides.
//! - [`source`] -- [`SnapshotSource`] and [`ReportSink`] traits with
//!   directory, in-memory, and JSON-lines implementations.
//! - [`hub`] -- [`GameHub`]: one sequential worker task per game.
//! - [`runner`] -- The replay loop tying a source, the hub, and a sink together.
//!
//! [`SnapshotSource`]: source::SnapshotSource
//! [`ReportSink`]: source::ReportSink
//! [`GameHub`]: hub::GameHub

pub mod config;
pub mod hub;
pub mod runner;
pub mod source;
