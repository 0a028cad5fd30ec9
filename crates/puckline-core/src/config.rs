//! Configuration loading and typed config structures for the Puckline engine.
//!
//! The canonical configuration lives in `puckline-config.yaml` at the project
//! root. Every field has a default, so a missing file or a partial file is
//! valid. A handful of environment variables override the YAML:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PUCKLINE_SNAPSHOT_DIR` | `replay.snapshot_dir` |
//! | `PUCKLINE_CHECKPOINT_DIR` | `replay.checkpoint_dir` |
//! | `PUCKLINE_LOG_LEVEL` | `logging.level` |

use std::path::{Path, PathBuf};

use serde::Deserialize;

use puckline_analysis::{MomentumConfig, MomentumConfigError};

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "PUCKLINE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "puckline-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The momentum section is out of range.
    #[error("invalid momentum config: {source}")]
    Momentum {
        /// The underlying validation error.
        #[from]
        source: MomentumConfigError,
    },

    /// The per-game channel must hold at least one snapshot.
    #[error("replay.channel_capacity must be at least 1")]
    ZeroChannelCapacity,
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `puckline-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Momentum weights, multipliers, bonuses, and tier thresholds.
    #[serde(default)]
    pub momentum: MomentumConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Snapshot replay and checkpoint settings.
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment overrides are applied before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load the file at `path` if it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file); a missing file is not an error.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override values with `PUCKLINE_*` environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override values using an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PUCKLINE_SNAPSHOT_DIR") {
            self.replay.snapshot_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("PUCKLINE_CHECKPOINT_DIR") {
            self.replay.checkpoint_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("PUCKLINE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Momentum`] or
    /// [`ConfigError::ZeroChannelCapacity`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.momentum.validate()?;
        if self.replay.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Snapshot replay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayConfig {
    /// Directory of snapshot JSON files, replayed in file-name order.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Directory holding one `<game_id>.json` checkpoint per game.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// Snapshots buffered per game before senders wait.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            checkpoint_dir: default_checkpoint_dir(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data/snapshots")
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("data/checkpoints")
}

const fn default_channel_capacity() -> usize {
    64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.replay.channel_capacity, 64);
        assert_eq!(config.momentum.tiers.play_by_play, 75);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
momentum:
  base_scores:
    goal: 60
    hit: 12
  multipliers:
    overtime: 3.0
    late_game_window_seconds: 240
  bonuses:
    struck_iron: 20
  tiers:
    play_by_play: 80
    mixed_coverage: 30

logging:
  level: debug
  json: true

replay:
  snapshot_dir: /var/puckline/in
  checkpoint_dir: /var/puckline/state
  channel_capacity: 8
";
        let mut config: EngineConfig = serde_yml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.momentum.base_scores.goal, 60);
        assert_eq!(config.momentum.base_scores.hit, 12);
        assert_eq!(config.momentum.base_scores.fight, 45);
        assert_eq!(config.momentum.multipliers.overtime, Decimal::new(30, 1));
        assert_eq!(config.momentum.multipliers.late_game_window_seconds, 240);
        assert_eq!(config.momentum.bonuses.struck_iron, 20);
        assert_eq!(config.momentum.tiers.play_by_play, 80);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.replay.snapshot_dir, PathBuf::from("/var/puckline/in"));
        assert_eq!(config.replay.channel_capacity, 8);

        config.apply_overrides_from(|key| {
            (key == "PUCKLINE_CHECKPOINT_DIR").then(|| "/tmp/ckpt".to_owned())
        });
        assert_eq!(config.replay.checkpoint_dir, PathBuf::from("/tmp/ckpt"));
        assert_eq!(config.replay.snapshot_dir, PathBuf::from("/var/puckline/in"));
    }

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let config: EngineConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config.replay, ReplayConfig::default());
        assert_eq!(config.momentum, MomentumConfig::default());
    }

    #[test]
    fn env_overrides_replace_yaml_values() {
        let mut config = EngineConfig::default();
        config.apply_overrides_from(|key| match key {
            "PUCKLINE_SNAPSHOT_DIR" => Some("/feed".to_owned()),
            "PUCKLINE_LOG_LEVEL" => Some("warn".to_owned()),
            _ => None,
        });
        assert_eq!(config.replay.snapshot_dir, PathBuf::from("/feed"));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.replay.checkpoint_dir, default_checkpoint_dir());
    }

    #[test]
    fn zero_channel_capacity_is_rejected() {
        let config: EngineConfig =
            serde_yml::from_str("replay:\n  channel_capacity: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChannelCapacity)));
    }

    #[test]
    fn inverted_tiers_are_rejected() {
        let config: EngineConfig =
            serde_yml::from_str("momentum:\n  tiers:\n    play_by_play: 10\n    mixed_coverage: 20\n")
                .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Momentum { .. })));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = serde_yml::from_str::<EngineConfig>("replay: [unterminated").unwrap_err();
        let err = ConfigError::from(err);
        assert!(err.to_string().starts_with("failed to parse config YAML"));
    }
}
