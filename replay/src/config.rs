//! Configuration management for the replay tool.
//!
//! Loads configuration from environment variables with sensible defaults.

use login_risk_engine::stores::RetentionPolicy;
use login_risk_engine::{DetectorConfig, Result};
use std::env;
use std::path::PathBuf;

/// Where attempts are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input.
    Stdin,
    /// A newline-delimited JSON file.
    File(PathBuf),
}

impl InputSource {
    /// `-` (or an empty value) means stdin, anything else is a path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "-" => Self::Stdin,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

/// Replay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Attempt input (`REPLAY_INPUT`, default stdin)
    pub input: InputSource,
    /// JSON geo table (`REPLAY_GEO_TABLE`)
    pub geo_table: Option<PathBuf>,
    /// MaxMind database (`REPLAY_GEOIP_DB`, `geoip` feature only)
    pub geoip_db: Option<PathBuf>,
    /// Redis URL (`REDIS_URL`); profiles stay in memory when unset
    pub redis_url: Option<String>,
    /// Store retention (`REPLAY_MAX_HISTORY`, `REPLAY_MAX_FAILED_ATTEMPTS`,
    /// `REPLAY_MAX_TYPICAL_LOCATIONS`)
    pub retention: RetentionPolicy,
    /// Detector settings (`RISK_*`)
    pub detector: DetectorConfig,
}

impl ReplayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the `RISK_*` detector settings do not validate.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            input: InputSource::parse(&env::var("REPLAY_INPUT").unwrap_or_default()),
            geo_table: non_empty_var("REPLAY_GEO_TABLE").map(PathBuf::from),
            geoip_db: non_empty_var("REPLAY_GEOIP_DB").map(PathBuf::from),
            redis_url: non_empty_var("REDIS_URL"),
            retention: RetentionPolicy {
                max_history: parsed_var("REPLAY_MAX_HISTORY"),
                max_failed_attempts: parsed_var("REPLAY_MAX_FAILED_ATTEMPTS"),
                max_typical_locations: parsed_var("REPLAY_MAX_TYPICAL_LOCATIONS"),
            },
            detector: DetectorConfig::from_env()?,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_var(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
