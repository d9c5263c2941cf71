//! # Login Risk Replay
//!
//! Forensic replay of historical login attempts.
//!
//! Reads newline-delimited JSON [`LoginAttempt`]s, sorts them by timestamp,
//! scores them with the login risk engine and writes newline-delimited JSON
//! [`RiskAssessment`]s in chronological order.
//!
//! ```text
//! attempts.jsonl → parse → replay_attempts → assessments.jsonl
//!                                   │
//!                     geo table / MaxMind, memory / Redis
//! ```

pub mod config;

use login_risk_engine::providers::{AssessmentSink, GeoResolver, ProfileStore};
use login_risk_engine::replay::replay_attempts;
use login_risk_engine::resolvers::StaticGeoResolver;
use login_risk_engine::stores::{InMemoryProfileStore, RedisProfileStore};
use login_risk_engine::{
    GeoLocation, LoginAttempt, Result, RiskAssessment, RiskDetector, RiskError, RiskLevel,
    UserId, UserProfile,
};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::net::IpAddr;

pub use config::{InputSource, ReplayConfig};

// ═══════════════════════════════════════════════════════════════════════
// Input / output
// ═══════════════════════════════════════════════════════════════════════

/// Parse newline-delimited JSON attempts. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`RiskError::InvalidInput`] naming the first malformed line.
pub fn parse_attempts(reader: impl BufRead) -> Result<Vec<LoginAttempt>> {
    let mut attempts = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| {
            RiskError::InvalidInput(format!("Failed to read line {line_number}: {e}"))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let attempt = serde_json::from_str(&line).map_err(|e| {
            RiskError::InvalidInput(format!("Invalid attempt on line {line_number}: {e}"))
        })?;
        attempts.push(attempt);
    }
    Ok(attempts)
}

/// Write one JSON assessment per line.
///
/// # Errors
///
/// Returns [`RiskError::Sink`] if writing fails.
pub fn write_assessments<'a>(
    mut writer: impl Write,
    assessments: impl IntoIterator<Item = &'a RiskAssessment>,
) -> Result<()> {
    for assessment in assessments {
        serde_json::to_writer(&mut writer, assessment)
            .map_err(|e| RiskError::Sink(format!("Failed to write assessment: {e}")))?;
        writer
            .write_all(b"\n")
            .map_err(|e| RiskError::Sink(format!("Failed to write assessment: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| RiskError::Sink(format!("Failed to flush output: {e}")))
}

// ═══════════════════════════════════════════════════════════════════════
// Summary
// ═══════════════════════════════════════════════════════════════════════

/// Totals of one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Attempts analyzed.
    pub attempts: usize,
    /// Assessments per risk level.
    pub by_level: BTreeMap<RiskLevel, usize>,
    /// Analyses whose profile could not be saved.
    pub unsaved_profiles: usize,
}

impl ReplaySummary {
    /// Count a batch of assessments.
    pub fn from_assessments<'a>(assessments: impl IntoIterator<Item = &'a RiskAssessment>) -> Self {
        let mut summary = Self::default();
        for assessment in assessments {
            summary.attempts += 1;
            *summary.by_level.entry(assessment.risk_level).or_default() += 1;
        }
        summary
    }

    /// Assessments at `level`.
    #[must_use]
    pub fn count(&self, level: RiskLevel) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }
}

/// Parse, replay and write a batch.
///
/// # Errors
///
/// Returns error if the input is malformed, a profile cannot be loaded, or
/// the output cannot be written.
pub async fn run_replay<G, S, K>(
    detector: &RiskDetector<G, S, K>,
    input: impl BufRead,
    output: impl Write,
) -> Result<ReplaySummary>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    let attempts = parse_attempts(input)?;
    let outcomes = replay_attempts(detector, attempts).await?;

    write_assessments(output, outcomes.iter().map(|outcome| &outcome.assessment))?;

    let mut summary = ReplaySummary::from_assessments(outcomes.iter().map(|o| &o.assessment));
    summary.unsaved_profiles = outcomes.iter().filter(|o| !o.profile_saved).count();

    tracing::info!(
        attempts = summary.attempts,
        critical = summary.count(RiskLevel::Critical),
        high = summary.count(RiskLevel::High),
        medium = summary.count(RiskLevel::Medium),
        low = summary.count(RiskLevel::Low),
        unsaved_profiles = summary.unsaved_profiles,
        "Replay finished"
    );

    Ok(summary)
}

// ═══════════════════════════════════════════════════════════════════════
// Collaborator selection
// ═══════════════════════════════════════════════════════════════════════

/// Geo resolver chosen from configuration.
#[derive(Clone)]
pub enum ReplayResolver {
    /// JSON table, or an empty table resolving nothing.
    Table(StaticGeoResolver),
    /// MaxMind GeoLite2-City database.
    #[cfg(feature = "geoip")]
    MaxMind(login_risk_engine::resolvers::MaxMindGeoResolver),
}

impl ReplayResolver {
    /// Pick a resolver: MaxMind database first (with `geoip`), then a JSON
    /// table, otherwise an empty table.
    ///
    /// # Errors
    ///
    /// Returns error if the configured database or table cannot be read.
    pub fn from_config(config: &ReplayConfig) -> Result<Self> {
        if let Some(resolver) = Self::maxmind(config)? {
            return Ok(resolver);
        }

        match &config.geo_table {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    RiskError::InvalidInput(format!(
                        "Failed to read geo table {}: {e}",
                        path.display()
                    ))
                })?;
                let table = StaticGeoResolver::from_json(&json)?;
                tracing::info!(path = %path.display(), entries = table.len(), "Loaded geo table");
                Ok(Self::Table(table))
            }
            None => {
                tracing::warn!("No geo source configured; location factors will be zero");
                Ok(Self::Table(StaticGeoResolver::new()))
            }
        }
    }

    #[cfg(feature = "geoip")]
    fn maxmind(config: &ReplayConfig) -> Result<Option<Self>> {
        config
            .geoip_db
            .as_ref()
            .map(|path| login_risk_engine::resolvers::MaxMindGeoResolver::open(path).map(Self::MaxMind))
            .transpose()
    }

    #[cfg(not(feature = "geoip"))]
    #[allow(clippy::unnecessary_wraps)]
    fn maxmind(config: &ReplayConfig) -> Result<Option<Self>> {
        if config.geoip_db.is_some() {
            tracing::warn!("REPLAY_GEOIP_DB is set but the geoip feature is disabled");
        }
        Ok(None)
    }
}

impl GeoResolver for ReplayResolver {
    async fn lookup(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        match self {
            Self::Table(table) => table.lookup(ip_address).await,
            #[cfg(feature = "geoip")]
            Self::MaxMind(reader) => reader.lookup(ip_address).await,
        }
    }
}

/// Profile store chosen from configuration.
#[derive(Clone)]
pub enum ReplayStore {
    /// Profiles live only for the duration of the run.
    Memory(InMemoryProfileStore),
    /// Profiles are shared with other runs through Redis.
    Redis(RedisProfileStore),
}

impl ReplayStore {
    /// Connect to Redis if `REDIS_URL` was set, otherwise use memory.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::StorageUnavailable`] if Redis cannot be reached.
    pub async fn from_config(config: &ReplayConfig) -> Result<Self> {
        match &config.redis_url {
            Some(url) => {
                let store = RedisProfileStore::new(url)
                    .await?
                    .with_retention(config.retention);
                tracing::info!("Using Redis profile store");
                Ok(Self::Redis(store))
            }
            None => Ok(Self::Memory(
                InMemoryProfileStore::new().with_retention(config.retention),
            )),
        }
    }
}

impl ProfileStore for ReplayStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        match self {
            Self::Memory(store) => store.load(user_id).await,
            Self::Redis(store) => store.load(user_id).await,
        }
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        match self {
            Self::Memory(store) => store.save(profile).await,
            Self::Redis(store) => store.save(profile).await,
        }
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool> {
        match self {
            Self::Memory(store) => store.delete(user_id).await,
            Self::Redis(store) => store.delete(user_id).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Cursor;

    #[test]
    fn test_parse_attempts_skips_blank_lines() {
        let input = r#"{"userId":"bob","timestamp":"2024-01-01T10:00:00Z","ipAddress":"198.51.100.10","success":true}

{"userId":"bob","timestamp":"2024-01-01T10:30:00Z","ipAddress":"203.0.113.10","success":false,"userAgent":"curl/8.0"}
"#;
        let attempts = parse_attempts(Cursor::new(input)).unwrap();
        assert_eq!(attempts.len(), 2);
        assert!(!attempts[1].success);
        assert_eq!(attempts[1].user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_parse_attempts_reports_line_number() {
        let input = "{\"userId\":\"bob\",\"timestamp\":\"2024-01-01T10:00:00Z\",\"ipAddress\":\"198.51.100.10\",\"success\":true}\n{\"userId\":\"bob\"}\n";
        let error = parse_attempts(Cursor::new(input)).unwrap_err();
        match error {
            RiskError::InvalidInput(message) => assert!(message.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_assessments_is_one_json_per_line() {
        let assessment = RiskAssessment {
            user_id: UserId::from("bob"),
            timestamp: Utc::now(),
            overall_risk: 12,
            risk_level: RiskLevel::Low,
            factors: login_risk_engine::RiskFactors::default(),
            recommendations: vec![],
            details: vec![],
        };

        let mut output = Vec::new();
        write_assessments(&mut output, [&assessment, &assessment]).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(text.lines().count(), 2);
        let parsed: RiskAssessment = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(parsed, assessment);
    }
}
