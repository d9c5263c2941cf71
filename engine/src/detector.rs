//! The risk detector.
//!
//! Ties the factor calculators, aggregation and recommendations to the
//! collaborator traits:
//!
//! ```text
//! attempt → load profile → resolve locations → 4 factors (mutate profile)
//!         → aggregate → classify → recommend → save profile → publish
//! ```
//!
//! The detector holds no per-user state and performs no locking. Callers must
//! not analyze two attempts for the same user concurrently; wrap the detector
//! in a [`SerializedDetector`](crate::guard::SerializedDetector) if nothing
//! else guarantees that.

use crate::assessment::{RiskAssessment, RiskFactors};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::factors;
use crate::providers::{AssessmentSink, GeoResolver, ProfileStore};
use crate::recommend;
use crate::scoring;
use crate::state::{LoginAttempt, UserProfile};
use tracing::Instrument;

/// Result of a full analysis.
///
/// The assessment is valid even when persisting the profile or publishing
/// the assessment failed; the flags report what happened afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// The scored attempt.
    pub assessment: RiskAssessment,

    /// `false` if the updated profile could not be saved. Later analyses for
    /// this user will then see less history than actually happened.
    pub profile_saved: bool,

    /// `false` if the sink rejected the assessment.
    pub published: bool,
}

/// Login risk detector.
///
/// # Type Parameters
///
/// - `G`: Geolocation resolver
/// - `S`: Profile store
/// - `K`: Assessment sink
#[derive(Clone)]
pub struct RiskDetector<G, S, K>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    config: DetectorConfig,
    geo: G,
    store: S,
    sink: K,
}

impl<G, S, K> RiskDetector<G, S, K>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    /// Create a detector.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidConfig`](crate::RiskError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn new(config: DetectorConfig, geo: G, store: S, sink: K) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            geo,
            store,
            sink,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Geolocation resolver.
    #[must_use]
    pub const fn geo(&self) -> &G {
        &self.geo
    }

    /// Profile store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Assessment sink.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Analyze one attempt end to end.
    ///
    /// Loads the user's profile (an absent profile is a cold start), scores
    /// the attempt, saves the updated profile and publishes the assessment.
    /// Save and publish failures are logged and reported through
    /// [`AnalysisOutcome`]; they do not fail the analysis.
    ///
    /// Not idempotent: analyzing the same attempt twice records it twice.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the profile could not be loaded.
    pub async fn analyze(&self, attempt: &LoginAttempt) -> Result<AnalysisOutcome> {
        let span = tracing::info_span!(
            "analyze_login",
            user_id = %attempt.user_id,
            success = attempt.success
        );

        async move {
            let mut profile = match self.store.load(&attempt.user_id).await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    tracing::debug!("No stored profile, starting cold");
                    metrics::counter!("login_risk.cold_starts").increment(1);
                    UserProfile::new(attempt.user_id.clone())
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load profile");
                    return Err(e);
                }
            };

            let assessment = self.assess(attempt, &mut profile).await;

            let profile_saved = match self.store.save(&profile).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to save profile, history update lost");
                    metrics::counter!("login_risk.profile_save_failures").increment(1);
                    false
                }
            };

            let published = match self.sink.publish(&assessment).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to publish assessment");
                    metrics::counter!("login_risk.sink_failures").increment(1);
                    false
                }
            };

            Ok(AnalysisOutcome {
                assessment,
                profile_saved,
                published,
            })
        }
        .instrument(span)
        .await
    }

    /// Score an attempt against a profile without touching the store or sink.
    ///
    /// The profile is updated exactly as [`analyze`](Self::analyze) would
    /// update it: the location may become typical, a failure is recorded,
    /// typical hours are recomputed and the attempt is appended to the
    /// history.
    pub async fn assess(&self, attempt: &LoginAttempt, profile: &mut UserProfile) -> RiskAssessment {
        let current_location = self.geo.lookup(attempt.ip_address).await;
        let previous_location = match profile.last_successful_login.as_ref() {
            Some(previous) => self.geo.lookup(previous.ip_address).await,
            None => None,
        };

        let location = factors::location_change(current_location.as_ref(), profile);
        let travel = factors::impossible_travel(
            attempt,
            current_location.as_ref(),
            profile,
            previous_location.as_ref(),
            &self.config,
        );
        let brute_force = factors::brute_force(attempt, profile, &self.config);
        let unusual_time = factors::unusual_time(attempt, profile);

        tracing::debug!(
            location_change = location.score,
            impossible_travel = travel.score,
            brute_force = brute_force.score,
            unusual_time = unusual_time.score,
            resolved = current_location.is_some(),
            "Computed risk factors"
        );

        profile.record_attempt(attempt.clone());

        let factors = RiskFactors::new(
            location.score,
            travel.score,
            brute_force.score,
            unusual_time.score,
        );
        let overall_risk = scoring::aggregate(&factors, &self.config.weights);
        let risk_level = scoring::classify(overall_risk, &self.config.risk_thresholds);

        let assessment = RiskAssessment {
            user_id: attempt.user_id.clone(),
            timestamp: attempt.timestamp,
            overall_risk,
            risk_level,
            factors,
            recommendations: recommend::recommendations(&factors, risk_level),
            details: recommend::details(&[&location, &travel, &brute_force, &unusual_time]),
        };

        metrics::counter!("login_risk.assessments_total", "level" => risk_level.as_str())
            .increment(1);
        metrics::histogram!("login_risk.overall_risk").record(f64::from(overall_risk));

        if risk_level.is_elevated() {
            tracing::warn!(
                user_id = %assessment.user_id,
                overall_risk,
                risk_level = %risk_level,
                details = ?assessment.details,
                "Elevated login risk"
            );
        } else {
            tracing::info!(
                user_id = %assessment.user_id,
                overall_risk,
                risk_level = %risk_level,
                "Assessed login attempt"
            );
        }

        assessment
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assessment::RiskLevel;
    use crate::config::RiskThresholds;
    use crate::mocks::{FailingProfileStore, MockGeoResolver, RecordingSink};
    use crate::state::{GeoLocation, UserId};
    use crate::stores::InMemoryProfileStore;
    use crate::RiskError;
    use chrono::{DateTime, TimeZone, Utc};
    use std::net::{IpAddr, Ipv4Addr};

    const NY_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 10));
    const TOKYO_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 20));

    fn resolver() -> MockGeoResolver {
        MockGeoResolver::new()
            .with_location(
                NY_IP,
                GeoLocation::new("US", "New York", "New York", 40.7128, -74.0060),
            )
            .with_location(
                TOKYO_IP,
                GeoLocation::new("JP", "Tokyo", "Tokyo", 35.6762, 139.6503),
            )
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config =
            DetectorConfig::default().with_risk_thresholds(RiskThresholds::new(50, 40, 70, 85));
        let result = RiskDetector::new(
            config,
            MockGeoResolver::new(),
            InMemoryProfileStore::new(),
            RecordingSink::new(),
        );
        assert!(matches!(result, Err(RiskError::InvalidConfig { .. })));
    }

    #[test]
    fn test_unrepresentable_window_rejected() {
        let config = DetectorConfig::default().with_brute_force_window(200_000_000_000_000);
        let result = RiskDetector::new(
            config,
            MockGeoResolver::new(),
            InMemoryProfileStore::new(),
            RecordingSink::new(),
        );
        assert!(matches!(result, Err(RiskError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_analyze_persists_and_publishes() {
        let store = InMemoryProfileStore::new();
        let sink = RecordingSink::new();
        let detector =
            RiskDetector::new(DetectorConfig::default(), resolver(), store.clone(), sink.clone())
                .unwrap();

        let outcome = detector
            .analyze(&LoginAttempt::new("bob", at(10, 0), NY_IP, true))
            .await
            .unwrap();

        assert!(outcome.profile_saved);
        assert!(outcome.published);
        assert_eq!(outcome.assessment.overall_risk, 0);
        assert_eq!(outcome.assessment.risk_level, RiskLevel::Low);
        assert_eq!(sink.published(), vec![outcome.assessment]);

        let profile = store.load(&UserId::from("bob")).await.unwrap().unwrap();
        assert_eq!(profile.login_history.len(), 1);
        assert_eq!(profile.typical_locations.len(), 1);
        assert!(profile.last_successful_login.is_some());
    }

    #[tokio::test]
    async fn test_assess_without_store_resolves_previous_location() {
        let geo = resolver();
        let detector = RiskDetector::new(
            DetectorConfig::default(),
            geo.clone(),
            InMemoryProfileStore::new(),
            RecordingSink::new(),
        )
        .unwrap();

        let mut profile = UserProfile::new(UserId::from("bob"));
        detector
            .assess(&LoginAttempt::new("bob", at(10, 0), NY_IP, true), &mut profile)
            .await;
        assert_eq!(geo.lookup_count(), 1);

        let assessment = detector
            .assess(&LoginAttempt::new("bob", at(10, 30), TOKYO_IP, true), &mut profile)
            .await;
        assert_eq!(geo.lookup_count(), 3);
        assert_eq!(assessment.factors.location_change, 40);
        assert_eq!(assessment.factors.impossible_travel, 100);
        assert_eq!(assessment.details.len(), 2);
        assert!(assessment.details[0].starts_with("Login from new location"));
        assert!(assessment.details[1].starts_with("Impossible travel"));
    }

    #[tokio::test]
    async fn test_load_failure_propagates() {
        let store = FailingProfileStore::new();
        store.fail_loads(true);
        let sink = RecordingSink::new();
        let detector =
            RiskDetector::new(DetectorConfig::default(), resolver(), store, sink.clone()).unwrap();

        let result = detector
            .analyze(&LoginAttempt::new("bob", at(10, 0), NY_IP, true))
            .await;

        assert!(matches!(result, Err(RiskError::StorageUnavailable(_))));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_still_returns_assessment() {
        let store = FailingProfileStore::new();
        store.fail_saves(true);
        let sink = RecordingSink::new();
        let detector =
            RiskDetector::new(DetectorConfig::default(), resolver(), store.clone(), sink.clone())
                .unwrap();

        let outcome = detector
            .analyze(&LoginAttempt::new("bob", at(10, 0), NY_IP, false))
            .await
            .unwrap();

        assert!(!outcome.profile_saved);
        assert!(outcome.published);
        assert_eq!(sink.len(), 1);
        assert_eq!(store.save_count(), 0);
        assert!(store.inner().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_sink_failure_still_saves_profile() {
        let store = InMemoryProfileStore::new();
        let detector = RiskDetector::new(
            DetectorConfig::default(),
            resolver(),
            store.clone(),
            RecordingSink::failing(),
        )
        .unwrap();

        let outcome = detector
            .analyze(&LoginAttempt::new("bob", at(10, 0), NY_IP, true))
            .await
            .unwrap();

        assert!(outcome.profile_saved);
        assert!(!outcome.published);
        assert_eq!(store.len().unwrap(), 1);
    }
}
