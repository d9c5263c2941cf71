//! Property tests for scoring and profile invariants.

#![allow(clippy::unwrap_used)]

use login_risk_engine::geodesy::{distance_between, EARTH_RADIUS_KM};
use login_risk_engine::mocks::RecordingSink;
use login_risk_engine::replay::replay_attempts;
use login_risk_engine::scoring::{aggregate, classify};
use login_risk_engine::stores::InMemoryProfileStore;
use login_risk_engine::{DetectorConfig, ProfileStore, RiskDetector, UserId};
use login_risk_testing::geo_table;
use login_risk_testing::properties::{
    arb_attempt_sequence, arb_factors, arb_location, arb_thresholds, arb_weights,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn distance_is_symmetric_and_bounded(a in arb_location(), b in arb_location()) {
        let there = distance_between(&a, &b);
        let back = distance_between(&b, &a);

        prop_assert!(there >= 0.0);
        prop_assert!(there <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        prop_assert!((there - back).abs() < 1e-6);
        prop_assert!(distance_between(&a, &a) < 1e-6);
    }

    #[test]
    fn overall_risk_stays_within_bounds(factors in arb_factors(), weights in arb_weights()) {
        let overall = aggregate(&factors, &weights);
        prop_assert!(overall <= 100);

        let max = factors
            .location_change
            .max(factors.impossible_travel)
            .max(factors.brute_force)
            .max(factors.unusual_time);
        prop_assert!(overall <= max);
    }

    #[test]
    fn classification_is_monotone(thresholds in arb_thresholds(), a in 0u8..=100, b in 0u8..=100) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(low, &thresholds) <= classify(high, &thresholds));
    }

    #[test]
    fn classification_is_deterministic(thresholds in arb_thresholds(), score in 0u8..=100) {
        prop_assert_eq!(classify(score, &thresholds), classify(score, &thresholds));
    }

    #[test]
    fn replay_preserves_profile_invariants(attempts in arb_attempt_sequence("quinn", 40)) {
        let store = InMemoryProfileStore::new();
        let detector = RiskDetector::new(
            DetectorConfig::default(),
            geo_table(),
            store.clone(),
            RecordingSink::new(),
        )
        .unwrap();

        let count = attempts.len();
        let (outcomes, profile) = tokio_test::block_on(async {
            let outcomes = replay_attempts(&detector, attempts).await.unwrap();
            let profile = store.load(&UserId::from("quinn")).await.unwrap().unwrap();
            (outcomes, profile)
        });

        prop_assert_eq!(outcomes.len(), count);
        for outcome in &outcomes {
            prop_assert!(outcome.assessment.overall_risk <= 100);
        }

        prop_assert_eq!(profile.login_history.len(), count);
        let failed: Vec<_> = profile.login_history.iter().filter(|a| !a.success).cloned().collect();
        prop_assert_eq!(&profile.failed_attempts, &failed);

        for (i, a) in profile.typical_locations.iter().enumerate() {
            for b in &profile.typical_locations[i + 1..] {
                prop_assert!(!a.same_place(b));
            }
        }
        prop_assert!(profile.typical_login_hours.iter().all(|h| *h < 24));
    }
}
