//! Property-based testing utilities using proptest.

use crate::{addresses, test_time};
use chrono::Duration;
use login_risk_engine::{GeoLocation, LoginAttempt, RiskFactors, RiskThresholds, RiskWeights};
use proptest::prelude::*;

/// Any factor vector with every factor in 0–100.
pub fn arb_factors() -> impl Strategy<Value = RiskFactors> {
    (0u8..=100, 0u8..=100, 0u8..=100, 0u8..=100)
        .prop_map(|(l, t, b, u)| RiskFactors::new(l, t, b, u))
}

/// Non-negative weights summing to 1.0.
pub fn arb_weights() -> impl Strategy<Value = RiskWeights> {
    (0u32..=100, 0u32..=100, 0u32..=100, 0u32..=100)
        .prop_filter("at least one weight must be nonzero", |(a, b, c, d)| {
            a + b + c + d > 0
        })
        .prop_map(|(a, b, c, d)| {
            let total = f64::from(a + b + c + d);
            RiskWeights {
                location_change: f64::from(a) / total,
                impossible_travel: f64::from(b) / total,
                brute_force: f64::from(c) / total,
                unusual_time: f64::from(d) / total,
            }
        })
}

/// Strictly increasing thresholds within 0–100.
pub fn arb_thresholds() -> impl Strategy<Value = RiskThresholds> {
    proptest::sample::subsequence((0u8..=100).collect::<Vec<_>>(), 4)
        .prop_map(|t| RiskThresholds::new(t[0], t[1], t[2], t[3]))
}

/// A location anywhere on the globe.
pub fn arb_location() -> impl Strategy<Value = GeoLocation> {
    (-90.0f64..=90.0, -180.0f64..=180.0, "[A-Z]{2}", "[A-Z][a-z]{3,8}").prop_map(
        |(latitude, longitude, country, city)| {
            GeoLocation::new(country, "Region", city, latitude, longitude)
        },
    )
}

/// Chronological attempts for one user, drawn from the fixture addresses.
///
/// Gaps between attempts range from 0 to 6 hours.
pub fn arb_attempt_sequence(
    user_id: &'static str,
    max_len: usize,
) -> impl Strategy<Value = Vec<LoginAttempt>> {
    proptest::collection::vec(
        (0i64..360, any::<bool>(), 0..addresses::RESOLVABLE.len()),
        1..=max_len,
    )
    .prop_map(move |steps| {
        let mut at = test_time();
        steps
            .into_iter()
            .map(|(gap_minutes, success, address)| {
                at += Duration::minutes(gap_minutes);
                LoginAttempt::new(user_id, at, addresses::RESOLVABLE[address], success)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_weights_validate(weights in arb_weights()) {
            prop_assert!(weights.validate().is_ok());
        }

        #[test]
        fn generated_thresholds_validate(thresholds in arb_thresholds()) {
            prop_assert!(thresholds.validate().is_ok());
        }

        #[test]
        fn generated_sequences_are_chronological(attempts in arb_attempt_sequence("pat", 20)) {
            prop_assert!(attempts.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
    }
}
