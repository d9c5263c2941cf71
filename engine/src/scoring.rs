//! Weighted aggregation and risk level classification.

use crate::assessment::{RiskFactors, RiskLevel};
use crate::config::{RiskThresholds, RiskWeights};

/// Weighted sum of the four factors, rounded and clamped to 0–100.
///
/// # Examples
///
/// ```
/// use login_risk_engine::assessment::RiskFactors;
/// use login_risk_engine::config::RiskWeights;
/// use login_risk_engine::scoring::aggregate;
///
/// let overall = aggregate(&RiskFactors::new(20, 0, 0, 0), &RiskWeights::default());
/// assert_eq!(overall, 4);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn aggregate(factors: &RiskFactors, weights: &RiskWeights) -> u8 {
    let weighted = weights.location_change * f64::from(factors.location_change)
        + weights.impossible_travel * f64::from(factors.impossible_travel)
        + weights.brute_force * f64::from(factors.brute_force)
        + weights.unusual_time * f64::from(factors.unusual_time);

    weighted.round().clamp(0.0, 100.0) as u8
}

/// Map an overall score to a risk level, checking the highest band first.
#[must_use]
pub const fn classify(overall_risk: u8, thresholds: &RiskThresholds) -> RiskLevel {
    if overall_risk >= thresholds.critical {
        RiskLevel::Critical
    } else if overall_risk >= thresholds.high {
        RiskLevel::High
    } else if overall_risk >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
