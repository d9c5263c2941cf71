//! Brute force factor.

use super::{scaled_score, Evidence, FactorScore};
use crate::config::DetectorConfig;
use crate::state::{LoginAttempt, UserProfile};
use crate::time_window;

/// Score when failures just reach the threshold.
pub const BRUTE_FORCE_BASE: f64 = 70.0;

/// Extra score per multiple of the threshold.
pub const BRUTE_FORCE_SLOPE: f64 = 30.0;

/// Share of the threshold above which failures are suspicious.
pub const FAILURE_BURST_RATIO: f64 = 0.7;

/// Score for failures approaching the threshold.
pub const FAILURE_BURST_SCORE: u8 = 40;

/// Score recent failed attempts.
///
/// A failing `attempt` is appended to `profile.failed_attempts` first, so it
/// counts itself. Failures within the configured window (either side of the
/// attempt's timestamp) are then counted:
///
/// - `count >= threshold`: `min(100, 70 + (count / threshold - 1) * 30)`
/// - `count >= 0.7 * threshold`: 40
/// - else 0
pub fn brute_force(
    attempt: &LoginAttempt,
    profile: &mut UserProfile,
    config: &DetectorConfig,
) -> FactorScore {
    if !attempt.success {
        profile.record_failure(attempt.clone());
    }

    let failures = time_window::count_within_window(
        &profile.failed_attempts,
        attempt.timestamp,
        config.brute_force_window(),
    );

    #[allow(clippy::cast_precision_loss)]
    let count = failures as f64;
    let threshold = f64::from(config.brute_force_threshold);
    let window_minutes = config.brute_force_window_minutes;

    if count >= threshold {
        let score = scaled_score(BRUTE_FORCE_BASE, count / threshold, BRUTE_FORCE_SLOPE);
        FactorScore::flagged(
            score,
            Evidence::BruteForce {
                failures,
                window_minutes,
            },
        )
    } else if count >= FAILURE_BURST_RATIO * threshold {
        FactorScore::flagged(
            FAILURE_BURST_SCORE,
            Evidence::FailureBurst {
                failures,
                window_minutes,
            },
        )
    } else {
        FactorScore::none()
    }
}
