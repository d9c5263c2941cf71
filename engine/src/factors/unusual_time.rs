//! Unusual time factor.

use super::{Evidence, FactorScore};
use crate::state::{LoginAttempt, UserProfile};
use crate::time_window::{hour_of_day, HourHistogram};

/// Successful logins needed before hours are judged at all.
pub const MIN_SUCCESSFUL_LOGINS: u32 = 10;

/// Score for a login outside the typical hours.
pub const UNUSUAL_TIME_SCORE: u8 = 35;

/// Score the hour of the attempt against the user's successful history.
///
/// The typical hours are recomputed from `profile.login_history` on every call
/// and stored in `profile.typical_login_hours`. With fewer than
/// [`MIN_SUCCESSFUL_LOGINS`] successes the factor is 0 and the stored hours are
/// cleared, so a history trimmed by retention never keeps stale hours.
pub fn unusual_time(attempt: &LoginAttempt, profile: &mut UserProfile) -> FactorScore {
    let histogram =
        HourHistogram::from_timestamps(profile.successful_logins().map(|login| login.timestamp));

    if histogram.total() < MIN_SUCCESSFUL_LOGINS {
        profile.typical_login_hours.clear();
        return FactorScore::none();
    }

    profile.typical_login_hours = histogram.typical_hours();

    let hour = hour_of_day(attempt.timestamp);
    if profile.typical_login_hours.contains(&hour) {
        FactorScore::none()
    } else {
        FactorScore::flagged(
            UNUSUAL_TIME_SCORE,
            Evidence::UnusualTime {
                hour,
                typical_hours: profile.typical_login_hours.clone(),
            },
        )
    }
}
