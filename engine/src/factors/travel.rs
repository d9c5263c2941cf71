//! Impossible travel factor.

use super::{scaled_score, Evidence, FactorScore, Travel};
use crate::config::DetectorConfig;
use crate::geodesy;
use crate::state::{GeoLocation, LoginAttempt, UserProfile};

/// Score when the required speed just exceeds the maximum.
pub const IMPOSSIBLE_TRAVEL_BASE: f64 = 60.0;

/// Extra score per multiple of the maximum speed.
pub const IMPOSSIBLE_TRAVEL_SLOPE: f64 = 40.0;

/// Share of the maximum speed above which travel is suspicious.
pub const RAPID_TRAVEL_RATIO: f64 = 0.7;

/// Score for suspicious but possible travel.
pub const RAPID_TRAVEL_SCORE: u8 = 30;

/// Score the movement since the last successful login.
///
/// `previous_location` is the resolved location of
/// `profile.last_successful_login`. The factor is 0 when there is no previous
/// success, when either location is unresolved, or when both logins share a
/// country/city. Otherwise, with `speed = distance / |elapsed hours|`:
///
/// - `speed > max`: `min(100, 60 + (speed / max - 1) * 40)`
/// - `speed > 0.7 * max`: 30
/// - else 0
#[must_use]
pub fn impossible_travel(
    attempt: &LoginAttempt,
    current_location: Option<&GeoLocation>,
    profile: &UserProfile,
    previous_location: Option<&GeoLocation>,
    config: &DetectorConfig,
) -> FactorScore {
    let Some(previous) = profile.last_successful_login.as_ref() else {
        return FactorScore::none();
    };
    let (Some(from), Some(to)) = (previous_location, current_location) else {
        return FactorScore::none();
    };
    if from.same_place(to) {
        return FactorScore::none();
    }

    #[allow(clippy::cast_precision_loss)]
    let hours = (attempt.timestamp - previous.timestamp)
        .num_milliseconds()
        .abs() as f64
        / 3_600_000.0;
    let speed_kmh = geodesy::travel_speed_kmh(from, to, hours);
    let max_speed = config.max_travel_speed_kmh;

    let travel = Travel {
        from: from.clone(),
        to: to.clone(),
        distance_km: geodesy::distance_between(from, to),
        hours,
        speed_kmh,
    };

    if speed_kmh > max_speed {
        let score = scaled_score(
            IMPOSSIBLE_TRAVEL_BASE,
            speed_kmh / max_speed,
            IMPOSSIBLE_TRAVEL_SLOPE,
        );
        FactorScore::flagged(score, Evidence::ImpossibleTravel(travel))
    } else if speed_kmh > RAPID_TRAVEL_RATIO * max_speed {
        FactorScore::flagged(RAPID_TRAVEL_SCORE, Evidence::RapidTravel(travel))
    } else {
        FactorScore::none()
    }
}
