//! Location change factor.

use super::{Evidence, FactorScore};
use crate::state::{GeoLocation, UserProfile};

/// Score contributed by a login from a previously unseen place.
pub const NEW_LOCATION_SCORE: u8 = 40;

/// Score a login against the user's typical locations.
///
/// - unresolved address: 0 (unknown is risk-neutral)
/// - first attempt ever: the location becomes typical, 0
/// - known country/city: 0
/// - otherwise the location becomes typical and the factor scores
///   [`NEW_LOCATION_SCORE`]
///
/// The typical set only grows; a second login from the same new place
/// scores 0.
pub fn location_change(location: Option<&GeoLocation>, profile: &mut UserProfile) -> FactorScore {
    let Some(location) = location else {
        return FactorScore::none();
    };

    if profile.is_cold_start() {
        profile.remember_location(location.clone());
        return FactorScore::none();
    }

    if profile.remember_location(location.clone()) {
        FactorScore::flagged(
            NEW_LOCATION_SCORE,
            Evidence::NewLocation {
                location: location.clone(),
            },
        )
    } else {
        FactorScore::none()
    }
}
