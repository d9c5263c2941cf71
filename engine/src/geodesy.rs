//! Great-circle distance and travel speed.

use crate::state::GeoLocation;

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two coordinates (degrees).
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    // Rounding can push `a` just past 1.0 for antipodal points.
    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance in kilometres between two resolved locations.
#[must_use]
pub fn distance_between(from: &GeoLocation, to: &GeoLocation) -> f64 {
    distance_km(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Speed in km/h needed to cover the distance between two locations.
///
/// Zero elapsed hours yields `f64::INFINITY`: an instantaneous relocation.
#[must_use]
pub fn travel_speed_kmh(from: &GeoLocation, to: &GeoLocation, hours: f64) -> f64 {
    if hours == 0.0 {
        return f64::INFINITY;
    }
    distance_between(from, to) / hours
}
