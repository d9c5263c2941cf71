//! Login and profile state types.
//!
//! `LoginAttempt` and `GeoLocation` are immutable facts. `UserProfile` is the
//! mutable per-user state that the factor calculators read and write; it is
//! loaded from and saved to a [`ProfileStore`](crate::providers::ProfileStore)
//! once per analyzed attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Identifier of the account an attempt targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Login Attempts
// ═══════════════════════════════════════════════════════════════════════

/// A single authentication attempt.
///
/// Serializes with the stable camelCase field names shared with the API and
/// dashboard layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    /// Account the attempt targets.
    pub user_id: UserId,

    /// When the attempt happened.
    pub timestamp: DateTime<Utc>,

    /// Network address the attempt came from.
    pub ip_address: IpAddr,

    /// Whether the credentials were accepted.
    pub success: bool,

    /// Client user agent, if reported.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Session identifier, if one was issued.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl LoginAttempt {
    /// Create an attempt without client metadata.
    #[must_use]
    pub fn new(
        user_id: impl Into<UserId>,
        timestamp: DateTime<Utc>,
        ip_address: IpAddr,
        success: bool,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp,
            ip_address,
            success,
            user_agent: None,
            session_id: None,
        }
    }

    /// Attach a user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Attach a session id.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Geolocation
// ═══════════════════════════════════════════════════════════════════════

/// City name used when a resolver knows the country but not the city.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Approximate geographic location of a network address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Country (ISO code or name, as the resolver reports it).
    pub country: String,

    /// Region or state.
    pub region: String,

    /// City, or [`UNKNOWN_CITY`].
    pub city: String,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoLocation {
    /// Create a location.
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        region: impl Into<String>,
        city: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
            city: city.into(),
            latitude,
            longitude,
        }
    }

    /// Two locations are the same place when country and city match.
    ///
    /// Coordinates and region are ignored.
    #[must_use]
    pub fn same_place(&self, other: &Self) -> bool {
        self.country == other.country && self.city == other.city
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User Profile
// ═══════════════════════════════════════════════════════════════════════

/// Learned per-user state.
///
/// # Invariants
///
/// - `failed_attempts` holds exactly the failed entries of `login_history`
///   (after an analysis completes)
/// - `typical_locations` never holds two entries with the same country/city
/// - `typical_login_hours` only contains values in `0..=23`
///
/// All collections grow without bound; a store may apply a
/// [`RetentionPolicy`](crate::stores::RetentionPolicy) when saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account this profile belongs to.
    pub user_id: UserId,

    /// Every analyzed attempt, in analysis order.
    pub login_history: Vec<LoginAttempt>,

    /// Places this user has logged in from.
    pub typical_locations: Vec<GeoLocation>,

    /// Hours of day (UTC) that account for a meaningful share of successes.
    pub typical_login_hours: BTreeSet<u8>,

    /// Most recent successful attempt.
    pub last_successful_login: Option<LoginAttempt>,

    /// Failed attempts, in analysis order.
    pub failed_attempts: Vec<LoginAttempt>,
}

impl UserProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            login_history: Vec::new(),
            typical_locations: Vec::new(),
            typical_login_hours: BTreeSet::new(),
            last_successful_login: None,
            failed_attempts: Vec::new(),
        }
    }

    /// `true` until the first attempt has been recorded.
    #[must_use]
    pub fn is_cold_start(&self) -> bool {
        self.login_history.is_empty()
    }

    /// Whether a location with the same country/city is already known.
    #[must_use]
    pub fn knows_location(&self, location: &GeoLocation) -> bool {
        self.typical_locations
            .iter()
            .any(|known| known.same_place(location))
    }

    /// Add a location to the typical set unless the place is already known.
    ///
    /// Returns `true` if the location was added.
    pub fn remember_location(&mut self, location: GeoLocation) -> bool {
        if self.knows_location(&location) {
            return false;
        }
        self.typical_locations.push(location);
        true
    }

    /// Append a failed attempt.
    pub fn record_failure(&mut self, attempt: LoginAttempt) {
        self.failed_attempts.push(attempt);
    }

    /// Append an attempt to the history, tracking the latest success.
    pub fn record_attempt(&mut self, attempt: LoginAttempt) {
        if attempt.success {
            self.last_successful_login = Some(attempt.clone());
        }
        self.login_history.push(attempt);
    }

    /// Successful attempts from the history, oldest first.
    pub fn successful_logins(&self) -> impl Iterator<Item = &LoginAttempt> {
        self.login_history.iter().filter(|attempt| attempt.success)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;

    fn attempt(success: bool) -> LoginAttempt {
        LoginAttempt::new(
            "alice",
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)),
            success,
        )
    }

    #[test]
    fn test_remember_location_deduplicates_by_country_and_city() {
        let mut profile = UserProfile::new(UserId::from("alice"));
        let paris = GeoLocation::new("FR", "Ile-de-France", "Paris", 48.8566, 2.3522);
        let paris_other_coords = GeoLocation::new("FR", "IDF", "Paris", 48.86, 2.35);
        let lyon = GeoLocation::new("FR", "Auvergne-Rhone-Alpes", "Lyon", 45.764, 4.8357);

        assert!(profile.remember_location(paris));
        assert!(!profile.remember_location(paris_other_coords));
        assert!(profile.remember_location(lyon));
        assert_eq!(profile.typical_locations.len(), 2);
    }

    #[test]
    fn test_record_attempt_tracks_last_success() {
        let mut profile = UserProfile::new(UserId::from("alice"));
        assert!(profile.is_cold_start());

        profile.record_attempt(attempt(true));
        profile.record_attempt(attempt(false));

        assert!(!profile.is_cold_start());
        assert_eq!(profile.login_history.len(), 2);
        assert_eq!(profile.successful_logins().count(), 1);
        assert!(profile.last_successful_login.as_ref().is_some_and(|a| a.success));
    }

    #[test]
    fn test_login_attempt_wire_format() {
        let attempt = attempt(true).with_user_agent("curl/8.0");
        let json = serde_json::to_value(&attempt).unwrap();

        assert_eq!(json["userId"], "alice");
        assert_eq!(json["ipAddress"], "203.0.113.7");
        assert_eq!(json["timestamp"], "2024-01-01T09:00:00Z");
        assert_eq!(json["userAgent"], "curl/8.0");

        let parsed: LoginAttempt = serde_json::from_str(
            r#"{"userId":"bob","timestamp":"2024-01-01T10:00:00Z","ipAddress":"198.51.100.1","success":false}"#,
        )
        .unwrap();
        assert_eq!(parsed.user_id.as_str(), "bob");
        assert!(parsed.session_id.is_none());
    }
}
