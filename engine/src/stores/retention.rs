//! Bounded profile growth.

use crate::state::UserProfile;
use serde::{Deserialize, Serialize};

/// Caps applied to a profile before it is persisted.
///
/// Every cap is optional; `None` keeps the collection unbounded, which is the
/// default. Eviction is oldest-first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    /// Maximum entries kept in `login_history`.
    pub max_history: Option<usize>,

    /// Maximum entries kept in `failed_attempts`.
    pub max_failed_attempts: Option<usize>,

    /// Maximum entries kept in `typical_locations`.
    pub max_typical_locations: Option<usize>,
}

impl RetentionPolicy {
    /// Keep everything.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_history: None,
            max_failed_attempts: None,
            max_typical_locations: None,
        }
    }

    /// Cap the login history.
    #[must_use]
    pub const fn with_max_history(mut self, entries: usize) -> Self {
        self.max_history = Some(entries);
        self
    }

    /// Cap the failed attempts.
    #[must_use]
    pub const fn with_max_failed_attempts(mut self, entries: usize) -> Self {
        self.max_failed_attempts = Some(entries);
        self
    }

    /// Cap the typical locations.
    #[must_use]
    pub const fn with_max_typical_locations(mut self, entries: usize) -> Self {
        self.max_typical_locations = Some(entries);
        self
    }

    /// `true` if no cap is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.max_history.is_none()
            && self.max_failed_attempts.is_none()
            && self.max_typical_locations.is_none()
    }

    /// Trim a profile in place, returning how many entries were evicted.
    ///
    /// Failed attempts older than the oldest retained history entry are
    /// dropped along with the history, so every failed attempt still appears
    /// in the history afterwards.
    pub fn apply(&self, profile: &mut UserProfile) -> usize {
        let mut evicted = 0;

        if let Some(max) = self.max_history {
            evicted += drain_oldest(&mut profile.login_history, max);
            let before = profile.failed_attempts.len();
            match profile.login_history.first().map(|oldest| oldest.timestamp) {
                Some(oldest) => profile
                    .failed_attempts
                    .retain(|attempt| attempt.timestamp >= oldest),
                None => profile.failed_attempts.clear(),
            }
            evicted += before - profile.failed_attempts.len();
        }

        if let Some(max) = self.max_failed_attempts {
            evicted += drain_oldest(&mut profile.failed_attempts, max);
        }

        if let Some(max) = self.max_typical_locations {
            evicted += drain_oldest(&mut profile.typical_locations, max);
        }

        evicted
    }
}

fn drain_oldest<T>(entries: &mut Vec<T>, max: usize) -> usize {
    let excess = entries.len().saturating_sub(max);
    entries.drain(..excess);
    excess
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::{GeoLocation, LoginAttempt, UserId};
    use chrono::{Duration, TimeZone, Utc};
    use std::net::{IpAddr, Ipv4Addr};

    fn profile_with(attempts: usize) -> UserProfile {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut profile = UserProfile::new(UserId::from("frank"));
        for i in 0..attempts {
            #[allow(clippy::cast_possible_wrap)]
            let attempt = LoginAttempt::new(
                "frank",
                start + Duration::minutes(i as i64),
                IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)),
                i % 2 == 0,
            );
            if !attempt.success {
                profile.record_failure(attempt.clone());
            }
            profile.record_attempt(attempt);
        }
        profile
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut profile = profile_with(20);
        let before = profile.clone();

        assert!(RetentionPolicy::default().is_unbounded());
        assert_eq!(RetentionPolicy::unbounded().apply(&mut profile), 0);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_history_cap_keeps_failures_consistent() {
        let mut profile = profile_with(20);
        let policy = RetentionPolicy::unbounded().with_max_history(6);

        let evicted = policy.apply(&mut profile);

        assert_eq!(profile.login_history.len(), 6);
        assert_eq!(evicted, 14 + 7);
        for failure in &profile.failed_attempts {
            assert!(profile.login_history.contains(failure));
        }
        assert_eq!(profile.failed_attempts.len(), 3);
    }

    #[test]
    fn test_failed_and_location_caps() {
        let mut profile = profile_with(10);
        for city in ["A", "B", "C", "D"] {
            profile.remember_location(GeoLocation::new("XX", "R", city, 0.0, 0.0));
        }

        let policy = RetentionPolicy::unbounded()
            .with_max_failed_attempts(2)
            .with_max_typical_locations(2);
        policy.apply(&mut profile);

        assert_eq!(profile.failed_attempts.len(), 2);
        assert_eq!(profile.login_history.len(), 10);
        let cities: Vec<&str> = profile.typical_locations.iter().map(|l| l.city.as_str()).collect();
        assert_eq!(cities, vec!["C", "D"]);
    }

    #[test]
    fn test_zero_history_clears_failures() {
        let mut profile = profile_with(4);
        RetentionPolicy::unbounded().with_max_history(0).apply(&mut profile);
        assert!(profile.login_history.is_empty());
        assert!(profile.failed_attempts.is_empty());
    }
}
