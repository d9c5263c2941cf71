//! Trailing-window counting and hour-of-day pattern learning.

use crate::state::LoginAttempt;
use chrono::{DateTime, Duration, Timelike, Utc};
use std::collections::BTreeSet;

/// Percentage of successful logins an hour needs to be considered typical.
pub const TYPICAL_HOUR_PERCENT: u32 = 10;

/// Count attempts whose timestamp lies within `window` of `anchor`.
///
/// The distance is absolute, so attempts recorded slightly after the anchor
/// (out-of-order replay) are still counted.
#[must_use]
pub fn count_within_window(
    attempts: &[LoginAttempt],
    anchor: DateTime<Utc>,
    window: Duration,
) -> usize {
    attempts
        .iter()
        .filter(|attempt| (anchor - attempt.timestamp).abs() <= window)
        .count()
}

/// Hour of day (0–23, UTC) of a timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // hour() is always < 24
pub fn hour_of_day(timestamp: DateTime<Utc>) -> u8 {
    timestamp.hour() as u8
}

/// Histogram of login counts per hour of day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourHistogram {
    counts: [u32; 24],
    total: u32,
}

impl HourHistogram {
    /// Build a histogram from timestamps.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let mut histogram = Self::default();
        for timestamp in timestamps {
            histogram.record(timestamp);
        }
        histogram
    }

    /// Count one more login at this timestamp's hour.
    pub fn record(&mut self, timestamp: DateTime<Utc>) {
        self.counts[usize::from(hour_of_day(timestamp))] += 1;
        self.total += 1;
    }

    /// Total number of recorded logins.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Logins recorded at `hour`.
    #[must_use]
    pub fn count(&self, hour: u8) -> u32 {
        self.counts.get(usize::from(hour)).copied().unwrap_or(0)
    }

    /// Hours holding at least [`TYPICAL_HOUR_PERCENT`] of all logins.
    ///
    /// When no hour clears that bar (activity spread thin), every hour with
    /// any activity counts as typical.
    #[must_use]
    pub fn typical_hours(&self) -> BTreeSet<u8> {
        let typical: BTreeSet<u8> = self
            .active_hours()
            .filter(|&(_, count)| count * 100 >= self.total * TYPICAL_HOUR_PERCENT)
            .map(|(hour, _)| hour)
            .collect();

        if typical.is_empty() {
            self.active_hours().map(|(hour, _)| hour).collect()
        } else {
            typical
        }
    }

    fn active_hours(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (0u8..24)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::net::{IpAddr, Ipv4Addr};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
    }

    fn failure(timestamp: DateTime<Utc>) -> LoginAttempt {
        LoginAttempt::new(
            "carol",
            timestamp,
            IpAddr::V4(Ipv4Addr::new(198, 51, 100, 9)),
            false,
        )
    }

    #[test]
    fn test_count_within_window_is_inclusive_and_absolute() {
        let attempts = vec![
            failure(at(9, 0)),
            failure(at(9, 30)),
            failure(at(9, 45)),
            failure(at(10, 10)),
        ];

        // 9:00 is exactly 30 minutes before 9:30, 10:10 is 40 minutes after.
        assert_eq!(
            count_within_window(&attempts, at(9, 30), Duration::minutes(30)),
            3
        );
        assert_eq!(
            count_within_window(&attempts, at(9, 30), Duration::minutes(5)),
            1
        );
        assert_eq!(count_within_window(&[], at(9, 30), Duration::minutes(30)), 0);
    }

    #[test]
    fn test_typical_hours_threshold() {
        // 8 logins at 10:00, 1 at 14:00, 1 at 22:00 → each of the latter is 10%.
        let mut timestamps = vec![at(10, 0); 8];
        timestamps.push(at(14, 0));
        timestamps.push(at(22, 0));
        let histogram = HourHistogram::from_timestamps(timestamps);

        assert_eq!(histogram.total(), 10);
        assert_eq!(histogram.count(10), 8);
        assert_eq!(histogram.typical_hours(), BTreeSet::from([10, 14, 22]));
    }

    #[test]
    fn test_rare_hours_are_not_typical() {
        let mut timestamps = vec![at(10, 0); 19];
        timestamps.push(at(3, 0));
        let histogram = HourHistogram::from_timestamps(timestamps);

        assert_eq!(histogram.typical_hours(), BTreeSet::from([10]));
    }

    #[test]
    fn test_fallback_when_activity_is_spread_thin() {
        // 24 distinct hours, each ~4% of total: nothing clears 10%.
        let timestamps = (0..24).map(|hour| at(hour, 0));
        let histogram = HourHistogram::from_timestamps(timestamps);

        assert_eq!(histogram.typical_hours().len(), 24);
    }

    #[test]
    fn test_empty_histogram_has_no_typical_hours() {
        assert!(HourHistogram::default().typical_hours().is_empty());
    }
}
