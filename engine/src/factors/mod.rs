//! Risk factor calculators.
//!
//! Each calculator looks at the current attempt and the user's profile and
//! returns a 0–100 [`FactorScore`]. Some of them update the profile as a side
//! effect (new typical location, appended failure, recomputed typical hours),
//! so they must run in a fixed order against a single profile:
//!
//! ```text
//! location_change → impossible_travel → brute_force → unusual_time
//! ```
//!
//! Geolocation happens before the calculators run; they receive the resolved
//! locations (or `None` when the address could not be resolved, in which case
//! the location-based factors contribute zero).

use crate::state::GeoLocation;
use std::collections::BTreeSet;
use std::fmt;

pub mod brute_force;
pub mod location;
pub mod travel;
pub mod unusual_time;

pub use brute_force::brute_force;
pub use location::location_change;
pub use travel::impossible_travel;
pub use unusual_time::unusual_time;

/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;

/// Sub-score of a single factor together with the evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    /// 0–100.
    pub score: u8,

    /// Why the score is nonzero. `None` when the factor did not fire.
    pub evidence: Option<Evidence>,
}

impl FactorScore {
    /// A factor that did not fire.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            score: 0,
            evidence: None,
        }
    }

    /// A factor that fired.
    #[must_use]
    pub fn flagged(score: u8, evidence: Evidence) -> Self {
        Self {
            score: score.min(MAX_SCORE),
            evidence: Some(evidence),
        }
    }
}

/// Audit evidence for a nonzero factor.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// Attempt came from a place not among the typical locations.
    NewLocation {
        /// Where the attempt came from.
        location: GeoLocation,
    },

    /// Required speed exceeds the configured maximum.
    ImpossibleTravel(Travel),

    /// Required speed is close to the configured maximum.
    RapidTravel(Travel),

    /// Failures inside the window reached the threshold.
    BruteForce {
        /// Failed attempts inside the window, including the current one.
        failures: usize,
        /// Window width in minutes.
        window_minutes: i64,
    },

    /// Failures inside the window are approaching the threshold.
    FailureBurst {
        /// Failed attempts inside the window, including the current one.
        failures: usize,
        /// Window width in minutes.
        window_minutes: i64,
    },

    /// Attempt happened outside the typical hours.
    UnusualTime {
        /// Hour of the attempt (UTC).
        hour: u8,
        /// Hours learned as typical.
        typical_hours: BTreeSet<u8>,
    },
}

/// Movement between the previous successful login and the current attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Travel {
    /// Location of the previous successful login.
    pub from: GeoLocation,
    /// Location of the current attempt.
    pub to: GeoLocation,
    /// Great-circle distance.
    pub distance_km: f64,
    /// Elapsed time between the two logins.
    pub hours: f64,
    /// Required speed (infinite for zero elapsed time).
    pub speed_kmh: f64,
}

impl fmt::Display for Travel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:.0} km in {:.2} h",
            self.from, self.to, self.distance_km, self.hours
        )?;
        if self.speed_kmh.is_finite() {
            write!(f, " ({:.0} km/h)", self.speed_kmh)
        } else {
            f.write_str(" (simultaneous)")
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewLocation { location } => {
                write!(f, "Login from new location: {location}")
            }
            Self::ImpossibleTravel(travel) => write!(f, "Impossible travel: {travel}"),
            Self::RapidTravel(travel) => write!(f, "Unusually fast travel: {travel}"),
            Self::BruteForce {
                failures,
                window_minutes,
            } => write!(
                f,
                "Brute force pattern: {failures} failed attempts within {window_minutes} minutes"
            ),
            Self::FailureBurst {
                failures,
                window_minutes,
            } => write!(
                f,
                "Elevated failures: {failures} failed attempts within {window_minutes} minutes"
            ),
            Self::UnusualTime {
                hour,
                typical_hours,
            } => {
                let typical = typical_hours
                    .iter()
                    .map(|h| format!("{h:02}:00"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Login at unusual hour {hour:02}:00 UTC (typical: {typical})"
                )
            }
        }
    }
}

/// `min(100, base + (ratio - 1) * slope)`, rounded to the nearest integer.
///
/// An infinite ratio saturates at 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn scaled_score(base: f64, ratio: f64, slope: f64) -> u8 {
    let raw = (ratio - 1.0).mul_add(slope, base);
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, f64::from(MAX_SCORE)).round() as u8
}
