//! Detector configuration.
//!
//! Values should be provided by the application; `Default` yields the
//! production defaults (900 km/h, 30 minute window, 5 failures,
//! thresholds 30/50/70/85, weights 0.2/0.4/0.3/0.1).

use crate::error::{Result, RiskError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Tolerance when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Score boundaries for each risk level.
///
/// Must be strictly increasing and no greater than 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Lower bound of the low band (informational).
    pub low: u8,

    /// Scores at or above this are at least medium.
    pub medium: u8,

    /// Scores at or above this are at least high.
    pub high: u8,

    /// Scores at or above this are critical.
    pub critical: u8,
}

impl RiskThresholds {
    /// Create thresholds.
    #[must_use]
    pub const fn new(low: u8, medium: u8, high: u8, critical: u8) -> Self {
        Self {
            low,
            medium,
            high,
            critical,
        }
    }

    /// Check ordering and range.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidConfig`] if the thresholds are not strictly
    /// increasing or exceed 100.
    pub fn validate(&self) -> Result<()> {
        if !(self.low < self.medium && self.medium < self.high && self.high < self.critical) {
            return Err(RiskError::invalid_config(format!(
                "risk thresholds must be strictly increasing, got low={} medium={} high={} critical={}",
                self.low, self.medium, self.high, self.critical
            )));
        }
        if self.critical > 100 {
            return Err(RiskError::invalid_config(format!(
                "critical threshold {} exceeds 100",
                self.critical
            )));
        }
        Ok(())
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::new(30, 50, 70, 85)
    }
}

/// Weight of each factor in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskWeights {
    /// Weight of the location change factor.
    pub location_change: f64,

    /// Weight of the impossible travel factor.
    pub impossible_travel: f64,

    /// Weight of the brute force factor.
    pub brute_force: f64,

    /// Weight of the unusual time factor.
    pub unusual_time: f64,
}

impl RiskWeights {
    /// Sum of all four weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.location_change + self.impossible_travel + self.brute_force + self.unusual_time
    }

    /// Check that weights are non-negative and sum to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidConfig`] otherwise.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.location_change,
            self.impossible_travel,
            self.brute_force,
            self.unusual_time,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RiskError::invalid_config(
                "factor weights must be finite and non-negative",
            ));
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RiskError::invalid_config(format!(
                "factor weights must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            location_change: 0.2,
            impossible_travel: 0.4,
            brute_force: 0.3,
            unusual_time: 0.1,
        }
    }
}

/// Risk detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Fastest plausible travel speed in km/h.
    ///
    /// Default: 900 km/h (commercial flight)
    pub max_travel_speed_kmh: f64,

    /// Width of the brute force window in minutes.
    ///
    /// Default: 30 minutes
    pub brute_force_window_minutes: i64,

    /// Failed attempts inside the window that count as brute force.
    ///
    /// Default: 5
    pub brute_force_threshold: u32,

    /// Distance in km for a location change to be significant.
    ///
    /// Reserved; scoring does not use it yet. Default: 500 km
    pub location_change_threshold_km: f64,

    /// Score boundaries for each risk level.
    pub risk_thresholds: RiskThresholds,

    /// Factor weights for the overall score.
    pub weights: RiskWeights,
}

impl DetectorConfig {
    /// Set the maximum plausible travel speed.
    #[must_use]
    pub const fn with_max_travel_speed(mut self, kmh: f64) -> Self {
        self.max_travel_speed_kmh = kmh;
        self
    }

    /// Set the brute force window.
    #[must_use]
    pub const fn with_brute_force_window(mut self, minutes: i64) -> Self {
        self.brute_force_window_minutes = minutes;
        self
    }

    /// Set the brute force threshold.
    #[must_use]
    pub const fn with_brute_force_threshold(mut self, failures: u32) -> Self {
        self.brute_force_threshold = failures;
        self
    }

    /// Set the risk level thresholds.
    #[must_use]
    pub const fn with_risk_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.risk_thresholds = thresholds;
        self
    }

    /// Set the factor weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: RiskWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Brute force window as a duration.
    ///
    /// Saturates at [`Duration::MAX`] for windows too wide to represent;
    /// [`validate`](Self::validate) rejects those.
    #[must_use]
    pub fn brute_force_window(&self) -> Duration {
        Duration::try_minutes(self.brute_force_window_minutes).unwrap_or(Duration::MAX)
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.max_travel_speed_kmh.is_finite() || self.max_travel_speed_kmh <= 0.0 {
            return Err(RiskError::invalid_config(format!(
                "max travel speed must be positive, got {}",
                self.max_travel_speed_kmh
            )));
        }
        if self.brute_force_window_minutes <= 0 {
            return Err(RiskError::invalid_config(format!(
                "brute force window must be positive, got {} minutes",
                self.brute_force_window_minutes
            )));
        }
        if Duration::try_minutes(self.brute_force_window_minutes).is_none() {
            return Err(RiskError::invalid_config(format!(
                "brute force window of {} minutes is out of range",
                self.brute_force_window_minutes
            )));
        }
        if self.brute_force_threshold == 0 {
            return Err(RiskError::invalid_config(
                "brute force threshold must be at least 1",
            ));
        }
        self.risk_thresholds.validate()?;
        self.weights.validate()
    }

    /// Load configuration from `RISK_*` environment variables.
    ///
    /// Missing or unparsable variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidConfig`] if the resulting configuration
    /// does not validate.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            max_travel_speed_kmh: env_or("RISK_MAX_TRAVEL_SPEED_KMH", defaults.max_travel_speed_kmh),
            brute_force_window_minutes: env_or(
                "RISK_BRUTE_FORCE_WINDOW_MINUTES",
                defaults.brute_force_window_minutes,
            ),
            brute_force_threshold: env_or(
                "RISK_BRUTE_FORCE_THRESHOLD",
                defaults.brute_force_threshold,
            ),
            location_change_threshold_km: env_or(
                "RISK_LOCATION_CHANGE_THRESHOLD_KM",
                defaults.location_change_threshold_km,
            ),
            risk_thresholds: RiskThresholds {
                low: env_or("RISK_THRESHOLD_LOW", defaults.risk_thresholds.low),
                medium: env_or("RISK_THRESHOLD_MEDIUM", defaults.risk_thresholds.medium),
                high: env_or("RISK_THRESHOLD_HIGH", defaults.risk_thresholds.high),
                critical: env_or("RISK_THRESHOLD_CRITICAL", defaults.risk_thresholds.critical),
            },
            weights: RiskWeights {
                location_change: env_or(
                    "RISK_WEIGHT_LOCATION_CHANGE",
                    defaults.weights.location_change,
                ),
                impossible_travel: env_or(
                    "RISK_WEIGHT_IMPOSSIBLE_TRAVEL",
                    defaults.weights.impossible_travel,
                ),
                brute_force: env_or("RISK_WEIGHT_BRUTE_FORCE", defaults.weights.brute_force),
                unusual_time: env_or("RISK_WEIGHT_UNUSUAL_TIME", defaults.weights.unusual_time),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_travel_speed_kmh: 900.0,
            brute_force_window_minutes: 30,
            brute_force_threshold: 5,
            location_change_threshold_km: 500.0,
            risk_thresholds: RiskThresholds::default(),
            weights: RiskWeights::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
