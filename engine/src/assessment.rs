//! Risk assessment output types.

use crate::state::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk bucket derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Below the medium threshold.
    Low,

    /// At or above the medium threshold.
    Medium,

    /// At or above the high threshold.
    High,

    /// At or above the critical threshold.
    Critical,
}

impl RiskLevel {
    /// Lowercase name used on the wire and in metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// `true` for high and critical.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four factor sub-scores, each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    /// Login from a place not seen before.
    pub location_change: u8,

    /// Travel from the previous successful login is implausibly fast.
    pub impossible_travel: u8,

    /// Failed attempts are piling up inside the window.
    pub brute_force: u8,

    /// Login outside the user's typical hours.
    pub unusual_time: u8,
}

impl RiskFactors {
    /// Create a factor vector.
    #[must_use]
    pub const fn new(
        location_change: u8,
        impossible_travel: u8,
        brute_force: u8,
        unusual_time: u8,
    ) -> Self {
        Self {
            location_change,
            impossible_travel,
            brute_force,
            unusual_time,
        }
    }

    /// `true` when every factor is zero.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.location_change == 0
            && self.impossible_travel == 0
            && self.brute_force == 0
            && self.unusual_time == 0
    }
}

/// Scored outcome of one login attempt.
///
/// Immutable; one is produced per analyzed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Account the attempt targeted.
    pub user_id: UserId,

    /// Timestamp of the scored attempt.
    pub timestamp: DateTime<Utc>,

    /// Weighted overall score, 0–100.
    pub overall_risk: u8,

    /// Level derived from `overall_risk`.
    pub risk_level: RiskLevel,

    /// Individual factor scores.
    pub factors: RiskFactors,

    /// Suggested actions, in rule order.
    pub recommendations: Vec<String>,

    /// Evidence for every nonzero factor, in factor order.
    pub details: Vec<String>,
}
