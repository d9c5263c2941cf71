//! Error types for risk analysis.

use thiserror::Error;

/// Result type alias for risk engine operations.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors raised by the risk engine and its collaborators.
///
/// Unresolvable addresses are deliberately absent: an unknown location
/// degrades the affected factor to zero instead of failing the analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    // ═══════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════

    /// Detector configuration was rejected at construction time.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Collaborators
    // ═══════════════════════════════════════════════════════════

    /// The profile store could not be reached.
    ///
    /// Distinct from a missing profile, which is reported as `Ok(None)`.
    #[error("Profile storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored profile could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The geolocation backend itself failed (not an unknown address).
    #[error("Geolocation backend error: {0}")]
    GeoLookup(String),

    /// The assessment sink rejected a delivery.
    #[error("Assessment delivery failed: {0}")]
    Sink(String),

    // ═══════════════════════════════════════════════════════════
    // Input / system
    // ═══════════════════════════════════════════════════════════

    /// Malformed input handed to a batch entry point.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal invariant broken (poisoned lock, join failure, ...).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RiskError {
    /// Shorthand for building an [`RiskError::InvalidConfig`].
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error originates from profile persistence.
    ///
    /// # Examples
    ///
    /// ```
    /// # use login_risk_engine::RiskError;
    /// assert!(RiskError::StorageUnavailable("down".into()).is_storage_error());
    /// assert!(!RiskError::Sink("closed".into()).is_storage_error());
    /// ```
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Serialization(_))
    }

    /// Returns `true` if this error is a rejected configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
