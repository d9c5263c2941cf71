//! # Login Risk Engine
//!
//! Scores authentication attempts from 0 to 100 by combining four
//! behavioral and geospatial signals learned from each user's history.
//!
//! ## Factors
//!
//! - **Location change**: login from a country/city the user has not used
//! - **Impossible travel**: distance from the previous successful login is
//!   too large for the elapsed time
//! - **Brute force**: failed attempts piling up inside a trailing window
//! - **Unusual time**: login outside the hours the user normally logs in
//!
//! The factors are combined with configurable weights, classified into
//! low/medium/high/critical and turned into recommendations. The engine only
//! scores and recommends; it never blocks a login itself.
//!
//! ## Architecture
//!
//! ```text
//! LoginAttempt → RiskDetector ─┬─ GeoResolver    (lookup)
//!                              ├─ ProfileStore   (load / save)
//!                              └─ AssessmentSink (publish)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use login_risk_engine::mocks::{MockGeoResolver, RecordingSink};
//! use login_risk_engine::stores::InMemoryProfileStore;
//! use login_risk_engine::{DetectorConfig, LoginAttempt, RiskDetector, RiskLevel};
//! use chrono::Utc;
//!
//! # async fn example() -> login_risk_engine::Result<()> {
//! let detector = RiskDetector::new(
//!     DetectorConfig::default(),
//!     MockGeoResolver::new(),
//!     InMemoryProfileStore::new(),
//!     RecordingSink::new(),
//! )?;
//!
//! let attempt = LoginAttempt::new("alice", Utc::now(), "192.0.2.1".parse().unwrap(), true);
//! let outcome = detector.analyze(&attempt).await?;
//! assert_eq!(outcome.assessment.risk_level, RiskLevel::Low);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod assessment;
pub mod config;
pub mod detector;
pub mod error;
pub mod factors;
pub mod geodesy;
pub mod guard;
pub mod providers;
pub mod recommend;
pub mod replay;
pub mod resolvers;
pub mod scoring;
pub mod sinks;
pub mod state;
pub mod stores;
pub mod time_window;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use assessment::{RiskAssessment, RiskFactors, RiskLevel};
pub use config::{DetectorConfig, RiskThresholds, RiskWeights};
pub use detector::{AnalysisOutcome, RiskDetector};
pub use error::{Result, RiskError};
pub use guard::{SerializedDetector, UserLocks};
pub use providers::{AssessmentSink, GeoResolver, ProfileStore};
pub use state::{GeoLocation, LoginAttempt, UserId, UserProfile};
