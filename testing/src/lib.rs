//! # Login Risk Testing
//!
//! Testing utilities for the login risk engine.
//!
//! This crate provides:
//! - Well-known city coordinates and addresses that resolve to them
//! - A fluent [`AttemptBuilder`]
//! - [`ScenarioTest`], a Given-When-Then runner around a real detector
//! - proptest strategies for the engine's domain types
//!
//! ## Example
//!
//! ```
//! use login_risk_testing::{addresses, timestamp, AttemptBuilder, ScenarioTest};
//!
//! # tokio_test_block_on(async {
//! ScenarioTest::new()
//!     .given(AttemptBuilder::new("bob").at(timestamp("2024-01-01T10:00:00Z")).from(addresses::NEW_YORK))
//!     .when(AttemptBuilder::new("bob").at(timestamp("2024-01-01T10:30:00Z")).from(addresses::TOKYO))
//!     .then_assessment(|assessment| assert_eq!(assessment.factors.impossible_travel, 100))
//!     .run()
//!     .await;
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod builders;
pub mod fixtures;
pub mod properties;
pub mod scenario;

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp.
///
/// # Panics
///
/// Panics if `rfc3339` is not a valid timestamp.
#[must_use]
#[allow(clippy::expect_used)]
pub fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("test timestamp should be valid RFC 3339")
        .with_timezone(&Utc)
}

/// Default instant used by builders (2024-01-01 00:00:00 UTC).
#[must_use]
pub fn test_time() -> DateTime<Utc> {
    timestamp("2024-01-01T00:00:00Z")
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("login_risk_engine=debug")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use builders::AttemptBuilder;
pub use fixtures::{addresses, cities, geo_table};
pub use scenario::ScenarioTest;
