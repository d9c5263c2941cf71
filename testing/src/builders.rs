//! Fluent builders for engine inputs.

use crate::{addresses, test_time};
use chrono::{DateTime, Duration, Utc};
use login_risk_engine::{LoginAttempt, UserId};
use std::net::IpAddr;

/// Builds a [`LoginAttempt`].
///
/// Defaults: [`test_time`], [`addresses::NEW_YORK`], successful.
///
/// # Example
///
/// ```
/// use login_risk_testing::{addresses, AttemptBuilder};
///
/// let attempt = AttemptBuilder::new("carol").from(addresses::LONDON).failed().build();
/// assert!(!attempt.success);
/// ```
#[derive(Debug, Clone)]
pub struct AttemptBuilder {
    user_id: UserId,
    timestamp: DateTime<Utc>,
    ip_address: IpAddr,
    success: bool,
    user_agent: Option<String>,
}

impl AttemptBuilder {
    /// Start building an attempt for `user_id`.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: test_time(),
            ip_address: addresses::NEW_YORK,
            success: true,
            user_agent: None,
        }
    }

    /// Set the timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Shift the timestamp forward.
    #[must_use]
    pub fn after(mut self, offset: Duration) -> Self {
        self.timestamp += offset;
        self
    }

    /// Set the source address.
    #[must_use]
    pub const fn from(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Mark the attempt as failed.
    #[must_use]
    pub const fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Mark the attempt as successful.
    #[must_use]
    pub const fn succeeded(mut self) -> Self {
        self.success = true;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the attempt.
    #[must_use]
    pub fn build(self) -> LoginAttempt {
        let attempt = LoginAttempt::new(self.user_id, self.timestamp, self.ip_address, self.success);
        match self.user_agent {
            Some(user_agent) => attempt.with_user_agent(user_agent),
            None => attempt,
        }
    }
}

impl From<AttemptBuilder> for LoginAttempt {
    fn from(builder: AttemptBuilder) -> Self {
        builder.build()
    }
}
