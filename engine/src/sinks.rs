//! Assessment sinks.
//!
//! - [`TracingSink`]: one structured log event per assessment
//! - [`ChannelSink`]: forwards assessments to an async consumer
//! - [`NullSink`]: discards everything

use crate::assessment::RiskAssessment;
use crate::error::{Result, RiskError};
use crate::providers::AssessmentSink;
use tokio::sync::mpsc;

/// Logs every assessment through `tracing`.
///
/// Elevated levels are logged at `WARN`, everything else at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AssessmentSink for TracingSink {
    async fn publish(&self, assessment: &RiskAssessment) -> Result<()> {
        let factors = &assessment.factors;
        if assessment.risk_level.is_elevated() {
            tracing::warn!(
                user_id = %assessment.user_id,
                overall_risk = assessment.overall_risk,
                risk_level = %assessment.risk_level,
                location_change = factors.location_change,
                impossible_travel = factors.impossible_travel,
                brute_force = factors.brute_force,
                unusual_time = factors.unusual_time,
                details = ?assessment.details,
                "Risky login attempt"
            );
        } else {
            tracing::info!(
                user_id = %assessment.user_id,
                overall_risk = assessment.overall_risk,
                risk_level = %assessment.risk_level,
                "Login attempt assessed"
            );
        }
        Ok(())
    }
}

/// Forwards assessments over an unbounded channel.
///
/// Sends never block, so delivery order matches analysis order.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<RiskAssessment>,
}

impl ChannelSink {
    /// Create a sink together with the receiving half.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RiskAssessment>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender.
    #[must_use]
    pub const fn from_sender(sender: mpsc::UnboundedSender<RiskAssessment>) -> Self {
        Self { sender }
    }
}

impl AssessmentSink for ChannelSink {
    async fn publish(&self, assessment: &RiskAssessment) -> Result<()> {
        self.sender
            .send(assessment.clone())
            .map_err(|_| RiskError::Sink("assessment receiver dropped".to_string()))
    }
}

/// Accepts and drops every assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AssessmentSink for NullSink {
    async fn publish(&self, _assessment: &RiskAssessment) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assessment::{RiskFactors, RiskLevel};
    use crate::state::UserId;
    use chrono::Utc;

    fn assessment(user: &str, overall_risk: u8, risk_level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            user_id: UserId::from(user),
            timestamp: Utc::now(),
            overall_risk,
            risk_level,
            factors: RiskFactors::default(),
            recommendations: vec![],
            details: vec![],
        }
    }

    #[tokio::test]
    async fn test_channel_sink_preserves_order() {
        let (sink, mut receiver) = ChannelSink::new();
        sink.publish(&assessment("a", 10, RiskLevel::Low)).await.unwrap();
        sink.publish(&assessment("b", 90, RiskLevel::Critical)).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().user_id, UserId::from("a"));
        assert_eq!(receiver.recv().await.unwrap().user_id, UserId::from("b"));
    }

    #[tokio::test]
    async fn test_channel_sink_fails_when_receiver_dropped() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);

        let result = sink.publish(&assessment("a", 10, RiskLevel::Low)).await;
        assert!(matches!(result, Err(RiskError::Sink(_))));
    }

    #[tokio::test]
    async fn test_tracing_and_null_sinks_accept() {
        let elevated = assessment("a", 90, RiskLevel::Critical);
        assert!(TracingSink.publish(&elevated).await.is_ok());
        assert!(TracingSink.publish(&assessment("b", 0, RiskLevel::Low)).await.is_ok());
        assert!(NullSink.publish(&elevated).await.is_ok());
    }
}
