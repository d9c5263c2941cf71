//! Assessment delivery trait.

use crate::assessment::RiskAssessment;
use crate::error::Result;

/// Receives every produced assessment for display or notification.
///
/// Delivery order must match analysis order per user.
pub trait AssessmentSink: Send + Sync {
    /// Deliver one assessment.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Sink`](crate::RiskError::Sink) if the assessment
    /// could not be delivered. The detector logs the failure; the assessment
    /// itself stays valid.
    fn publish(
        &self,
        assessment: &RiskAssessment,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
