//! Recording assessment sink.

use crate::assessment::RiskAssessment;
use crate::error::{Result, RiskError};
use crate::providers::AssessmentSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Keeps every published assessment in memory.
///
/// Can be switched into a failing mode to exercise delivery errors.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    published: Arc<Mutex<Vec<RiskAssessment>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every delivery.
    #[must_use]
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    /// Toggle failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Assessments delivered so far, in delivery order.
    #[must_use]
    pub fn published(&self) -> Vec<RiskAssessment> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Number of assessments delivered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().map(|p| p.len()).unwrap_or_default()
    }

    /// `true` if nothing was delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssessmentSink for RecordingSink {
    async fn publish(&self, assessment: &RiskAssessment) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RiskError::Sink("recording sink set to fail".to_string()));
        }

        self.published
            .lock()
            .map_err(|_| RiskError::Internal("Sink lock poisoned".to_string()))?
            .push(assessment.clone());
        Ok(())
    }
}
