//! Per-user serialization.
//!
//! The detector assumes a single writer per user. [`UserLocks`] hands out one
//! async mutex per user id; [`SerializedDetector`] holds that mutex across the
//! whole load → score → save sequence so concurrent callers for the same user
//! queue up while different users proceed in parallel.

use crate::detector::{AnalysisOutcome, RiskDetector};
use crate::error::{Result, RiskError};
use crate::providers::{AssessmentSink, GeoResolver, ProfileStore};
use crate::state::{LoginAttempt, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

/// One async mutex per user.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>>,
}

impl UserLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `user_id`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Internal`] if the table lock is poisoned.
    pub fn lock_for(&self, user_id: &UserId) -> Result<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| RiskError::Internal("User lock table poisoned".to_string()))?;
        Ok(Arc::clone(locks.entry(user_id.clone()).or_default()))
    }

    /// Drop mutexes nobody currently holds or waits on.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Internal`] if the table lock is poisoned.
    pub fn prune(&self) -> Result<usize> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| RiskError::Internal("User lock table poisoned".to_string()))?;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(before - locks.len())
    }

    /// Number of users with a mutex in the table.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Internal`] if the table lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .locks
            .lock()
            .map_err(|_| RiskError::Internal("User lock table poisoned".to_string()))?
            .len())
    }

    /// `true` if the table is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Internal`] if the table lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// A [`RiskDetector`] that serializes analyses per user.
pub struct SerializedDetector<G, S, K>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    detector: Arc<RiskDetector<G, S, K>>,
    locks: UserLocks,
}

impl<G, S, K> Clone for SerializedDetector<G, S, K>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    fn clone(&self) -> Self {
        Self {
            detector: Arc::clone(&self.detector),
            locks: self.locks.clone(),
        }
    }
}

impl<G, S, K> SerializedDetector<G, S, K>
where
    G: GeoResolver,
    S: ProfileStore,
    K: AssessmentSink,
{
    /// Wrap a detector.
    #[must_use]
    pub fn new(detector: RiskDetector<G, S, K>) -> Self {
        Self {
            detector: Arc::new(detector),
            locks: UserLocks::new(),
        }
    }

    /// The wrapped detector.
    #[must_use]
    pub fn detector(&self) -> &RiskDetector<G, S, K> {
        &self.detector
    }

    /// The lock table, e.g. for periodic [`UserLocks::prune`] calls.
    #[must_use]
    pub const fn locks(&self) -> &UserLocks {
        &self.locks
    }

    /// Analyze an attempt while holding the user's mutex.
    ///
    /// # Errors
    ///
    /// Same as [`RiskDetector::analyze`], plus [`RiskError::Internal`] if the
    /// lock table is poisoned.
    pub async fn analyze(&self, attempt: &LoginAttempt) -> Result<AnalysisOutcome> {
        let lock = self.locks.lock_for(&attempt.user_id)?;
        let _guard = lock.lock().await;
        self.detector.analyze(attempt).await
    }
}
