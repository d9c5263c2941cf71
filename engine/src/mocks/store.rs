//! Profile store with injectable failures.

use crate::error::{Result, RiskError};
use crate::providers::ProfileStore;
use crate::state::{UserId, UserProfile};
use crate::stores::InMemoryProfileStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory store whose loads and saves can be made to fail.
///
/// Failures are reported as [`RiskError::StorageUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct FailingProfileStore {
    inner: InMemoryProfileStore,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl FailingProfileStore {
    /// Create a store that succeeds until told otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The backing store, for inspecting persisted profiles.
    #[must_use]
    pub const fn inner(&self) -> &InMemoryProfileStore {
        &self.inner
    }
}

impl ProfileStore for FailingProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(RiskError::StorageUnavailable(
                "injected load failure".to_string(),
            ));
        }
        self.inner.load(user_id).await
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RiskError::StorageUnavailable(
                "injected save failure".to_string(),
            ));
        }
        self.inner.save(profile).await?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool> {
        self.inner.delete(user_id).await
    }
}
