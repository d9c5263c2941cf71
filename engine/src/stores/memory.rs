//! In-memory profile store.

use super::RetentionPolicy;
use crate::error::{Result, RiskError};
use crate::providers::ProfileStore;
use crate::state::{UserId, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-local profile store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    retention: RetentionPolicy,
}

impl InMemoryProfileStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a retention policy on every save.
    #[must_use]
    pub const fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Number of stored profiles.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .profiles
            .read()
            .map_err(|_| RiskError::Internal("Profile lock poisoned".to_string()))?
            .len())
    }

    /// `true` if no profile is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RiskError::Internal("Profile lock poisoned".to_string()))?;
        Ok(profiles.get(user_id).cloned())
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let mut profile = profile.clone();
        let evicted = self.retention.apply(&mut profile);
        if evicted > 0 {
            tracing::debug!(user_id = %profile.user_id, evicted, "Trimmed profile before save");
        }

        self.profiles
            .write()
            .map_err(|_| RiskError::Internal("Profile lock poisoned".to_string()))?
            .insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool> {
        Ok(self
            .profiles
            .write()
            .map_err(|_| RiskError::Internal("Profile lock poisoned".to_string()))?
            .remove(user_id)
            .is_some())
    }
}
