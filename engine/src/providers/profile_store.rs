//! Profile persistence trait.

use crate::error::Result;
use crate::state::{UserId, UserProfile};

/// Load/save contract for per-user profiles.
///
/// The detector calls `load` before scoring and `save` after, once per
/// attempt. Callers must serialize analyses per user: the store performs no
/// read-modify-write coordination of its own.
pub trait ProfileStore: Send + Sync {
    /// Load a profile.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the user has never been seen (cold start).
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::StorageUnavailable`](crate::RiskError::StorageUnavailable)
    /// when the backend cannot be reached, or
    /// [`RiskError::Serialization`](crate::RiskError::Serialization) when the
    /// stored bytes cannot be decoded.
    fn load(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>>> + Send;

    /// Persist a profile, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be reached or encoding fails.
    fn save(&self, profile: &UserProfile) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove a profile.
    ///
    /// Retention is the store's concern; the detector never deletes.
    ///
    /// # Returns
    ///
    /// `true` if a profile existed.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be reached.
    fn delete(&self, user_id: &UserId) -> impl std::future::Future<Output = Result<bool>> + Send;
}
