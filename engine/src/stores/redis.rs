//! Redis-based profile store.
//!
//! # Architecture
//!
//! - **Key**: `login_risk:profile:{user_id}` → bincode-serialized `UserProfile`
//! - **TTL**: optional; refreshed on every save so idle profiles expire
//! - **Retention**: [`RetentionPolicy`] applied before encoding
//!
//! # Example
//!
//! ```no_run
//! use login_risk_engine::stores::RedisProfileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedisProfileStore::new("redis://127.0.0.1:6379").await?;
//! # Ok(())
//! # }
//! ```

use super::RetentionPolicy;
use crate::error::{Result, RiskError};
use crate::providers::ProfileStore;
use crate::state::{UserId, UserProfile};
use chrono::Duration;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Encode a profile the way the Redis store persists it.
///
/// # Errors
///
/// Returns [`RiskError::Serialization`] if encoding fails.
pub fn encode_profile(profile: &UserProfile) -> Result<Vec<u8>> {
    bincode::serialize(profile).map_err(|e| RiskError::Serialization(e.to_string()))
}

/// Decode a profile persisted by the Redis store.
///
/// # Errors
///
/// Returns [`RiskError::Serialization`] if the bytes are not a valid profile.
pub fn decode_profile(bytes: &[u8]) -> Result<UserProfile> {
    bincode::deserialize(bytes).map_err(|e| RiskError::Serialization(e.to_string()))
}

/// Redis-backed profile store.
///
/// Cloning is cheap; clones share the connection manager.
#[derive(Clone)]
pub struct RedisProfileStore {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,

    /// Caps applied before every save.
    retention: RetentionPolicy,

    /// Expire profiles that have not been saved for this long.
    idle_ttl: Option<Duration>,
}

impl RedisProfileStore {
    /// Create a new Redis profile store.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::StorageUnavailable`] if connecting fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            RiskError::StorageUnavailable(format!("Failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            RiskError::StorageUnavailable(format!(
                "Failed to create Redis connection manager: {e}"
            ))
        })?;

        Ok(Self {
            conn_manager,
            retention: RetentionPolicy::unbounded(),
            idle_ttl: None,
        })
    }

    /// Apply a retention policy on every save.
    #[must_use]
    pub const fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Expire profiles idle for longer than `ttl`.
    #[must_use]
    pub const fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    /// Get the Redis key for a profile.
    pub(crate) fn profile_key(user_id: &UserId) -> String {
        format!("login_risk:profile:{}", user_id.0)
    }
}

impl ProfileStore for RedisProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let mut conn = self.conn_manager.clone();
        let key = Self::profile_key(user_id);

        let bytes: Option<Vec<u8>> = conn.get(&key).await.map_err(|e| {
            RiskError::StorageUnavailable(format!("Failed to get profile from Redis: {e}"))
        })?;

        bytes.map(|bytes| decode_profile(&bytes)).transpose()
    }

    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = Self::profile_key(&profile.user_id);

        let mut profile = profile.clone();
        let evicted = self.retention.apply(&mut profile);
        let bytes = encode_profile(&profile)?;

        match self.idle_ttl {
            Some(ttl) => {
                #[allow(clippy::cast_sign_loss)]
                let ttl_seconds = ttl.num_seconds().max(1) as u64;
                let _: () = conn.set_ex(&key, bytes, ttl_seconds).await.map_err(|e| {
                    RiskError::StorageUnavailable(format!("Failed to save profile: {e}"))
                })?;
            }
            None => {
                let _: () = conn.set(&key, bytes).await.map_err(|e| {
                    RiskError::StorageUnavailable(format!("Failed to save profile: {e}"))
                })?;
            }
        }

        tracing::debug!(
            user_id = %profile.user_id,
            history = profile.login_history.len(),
            evicted,
            "Saved profile to Redis"
        );

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool> {
        let mut conn = self.conn_manager.clone();
        let key = Self::profile_key(user_id);

        let deleted: usize = conn.del(&key).await.map_err(|e| {
            RiskError::StorageUnavailable(format!("Failed to delete profile from Redis: {e}"))
        })?;

        tracing::info!(user_id = %user_id, "Deleted profile from Redis");

        Ok(deleted > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::LoginAttempt;
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_profile_key() {
        assert_eq!(
            RedisProfileStore::profile_key(&UserId::from("ivy")),
            "login_risk:profile:ivy"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_profile(&[0xff, 0x01]),
            Err(RiskError::Serialization(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_profile_lifecycle() {
        let store = RedisProfileStore::new("redis://127.0.0.1:6379")
            .await
            .unwrap()
            .with_idle_ttl(Duration::hours(1));

        let user_id = UserId::from("redis-lifecycle-user");
        let mut profile = UserProfile::new(user_id.clone());
        profile.record_attempt(LoginAttempt::new(
            "redis-lifecycle-user",
            Utc::now(),
            IpAddr::V4(Ipv4Addr::new(192, 0, 2, 77)),
            true,
        ));

        store.save(&profile).await.unwrap();
        assert_eq!(store.load(&user_id).await.unwrap(), Some(profile));
        assert!(store.delete(&user_id).await.unwrap());
        assert!(store.load(&user_id).await.unwrap().is_none());
    }
}
