//! Profile store implementations.
//!
//! - **In-memory** ([`InMemoryProfileStore`]) - process-local map, for tests,
//!   replay and single-node deployments
//! - **Redis** ([`RedisProfileStore`]) - shared, persistent storage with an
//!   optional idle TTL
//!
//! Both apply a [`RetentionPolicy`] when saving.

pub mod memory;
pub mod redis;
pub mod retention;

pub use memory::InMemoryProfileStore;
pub use redis::RedisProfileStore;
pub use retention::RetentionPolicy;
