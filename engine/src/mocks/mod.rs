//! Mock provider implementations for testing.
//!
//! In-memory collaborators that record what the detector did with them, or
//! fail on demand.

pub mod geo;
pub mod sink;
pub mod store;

pub use geo::MockGeoResolver;
pub use sink::RecordingSink;
pub use store::FailingProfileStore;
