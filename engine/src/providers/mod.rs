//! Collaborator interfaces.
//!
//! The engine depends on these traits only. Concrete implementations live in
//! [`resolvers`](crate::resolvers), [`stores`](crate::stores),
//! [`sinks`](crate::sinks) and, for tests, [`mocks`](crate::mocks).
//!
//! ```text
//!   LoginAttempt
//!        │
//!        ▼
//! ┌──────────────┐  load/save   ┌──────────────┐
//! │ RiskDetector │─────────────▶│ ProfileStore │
//! │              │   lookup     ├──────────────┤
//! │              │─────────────▶│ GeoResolver  │
//! │              │   publish    ├──────────────┤
//! │              │─────────────▶│AssessmentSink│
//! └──────────────┘              └──────────────┘
//! ```

pub mod geo;
pub mod profile_store;
pub mod sink;

pub use geo::GeoResolver;
pub use profile_store::ProfileStore;
pub use sink::AssessmentSink;
