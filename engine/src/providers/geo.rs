//! Geolocation lookup trait.

use crate::state::GeoLocation;
use std::net::IpAddr;

/// Maps a network address to an approximate location.
///
/// # Implementation Notes
///
/// - Return `None` for private, loopback or otherwise unknown addresses
/// - Lookups should be pure: the same address yields the same answer
/// - Backend failures are not errors at this level; log them and return `None`
pub trait GeoResolver: Send + Sync {
    /// Resolve an address.
    fn lookup(&self, ip_address: IpAddr) -> impl std::future::Future<Output = Option<GeoLocation>> + Send;
}
