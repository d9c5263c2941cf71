//! Mock geolocation resolver.

use crate::providers::GeoResolver;
use crate::state::GeoLocation;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Exact-address resolver that counts lookups.
///
/// Unknown addresses resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct MockGeoResolver {
    locations: Arc<Mutex<HashMap<IpAddr, GeoLocation>>>,
    lookups: Arc<AtomicUsize>,
}

impl MockGeoResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_location(self, ip_address: IpAddr, location: GeoLocation) -> Self {
        self.insert(ip_address, location);
        self
    }

    /// Map an address to a location.
    pub fn insert(&self, ip_address: IpAddr, location: GeoLocation) {
        if let Ok(mut locations) = self.locations.lock() {
            locations.insert(ip_address, location);
        }
    }

    /// Number of lookups served so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl GeoResolver for MockGeoResolver {
    async fn lookup(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.locations
            .lock()
            .ok()
            .and_then(|locations| locations.get(&ip_address).cloned())
    }
}
