//! MaxMind GeoLite2-City resolver.

use crate::error::{Result, RiskError};
use crate::providers::GeoResolver;
use crate::state::{GeoLocation, UNKNOWN_CITY};
use maxminddb::{geoip2, Reader};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Resolver reading a `GeoLite2-City.mmdb` database into memory.
#[derive(Clone)]
pub struct MaxMindGeoResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoResolver {
    /// Open a database file.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::GeoLookup`] if the file cannot be read or is not
    /// a MaxMind database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| {
            RiskError::GeoLookup(format!("Failed to open {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Loaded MaxMind database");
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    fn resolve(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        let city = match self.reader.lookup::<geoip2::City>(ip_address) {
            Ok(Some(city)) => city,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(ip_address = %ip_address, error = %e, "MaxMind lookup failed");
                return None;
            }
        };

        let location = city.location.as_ref()?;
        let (latitude, longitude) = (location.latitude?, location.longitude?);

        let country = city
            .country
            .as_ref()
            .and_then(|country| country.iso_code)
            .unwrap_or("Unknown");
        let region = city
            .subdivisions
            .as_ref()
            .and_then(|subdivisions| subdivisions.first())
            .and_then(|subdivision| subdivision.names.as_ref())
            .and_then(|names| names.get("en").copied())
            .unwrap_or("Unknown");
        let city_name = city
            .city
            .as_ref()
            .and_then(|city| city.names.as_ref())
            .and_then(|names| names.get("en").copied())
            .unwrap_or(UNKNOWN_CITY);

        Some(GeoLocation::new(country, region, city_name, latitude, longitude))
    }
}

impl GeoResolver for MaxMindGeoResolver {
    async fn lookup(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        self.resolve(ip_address)
    }
}
