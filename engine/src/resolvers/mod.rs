//! Geolocation resolver implementations.
//!
//! - [`StaticGeoResolver`] - in-process table of addresses and networks
//! - `MaxMindGeoResolver` - GeoLite2-City database (feature `geoip`)

#[cfg(feature = "geoip")]
pub mod maxmind;
pub mod static_table;

#[cfg(feature = "geoip")]
pub use maxmind::MaxMindGeoResolver;
pub use static_table::{GeoTableEntry, StaticGeoResolver};
