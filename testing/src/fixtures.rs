//! Well-known locations and the addresses that resolve to them.
//!
//! Addresses come from the documentation ranges (RFC 5737), so they never
//! collide with real traffic.

use login_risk_engine::resolvers::StaticGeoResolver;

/// Cities with real coordinates.
pub mod cities {
    use login_risk_engine::GeoLocation;

    /// New York, US.
    #[must_use]
    pub fn new_york() -> GeoLocation {
        GeoLocation::new("US", "New York", "New York", 40.7128, -74.0060)
    }

    /// Boston, US (about 306 km from New York).
    #[must_use]
    pub fn boston() -> GeoLocation {
        GeoLocation::new("US", "Massachusetts", "Boston", 42.3601, -71.0589)
    }

    /// Los Angeles, US (about 3,936 km from New York).
    #[must_use]
    pub fn los_angeles() -> GeoLocation {
        GeoLocation::new("US", "California", "Los Angeles", 34.0522, -118.2437)
    }

    /// Tokyo, JP (about 10,852 km from New York).
    #[must_use]
    pub fn tokyo() -> GeoLocation {
        GeoLocation::new("JP", "Tokyo", "Tokyo", 35.6762, 139.6503)
    }

    /// London, GB.
    #[must_use]
    pub fn london() -> GeoLocation {
        GeoLocation::new("GB", "England", "London", 51.5074, -0.1278)
    }

    /// Paris, FR.
    #[must_use]
    pub fn paris() -> GeoLocation {
        GeoLocation::new("FR", "Ile-de-France", "Paris", 48.8566, 2.3522)
    }

    /// Sydney, AU.
    #[must_use]
    pub fn sydney() -> GeoLocation {
        GeoLocation::new("AU", "New South Wales", "Sydney", -33.8688, 151.2093)
    }
}

/// Addresses that [`geo_table`] resolves.
pub mod addresses {
    use std::net::{IpAddr, Ipv4Addr};

    /// Resolves to New York.
    pub const NEW_YORK: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 10));
    /// Resolves to Boston.
    pub const BOSTON: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 20));
    /// Resolves to Los Angeles.
    pub const LOS_ANGELES: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 30));
    /// Resolves to Tokyo.
    pub const TOKYO: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10));
    /// Resolves to London.
    pub const LONDON: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 20));
    /// Resolves to Paris.
    pub const PARIS: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 30));
    /// Resolves to Sydney.
    pub const SYDNEY: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10));

    /// Not in the table.
    pub const UNRESOLVED: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 250));
    /// Private address, never resolved.
    pub const PRIVATE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5));

    /// Every resolvable address.
    pub const RESOLVABLE: [IpAddr; 7] = [NEW_YORK, BOSTON, LOS_ANGELES, TOKYO, LONDON, PARIS, SYDNEY];
}

/// Resolver mapping every [`addresses`] entry to its city.
#[must_use]
pub fn geo_table() -> StaticGeoResolver {
    StaticGeoResolver::new()
        .with_address(addresses::NEW_YORK, cities::new_york())
        .with_address(addresses::BOSTON, cities::boston())
        .with_address(addresses::LOS_ANGELES, cities::los_angeles())
        .with_address(addresses::TOKYO, cities::tokyo())
        .with_address(addresses::LONDON, cities::london())
        .with_address(addresses::PARIS, cities::paris())
        .with_address(addresses::SYDNEY, cities::sydney())
}
