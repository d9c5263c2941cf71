//! Table-driven geolocation.
//!
//! Useful for tests, replay of historical logs with a known address plan, and
//! small deployments that only need to recognise their own office networks.

use crate::error::{Result, RiskError};
use crate::providers::GeoResolver;
use crate::state::GeoLocation;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// One row of a geo table: a single address or CIDR network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTableEntry {
    /// Address (`203.0.113.7`) or network (`203.0.113.0/24`).
    pub network: String,

    /// Location every address in the network resolves to.
    pub location: GeoLocation,
}

/// Resolver backed by an in-memory table.
///
/// Exact addresses win over networks; among networks the longest prefix wins.
/// Addresses the table does not cover resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoResolver {
    addresses: Arc<HashMap<IpAddr, GeoLocation>>,
    networks: Arc<Vec<(IpNetwork, GeoLocation)>>,
}

impl StaticGeoResolver {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] if an entry is neither an address
    /// nor a CIDR network.
    pub fn from_entries(entries: impl IntoIterator<Item = GeoTableEntry>) -> Result<Self> {
        entries
            .into_iter()
            .try_fold(Self::new(), |table, entry| table.with_entry(&entry.network, entry.location))
    }

    /// Parse a JSON array of [`GeoTableEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] on malformed JSON or entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<GeoTableEntry> = serde_json::from_str(json)
            .map_err(|e| RiskError::InvalidInput(format!("Invalid geo table: {e}")))?;
        Self::from_entries(entries)
    }

    /// Map a single address.
    #[must_use]
    pub fn with_address(mut self, ip_address: IpAddr, location: GeoLocation) -> Self {
        Arc::make_mut(&mut self.addresses).insert(ip_address, location);
        self
    }

    /// Map a whole network.
    #[must_use]
    pub fn with_network(mut self, network: IpNetwork, location: GeoLocation) -> Self {
        let networks = Arc::make_mut(&mut self.networks);
        networks.push((network, location));
        networks.sort_by(|(a, _), (b, _)| b.prefix().cmp(&a.prefix()));
        self
    }

    /// Map an address or network given as text.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] if `network` does not parse.
    pub fn with_entry(self, network: &str, location: GeoLocation) -> Result<Self> {
        let network = network.trim();
        if let Ok(ip_address) = network.parse::<IpAddr>() {
            return Ok(self.with_address(ip_address, location));
        }
        let parsed: IpNetwork = network
            .parse()
            .map_err(|e| RiskError::InvalidInput(format!("Invalid network '{network}': {e}")))?;
        Ok(self.with_network(parsed, location))
    }

    /// Number of addresses and networks in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len() + self.networks.len()
    }

    /// `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous lookup.
    #[must_use]
    pub fn resolve(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        if let Some(location) = self.addresses.get(&ip_address) {
            return Some(location.clone());
        }
        self.networks
            .iter()
            .find(|(network, _)| network.contains(ip_address))
            .map(|(_, location)| location.clone())
    }
}

impl GeoResolver for StaticGeoResolver {
    async fn lookup(&self, ip_address: IpAddr) -> Option<GeoLocation> {
        let location = self.resolve(ip_address);
        if location.is_none() {
            tracing::debug!(ip_address = %ip_address, "Address not covered by geo table");
        }
        location
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn london() -> GeoLocation {
        GeoLocation::new("GB", "England", "London", 51.5074, -0.1278)
    }

    fn manchester() -> GeoLocation {
        GeoLocation::new("GB", "England", "Manchester", 53.4808, -2.2426)
    }

    fn office() -> GeoLocation {
        GeoLocation::new("GB", "England", "Reading", 51.4543, -0.9781)
    }

    fn table() -> StaticGeoResolver {
        StaticGeoResolver::new()
            .with_entry("81.0.0.0/8", london())
            .unwrap()
            .with_entry("81.2.0.0/16", manchester())
            .unwrap()
            .with_entry("81.2.3.4", office())
            .unwrap()
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = table();
        assert_eq!(table.resolve("81.9.9.9".parse().unwrap()), Some(london()));
        assert_eq!(table.resolve("81.2.200.1".parse().unwrap()), Some(manchester()));
        assert_eq!(table.resolve("81.2.3.4".parse().unwrap()), Some(office()));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_uncovered_and_private_addresses_are_unknown() {
        let table = table();
        assert_eq!(table.resolve("10.0.0.1".parse().unwrap()), None);
        assert_eq!(table.resolve("127.0.0.1".parse().unwrap()), None);
        assert_eq!(table.resolve("::1".parse().unwrap()), None);
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let result = StaticGeoResolver::new().with_entry("not-a-network", london());
        assert!(matches!(result, Err(RiskError::InvalidInput(_))));
    }

    #[test]
    fn test_from_json() {
        let table = StaticGeoResolver::from_json(
            r#"[
                {"network": "2001:db8::/32", "location": {"country": "NL", "region": "North Holland", "city": "Amsterdam", "latitude": 52.37, "longitude": 4.89}}
            ]"#,
        )
        .unwrap();
        let location = table.resolve("2001:db8::42".parse().unwrap()).unwrap();
        assert_eq!(location.city, "Amsterdam");
    }

    #[tokio::test]
    async fn test_lookup_via_trait() {
        let table = table();
        let location = table.lookup("81.2.3.4".parse().unwrap()).await;
        assert_eq!(location, Some(office()));
    }
}
