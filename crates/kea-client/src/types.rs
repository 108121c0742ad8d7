// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Configuration and statistics snapshots fetched from a Kea server

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// DHCP protocol variant served by one Kea daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DhcpVersion {
    /// DHCPv4 (`kea-dhcp4`)
    Dhcp4,
    /// DHCPv6 (`kea-dhcp6`)
    Dhcp6,
}

impl DhcpVersion {
    /// Top-level key of this variant's block in a `config-get` response
    pub fn config_key(&self) -> &'static str {
        match self {
            DhcpVersion::Dhcp4 => "Dhcp4",
            DhcpVersion::Dhcp6 => "Dhcp6",
        }
    }

    /// Key of the subnet list inside the variant's block
    pub fn subnet_key(&self) -> &'static str {
        match self {
            DhcpVersion::Dhcp4 => "subnet4",
            DhcpVersion::Dhcp6 => "subnet6",
        }
    }

    /// Lowercase name, matching the Kea service name
    pub fn as_label(&self) -> &'static str {
        match self {
            DhcpVersion::Dhcp4 => "dhcp4",
            DhcpVersion::Dhcp6 => "dhcp6",
        }
    }
}

impl fmt::Display for DhcpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Address pool inside a subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool range as configured, e.g. `10.0.0.10-10.0.0.20`
    pub pool: String,
}

/// Subnet declaration
///
/// Statistics address pools by their position in `pools`, so the order is
/// only meaningful for the configuration fetch it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet id used in `subnet[<id>]` statistic keys
    pub id: u32,
    /// CIDR prefix
    pub subnet: String,
    /// Pools in configuration order
    #[serde(default)]
    pub pools: Vec<Pool>,
}

/// Configuration of one DHCP daemon, as returned by `config-get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfiguration {
    /// Protocol variant of the block that was present
    pub version: DhcpVersion,
    /// Operator supplied `server-tag`, empty when unset
    pub server_tag: String,
    /// Subnets in configuration order
    pub subnets: Vec<Subnet>,
}

/// Arguments of a `config-get` response
#[derive(Deserialize)]
struct ConfigArguments {
    #[serde(rename = "Dhcp4")]
    dhcp4: Option<DaemonBlock>,
    #[serde(rename = "Dhcp6")]
    dhcp6: Option<DaemonBlock>,
}

#[derive(Deserialize)]
struct DaemonBlock {
    #[serde(rename = "server-tag", default)]
    server_tag: Option<String>,
    #[serde(default, alias = "subnet4", alias = "subnet6")]
    subnets: Vec<Subnet>,
}

impl ServerConfiguration {
    /// Build from the `arguments` object of a `config-get` response
    ///
    /// Returns `Ok(None)` when neither `Dhcp4` nor `Dhcp6` is present.
    /// A response carrying both is read as `Dhcp4`.
    pub fn from_arguments(arguments: serde_json::Value) -> serde_json::Result<Option<Self>> {
        let parsed: ConfigArguments = serde_json::from_value(arguments)?;

        let (version, block) = match (parsed.dhcp4, parsed.dhcp6) {
            (Some(block), _) => (DhcpVersion::Dhcp4, block),
            (None, Some(block)) => (DhcpVersion::Dhcp6, block),
            (None, None) => return Ok(None),
        };

        Ok(Some(Self {
            version,
            server_tag: block.server_tag.unwrap_or_default(),
            subnets: block.subnets,
        }))
    }
}

/// One `[value, timestamp]` sample of a Kea statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticSample {
    /// Observed value
    pub value: f64,
    /// Server-side timestamp of the observation
    #[serde(default)]
    pub timestamp: String,
}

impl StatisticSample {
    fn to_value(&self) -> serde_json::Value {
        serde_json::json!([self.value, self.timestamp])
    }
}

/// `statistic-get-all` result: raw key to samples, freshest first
///
/// Samples are kept as raw JSON and only interpreted when a key is looked
/// up, so a statistic with a non-numeric value (hook durations, string
/// observations) does not spoil the rest of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStatistics(HashMap<String, serde_json::Value>);

impl RawStatistics {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `arguments` object of a `statistic-get-all` response
    ///
    /// A reply without arguments is an empty snapshot.
    pub fn from_arguments(arguments: serde_json::Value) -> serde_json::Result<Self> {
        match arguments {
            serde_json::Value::Null => Ok(Self::new()),
            arguments => serde_json::from_value(arguments),
        }
    }

    /// Freshest numeric value recorded under `key`
    ///
    /// A key whose freshest sample is not a number reads as missing.
    pub fn latest(&self, key: &str) -> Option<f64> {
        let samples = self.0.get(key)?;
        if samples.as_array().is_some_and(Vec::is_empty) {
            return None;
        }
        let value = samples
            .get(0)
            .and_then(|sample| sample.get(0))
            .and_then(serde_json::Value::as_f64);
        if value.is_none() {
            trace!(statistic = key, samples = %samples, "Ignoring non-numeric statistic");
        }
        value
    }

    /// Replace the samples recorded under `key`
    pub fn insert(&mut self, key: impl Into<String>, samples: Vec<StatisticSample>) {
        let samples = samples.iter().map(StatisticSample::to_value).collect();
        self.0.insert(key.into(), serde_json::Value::Array(samples));
    }

    /// Record a single sample under `key`
    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(
            key,
            vec![StatisticSample {
                value,
                timestamp: String::new(),
            }],
        );
        self
    }

    /// Number of statistic keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot holds no statistics
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything collected from one DHCP daemon during a scrape
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot {
    /// Target identifier (URL or socket path)
    pub target: String,
    /// Operator supplied `server-tag`
    pub server_tag: String,
    /// Protocol variant of the daemon
    pub version: DhcpVersion,
    /// Statistics fetched after the configuration
    pub statistics: RawStatistics,
    /// Subnets from the configuration fetched in the same scrape
    pub subnets: Vec<Subnet>,
}

impl TargetSnapshot {
    /// Combine a configuration with the statistics fetched after it
    pub fn new(
        target: impl Into<String>,
        configuration: ServerConfiguration,
        statistics: RawStatistics,
    ) -> Self {
        Self {
            target: target.into(),
            server_tag: configuration.server_tag,
            version: configuration.version,
            statistics,
            subnets: configuration.subnets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dhcp4_configuration() {
        let arguments = json!({
            "Dhcp4": {
                "server-tag": "edge-1",
                "valid-lifetime": 4000,
                "subnet4": [
                    {
                        "id": 10,
                        "subnet": "10.0.0.0/24",
                        "pools": [{ "pool": "10.0.0.10-10.0.0.20" }]
                    },
                    { "id": 11, "subnet": "10.0.1.0/24" }
                ]
            }
        });

        let config = ServerConfiguration::from_arguments(arguments)
            .unwrap()
            .unwrap();
        assert_eq!(config.version, DhcpVersion::Dhcp4);
        assert_eq!(config.server_tag, "edge-1");
        assert_eq!(config.subnets.len(), 2);
        assert_eq!(config.subnets[0].pools[0].pool, "10.0.0.10-10.0.0.20");
        assert!(config.subnets[1].pools.is_empty());
    }

    #[test]
    fn test_dhcp6_configuration_without_tag() {
        let arguments = json!({
            "Dhcp6": {
                "subnet6": [{ "id": 1, "subnet": "2001:db8::/64", "pools": [] }]
            }
        });

        let config = ServerConfiguration::from_arguments(arguments)
            .unwrap()
            .unwrap();
        assert_eq!(config.version, DhcpVersion::Dhcp6);
        assert_eq!(config.server_tag, "");
        assert_eq!(config.subnets[0].id, 1);
    }

    #[test]
    fn test_unsupported_configuration() {
        let arguments = json!({ "DhcpDdns": { "ip-address": "127.0.0.1" } });
        assert!(ServerConfiguration::from_arguments(arguments)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_statistics_latest_sample() {
        let arguments = json!({
            "pkt4-ack-sent": [[12, "2026-01-01 10:00:02.000"], [11, "2026-01-01 10:00:01.000"]],
            "pkt4-nak-sent": []
        });

        let stats = RawStatistics::from_arguments(arguments).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.latest("pkt4-ack-sent"), Some(12.0));
        assert_eq!(stats.latest("pkt4-nak-sent"), None);
        assert_eq!(stats.latest("pkt4-offer-sent"), None);
    }

    #[test]
    fn test_non_numeric_statistic_does_not_spoil_snapshot() {
        let arguments = json!({
            "pkt4-ack-sent": [[12, "2026-01-01 10:00:02.000"]],
            "some-hook-duration": [["00:00:01.250000", "2026-01-01 10:00:02.000"]],
            "subnet[1].broken": "not a sample list"
        });

        let stats = RawStatistics::from_arguments(arguments).unwrap();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.latest("pkt4-ack-sent"), Some(12.0));
        assert_eq!(stats.latest("some-hook-duration"), None);
        assert_eq!(stats.latest("subnet[1].broken"), None);
    }

    #[test]
    fn test_large_and_untimestamped_samples() {
        let arguments = json!({
            "cumulative-assigned-addresses": [[18446744073709551616.0_f64, "t"]],
            "pkt4-offer-sent": [[7]]
        });

        let stats = RawStatistics::from_arguments(arguments).unwrap();
        assert_eq!(
            stats.latest("cumulative-assigned-addresses"),
            Some(18446744073709551616.0)
        );
        assert_eq!(stats.latest("pkt4-offer-sent"), Some(7.0));
    }

    #[test]
    fn test_missing_arguments_are_an_empty_snapshot() {
        let stats = RawStatistics::from_arguments(serde_json::Value::Null).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_inserted_samples_are_read_back() {
        let mut stats = RawStatistics::new().with_value("pkt6-reply-sent", 4.0);
        stats.insert("pkt6-advertise-sent", vec![]);

        assert_eq!(stats.latest("pkt6-reply-sent"), Some(4.0));
        assert_eq!(stats.latest("pkt6-advertise-sent"), None);
    }

    #[test]
    fn test_version_labels() {
        assert_eq!(DhcpVersion::Dhcp4.config_key(), "Dhcp4");
        assert_eq!(DhcpVersion::Dhcp6.subnet_key(), "subnet6");
        assert_eq!(DhcpVersion::Dhcp6.to_string(), "dhcp6");
    }
}
