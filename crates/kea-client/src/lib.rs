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
//! Clients for Kea DHCP server control endpoints
//!
//! A monitored target is either a Kea Control Agent reached over HTTP or a
//! local control socket opened by `kea-dhcp4`/`kea-dhcp6`. Both are exposed
//! through the [`TargetClient`] trait, which fetches the running configuration
//! and the raw statistics of every DHCP daemon behind the target.
//!
//! # Consistency
//!
//! Configuration and statistics are two separate round trips. A
//! configuration change landing between them can leave subnet ids or pool
//! positions that do not match the statistics; [`TargetClient::collect`]
//! narrows that window by always fetching configuration immediately before
//! statistics, but cannot close it.
//!
//! # Example
//!
//! ```no_run
//! use kea_client::{ClientConfig, SocketClient, TargetClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let socket = "/run/kea/kea4-ctrl-socket";
//!     let client = SocketClient::connect(socket, &ClientConfig::default()).await?;
//!
//!     for snapshot in client.collect().await? {
//!         println!("{} serves {} subnets", snapshot.version, snapshot.subnets.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod error;
pub mod http;
pub mod mock;
pub mod socket;
pub mod target;
pub mod types;

use async_trait::async_trait;
use std::fmt::Debug;

pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use socket::SocketClient;
pub use target::{ClientConfig, ClientIdentity, TargetAddress, DEFAULT_TIMEOUT};
pub use types::{
    DhcpVersion, Pool, RawStatistics, ServerConfiguration, StatisticSample, Subnet, TargetSnapshot,
};

/// Contract shared by the control agent and control socket transports
///
/// Implementations perform blocking request/response exchanges and are not
/// meant to serve overlapping calls; callers serialise access per client.
#[async_trait]
pub trait TargetClient: Send + Sync + Debug {
    /// Identifier used verbatim as the `target` label
    fn target(&self) -> &str;

    /// Fetch the configuration of every daemon behind this target
    ///
    /// # Errors
    ///
    /// `ConfigUnavailable` on transport failure, a malformed response, a
    /// non-zero result code, or a daemon exposing neither `Dhcp4` nor `Dhcp6`.
    async fn fetch_configuration(&self) -> ClientResult<Vec<ServerConfiguration>>;

    /// Fetch the statistics of every daemon, aligned with the configuration
    ///
    /// # Errors
    ///
    /// `StatsUnavailable` on transport or protocol failure.
    async fn fetch_statistics(&self) -> ClientResult<Vec<RawStatistics>>;

    /// Fetch configuration, then statistics, and pair them per daemon
    async fn collect(&self) -> ClientResult<Vec<TargetSnapshot>> {
        let configurations = self.fetch_configuration().await?;
        let statistics = self.fetch_statistics().await?;
        pair_snapshots(self.target(), configurations, statistics)
    }
}

/// Pair configurations with the statistics fetched for the same daemons
pub fn pair_snapshots(
    target: &str,
    configurations: Vec<ServerConfiguration>,
    statistics: Vec<RawStatistics>,
) -> ClientResult<Vec<TargetSnapshot>> {
    if configurations.len() != statistics.len() {
        return Err(ClientError::malformed(
            target,
            format!(
                "{} statistics responses for {} configured daemons",
                statistics.len(),
                configurations.len()
            ),
        )
        .into_stats_unavailable(target));
    }

    Ok(configurations
        .into_iter()
        .zip(statistics)
        .map(|(configuration, stats)| TargetSnapshot::new(target, configuration, stats))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration(version: DhcpVersion) -> ServerConfiguration {
        ServerConfiguration {
            version,
            server_tag: "tag".to_string(),
            subnets: vec![],
        }
    }

    #[test]
    fn test_pair_snapshots_preserves_order() {
        let snapshots = pair_snapshots(
            "http://kea:8000",
            vec![configuration(DhcpVersion::Dhcp4), configuration(DhcpVersion::Dhcp6)],
            vec![
                RawStatistics::new().with_value("pkt4-ack-sent", 1.0),
                RawStatistics::new().with_value("pkt6-reply-sent", 2.0),
            ],
        )
        .unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].version, DhcpVersion::Dhcp4);
        assert_eq!(snapshots[0].statistics.latest("pkt4-ack-sent"), Some(1.0));
        assert_eq!(snapshots[1].version, DhcpVersion::Dhcp6);
        assert_eq!(snapshots[1].target, "http://kea:8000");
    }

    #[test]
    fn test_pair_snapshots_length_mismatch() {
        let err = pair_snapshots(
            "http://kea:8000",
            vec![configuration(DhcpVersion::Dhcp4)],
            vec![],
        )
        .unwrap_err();
        assert!(err.is_stats_unavailable());
    }
}
