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
//! In-memory target client for testing
//!
//! Serves canned configuration and statistics snapshots and records the
//! order of fetches. Clones share state, so a test can keep a handle while
//! the engine under test owns another and change the backend between
//! scrapes.
//!
//! ```rust,no_run
//! use kea_client::mock::MockClient;
//! use kea_client::{DhcpVersion, RawStatistics, TargetClient};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = MockClient::new("/run/kea/kea4-ctrl-socket")
//!     .with_daemon(
//!         DhcpVersion::Dhcp4,
//!         "",
//!         vec![],
//!         RawStatistics::new().with_value("pkt4-ack-sent", 3.0),
//!     );
//!
//! let snapshots = client.collect().await?;
//! assert_eq!(snapshots[0].statistics.latest("pkt4-ack-sent"), Some(3.0));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{ClientError, ClientResult};
use crate::types::{DhcpVersion, RawStatistics, ServerConfiguration, Subnet};
use crate::TargetClient;

/// Fetch recorded by [`MockClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    /// `fetch_configuration`
    Configuration,
    /// `fetch_statistics`
    Statistics,
}

#[derive(Debug, Default)]
struct MockState {
    configurations: Vec<ServerConfiguration>,
    statistics: Vec<RawStatistics>,
    fail_configuration: bool,
    fail_statistics: bool,
    calls: Vec<MockCall>,
}

/// In-memory [`TargetClient`]
#[derive(Debug, Clone)]
pub struct MockClient {
    target: String,
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    /// Create a client serving no daemons
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Add a daemon with its configuration and statistics
    pub fn with_daemon(
        self,
        version: DhcpVersion,
        server_tag: impl Into<String>,
        subnets: Vec<Subnet>,
        statistics: RawStatistics,
    ) -> Self {
        {
            let mut state = self.state();
            state.configurations.push(ServerConfiguration {
                version,
                server_tag: server_tag.into(),
                subnets,
            });
            state.statistics.push(statistics);
        }
        self
    }

    /// Replace the statistics of the daemon at `index`
    pub fn set_statistics(&self, index: usize, statistics: RawStatistics) {
        let mut state = self.state();
        if let Some(slot) = state.statistics.get_mut(index) {
            *slot = statistics;
        }
    }

    /// Replace the subnets of the daemon at `index`
    pub fn set_subnets(&self, index: usize, subnets: Vec<Subnet>) {
        let mut state = self.state();
        if let Some(configuration) = state.configurations.get_mut(index) {
            configuration.subnets = subnets;
        }
    }

    /// Make configuration fetches fail
    pub fn fail_configuration(&self, fail: bool) {
        self.state().fail_configuration = fail;
    }

    /// Make statistics fetches fail
    pub fn fail_statistics(&self, fail: bool) {
        self.state().fail_statistics = fail;
    }

    /// Fetches performed so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TargetClient for MockClient {
    fn target(&self) -> &str {
        &self.target
    }

    async fn fetch_configuration(&self) -> ClientResult<Vec<ServerConfiguration>> {
        let mut state = self.state();
        state.calls.push(MockCall::Configuration);

        if state.fail_configuration {
            return Err(ClientError::malformed(&self.target, "injected configuration failure")
                .into_config_unavailable(&self.target));
        }
        Ok(state.configurations.clone())
    }

    async fn fetch_statistics(&self) -> ClientResult<Vec<RawStatistics>> {
        let mut state = self.state();
        state.calls.push(MockCall::Statistics);

        if state.fail_statistics {
            return Err(ClientError::malformed(&self.target, "injected statistics failure")
                .into_stats_unavailable(&self.target));
        }
        Ok(state.statistics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_fetches_configuration_first() {
        let client = MockClient::new("mock").with_daemon(
            DhcpVersion::Dhcp4,
            "",
            vec![],
            RawStatistics::new(),
        );

        client.collect().await.unwrap();
        assert_eq!(
            client.calls(),
            vec![MockCall::Configuration, MockCall::Statistics]
        );
    }

    #[tokio::test]
    async fn test_configuration_failure_skips_statistics() {
        let client = MockClient::new("mock").with_daemon(
            DhcpVersion::Dhcp6,
            "",
            vec![],
            RawStatistics::new(),
        );
        client.fail_configuration(true);

        let err = client.collect().await.unwrap_err();
        assert!(err.is_config_unavailable());
        assert_eq!(client.calls(), vec![MockCall::Configuration]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let client = MockClient::new("mock").with_daemon(
            DhcpVersion::Dhcp4,
            "",
            vec![],
            RawStatistics::new(),
        );
        let handle = client.clone();
        handle.set_statistics(0, RawStatistics::new().with_value("pkt4-ack-sent", 9.0));

        let snapshots = client.collect().await.unwrap();
        assert_eq!(snapshots[0].statistics.latest("pkt4-ack-sent"), Some(9.0));
    }
}
