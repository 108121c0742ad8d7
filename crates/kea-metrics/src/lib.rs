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
//! Prometheus metrics for Kea DHCP statistics
//!
//! This crate turns raw Kea statistics into Prometheus metric families:
//! - [`key`] builds the bracket-indexed raw statistic keys
//! - [`table`] declares every exported family and the statistics feeding it
//! - [`engine`] polls target clients and fills the families
//! - [`exposition`] and [`server`] publish the result over HTTP
//!
//! # Example
//!
//! ```no_run
//! use kea_client::{ClientConfig, SocketClient, TargetClient};
//! use kea_metrics::{CollectionEngine, MetricTable, MetricsConfig, MetricsServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let socket = "/run/kea/kea4-ctrl-socket";
//!     let client = SocketClient::connect(socket, &ClientConfig::default()).await?;
//!     let targets: Vec<Box<dyn TargetClient>> = vec![Box::new(client)];
//!
//!     let engine = CollectionEngine::new(targets, MetricTable::kea()?);
//!     MetricsServer::new(engine, MetricsConfig::default()).serve().await
//! }
//! ```

pub mod engine;
pub mod error;
pub mod exposition;
pub mod family;
pub mod key;
pub mod server;
pub mod table;
pub mod types;

pub use engine::{map_snapshots, CollectionEngine};
pub use error::{MetricsError, MetricsResult};
pub use exposition::encode_text;
pub use family::MetricFamily;
pub use key::{statistic_key, StatisticScope};
pub use server::MetricsServer;
pub use table::{MetricDeclaration, MetricScope, MetricTable, KEA_METRICS};
pub use types::MetricsConfig;

// Re-export prometheus types for convenience
pub use prometheus::{Encoder, TextEncoder};
