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
//! Prometheus exporter for Kea DHCP servers
//!
//! Glue between the command line, the target clients in `kea-client` and
//! the metrics server in `kea-metrics`.

pub mod cli;
pub mod config;
pub mod error;
pub mod targets;

pub use cli::Cli;
pub use config::ExporterConfig;
pub use error::{ExporterError, ExporterResult};
pub use targets::{connect_target, connect_targets};
