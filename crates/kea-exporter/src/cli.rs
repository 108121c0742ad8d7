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
//! Command line interface

use clap::Parser;
use kea_observability::LogFormat;
use std::path::PathBuf;

/// Command line flags
///
/// Every option falls back to an environment variable. Options left unset
/// keep the value from the configuration file or the built-in default.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "kea-exporter")]
#[command(version, about = "Prometheus exporter for Kea DHCP servers")]
#[command(
    long_about = "Polls Kea control agents (http:// or https:// URLs) and Kea control sockets
(filesystem paths) and republishes their statistics as Prometheus metrics."
)]
pub struct Cli {
    /// Address that the exporter binds to [default: 0.0.0.0]
    #[arg(short, long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Port that the exporter binds to [default: 9547]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Run in debug mode
    #[arg(short, long, env = "DEBUG")]
    pub debug: bool,

    /// Path to client certificate used in HTTP requests
    #[arg(long, env = "CLIENT_CERT", value_name = "PATH")]
    pub client_cert: Option<PathBuf>,

    /// Path to client key used in HTTP requests
    #[arg(long, env = "CLIENT_KEY", value_name = "PATH")]
    pub client_key: Option<PathBuf>,

    /// Timeout of a single command, in seconds [default: 10]
    #[arg(long, env = "TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Log format (pretty|compact|json) [default: compact]
    #[arg(long, env = "LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// TOML configuration file
    #[arg(short, long, env = "CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Control agent URLs or control socket paths
    #[arg(env = "TARGETS", value_delimiter = ' ')]
    pub targets: Vec<String>,
}
