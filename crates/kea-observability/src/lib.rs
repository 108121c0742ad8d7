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
//! Structured logging for the Kea exporter.
//!
//! Wraps `tracing-subscriber` setup behind a small configuration type so the
//! binary can pick an output format from its flags or config file.
//!
//! # Example
//!
//! ```no_run
//! use kea_observability::{init_tracing_with_config, LogConfig, LogFormat};
//!
//! let config = LogConfig::new().with_format(LogFormat::Json).with_debug(true);
//! init_tracing_with_config(config).unwrap();
//! tracing::debug!("Debug logging enabled");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};
