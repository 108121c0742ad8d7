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
//! Metrics endpoint configuration

use serde::{Deserialize, Serialize};

/// Default port of the metrics endpoint
pub const DEFAULT_PORT: u16 = 9547;

/// Default bind address of the metrics endpoint
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Where the metrics endpoint listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Port to listen on
    pub port: u16,
    /// Address to bind to
    pub bind_address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create new config with port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    /// Get bind address with port
    pub fn socket_addr(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetricsConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:9547");
    }

    #[test]
    fn test_builders() {
        let config = MetricsConfig::with_port(9100).with_bind_address("127.0.0.1");
        assert_eq!(config.socket_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_ipv6_bind_address() {
        let config = MetricsConfig::with_port(9547).with_bind_address("::");
        assert_eq!(config.socket_addr(), "[::]:9547");
    }
}
