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
//! Target addresses and per-target client settings

use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default bound on a single command exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a Kea server can be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddress {
    /// Control agent URL, kept verbatim
    Http(String),
    /// Path of a local control socket
    Socket(PathBuf),
}

impl TargetAddress {
    /// Classify an operator supplied address
    ///
    /// An `http`/`https` URL selects the control agent transport; anything
    /// that does not parse as an absolute URL is taken as a socket path.
    pub fn parse(input: &str) -> ClientResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClientError::invalid_target(input, "empty address"));
        }

        match Url::parse(input) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(TargetAddress::Http(input.to_string())),
                scheme => Err(ClientError::invalid_target(
                    input,
                    format!("unsupported scheme '{}'", scheme),
                )),
            },
            Err(_) => Ok(TargetAddress::Socket(PathBuf::from(input))),
        }
    }

    /// Whether this address uses the control agent transport
    pub fn is_http(&self) -> bool {
        matches!(self, TargetAddress::Http(_))
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddress::Http(url) => f.write_str(url),
            TargetAddress::Socket(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Client certificate and key presented to a control agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// PEM certificate
    pub cert: PathBuf,
    /// PEM private key
    pub key: PathBuf,
}

/// Settings shared by every target client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on a single command exchange
    pub timeout: Duration,
    /// Optional mutual-TLS identity (HTTP transport only)
    pub identity: Option<ClientIdentity>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            identity: None,
        }
    }
}

impl ClientConfig {
    /// Set the exchange timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a client certificate and key
    pub fn with_identity(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.identity = Some(ClientIdentity {
            cert: cert.into(),
            key: key.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_addresses() {
        assert_eq!(
            TargetAddress::parse("http://kea-ctrl:8000").unwrap(),
            TargetAddress::Http("http://kea-ctrl:8000".to_string())
        );
        assert!(TargetAddress::parse("https://10.0.0.1:8001/").unwrap().is_http());
    }

    #[test]
    fn test_socket_addresses() {
        assert_eq!(
            TargetAddress::parse("/run/kea/kea4-ctrl-socket").unwrap(),
            TargetAddress::Socket(PathBuf::from("/run/kea/kea4-ctrl-socket"))
        );
        assert_eq!(
            TargetAddress::parse("kea4.sock").unwrap(),
            TargetAddress::Socket(PathBuf::from("kea4.sock"))
        );
    }

    #[test]
    fn test_rejected_addresses() {
        assert!(matches!(
            TargetAddress::parse("   "),
            Err(ClientError::InvalidTarget { .. })
        ));
        assert!(matches!(
            TargetAddress::parse("ftp://kea/"),
            Err(ClientError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_display_is_verbatim() {
        let address = TargetAddress::parse("http://kea-ctrl:8000").unwrap();
        assert_eq!(address.to_string(), "http://kea-ctrl:8000");
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_identity("/etc/kea/client.crt", "/etc/kea/client.key");

        assert_eq!(config.timeout, Duration::from_secs(3));
        let identity = config.identity.unwrap();
        assert_eq!(identity.cert, PathBuf::from("/etc/kea/client.crt"));
        assert_eq!(identity.key, PathBuf::from("/etc/kea/client.key"));
    }
}
