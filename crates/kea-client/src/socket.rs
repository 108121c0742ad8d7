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
//! Kea control socket transport
//!
//! One command per connection: the request object is written, the daemon
//! answers with a single JSON object and closes the stream.

use async_trait::async_trait;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, error, info};

use crate::command::{CommandRequest, CommandResponse, CONFIG_GET, STATISTIC_GET_ALL};
use crate::error::{ClientError, ClientResult};
use crate::target::ClientConfig;
use crate::types::{RawStatistics, ServerConfiguration};
use crate::TargetClient;

/// Client for a local Kea control socket
#[derive(Debug)]
pub struct SocketClient {
    path: PathBuf,
    label: String,
    timeout: Duration,
}

impl SocketClient {
    /// Open a control socket
    ///
    /// The path is made absolute and used as the target identifier. The first
    /// configuration fetch happens here, so a socket serving neither DHCPv4
    /// nor DHCPv6 is rejected before it is ever scraped.
    ///
    /// # Errors
    ///
    /// `TargetConstruction` when the path does not exist, is not a socket,
    /// cannot be read and written, or does not serve a DHCP configuration.
    pub async fn connect(path: impl AsRef<Path>, config: &ClientConfig) -> ClientResult<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ClientError::target_construction(
                &label,
                format!("Unix domain socket does not exist at {}", label),
            ),
            _ => ClientError::target_construction(&label, e.to_string()),
        })?;

        if !metadata.file_type().is_socket() {
            return Err(ClientError::target_construction(
                &label,
                format!("{} is not a Unix domain socket", label),
            ));
        }

        let path = std::path::absolute(path)
            .map_err(|e| ClientError::target_construction(&label, e.to_string()))?;

        let client = Self {
            label: path.display().to_string(),
            path,
            timeout: config.timeout,
        };

        match client.fetch_configuration().await {
            Ok(configurations) => {
                for configuration in &configurations {
                    info!(
                        endpoint = %client.label,
                        version = %configuration.version,
                        subnets = configuration.subnets.len(),
                        "Connected to Kea control socket"
                    );
                }
                Ok(client)
            }
            Err(e) if e.is_permission_denied() => Err(ClientError::target_construction(
                &client.label,
                format!("No read/write permissions on Unix domain socket at {}", client.label),
            )),
            Err(e) => {
                if e.is_unsupported_configuration() {
                    error!(endpoint = %client.label, "Socket has no supported configuration");
                }
                Err(ClientError::target_construction(&client.label, e.to_string()))
            }
        }
    }

    /// Absolute path of the control socket
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one command and return its arguments
    async fn query(&self, command: &str) -> ClientResult<serde_json::Value> {
        debug!(endpoint = %self.label, command, "Sending command");

        let body = tokio::time::timeout(self.timeout, self.exchange(command))
            .await
            .map_err(|_| ClientError::timeout(&self.label, command))??;

        let response: CommandResponse = serde_json::from_slice(&body)?;
        response.into_arguments(&self.label, command)
    }

    async fn exchange(&self, command: &str) -> ClientResult<Vec<u8>> {
        let mut stream = UnixStream::connect(&self.path).await?;

        let request = serde_json::to_vec(&CommandRequest::new(command))?;
        stream.write_all(&request).await?;

        let mut body = Vec::new();
        stream.read_to_end(&mut body).await?;
        Ok(body)
    }

    async fn load_configuration(&self) -> ClientResult<Vec<ServerConfiguration>> {
        let arguments = self.query(CONFIG_GET).await?;
        let configuration = ServerConfiguration::from_arguments(arguments)?.ok_or_else(|| {
            ClientError::UnsupportedConfiguration {
                target: self.label.clone(),
            }
        })?;
        Ok(vec![configuration])
    }

    async fn load_statistics(&self) -> ClientResult<Vec<RawStatistics>> {
        let arguments = self.query(STATISTIC_GET_ALL).await?;
        Ok(vec![RawStatistics::from_arguments(arguments)?])
    }
}

#[async_trait]
impl TargetClient for SocketClient {
    fn target(&self) -> &str {
        &self.label
    }

    async fn fetch_configuration(&self) -> ClientResult<Vec<ServerConfiguration>> {
        self.load_configuration()
            .await
            .map_err(|e| e.into_config_unavailable(&self.label))
    }

    async fn fetch_statistics(&self) -> ClientResult<Vec<RawStatistics>> {
        self.load_statistics()
            .await
            .map_err(|e| e.into_stats_unavailable(&self.label))
    }
}
