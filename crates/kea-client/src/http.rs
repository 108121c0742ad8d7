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
//! Kea Control Agent transport
//!
//! Commands are POSTed as JSON to the agent, which forwards them to the
//! services named in the request and answers with one response element per
//! service, in request order.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::command::{CommandRequest, CommandResponse, CONFIG_GET, STATISTIC_GET_ALL};
use crate::error::{ClientError, ClientResult};
use crate::target::{ClientConfig, ClientIdentity};
use crate::types::{RawStatistics, ServerConfiguration};
use crate::TargetClient;

/// Client for a Kea Control Agent
#[derive(Debug)]
pub struct HttpClient {
    url: String,
    client: reqwest::Client,
    services: Vec<String>,
}

impl HttpClient {
    /// Connect to a control agent
    ///
    /// Discovers the DHCP services behind the agent and fetches their
    /// configuration once, so an agent that cannot be monitored is rejected
    /// here rather than on every scrape.
    ///
    /// # Errors
    ///
    /// `TargetConstruction` when the client identity cannot be loaded, no DHCP
    /// service is configured behind the agent, or the first configuration
    /// fetch fails.
    pub async fn connect(url: impl Into<String>, config: &ClientConfig) -> ClientResult<Self> {
        let url = url.into();
        let client = build_http_client(&url, config)?;

        let mut http = Self {
            url,
            client,
            services: Vec::new(),
        };

        http.services = http
            .discover_services()
            .await
            .map_err(|e| ClientError::target_construction(&http.url, e.to_string()))?;

        if http.services.is_empty() {
            return Err(ClientError::target_construction(
                &http.url,
                "no DHCP service configured behind the control agent",
            ));
        }

        let configurations = http
            .fetch_configuration()
            .await
            .map_err(|e| ClientError::target_construction(&http.url, e.to_string()))?;

        info!(
            endpoint = %http.url,
            services = ?http.services,
            daemons = configurations.len(),
            "Connected to Kea control agent"
        );
        Ok(http)
    }

    /// DHCP services monitored through this agent, in request order
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// POST a command and parse the per-service response list
    async fn send_command(&self, request: &CommandRequest) -> ClientResult<Vec<CommandResponse>> {
        debug!(endpoint = %self.url, command = %request.command, "POST");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(CommandResponse::parse_list(body)?)
    }

    /// Ask the agent which services it forwards to
    async fn discover_services(&self) -> ClientResult<Vec<String>> {
        let responses = self.send_command(&CommandRequest::new(CONFIG_GET)).await?;
        let response = responses
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::malformed(&self.url, "empty config-get response"))?;

        let arguments = response.into_arguments(&self.url, CONFIG_GET)?;
        let sockets = arguments
            .pointer("/Control-agent/control-sockets")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                ClientError::malformed(&self.url, "no Control-agent.control-sockets in config-get")
            })?;

        Ok(select_dhcp_services(sockets.keys()))
    }

    /// Send a service-scoped command and check the response count
    async fn send_to_services(
        &self,
        request: CommandRequest,
    ) -> ClientResult<Vec<CommandResponse>> {
        let command = request.command.clone();
        let responses = self
            .send_command(&request.with_services(&self.services))
            .await?;

        if responses.len() != self.services.len() {
            return Err(ClientError::malformed(
                &self.url,
                format!(
                    "{} answered with {} elements for {} services",
                    command,
                    responses.len(),
                    self.services.len()
                ),
            ));
        }
        Ok(responses)
    }

    async fn load_configuration(&self) -> ClientResult<Vec<ServerConfiguration>> {
        let responses = self
            .send_to_services(CommandRequest::new(CONFIG_GET))
            .await?;

        responses
            .into_iter()
            .zip(&self.services)
            .map(|(response, service)| -> ClientResult<ServerConfiguration> {
                let arguments = response.into_arguments(&self.url, CONFIG_GET)?;
                ServerConfiguration::from_arguments(arguments)?.ok_or_else(|| {
                    ClientError::UnsupportedConfiguration {
                        target: format!("{} (service {})", self.url, service),
                    }
                })
            })
            .collect()
    }

    async fn load_statistics(&self) -> ClientResult<Vec<RawStatistics>> {
        let responses = self
            .send_to_services(CommandRequest::new(STATISTIC_GET_ALL).with_arguments(json!({})))
            .await?;

        responses
            .into_iter()
            .map(|response| -> ClientResult<RawStatistics> {
                let arguments = response.into_arguments(&self.url, STATISTIC_GET_ALL)?;
                Ok(RawStatistics::from_arguments(arguments)?)
            })
            .collect()
    }
}

#[async_trait]
impl TargetClient for HttpClient {
    fn target(&self) -> &str {
        &self.url
    }

    async fn fetch_configuration(&self) -> ClientResult<Vec<ServerConfiguration>> {
        self.load_configuration()
            .await
            .map_err(|e| e.into_config_unavailable(&self.url))
    }

    async fn fetch_statistics(&self) -> ClientResult<Vec<RawStatistics>> {
        self.load_statistics()
            .await
            .map_err(|e| e.into_stats_unavailable(&self.url))
    }
}

/// Keep the control sockets that lead to DHCP daemons
///
/// The agent may also front `d2` (DDNS), which exposes no DHCP statistics.
pub fn select_dhcp_services<'a>(names: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| name.contains("dhcp"))
        .cloned()
        .collect()
}

fn build_http_client(url: &str, config: &ClientConfig) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(config.timeout);

    if let Some(identity) = &config.identity {
        let identity = load_identity(identity).map_err(|e| {
            ClientError::target_construction(url, format!("cannot load client identity: {}", e))
        })?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| ClientError::target_construction(url, e.to_string()))
}

fn load_identity(identity: &ClientIdentity) -> ClientResult<reqwest::Identity> {
    let mut pem = std::fs::read(&identity.cert)?;
    pem.push(b'\n');
    pem.extend(std::fs::read(&identity.key)?);
    Ok(reqwest::Identity::from_pem(&pem)?)
}
