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
//! Target construction
//!
//! Every configured address is classified and connected once at startup.
//! A target that cannot be constructed is logged and left out for the rest
//! of the process lifetime; the exporter only refuses to start when none
//! survive.

use kea_client::{
    ClientConfig, ClientError, ClientResult, HttpClient, SocketClient, TargetAddress, TargetClient,
};
use tracing::{error, info};

use crate::error::{ExporterError, ExporterResult};

/// Connect the client for one address
pub async fn connect_target(
    address: &str,
    config: &ClientConfig,
) -> ClientResult<Box<dyn TargetClient>> {
    match TargetAddress::parse(address)? {
        TargetAddress::Http(url) => Ok(Box::new(HttpClient::connect(url, config).await?)),
        TargetAddress::Socket(path) => Ok(Box::new(SocketClient::connect(path, config).await?)),
    }
}

/// Connect every address, skipping the ones that fail
///
/// # Errors
///
/// `NoTargets` when no address could be connected.
pub async fn connect_targets(
    addresses: &[String],
    config: &ClientConfig,
) -> ExporterResult<Vec<Box<dyn TargetClient>>> {
    let mut targets = Vec::with_capacity(addresses.len());

    for address in addresses {
        match connect_target(address, config).await {
            Ok(client) => {
                info!(endpoint = %client.target(), "Monitoring target");
                targets.push(client);
            }
            Err(e @ ClientError::InvalidTarget { .. }) => {
                error!(endpoint = %address, error = %e, "Unable to parse target");
            }
            Err(e) => {
                error!(endpoint = %address, error = %e, "Excluding target");
            }
        }
    }

    if targets.is_empty() {
        return Err(ExporterError::NoTargets {
            attempted: addresses.len(),
        });
    }
    Ok(targets)
}
