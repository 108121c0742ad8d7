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
use anyhow::{Context, Result};
use clap::Parser;
use kea_exporter::{connect_targets, Cli, ExporterConfig};
use kea_metrics::{CollectionEngine, MetricTable, MetricsServer};
use kea_observability::init_tracing_with_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ExporterConfig::resolve(&cli).context("Failed to load configuration")?;
    init_tracing_with_config(config.log_config()).context("Failed to initialize logging")?;
    config.validate().context("Invalid configuration")?;

    let table = MetricTable::kea().context("Invalid metric table")?;
    let targets = connect_targets(&config.targets, &config.client_config()).await?;
    tracing::info!("Monitoring {} of {} targets", targets.len(), config.targets.len());

    let engine = CollectionEngine::new(targets, table);
    let server = MetricsServer::new(engine, config.metrics_config());
    tracing::info!("Listening on http://{}", server.bind_address());

    server.serve().await
}
