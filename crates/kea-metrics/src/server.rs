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
//! HTTP server for Prometheus metrics endpoint
//!
//! Every `GET /metrics` runs one collection pass over the engine handed in
//! at construction and encodes the result in the text exposition format.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::engine::CollectionEngine;
use crate::exposition::{encode_text, CONTENT_TYPE};
use crate::types::MetricsConfig;

/// HTTP server for Prometheus metrics
#[derive(Debug, Clone)]
pub struct MetricsServer {
    engine: Arc<CollectionEngine>,
    config: MetricsConfig,
}

impl MetricsServer {
    /// Create a new metrics server
    pub fn new(engine: CollectionEngine, config: MetricsConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }

    /// Get the bind address for the server
    pub fn bind_address(&self) -> String {
        self.config.socket_addr()
    }

    /// Routes served by this server
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(Arc::clone(&self.engine))
    }

    /// Bind the configured address and serve until the process exits
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        info!("Metrics server listening on http://{}/metrics", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| anyhow::anyhow!("Metrics server error: {}", e))
    }
}

/// Handler for `/metrics` endpoint
async fn metrics_handler(State(engine): State<Arc<CollectionEngine>>) -> Response {
    let families = engine.collect().await;

    match encode_text(&families) {
        Ok(body) => {
            debug!("Successfully encoded {} metric families", families.len());
            (StatusCode::OK, [("content-type", CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Handler for `/health` endpoint
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
