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
//! Metrics error types

use thiserror::Error;

/// Result type alias for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors raised while declaring or exporting metrics
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A metric declaration failed validation
    #[error("invalid declaration of metric '{metric}': {reason}")]
    InvalidMetricTable { metric: String, reason: String },

    /// Prometheus rejected a family while encoding
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// Exposition output was not valid UTF-8
    #[error("exposition output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl MetricsError {
    /// Create an InvalidMetricTable error
    pub fn invalid_table(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        MetricsError::InvalidMetricTable {
            metric: metric.into(),
            reason: reason.into(),
        }
    }
}
