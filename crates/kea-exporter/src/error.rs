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
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid configuration value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("No targets configured")]
    MissingTargets,

    #[error("None of the {attempted} configured targets could be reached")]
    NoTargets { attempted: usize },
}

impl ExporterError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ExporterError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type ExporterResult<T> = Result<T, ExporterError>;
