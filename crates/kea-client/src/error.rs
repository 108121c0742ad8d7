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
//! Client error types

use std::io;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while constructing or querying a monitored target
#[derive(Error, Debug)]
pub enum ClientError {
    /// The target address is neither an HTTP(S) URL nor a filesystem path
    #[error("unable to parse target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The target could not be set up; it is excluded for the process lifetime
    #[error("cannot monitor target {target}: {reason}")]
    TargetConstruction { target: String, reason: String },

    /// Configuration could not be fetched or understood
    #[error("configuration unavailable from {target}: {source}")]
    ConfigUnavailable {
        target: String,
        source: Box<ClientError>,
    },

    /// Statistics could not be fetched or understood
    #[error("statistics unavailable from {target}: {source}")]
    StatsUnavailable {
        target: String,
        source: Box<ClientError>,
    },

    /// The server answered a command with a non-zero result code
    #[error("command '{command}' failed on {target} with result {result}: {text}")]
    CommandFailed {
        target: String,
        command: String,
        result: i64,
        text: String,
    },

    /// The configuration carries neither a `Dhcp4` nor a `Dhcp6` block
    #[error("{target} has no supported configuration (neither Dhcp4 nor Dhcp6)")]
    UnsupportedConfiguration { target: String },

    /// The response parsed as JSON but not in the expected shape
    #[error("malformed response from {target}: {reason}")]
    MalformedResponse { target: String, reason: String },

    /// A command exchange did not complete in time
    #[error("command '{command}' to {target} timed out")]
    Timeout { target: String, command: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket or filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an InvalidTarget error
    pub fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a TargetConstruction error
    pub fn target_construction(target: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::TargetConstruction {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a CommandFailed error
    pub fn command_failed(
        target: impl Into<String>,
        command: impl Into<String>,
        result: i64,
        text: impl Into<String>,
    ) -> Self {
        ClientError::CommandFailed {
            target: target.into(),
            command: command.into(),
            result,
            text: text.into(),
        }
    }

    /// Create a MalformedResponse error
    pub fn malformed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(target: impl Into<String>, command: impl Into<String>) -> Self {
        ClientError::Timeout {
            target: target.into(),
            command: command.into(),
        }
    }

    /// Wrap this error as a configuration failure for `target`
    pub fn into_config_unavailable(self, target: &str) -> Self {
        match self {
            err @ ClientError::ConfigUnavailable { .. } => err,
            other => ClientError::ConfigUnavailable {
                target: target.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Wrap this error as a statistics failure for `target`
    pub fn into_stats_unavailable(self, target: &str) -> Self {
        match self {
            err @ ClientError::StatsUnavailable { .. } => err,
            other => ClientError::StatsUnavailable {
                target: target.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Check if this is a ConfigUnavailable error
    pub fn is_config_unavailable(&self) -> bool {
        matches!(self, ClientError::ConfigUnavailable { .. })
    }

    /// Check if this is a StatsUnavailable error
    pub fn is_stats_unavailable(&self) -> bool {
        matches!(self, ClientError::StatsUnavailable { .. })
    }

    /// Check if this is a TargetConstruction error
    pub fn is_target_construction(&self) -> bool {
        matches!(self, ClientError::TargetConstruction { .. })
    }

    /// Check if the root cause is a timed out exchange
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Timeout { .. } => true,
            ClientError::Http(err) => err.is_timeout(),
            ClientError::ConfigUnavailable { source, .. }
            | ClientError::StatsUnavailable { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Check if the root cause is the operating system refusing access
    pub fn is_permission_denied(&self) -> bool {
        match self {
            ClientError::Io(err) => err.kind() == io::ErrorKind::PermissionDenied,
            ClientError::ConfigUnavailable { source, .. }
            | ClientError::StatsUnavailable { source, .. } => source.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if the root cause is a daemon without DHCP configuration
    pub fn is_unsupported_configuration(&self) -> bool {
        match self {
            ClientError::UnsupportedConfiguration { .. } => true,
            ClientError::ConfigUnavailable { source, .. }
            | ClientError::StatsUnavailable { source, .. } => source.is_unsupported_configuration(),
            _ => false,
        }
    }
}
