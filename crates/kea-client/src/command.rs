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
//! Kea control-channel command envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Command fetching the running configuration
pub const CONFIG_GET: &str = "config-get";

/// Command fetching every statistic
pub const STATISTIC_GET_ALL: &str = "statistic-get-all";

/// Result code signalling success
pub const RESULT_SUCCESS: i64 = 0;

/// Request sent to a control agent or control socket
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandRequest {
    /// Command name
    pub command: String,
    /// Command arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
    /// Services behind a control agent the command is forwarded to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
}

impl CommandRequest {
    /// Create a bare command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            arguments: None,
            service: None,
        }
    }

    /// Attach an arguments object
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Forward the command to the given services
    pub fn with_services(mut self, services: &[String]) -> Self {
        self.service = Some(services.to_vec());
        self
    }
}

/// One response element
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandResponse {
    /// Result code, 0 on success
    pub result: i64,
    /// Human readable status
    #[serde(default)]
    pub text: Option<String>,
    /// Command output
    #[serde(default)]
    pub arguments: Value,
}

impl CommandResponse {
    /// Parse a control agent body
    ///
    /// The agent answers with one element per service, but errors it raises
    /// itself come back as a single bare object.
    pub fn parse_list(body: Value) -> serde_json::Result<Vec<Self>> {
        match body {
            Value::Array(_) => serde_json::from_value(body),
            other => serde_json::from_value(other).map(|response| vec![response]),
        }
    }

    /// Unwrap the arguments of a successful response
    pub fn into_arguments(self, target: &str, command: &str) -> ClientResult<Value> {
        if self.result != RESULT_SUCCESS {
            return Err(ClientError::command_failed(
                target,
                command,
                self.result,
                self.text.unwrap_or_default(),
            ));
        }
        Ok(self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_command_serialization() {
        let json = serde_json::to_value(CommandRequest::new(CONFIG_GET)).unwrap();
        assert_eq!(json, json!({ "command": "config-get" }));
    }

    #[test]
    fn test_service_command_serialization() {
        let services = vec!["dhcp4".to_string(), "dhcp6".to_string()];
        let request = CommandRequest::new(STATISTIC_GET_ALL)
            .with_arguments(json!({}))
            .with_services(&services);

        let json = serde_json::to_value(request).unwrap();
        assert_eq!(
            json,
            json!({
                "command": "statistic-get-all",
                "arguments": {},
                "service": ["dhcp4", "dhcp6"]
            })
        );
    }

    #[test]
    fn test_parse_list_accepts_bare_object() {
        let responses =
            CommandResponse::parse_list(json!({ "result": 1, "text": "unauthorized" })).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].result, 1);
    }

    #[test]
    fn test_failed_response() {
        let response = CommandResponse {
            result: 2,
            text: Some("'statistic-get-all' command not supported".to_string()),
            arguments: Value::Null,
        };

        let err = response
            .into_arguments("http://kea:8000", STATISTIC_GET_ALL)
            .unwrap_err();
        assert!(matches!(err, ClientError::CommandFailed { result: 2, .. }));
    }

    #[test]
    fn test_successful_response() {
        let response: CommandResponse =
            serde_json::from_value(json!({ "result": 0, "arguments": { "Dhcp4": {} } })).unwrap();
        let arguments = response.into_arguments("/run/kea.sock", CONFIG_GET).unwrap();
        assert!(arguments.get("Dhcp4").is_some());
    }
}
