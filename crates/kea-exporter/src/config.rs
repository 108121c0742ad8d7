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
//! Exporter configuration
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, then command line flags and their environment
//! variables.
//!
//! ```toml
//! address = "127.0.0.1"
//! port = 9547
//! timeout = 5
//! log_format = "json"
//! targets = ["/run/kea/kea4-ctrl-socket", "https://kea-ca.example.net:8000/"]
//! client_cert = "/etc/kea-exporter/client.pem"
//! client_key = "/etc/kea-exporter/client.key"
//! ```

use kea_client::ClientConfig;
use kea_metrics::types::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT};
use kea_metrics::MetricsConfig;
use kea_observability::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::cli::Cli;
use crate::error::{ExporterError, ExporterResult};

fn default_timeout() -> u64 {
    kea_client::DEFAULT_TIMEOUT.as_secs()
}

/// Complete exporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterConfig {
    /// Address the metrics endpoint binds to
    pub address: String,

    /// Port the metrics endpoint binds to
    pub port: u16,

    /// Verbose logging
    pub debug: bool,

    /// Log output format
    pub log_format: LogFormat,

    /// Per-command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Client certificate presented to control agents
    pub client_cert: Option<PathBuf>,

    /// Key of the client certificate
    pub client_key: Option<PathBuf>,

    /// Control agent URLs and control socket paths
    pub targets: Vec<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            debug: false,
            log_format: LogFormat::default(),
            timeout: default_timeout(),
            client_cert: None,
            client_key: None,
            targets: Vec::new(),
        }
    }
}

impl ExporterConfig {
    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> ExporterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExporterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded configuration file: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> ExporterResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the configuration for a command line: defaults, then the file
    /// named by `--config`, then the flags that were given
    pub fn resolve(cli: &Cli) -> ExporterResult<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Override fields with the flags present on the command line
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(address) = &cli.address {
            self.address = address.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if cli.debug {
            self.debug = true;
        }
        if let Some(format) = cli.log_format {
            self.log_format = format;
        }
        if let Some(timeout) = cli.timeout {
            self.timeout = timeout;
        }
        if let Some(cert) = &cli.client_cert {
            self.client_cert = Some(cert.clone());
        }
        if let Some(key) = &cli.client_key {
            self.client_key = Some(key.clone());
        }
        if !cli.targets.is_empty() {
            self.targets = cli.targets.clone();
        }
    }

    /// Check the configuration can be acted on
    pub fn validate(&self) -> ExporterResult<()> {
        if self.targets.iter().all(|t| t.trim().is_empty()) {
            return Err(ExporterError::MissingTargets);
        }
        if self.timeout == 0 {
            return Err(ExporterError::invalid_value("timeout", "must be at least one second"));
        }

        match (&self.client_cert, &self.client_key) {
            (Some(_), None) => {
                return Err(ExporterError::invalid_value(
                    "client_key",
                    "required when client_cert is set",
                ))
            }
            (None, Some(_)) => {
                return Err(ExporterError::invalid_value(
                    "client_cert",
                    "required when client_key is set",
                ))
            }
            _ => {}
        }

        for (field, path) in [
            ("client_cert", &self.client_cert),
            ("client_key", &self.client_key),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    return Err(ExporterError::invalid_value(
                        field,
                        format!("{} does not exist", path.display()),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Settings shared by every target client
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(self.timeout));
        match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => config.with_identity(cert, key),
            _ => config,
        }
    }

    /// Metrics endpoint settings
    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig::with_port(self.port).with_bind_address(&self.address)
    }

    /// Logging settings
    pub fn log_config(&self) -> LogConfig {
        LogConfig::new()
            .with_format(self.log_format)
            .with_debug(self.debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kea-exporter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::default();
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 9547);
        assert_eq!(config.timeout, 10);
        assert!(!config.debug);
        assert!(matches!(config.validate(), Err(ExporterError::MissingTargets)));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExporterConfig::from_toml_str(
            r#"
            port = 9100
            targets = ["/run/kea/kea4-ctrl-socket"]
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.timeout, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(ExporterConfig::from_toml_str("prot = 9100").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            address = "127.0.0.1"
            port = 9100
            log_format = "json"
            targets = ["/run/kea/kea4-ctrl-socket"]
            "#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let args = cli(&["-c", path, "-p", "9200", "http://kea-ca:8000/"]);
        let config = ExporterConfig::resolve(&args).unwrap();

        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 9200);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.targets, vec!["http://kea-ca:8000/"]);
    }

    #[test]
    fn test_missing_config_file() {
        let err = ExporterConfig::load("/nonexistent/kea-exporter.toml").unwrap_err();
        assert!(matches!(err, ExporterError::ConfigRead { .. }));
    }

    #[test]
    fn test_certificate_requires_key() {
        let cert = NamedTempFile::new().unwrap();
        let config = ExporterConfig {
            targets: vec!["https://kea-ca:8000/".to_string()],
            client_cert: Some(cert.path().to_path_buf()),
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_key"));
    }

    #[test]
    fn test_certificate_paths_must_exist() {
        let cert = NamedTempFile::new().unwrap();
        let config = ExporterConfig {
            targets: vec!["https://kea-ca:8000/".to_string()],
            client_cert: Some(cert.path().to_path_buf()),
            client_key: Some(PathBuf::from("/nonexistent/client.key")),
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/client.key"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ExporterConfig {
            targets: vec!["/run/kea/kea4-ctrl-socket".to_string()],
            timeout: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_settings() {
        let config = ExporterConfig {
            address: "::".to_string(),
            port: 9547,
            timeout: 3,
            debug: true,
            ..Default::default()
        };

        assert_eq!(config.metrics_config().socket_addr(), "[::]:9547");
        assert_eq!(config.client_config().timeout, Duration::from_secs(3));
        assert!(config.client_config().identity.is_none());
        assert!(config.log_config().level.is_some());
    }
}
