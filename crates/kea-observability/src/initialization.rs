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
//! Logging initialization and setup.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialize tracing with the given format, in debug mode or not.
///
/// Without `debug`, the filter comes from `RUST_LOG` and defaults to `info`.
///
/// # Example
///
/// ```no_run
/// use kea_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, false).unwrap();
/// tracing::info!("Exporter started");
/// ```
pub fn init_tracing(format: LogFormat, debug: bool) -> Result<(), LogError> {
    init_tracing_with_config(LogConfig::new().with_format(format).with_debug(debug))
}

/// Initialize tracing with a detailed configuration.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;
    let registry = Registry::default().with(env_filter);
    let writer = get_writer(&config.output);

    let result = match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(config.include_targets)
                .with_ansi(config.use_color)
                .pretty();

            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).try_init()
            } else {
                registry.with(layer.without_time()).try_init()
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(config.include_targets)
                .with_ansi(config.use_color)
                .compact();

            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).try_init()
            } else {
                registry.with(layer.without_time()).try_init()
            }
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_writer(writer)
                .json()
                .with_target(config.include_targets)
                .with_current_span(false);

            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).try_init()
            } else {
                registry.with(layer.without_time()).try_init()
            }
        }
    };

    result.map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

/// Get the writer for the specified output
fn get_writer(output: &LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

/// Build an environment filter for the given configuration
pub(crate) fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let filter = config.get_effective_level();

    EnvFilter::try_new(&filter).map_err(|e| LogError::InvalidFilter {
        filter: filter.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEBUG_FILTER;

    // The global subscriber can only be installed once per process, so these
    // tests stick to filter construction.

    #[test]
    fn test_debug_filter_parses() {
        assert!(build_env_filter(&LogConfig::new().with_level(DEBUG_FILTER)).is_ok());
    }

    #[test]
    fn test_module_directives_parse() {
        let config = LogConfig::new().with_level("warn,kea_client=trace");
        assert!(build_env_filter(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let err = build_env_filter(&LogConfig::new().with_level("kea_client=loud")).unwrap_err();
        assert!(matches!(err, LogError::InvalidFilter { .. }));
    }
}
