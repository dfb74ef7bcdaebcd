//! Application configuration.
//!
//! Values come from command-line flags first, then the `QUERYBOX_*`
//! environment variables (both handled by clap), then defaults. The log
//! filter also falls back to `RUST_LOG` before its default.

use std::path::PathBuf;

use querybox_infrastructure::TransportConfig;

use crate::cli::Cli;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default log filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

const VERBOSE_LOG_FILTER: &str = "debug";
const DATA_DIR_NAME: &str = "querybox";
const RUST_LOG_ENV: &str = "RUST_LOG";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the persisted workbench
    pub data_dir: PathBuf,
    /// `tracing` filter directive
    pub log_filter: String,
    /// Whole-request timeout
    pub request_timeout_ms: u64,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: TransportConfig::default().user_agent,
        }
    }
}

impl AppConfig {
    /// Fills in defaults for anything the command line left unset.
    ///
    /// `--verbose` wins over any other log filter.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        let log_filter = if cli.verbose {
            VERBOSE_LOG_FILTER.to_string()
        } else {
            cli.log_filter
                .clone()
                .or_else(|| std::env::var(RUST_LOG_ENV).ok())
                .unwrap_or(defaults.log_filter)
        };
        Self {
            data_dir: cli.data_dir.clone().unwrap_or(defaults.data_dir),
            log_filter,
            request_timeout_ms: cli.timeout_ms.unwrap_or(defaults.request_timeout_ms),
            user_agent: defaults.user_agent,
        }
    }

    /// Transport settings derived from this configuration.
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout_ms: self.request_timeout_ms,
            user_agent: self.user_agent.clone(),
            ..TransportConfig::default()
        }
    }
}

/// Platform data directory, or the working directory when there is none.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["querybox"];
        argv.extend_from_slice(args);
        argv.push("tabs");
        AppConfig::from_cli(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["--data-dir", "/tmp/qb", "--log", "warn", "--timeout-ms", "1500"]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/qb"));
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.request_timeout_ms, 1500);
        assert_eq!(config.transport_config().timeout_ms, 1500);
    }

    #[test]
    fn test_verbose_forces_debug() {
        let config = parse(&["--log", "warn", "--verbose"]);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_default_data_dir_ends_with_app_name() {
        assert!(default_data_dir().ends_with("querybox"));
        assert!(AppConfig::default().user_agent.starts_with("QueryBox/"));
    }
}
