//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use querybox_domain::{HttpMethod, ImportStrategy};
use querybox_infrastructure::SnippetLanguage;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "querybox", version, about = "Multi-tab HTTP request workbench")]
pub struct Cli {
    /// Directory holding the persisted workbench
    #[arg(long, global = true, env = "QUERYBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `querybox_application=trace`)
    #[arg(long = "log", global = true, env = "QUERYBOX_LOG")]
    pub log_filter: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long = "timeout-ms", global = true, env = "QUERYBOX_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Shorthand for `--log debug`
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Workbench subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List open tabs
    Tabs,
    /// Open a new tab and make it active
    NewTab {
        /// Request method
        #[arg(short = 'X', long, default_value = "GET", value_parser = parse_method)]
        method: HttpMethod,
        /// Request URL
        url: Option<String>,
    },
    /// Close a tab
    CloseTab {
        /// Tab id
        id: String,
    },
    /// Make a tab active
    SwitchTab {
        /// Tab id
        id: String,
    },
    /// Replace the URL of the active tab
    SetUrl {
        /// New URL, query string included
        url: String,
    },
    /// Add a header to the active tab
    AddHeader {
        /// Header name
        key: String,
        /// Header value
        value: String,
    },
    /// Send a tab's request
    Send {
        /// Tab id, defaults to the active tab
        #[arg(long)]
        tab: Option<String>,
    },
    /// List environments
    Envs,
    /// Create an environment
    EnvCreate {
        /// Environment name
        name: String,
    },
    /// Set a variable in an environment
    EnvSet {
        /// Environment name
        env: String,
        /// Variable name
        key: String,
        /// Variable value
        value: String,
    },
    /// Select the active environment, or `none` to clear it
    EnvUse {
        /// Environment name or `none`
        name: String,
    },
    /// Write every environment to an export file
    ExportEnvs {
        /// Destination file
        file: PathBuf,
    },
    /// Import environments from an export file
    ImportEnvs {
        /// Source file
        file: PathBuf,
        /// How imported environments combine with existing ones
        #[arg(long, value_enum, default_value_t = StrategyArg::Merge)]
        strategy: StrategyArg,
    },
    /// List request history, newest first
    History,
    /// Print a tab's request as a code snippet
    #[command(visible_alias = "curl")]
    Snippet {
        /// Tab id, defaults to the active tab
        #[arg(long)]
        tab: Option<String>,
        /// Snippet language
        #[arg(long, default_value = "curl", value_parser = parse_language)]
        lang: SnippetLanguage,
        /// Keep `{{var}}` placeholders instead of the active environment's values
        #[arg(long)]
        raw: bool,
    },
}

/// Import strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Keep existing environments, skip name conflicts
    Merge,
    /// Discard existing environments
    Replace,
}

impl From<StrategyArg> for ImportStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Merge => Self::Merge,
            StrategyArg::Replace => Self::Replace,
        }
    }
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    s.parse().map_err(|e: querybox_domain::DomainError| e.to_string())
}

fn parse_language(s: &str) -> Result<SnippetLanguage, String> {
    s.parse()
}
