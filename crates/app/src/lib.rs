//! `QueryBox` - command-line front end for the request workbench
//!
//! The binary parses arguments, resolves [`AppConfig`], initialises
//! logging and runs one [`Command`] against a workbench persisted in the
//! data directory.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Cli, Command};
pub use commands::run;
pub use config::AppConfig;
