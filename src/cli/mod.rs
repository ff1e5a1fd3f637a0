//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `check` - Test the token against the API
//! - `discover` - Print the stream catalog
//! - `read` - Extract records, emitting SCHEMA, RECORD and STATE messages
//! - `streams` - List stream names

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
