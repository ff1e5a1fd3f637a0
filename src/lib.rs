// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy monday.com tap
//!
//! Extracts boards, groups, items, columns and column values from the
//! monday.com GraphQL API and emits them as Singer messages.
//!
//! ## Features
//!
//! - **Stream Graph**: Boards fan out into groups, items and columns; items
//!   fan out into column values
//! - **Page Pagination**: Boards and items page by limit; a short page ends
//!   the stream
//! - **Flat Rows**: Nested owners, workspaces, creators and groups are
//!   flattened into scalar columns with fixed fallbacks
//! - **Incremental Sync**: Boards and items are bookmarked on `updated_at`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_monday::{GraphQlClient, JsonLinesWriter, StateManager, SyncEngine, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> solidafy_monday::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let client = GraphQlClient::from_config(&config)?;
//!
//!     let mut engine = SyncEngine::new(client, config, StateManager::in_memory());
//!     let stats = engine.run(&mut JsonLinesWriter::stdout()).await?;
//!     eprintln!("{} records", stats.records_synced());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SyncEngine                               │
//! │  depth-first over the stream graph, one request in flight       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Query   │ Transport │    Parse      │ Normalize │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ GraphQL  │ POST      │ Envelope      │ Flatten   │ SCHEMA      │
//! │ Variables│ Retry     │ Lazy records  │ Coerce    │ RECORD      │
//! │ Pages    │ Rate Limit│               │ Project   │ STATE       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Stream graph and stream definitions
pub mod streams;

/// GraphQL query construction
pub mod query;

/// Response envelope parsing
pub mod parse;

/// Row normalization
pub mod normalize;

/// Page-number pagination
pub mod pagination;

/// GraphQL transport with retry and rate limiting
pub mod http;

/// Bookmark state
pub mod state;

/// Output protocol and catalog
pub mod output;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{BoardIds, TapConfig};
pub use engine::{Message, SyncConfig, SyncEngine, SyncStats};
pub use error::{Error, Result};
pub use http::{GraphQlClient, Transport};
pub use output::{Catalog, JsonLinesWriter, MessageSink};
pub use state::StateManager;
pub use streams::{EntityType, StreamContext, StreamSelection};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
