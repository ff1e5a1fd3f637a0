//! Output module
//!
//! Handles the outbound record protocol.
//!
//! # Overview
//!
//! This module provides:
//! - `MessageSink` - Destination for SCHEMA, RECORD and STATE messages
//! - `JsonLinesWriter` - Sink writing one JSON message per line
//! - `Catalog` - Stream descriptions printed by discovery

mod catalog;
mod writer;

pub use catalog::{Catalog, CatalogEntry};
pub use writer::{JsonLinesWriter, MessageSink};
