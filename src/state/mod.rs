//! State management module
//!
//! Tracks the replication-key high-watermark of each incremental stream
//! between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Per-stream bookmarks in the Singer layout
//! - `StateManager` - Shared, optionally file-backed access to the state
//!
//! Bookmarks only move forward, and are only proposed once a run has
//! completed.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{compare_replication_values, Bookmark, State};
