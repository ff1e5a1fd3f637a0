//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine walks the stream graph depth first. For one stream in one
//! context it drains every page, emitting records as they are normalized,
//! then fetches each child stream once per record, in record order:
//!
//! ```text
//! boards (all pages)
//!   board 1: groups, items (all pages), columns
//!     item 10: column_values
//!     item 11: column_values
//!   board 2: ...
//! ```
//!
//! One request is in flight at a time. Bookmarks are read once at the
//! start and the new high-watermarks are only proposed once the whole
//! traversal has succeeded.

mod types;

pub use types::{Message, SyncConfig, SyncStats};

use crate::config::TapConfig;
use crate::error::Result;
use crate::http::Transport;
use crate::normalize::normalize;
use crate::output::MessageSink;
use crate::pagination::{PagePolicy, PaginationState};
use crate::parse::parse_response;
use crate::query::build_query;
use crate::state::{compare_replication_values, StateManager};
use crate::streams::{children_of, context_for_child, EntityType, StreamContext, ROOT};
use crate::types::JsonObject;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<T: Transport> {
    /// GraphQL transport
    transport: T,
    /// Tap configuration
    config: TapConfig,
    /// State manager
    state: StateManager,
    /// Sync configuration
    sync: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// Bookmarks as they stood when the run started
    start_bookmarks: BTreeMap<EntityType, String>,
    /// Largest replication-key value seen this run
    max_seen: BTreeMap<EntityType, String>,
}

impl<T: Transport> SyncEngine<T> {
    /// Create a new sync engine
    pub fn new(transport: T, config: TapConfig, state: StateManager) -> Self {
        Self {
            transport,
            config,
            state,
            sync: SyncConfig::default(),
            stats: SyncStats::default(),
            start_bookmarks: BTreeMap::new(),
            max_seen: BTreeMap::new(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_sync_config(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run a full extraction, sending every message to `sink`
    pub async fn run(&mut self, sink: &mut dyn MessageSink) -> Result<SyncStats> {
        let start = Instant::now();
        self.stats = SyncStats::default();
        self.max_seen.clear();
        self.load_bookmarks().await;

        let streams = self.sync.selection.streams();
        info!(
            streams = ?streams.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "starting sync"
        );

        for entity in &streams {
            sink.emit(Message::schema(entity.def()))?;
        }

        if self.sync.selection.needs_fetch(ROOT) {
            self.sync_stream(ROOT, StreamContext::root(), &mut *sink)
                .await?;
        }

        self.commit_bookmarks().await?;
        sink.emit(Message::state(self.state.to_value().await?))?;
        sink.flush()?;

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = self.stats.records_synced(),
            skipped = self.stats.records_skipped,
            requests = self.stats.requests,
            duration_ms = self.stats.duration_ms,
            "sync complete"
        );

        Ok(self.stats.clone())
    }

    async fn load_bookmarks(&mut self) {
        self.start_bookmarks.clear();
        if self.sync.ignore_bookmarks {
            return;
        }

        for entity in EntityType::ALL {
            if entity.def().replication_key.is_none() {
                continue;
            }
            if let Some(value) = self.state.get_bookmark(entity.name()).await {
                debug!(stream = entity.name(), bookmark = %value, "resuming from bookmark");
                self.start_bookmarks.insert(entity, value);
            }
        }
    }

    async fn commit_bookmarks(&mut self) -> Result<()> {
        for (entity, value) in &self.max_seen {
            let Some(key) = entity.def().replication_key else {
                continue;
            };
            self.state
                .advance_bookmark(entity.name(), key, value)
                .await?;
        }
        Ok(())
    }

    /// Drain every page of `entity` in `context`, then descend into the
    /// children of each record
    fn sync_stream<'a, S: MessageSink + ?Sized>(
        &'a mut self,
        entity: EntityType,
        context: StreamContext,
        sink: &'a mut S,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let policy = PagePolicy::for_stream(entity, &self.config)?;
            let selected = self.sync.selection.is_selected(entity);
            let children: Vec<EntityType> = children_of(entity)
                .iter()
                .copied()
                .filter(|child| self.sync.selection.needs_fetch(*child))
                .collect();

            let mut pagination = PaginationState::starting_at(policy.first_page());
            let mut child_contexts = Vec::new();

            while !pagination.done {
                let page = pagination.page;
                let request = build_query(entity, &context, page, &self.config)?;
                debug!(
                    stream = entity.name(),
                    %context,
                    page = page.map(|p| p.number()),
                    "fetching"
                );

                let body = self.transport.execute(&request).await?;
                self.stats.add_request();

                let next = policy.next_page_from_response(&body, page)?;
                let mut count = 0;
                for raw in parse_response(entity, body)? {
                    let record = normalize(entity, raw?, &context)?;
                    count += 1;

                    if !children.is_empty() {
                        child_contexts.push(context_for_child(entity, &context, &record)?);
                    }
                    if selected {
                        self.emit_record(entity, record, &mut *sink)?;
                    }
                }

                debug!(stream = entity.name(), %context, records = count, "page done");
                pagination.advance(count, next);
            }

            for child_context in child_contexts {
                for child in &children {
                    self.stats.add_context();
                    self.sync_stream(*child, child_context, &mut *sink).await?;
                }
            }

            Ok(())
        }
        .boxed_local()
    }

    fn emit_record<S: MessageSink + ?Sized>(
        &mut self,
        entity: EntityType,
        record: JsonObject,
        sink: &mut S,
    ) -> Result<()> {
        if let Some(key) = entity.def().replication_key {
            if let Some(value) = record.get(key).and_then(|v| v.as_str()) {
                if let Some(bookmark) = self.start_bookmarks.get(&entity) {
                    if compare_replication_values(value, bookmark) == Ordering::Less {
                        self.stats.add_skipped();
                        return Ok(());
                    }
                }

                let is_new_max = self
                    .max_seen
                    .get(&entity)
                    .map_or(true, |max| compare_replication_values(value, max) == Ordering::Greater);
                if is_new_max {
                    self.max_seen.insert(entity, value.to_string());
                }
            }
        }

        self.stats.add_record(entity);
        sink.emit(Message::record(entity.name(), record))
    }
}

impl<T: Transport> std::fmt::Debug for SyncEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("sync", &self.sync)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
