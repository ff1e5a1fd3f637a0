//! Page-number policy
//!
//! The API reports no total count, so a page holding exactly `limit`
//! records is taken to mean more may follow. A short or empty page ends
//! the fetch. This costs one extra, empty request when the last page
//! happens to be full.

use super::types::{NextPage, PageToken};
use crate::config::TapConfig;
use crate::error::Result;
use crate::parse;
use crate::streams::EntityType;
use serde_json::Value;

/// Decides whether a stream paginates and which page comes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    stream: EntityType,
    limit: Option<u32>,
}

impl PagePolicy {
    /// Policy for `stream` under `config`
    ///
    /// Boards paginate unless an explicit allow-list is configured; items
    /// paginate within each board. Groups, columns and column values are
    /// fetched in one request per parent.
    pub fn for_stream(stream: EntityType, config: &TapConfig) -> Result<Self> {
        let limit = match stream {
            EntityType::Board if config.board_ids()?.is_none() => Some(config.board_limit),
            EntityType::Item => Some(config.item_limit),
            _ => None,
        };
        Ok(Self { stream, limit })
    }

    /// A paginated policy with an explicit page size
    pub fn paginated(stream: EntityType, limit: u32) -> Self {
        Self {
            stream,
            limit: Some(limit.max(1)),
        }
    }

    /// A policy that always fetches a single page
    pub fn single_page(stream: EntityType) -> Self {
        Self {
            stream,
            limit: None,
        }
    }

    /// Stream this policy applies to
    pub fn stream(&self) -> EntityType {
        self.stream
    }

    /// Page size, if the stream paginates
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Whether the stream paginates
    pub fn is_paginated(&self) -> bool {
        self.limit.is_some()
    }

    /// Token of the first request
    pub fn first_page(&self) -> Option<PageToken> {
        self.limit.map(|_| PageToken::FIRST)
    }

    /// Next page given the token of the page just fetched (`None` meaning
    /// the first page) and how many records it held
    pub fn next_page(&self, previous: Option<PageToken>, records: usize) -> NextPage {
        let Some(limit) = self.limit else {
            return NextPage::Done;
        };

        if records == 0 || records < limit as usize {
            return NextPage::Done;
        }

        NextPage::Continue(previous.unwrap_or(PageToken::FIRST).next())
    }

    /// Same as [`Self::next_page`], counting records straight from a response
    pub fn next_page_from_response(
        &self,
        body: &Value,
        previous: Option<PageToken>,
    ) -> Result<NextPage> {
        let records = parse::count_records(self.stream, body)?;
        Ok(self.next_page(previous, records))
    }
}
