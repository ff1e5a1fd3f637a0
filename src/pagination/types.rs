//! Pagination types
//!
//! Page tokens and the running state of one paginated fetch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based page number sent as the `page` query variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(u32);

impl PageToken {
    /// The first page
    pub const FIRST: PageToken = PageToken(1);

    /// Create a token for a page number; page 0 is clamped to the first page
    pub fn new(page: u32) -> Self {
        Self(page.max(1))
    }

    /// The page number
    pub fn number(self) -> u32 {
        self.0
    }

    /// The following page
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for PageToken {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this page next
    Continue(PageToken),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// The token to fetch next, if any
    pub fn token(self) -> Option<PageToken> {
        match self {
            Self::Continue(token) => Some(token),
            Self::Done => None,
        }
    }
}

impl From<Option<PageToken>> for NextPage {
    fn from(token: Option<PageToken>) -> Self {
        token.map_or(Self::Done, Self::Continue)
    }
}

/// Tracks pagination state during one stream fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Page of the request about to be sent (`None` for unpaginated streams)
    pub page: Option<PageToken>,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create state starting at the given page
    pub fn starting_at(page: Option<PageToken>) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Record one fetched page and move to `next`
    pub fn advance(&mut self, records: usize, next: NextPage) {
        self.pages_fetched += 1;
        self.total_fetched += records as u64;
        match next {
            NextPage::Continue(token) => self.page = Some(token),
            NextPage::Done => self.done = true,
        }
    }
}
