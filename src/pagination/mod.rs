//! Pagination module
//!
//! The API paginates with `limit` and a 1-based `page` argument. Only the
//! root boards query (without an allow-list) and the per-board items query
//! paginate; every other stream is fetched whole per parent.

mod policy;
mod types;

pub use policy::PagePolicy;
pub use types::{NextPage, PageToken, PaginationState};
