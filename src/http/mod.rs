//! HTTP transport module
//!
//! Carries GraphQL requests to the API and hands back decoded bodies.
//!
//! # Features
//!
//! - **Fixed-interval Retries**: 429, 5xx, timeouts and connection errors
//!   are retried after a constant wait, up to a configured ceiling
//! - **Rate Limiting**: Optional token bucket limiter using governor
//! - **GraphQL Errors**: A 200 response carrying `errors` fails the request

mod client;
mod rate_limit;

pub use client::GraphQlClient;
pub use rate_limit::RateLimiter;

use crate::error::Result;
use crate::query::GraphQlRequest;
use crate::types::JsonValue;
use async_trait::async_trait;

/// Executes one GraphQL request and returns the decoded response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request; the body is returned only if it carries no
    /// GraphQL errors
    async fn execute(&self, request: &GraphQlRequest) -> Result<JsonValue>;
}

#[cfg(test)]
mod tests;
