//! Client-side request pacing
//!
//! Uses the governor crate for token bucket rate limiting. The API meters
//! calls per minute, so the quota is expressed that way too.

use crate::error::{Error, Result};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    requests_per_minute: u32,
}

impl RateLimiter {
    /// Allow `requests_per_minute` requests, all of which may burst at once
    pub fn per_minute(requests_per_minute: u32) -> Result<Self> {
        let rate = NonZeroU32::new(requests_per_minute).ok_or_else(|| {
            Error::invalid_value("requests_per_minute", "must be greater than zero")
        })?;

        Ok(Self {
            limiter: Arc::new(Governor::direct(Quota::per_minute(rate))),
            requests_per_minute,
        })
    }

    /// Configured quota
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish_non_exhaustive()
    }
}
