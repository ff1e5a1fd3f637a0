//! GraphQL transport with retry and rate limiting
//!
//! Every query is a POST of `{"query", "variables"}` to one endpoint. The
//! client handles:
//! - Fixed-interval retries on whatever [`Error::is_retryable`] accepts:
//!   429, 5xx, timeouts and connection errors
//! - Optional client-side rate limiting
//! - Surfacing GraphQL `errors` carried by a 200 response

use super::rate_limit::RateLimiter;
use super::Transport;
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::parse::check_errors;
use crate::query::GraphQlRequest;
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const API_VERSION: &str = "api-version";

/// HTTP client for the monday.com GraphQL endpoint
pub struct GraphQlClient {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
    timeout: Duration,
    max_retries: u32,
    retry_wait: Duration,
    rate_limiter: Option<RateLimiter>,
}

impl GraphQlClient {
    /// Build a client from validated config
    pub fn from_config(config: &TapConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.api_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("auth_token", &config.auth_token)?);
        if let Some(version) = &config.api_version {
            headers.insert(API_VERSION, header_value("api_version", version)?);
        }
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("solidafy-monday/{}", env!("CARGO_PKG_VERSION")));
        headers.insert(USER_AGENT, header_value("user_agent", &user_agent)?);

        let rate_limiter = config
            .requests_per_minute
            .map(RateLimiter::per_minute)
            .transpose()?;

        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            endpoint,
            headers,
            timeout: config.request_timeout(),
            max_retries: config.max_retries,
            retry_wait: config.retry_wait(),
            rate_limiter,
        })
    }

    /// Endpoint every query is posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Post one request, retrying transient failures
    pub async fn post(&self, request: &GraphQlRequest) -> Result<JsonValue> {
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let err = match self.attempt(request).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt >= self.max_retries {
                return Err(self.exhausted(err, attempt + 1));
            }
            attempt += 1;

            warn!(
                attempt,
                max_retries = self.max_retries,
                error = %err,
                "retrying in {:?}",
                self.retry_wait
            );
            tokio::time::sleep(self.retry_wait).await;
        }
    }

    /// One round trip
    async fn attempt(&self, request: &GraphQlRequest) -> Result<JsonValue> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body: JsonValue = serde_json::from_str(&text)?;
        check_errors(&body)?;

        debug!(status = status.as_u16(), bytes = text.len(), "query succeeded");
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }

    /// Final error once every attempt failed with a retryable error
    fn exhausted(&self, last: Error, attempts: u32) -> Error {
        match last {
            Error::HttpStatus { status, .. } if status == StatusCode::TOO_MANY_REQUESTS.as_u16() => {
                Error::RateLimited { attempts }
            }
            last => Error::MaxRetriesExceeded {
                max_retries: self.max_retries,
                last: Box::new(last),
            },
        }
    }
}

#[async_trait]
impl Transport for GraphQlClient {
    async fn execute(&self, request: &GraphQlRequest) -> Result<JsonValue> {
        self.post(request).await
    }
}

impl std::fmt::Debug for GraphQlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_retries", &self.max_retries)
            .field("retry_wait", &self.retry_wait)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_value(field, "is not a valid header value"))?;
    if field == "auth_token" {
        header.set_sensitive(true);
    }
    Ok(header)
}
