//! Error types for the monday.com tap
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! Errors are grouped by the stage that raises them so the run boundary can
//! report transient transport failures separately from schema drift.

use thiserror::Error;

/// The main error type for the tap
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded: {last}")]
    MaxRetriesExceeded {
        max_retries: u32,
        #[source]
        last: Box<Error>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    #[error("Malformed response for stream '{stream}': {message}")]
    MalformedResponse { stream: String, message: String },

    // ============================================================================
    // Normalization Errors
    // ============================================================================
    #[error("Stream '{stream}' record is missing required field '{field}'")]
    Normalization { stream: String, field: String },

    #[error("Stream '{stream}' field '{field}' has invalid value: {message}")]
    InvalidField {
        stream: String,
        field: String,
        message: String,
    },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    #[error("Stream '{stream}' not found")]
    StreamNotFound { stream: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a GraphQL error
    pub fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQl {
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create a normalization error naming the missing field
    pub fn normalization(stream: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Normalization {
            stream: stream.into(),
            field: field.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(
        stream: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            stream: stream.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Result type alias for the tap
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_field("auth_token");
        assert_eq!(err.to_string(), "Missing required config field: auth_token");

        let err = Error::http_status(401, "Not authenticated");
        assert_eq!(err.to_string(), "HTTP 401: Not authenticated");

        let err = Error::normalization("items", "updated_at");
        assert_eq!(
            err.to_string(),
            "Stream 'items' record is missing required field 'updated_at'"
        );

        let err = Error::malformed("boards", "missing 'data.boards'");
        assert_eq!(
            err.to_string(),
            "Malformed response for stream 'boards': missing 'data.boards'"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited { attempts: 5 }.is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::graphql("Complexity budget exhausted").is_retryable());
        assert!(!Error::malformed("groups", "missing").is_retryable());
        assert!(!Error::normalization("boards", "id").is_retryable());
    }

    #[test]
    fn test_max_retries_keeps_last_error() {
        let err = Error::MaxRetriesExceeded {
            max_retries: 2,
            last: Box::new(Error::http_status(503, "Service Unavailable")),
        };
        assert_eq!(
            err.to_string(),
            "Max retries (2) exceeded: HTTP 503: Service Unavailable"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_retryable());
    }
}
