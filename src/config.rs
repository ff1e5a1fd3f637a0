//! Tap configuration
//!
//! The configuration is a flat JSON (or YAML) object. Only `auth_token` is
//! required; everything else has a default. When the token is absent from
//! the file, it is taken from the `MONDAY_API_KEY` environment variable.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when the config carries no token
pub const AUTH_TOKEN_ENV: &str = "MONDAY_API_KEY";

/// Default GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

// ============================================================================
// Board ID allow-list
// ============================================================================

/// Explicit board allow-list as it appears in the config
///
/// Accepts a single integer, a list of integers, or a comma-separated
/// string with optional whitespace around each id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardIds {
    /// `"board_ids": 2580307008`
    Single(i64),
    /// `"board_ids": [2580307008, 1903379862]`
    List(Vec<i64>),
    /// `"board_ids": "2580307008, 1903379862"`
    Text(String),
}

impl BoardIds {
    /// Resolve to the canonical integer list
    pub fn resolve(&self) -> Result<Vec<i64>> {
        match self {
            BoardIds::Single(id) => Ok(vec![*id]),
            BoardIds::List(ids) => Ok(ids.clone()),
            BoardIds::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<i64>().map_err(|e| {
                        Error::invalid_value("board_ids", format!("'{part}' is not an id: {e}"))
                    })
                })
                .collect(),
        }
    }
}

// ============================================================================
// Tap Config
// ============================================================================

/// Complete tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// API token sent in the `Authorization` header
    #[serde(default)]
    pub auth_token: String,

    /// GraphQL endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Boards requested per page
    #[serde(default = "default_board_limit")]
    pub board_limit: u32,

    /// Items requested per page of a board
    #[serde(default = "default_item_limit")]
    pub item_limit: u32,

    /// Optional board allow-list
    #[serde(default)]
    pub board_ids: Option<BoardIds>,

    /// Optional `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Optional `API-Version` header
    #[serde(default)]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts after the first one for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed wait between attempts in seconds
    #[serde(default = "default_retry_wait_secs")]
    pub retry_wait_secs: u64,

    /// Optional client-side request budget
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_board_limit() -> u32 {
    10
}

fn default_item_limit() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_wait_secs() -> u64 {
    70
}

impl TapConfig {
    /// Create a config with the given token and defaults everywhere else
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            api_url: default_api_url(),
            board_limit: default_board_limit(),
            item_limit: default_item_limit(),
            board_ids: None,
            user_agent: None,
            api_version: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_wait_secs: default_retry_wait_secs(),
            requests_per_minute: None,
        }
    }

    /// Parse a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.finish()
    }

    /// Load a config file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            let config: Self = serde_yaml::from_str(&content)?;
            config.finish()
        } else {
            Self::from_json_str(&content)
        }
    }

    fn finish(mut self) -> Result<Self> {
        if self.auth_token.trim().is_empty() {
            if let Ok(token) = std::env::var(AUTH_TOKEN_ENV) {
                self.auth_token = token;
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<()> {
        if self.auth_token.trim().is_empty() {
            return Err(Error::missing_field("auth_token"));
        }

        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.board_limit == 0 {
            return Err(Error::invalid_value("board_limit", "must be at least 1"));
        }
        if self.item_limit == 0 {
            return Err(Error::invalid_value("item_limit", "must be at least 1"));
        }
        if self.requests_per_minute == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_minute",
                "must be at least 1",
            ));
        }

        self.board_ids()?;
        Ok(())
    }

    /// Resolved board allow-list; `None` means "all boards"
    pub fn board_ids(&self) -> Result<Option<Vec<i64>>> {
        match &self.board_ids {
            None => Ok(None),
            Some(ids) => {
                let ids = ids.resolve()?;
                Ok(if ids.is_empty() { None } else { Some(ids) })
            }
        }
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry wait as a duration
    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(self.retry_wait_secs)
    }

    /// Set the API URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the board allow-list
    #[must_use]
    pub fn with_board_ids(mut self, ids: BoardIds) -> Self {
        self.board_ids = Some(ids);
        self
    }

    /// Set the board page size
    #[must_use]
    pub fn with_board_limit(mut self, limit: u32) -> Self {
        self.board_limit = limit;
        self
    }

    /// Set the item page size
    #[must_use]
    pub fn with_item_limit(mut self, limit: u32) -> Self {
        self.item_limit = limit;
        self
    }

    /// Set retry behavior
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, wait_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_wait_secs = wait_secs;
        self
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("auth_token", &"***")
            .field("api_url", &self.api_url)
            .field("board_limit", &self.board_limit)
            .field("item_limit", &self.item_limit)
            .field("board_ids", &self.board_ids)
            .field("api_version", &self.api_version)
            .field("max_retries", &self.max_retries)
            .field("retry_wait_secs", &self.retry_wait_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = TapConfig::from_json_str(r#"{"auth_token": "mytoken"}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.board_limit, 10);
        assert_eq!(config.item_limit, 100);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_wait(), Duration::from_secs(70));
        assert!(config.board_ids().unwrap().is_none());
    }

    #[test_case(r#"{"auth_token": "t"}"#, None ; "absent")]
    #[test_case(r#"{"auth_token": "t", "board_ids": [2580307008, 1903379862]}"#, Some(vec![2580307008, 1903379862]) ; "list")]
    #[test_case(r#"{"auth_token": "t", "board_ids": "2580307008"}"#, Some(vec![2580307008]) ; "single string")]
    #[test_case(r#"{"auth_token": "t", "board_ids": "2580307008,1903379862"}"#, Some(vec![2580307008, 1903379862]) ; "comma string")]
    #[test_case(r#"{"auth_token": "t", "board_ids": "2580307008, 1903379862"}"#, Some(vec![2580307008, 1903379862]) ; "comma string with space")]
    #[test_case(r#"{"auth_token": "t", "board_ids": " 2580307008 ,1903379862 "}"#, Some(vec![2580307008, 1903379862]) ; "padded string")]
    #[test_case(r#"{"auth_token": "t", "board_ids": 2580307008}"#, Some(vec![2580307008]) ; "bare integer")]
    #[test_case(r#"{"auth_token": "t", "board_ids": ""}"#, None ; "empty string")]
    fn test_board_ids_forms(json: &str, expected: Option<Vec<i64>>) {
        let config = TapConfig::from_json_str(json).unwrap();
        assert_eq!(config.board_ids().unwrap(), expected);
    }

    #[test]
    fn test_board_ids_invalid() {
        let err = TapConfig::from_json_str(r#"{"auth_token": "t", "board_ids": "12,abc"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "board_ids"));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err =
            TapConfig::from_json_str(r#"{"auth_token": "t", "board_limit": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "board_limit"));
    }

    #[test]
    fn test_bad_url_rejected() {
        assert!(TapConfig::new("t").with_api_url("not a url").validate().is_err());
        assert!(TapConfig::new("t")
            .with_api_url("ftp://api.monday.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_missing_token() {
        let err = TapConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "auth_token"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "auth_token: yamltoken\nboard_limit: 25\nboard_ids: \"1, 2\""
        )
        .unwrap();

        let config = TapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auth_token, "yamltoken");
        assert_eq!(config.board_limit, 25);
        assert_eq!(config.board_ids().unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_debug_masks_token() {
        let debug = format!("{:?}", TapConfig::new("secret-token"));
        assert!(!debug.contains("secret-token"));
    }
}
