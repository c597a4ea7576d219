use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Production backend serving the extractor endpoint
pub const DEFAULT_BASE_URL: &str = "https://grapi-backend.onrender.com";

/// Whole-request timeout applied when nothing overrides it
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const DEFAULT_USER_AGENT: &str = concat!("grapi-fetcher/", env!("CARGO_PKG_VERSION"));

/// Yearly payload: category name mapped to its records.
///
/// Values are kept exactly as the backend sent them. Categories normally hold
/// a list of records, but nothing here enforces that; typed decoding is left
/// to the caller.
pub type ApiDataStructure = Map<String, Value>;

/// Successful response envelope
#[derive(Debug, Clone)]
pub struct FetchDataResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    /// Final request URL, including the `year` query
    pub url: String,
    pub data: ApiDataStructure,
}

impl FetchDataResponse {
    /// Records of one category, if it holds a list
    pub fn records(&self, category: &str) -> Option<&[Value]> {
        self.data.get(category)?.as_array().map(Vec::as_slice)
    }

    /// Number of records per category, sorted by category name.
    ///
    /// A category holding a single non-list value counts as one record.
    pub fn record_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .data
            .iter()
            .map(|(category, value)| {
                let count = value.as_array().map_or(1, Vec::len);
                (category.as_str(), count)
            })
            .collect();
        counts.sort_by(|a, b| a.0.cmp(b.0));
        counts
    }
}

/// Configuration for the extractor client.
///
/// The API key is deliberately absent: it is looked up on every call
/// through an [`ApiKeyProvider`](crate::api::ApiKeyProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from a single dotenv file without touching the process environment
    pub fn from_env_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let vars: HashMap<String, String> =
            dotenvy::from_path_iter(path.as_ref())?.collect::<Result<_, dotenvy::Error>>()?;

        Ok(Self::from_lookup(|name| vars.get(name).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            base_url: lookup("GRAPI_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: lookup("GRAPI_TIMEOUT_MS")
                .and_then(|ms| ms.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            user_agent: defaults.user_agent,
        }
    }
}
