use crate::error::FetchError;
use crate::models::FetchDataResponse;

pub mod extractor_client;
pub use extractor_client::{fetch_data, ExtractorClient};

/// Environment variable holding the extractor API key
pub const API_KEY_VAR: &str = "NEXT_PUBLIC_API_KEY";

/// Source of the API key, consulted once per request
#[cfg_attr(test, mockall::automock)]
pub trait ApiKeyProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvApiKeyProvider;

impl ApiKeyProvider for EnvApiKeyProvider {
    fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_VAR).ok()
    }
}

/// Fixed key, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticApiKeyProvider(pub Option<String>);

impl StaticApiKeyProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl ApiKeyProvider for StaticApiKeyProvider {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Common trait for yearly data sources
#[async_trait::async_trait]
pub trait ExtractorApi {
    async fn fetch_data(&self, year: &str) -> Result<FetchDataResponse, FetchError>;
}
