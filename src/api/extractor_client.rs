use anyhow::Result;
use reqwest::header::HeaderValue;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use url::Url;

use crate::error::{FetchError, MISSING_API_KEY_REASON};
use crate::models::{ApiDataStructure, Config, FetchDataResponse};
use super::{ApiKeyProvider, EnvApiKeyProvider, ExtractorApi, API_KEY_VAR};

const EXTRACTOR_PATH: &str = "extractor";
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the yearly extractor endpoint.
///
/// Holds no per-call state: the API key is fetched from the provider on every
/// request and each call owns its own request and response.
pub struct ExtractorClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    api_keys: Arc<dyn ApiKeyProvider>,
}

impl ExtractorClient {
    /// Create a new extractor client
    pub fn new<P>(config: &Config, api_keys: P) -> Result<Self>
    where
        P: ApiKeyProvider + 'static,
    {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint: extractor_endpoint(&config.base_url)?,
            timeout: config.timeout,
            api_keys: Arc::new(api_keys),
        })
    }

    /// Client configured from the environment, reading the key from `NEXT_PUBLIC_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env(), EnvApiKeyProvider)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the category data for one year.
    ///
    /// Only a 200 response carrying a non-empty JSON object counts as
    /// success. Every failure comes back as a [`FetchError`] whose message
    /// starts with `Falha na requisição: `.
    pub async fn fetch_data(&self, year: &str) -> Result<FetchDataResponse, FetchError> {
        self.try_fetch(year).await.map_err(|err| {
            error!(year, kind = %err.kind(), "Erro em fetchData: {}", err.reason());
            err
        })
    }

    async fn try_fetch(&self, year: &str) -> Result<FetchDataResponse, FetchError> {
        let api_key = self
            .api_keys
            .api_key()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                error!("API key not found in environment ({})", API_KEY_VAR);
                FetchError::configuration(MISSING_API_KEY_REASON)
            })?;

        let key_header = HeaderValue::from_str(&api_key).map_err(|e| {
            error!(error = %e, "API key cannot be sent as a header value");
            FetchError::configuration("API Key contém caracteres inválidos para um cabeçalho HTTP")
        })?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("year", year);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key_header)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(rejected_status(response).await);
        }

        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        Ok(FetchDataResponse {
            status: status.as_u16(),
            status_text,
            headers,
            url: final_url,
            data: validate_payload(parse_body(&body))?,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> FetchError {
        error!(error = ?err, "HTTP request to extractor failed");

        if err.is_builder() {
            FetchError::unknown()
        } else if err.is_timeout() {
            FetchError::transport(format!("timeout of {}ms exceeded", self.timeout.as_millis()))
        } else {
            FetchError::transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl ExtractorApi for ExtractorClient {
    async fn fetch_data(&self, year: &str) -> Result<FetchDataResponse, FetchError> {
        ExtractorClient::fetch_data(self, year).await
    }
}

/// One-shot fetch using configuration and key from the environment
pub async fn fetch_data(year: &str) -> Result<FetchDataResponse, FetchError> {
    let client = ExtractorClient::from_env().map_err(|e| {
        error!(error = %e, "Failed to build extractor client");
        FetchError::unknown()
    })?;

    client.fetch_data(year).await
}

fn extractor_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(EXTRACTOR_PATH)?)
}

/// Error for a response whose status isn't 200, preferring the backend's `error` field
async fn rejected_status(response: Response) -> FetchError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let reason = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|payload| payload.get("error").and_then(backend_error_reason))
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

    error!(status = status.as_u16(), body = %body, "Extractor rejected the request");
    FetchError::transport(reason)
}

/// Non-JSON bodies are kept as a plain string so they fail the shape check
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Text of a backend `error` field; null, false, zero and empty strings don't count
fn backend_error_reason(field: &Value) -> Option<String> {
    match field {
        Value::Null | Value::Bool(false) => None,
        Value::String(msg) if msg.is_empty() => None,
        Value::String(msg) => Some(msg.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Accepts any object with at least one key; values are carried through untouched
fn validate_payload(payload: Value) -> Result<ApiDataStructure, FetchError> {
    match payload {
        Value::Object(categories) if !categories.is_empty() => Ok(categories),
        other => {
            error!(payload = %other, "Invalid or empty data received from API");
            Err(FetchError::invalid_payload())
        }
    }
}
