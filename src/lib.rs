//! Client for the grapi extractor backend.
//!
//! Fetches the per-category records for a year, checks that the payload is a
//! non-empty object of record lists and reports every failure as a single
//! [`FetchError`] prefixed with `Falha na requisição: `.

pub mod api;
pub mod error;
pub mod models;

pub use api::{fetch_data, ApiKeyProvider, EnvApiKeyProvider, ExtractorApi, ExtractorClient, StaticApiKeyProvider};
pub use error::{FetchError, FetchErrorKind};
pub use models::{ApiDataStructure, Config, FetchDataResponse};
