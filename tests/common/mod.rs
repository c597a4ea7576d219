//! Common test utilities and helpers

/// Payload fixtures
pub mod fixtures {
    use serde_json::{json, Map, Value};

    /// A valid extractor payload with two categories
    pub fn yearly_payload() -> Value {
        json!({
            "receitas": [
                {"mes": "jan", "valor": 1200.5},
                {"mes": "fev", "valor": 980.0}
            ],
            "despesas": [
                {"mes": "jan", "valor": 300.0}
            ]
        })
    }

    /// Payload tagged with the year it was requested for
    pub fn payload_for_year(year: &str) -> Value {
        let mut payload = Map::new();
        payload.insert(year.to_string(), json!([{ "year": year }]));
        Value::Object(payload)
    }
}

/// Mock extractor backend helpers
pub mod api_mock {
    use grapi_fetcher::{Config, ExtractorClient, StaticApiKeyProvider};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const TEST_API_KEY: &str = "test-key-123";

    /// Default configuration pointed at `base_url`
    pub fn config_for(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            ..Config::default()
        }
    }

    /// Client for the mock server using the test key
    pub fn client_for(server: &MockServer) -> ExtractorClient {
        ExtractorClient::new(&config_for(&server.uri()), StaticApiKeyProvider::new(TEST_API_KEY))
            .expect("Failed to build extractor client")
    }

    /// Client with a shortened timeout
    pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> ExtractorClient {
        let config = Config {
            timeout,
            ..config_for(&server.uri())
        };
        ExtractorClient::new(&config, StaticApiKeyProvider::new(TEST_API_KEY))
            .expect("Failed to build extractor client")
    }

    /// Mount a response for `GET /extractor?year=<year>` that requires the test key
    pub async fn mount_year(server: &MockServer, year: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/extractor"))
            .and(query_param("year", year))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }
}

/// Process environment helpers
pub mod env {
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Hold while a test mutates process environment variables
    pub fn lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets variables for the guard's lifetime and removes them on drop
    pub struct ScopedVars {
        names: Vec<&'static str>,
    }

    impl ScopedVars {
        pub fn set(vars: &[(&'static str, &str)]) -> Self {
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
            Self {
                names: vars.iter().map(|(name, _)| *name).collect(),
            }
        }
    }

    impl Drop for ScopedVars {
        fn drop(&mut self) {
            for name in &self.names {
                std::env::remove_var(name);
            }
        }
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::info;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("grapi_fetcher=debug,test=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }
}
