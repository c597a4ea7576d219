use std::fmt;
use thiserror::Error;

/// Prefix carried by every error surfaced from a fetch
pub const FAILURE_PREFIX: &str = "Falha na requisição: ";

/// Reason used when a payload fails the shape check
pub const INVALID_PAYLOAD_REASON: &str = "Resposta da API sem dados ou em formato inválido";

/// Reason used when the API key is missing or empty
pub const MISSING_API_KEY_REASON: &str = "Configuração de API Key ausente no frontend.";

/// Reason used for failures that match no other kind
pub const UNKNOWN_REASON: &str = "Erro desconhecido";

/// Where a fetch failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// API key missing, empty or unusable as a header value
    Configuration,
    /// Connection failure, timeout or a status other than 200
    Transport,
    /// Body was not a non-empty object of record arrays
    Shape,
    Unknown,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Configuration => "configuration",
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Shape => "shape",
            FetchErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The only error a fetch ever returns.
///
/// Displays as `Falha na requisição: <reason>`; the kind is kept alongside so
/// callers don't have to parse the message to branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", FAILURE_PREFIX, .reason)]
pub struct FetchError {
    kind: FetchErrorKind,
    reason: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Configuration, reason)
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Transport, reason)
    }

    pub fn invalid_payload() -> Self {
        Self::new(FetchErrorKind::Shape, INVALID_PAYLOAD_REASON)
    }

    pub fn unknown() -> Self {
        Self::new(FetchErrorKind::Unknown, UNKNOWN_REASON)
    }

    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    /// Derived reason, without the prefix
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
