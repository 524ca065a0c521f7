use crate::types::SourceKind;

/// Errors surfaced by the pipeline itself.
///
/// Provider-level faults never show up here: they are converted to
/// [`FetchFailed`](crate::types::FetchFailed) warnings at the adapter boundary.
#[derive(Debug, thiserror::Error)]
pub enum PickupError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl PickupError {
    pub fn code_str(&self) -> &'static str {
        match self {
            PickupError::InvalidQuery(_) => "invalid_query",
            PickupError::MissingCredential(_) => "missing_credential",
            PickupError::InvalidConfig(_) => "invalid_config",
            PickupError::Cancelled => "cancelled",
            PickupError::Io(_) | PickupError::Yaml(_) => "config_io",
            PickupError::HttpClient(_) => "internal_error",
        }
    }
}

/// A fault raised by a single provider while fetching.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Api(String),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl AdapterError {
    pub fn code_str(&self) -> &'static str {
        match self {
            AdapterError::Authentication(_) => "auth_failed",
            AdapterError::RateLimited(_) => "rate_limited",
            AdapterError::Api(_) => "upstream_error",
            AdapterError::HttpRequest(_) => "transport_error",
            AdapterError::Decode(_) => "parse_error",
            AdapterError::Timeout(_) => "timeout",
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            AdapterError::Timeout(_) => true,
            AdapterError::HttpRequest(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Human-facing message tagged with the adapter that raised it.
    pub fn describe(&self, adapter: SourceKind) -> String {
        format!("{} error: {}", adapter.display_name(), self)
    }
}

/// A provider timestamp that none of the known layouts accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised date: {raw:?}")]
pub struct DateParseFailure {
    pub raw: String,
}
