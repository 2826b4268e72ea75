// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Query is empty after normalization")]
    EmptyQuery,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited by search service: {0}")]
    RateLimit(String),

    #[error("No results found for \"{0}\"")]
    NoResults(String),

    #[error("Question {0} could not be found")]
    NotFound(u64),

    /// Total lookup budget, in milliseconds.
    #[error("Lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("No answers to rank")]
    EmptyInput,

    #[error("Search service error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl LookupError {
    /// Stable name of the failure, used for the one-line CLI error report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "EmptyQueryError",
            Self::Network(_) => "NetworkError",
            Self::RateLimit(_) => "RateLimitError",
            Self::NoResults(_) => "NoResultsError",
            Self::NotFound(_) => "NotFoundError",
            Self::Timeout(_) => "TimeoutError",
            Self::EmptyInput => "EmptyInputError",
            Self::Api { .. } => "ApiError",
            Self::Config(_) => "ConfigError",
            Self::Validation(_) => "ValidationError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
        }
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
