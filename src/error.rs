//! Error types for span bookkeeping, sample parsing, and configuration.

use spatio_types::time::Instant;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DynamicError>;

#[derive(Debug, Error)]
pub enum DynamicError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid timestamp '{input}': {source}")]
    InvalidTimestamp {
        input: String,
        #[source]
        source: spatio_types::chrono::ParseError,
    },

    #[error("Span [{start}, {stop}] overlaps an existing span")]
    OverlappingSpan { start: Instant, stop: Instant },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl DynamicError {
    pub(crate) fn invalid_timestamp(
        input: &str,
        source: spatio_types::chrono::ParseError,
    ) -> Self {
        Self::InvalidTimestamp {
            input: input.to_string(),
            source,
        }
    }
}
