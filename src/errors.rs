use thiserror::Error;

/// Any failure of the chat round trip. Every variant is recoverable: the
/// widget keeps its conversation and the user may send again.
///
/// Payloads are rendered strings so the error can be cloned into widget state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {status}")]
    Status { status: u16 },

    #[error("Parse error: {0}")]
    Decode(String),

    #[error("Serialize error: {0}")]
    Encode(String),
}

impl TransportError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        TransportError::Network(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        TransportError::Decode(err.to_string())
    }

    pub fn encode(err: impl std::fmt::Display) -> Self {
        TransportError::Encode(err.to_string())
    }
}

/// Invalid configuration override.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer (got '{value}')")]
    InvalidHistoryLimit { var: &'static str, value: String },

    #[error("{var} must be 'completion' or 'submission' (got '{value}')")]
    InvalidReplyOrdering { var: &'static str, value: String },

    #[error("{var} cannot be empty")]
    EmptyBaseUrl { var: &'static str },
}
