//! Error types for the admin client
//!
//! Every operation resolves with a typed payload or fails with [`AdminError`].
//! There is no retry and no partial success. Not-found and every other
//! non-2xx status share one shape, [`AdminError::Api`], and differ only in
//! the message the backend supplied.

use thiserror::Error;

/// Message used when a failed response carries no usable error text.
pub const FALLBACK_API_MESSAGE: &str = "API error";

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    /// The call failed before any response arrived (DNS, refused connection,
    /// TLS, a lower-layer timeout). No status code is available.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    ///
    /// `Display` renders the message alone so consumers can surface it as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body does not fit the operation's declared shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL or environment configuration could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The persisted credential record is unreadable.
    #[error("credential storage error: {0}")]
    CredentialStorage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Build an API error from a status and an optional backend message.
    ///
    /// A missing or blank message falls back to [`FALLBACK_API_MESSAGE`].
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_API_MESSAGE.to_string());
        Self::Api { status, message }
    }

    /// HTTP status of an API error; `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<url::ParseError> for AdminError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidConfig(format!("invalid URL: {err}"))
    }
}
