//! Closed error taxonomy surfaced to the UI from the repository boundary.

use thiserror::Error;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("No network connection")]
    NoConnectivity,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Conflicting change")]
    Conflict,

    #[error("Request timed out")]
    Timeout,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Server returned {status}")]
    ServerError { status: u16 },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl RepositoryError {
    /// Error for a non-success HTTP status; `None` for 2xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 | 403 => Some(RepositoryError::Unauthorized),
            408 => Some(RepositoryError::Timeout),
            409 => Some(RepositoryError::Conflict),
            413 => Some(RepositoryError::PayloadTooLarge),
            500..=599 => Some(RepositoryError::ServerError { status }),
            other => Some(RepositoryError::Unknown(format!("HTTP status {}", other))),
        }
    }

    /// Short message suitable for a banner or toast.
    pub fn user_message(&self) -> String {
        match self {
            RepositoryError::NoConnectivity => {
                "You appear to be offline. Showing saved data.".to_string()
            }
            RepositoryError::Unauthorized => {
                "The holiday service rejected the API key. Check your settings.".to_string()
            }
            RepositoryError::Conflict => "This item was changed elsewhere. Try again.".to_string(),
            RepositoryError::Timeout => "The server took too long to respond.".to_string(),
            RepositoryError::PayloadTooLarge => "The response was too large to load.".to_string(),
            RepositoryError::ServerError { status } => {
                format!("The server is having trouble (HTTP {}).", status)
            }
            RepositoryError::Serialization(_) => "Received data could not be read.".to_string(),
            RepositoryError::Unknown(detail) => format!("Something went wrong: {}", detail),
        }
    }

    /// Worth retrying later without user action.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::NoConnectivity
                | RepositoryError::Timeout
                | RepositoryError::ServerError { .. }
        )
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RepositoryError::Timeout
        } else if err.is_connect() {
            RepositoryError::NoConnectivity
        } else if err.is_decode() {
            RepositoryError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status.as_u16())
                .unwrap_or_else(|| RepositoryError::Unknown(err.to_string()))
        } else {
            RepositoryError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Conflict
            }
            _ => RepositoryError::Unknown(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for RepositoryError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(sqlite) = err.downcast_ref::<rusqlite::Error>() {
            if let rusqlite::Error::SqliteFailure(failure, _) = sqlite {
                if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                    return RepositoryError::Conflict;
                }
            }
        }
        RepositoryError::Unknown(format!("{:#}", err))
    }
}
