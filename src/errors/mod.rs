use thiserror::Error;

/// Required start-up configuration is missing or unusable. Fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing environment variable {0}")]
    MissingVariable(&'static str),
    #[error("Invalid remote service url: {0}")]
    InvalidUrl(String),
}

/// Where a remote call failed. Views never look at this, only logs do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    Transport,
    Rejected { status: u16 },
    Decode,
    Channel,
}

/// Any fetch/insert/subscribe call rejected by the remote service.
///
/// Displays as the service's message only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteServiceError {
    pub message: String,
    pub kind: RemoteFailure,
}

impl RemoteServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message, RemoteFailure::Transport)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(message, RemoteFailure::Rejected { status })
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(message, RemoteFailure::Decode)
    }

    pub fn channel(message: impl Into<String>) -> Self {
        Self::new(message, RemoteFailure::Channel)
    }

    fn new(message: impl Into<String>, kind: RemoteFailure) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "An error occurred".to_string()
        } else {
            message
        };
        Self { message, kind }
    }
}

impl From<reqwest::Error> for RemoteServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RemoteServiceError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::channel(err.to_string())
    }
}

/// A submitted form could not be coerced into an insertable record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field {field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Add context to remote errors
pub fn remote_context(operation: &str, table: &str) -> String {
    format!("Failed to {} {}", operation, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message_only() {
        let err = RemoteServiceError::rejected(401, "JWT expired");
        assert_eq!(err.to_string(), "JWT expired");
        assert_eq!(err.kind, RemoteFailure::Rejected { status: 401 });
    }

    #[test]
    fn test_blank_message_gets_fallback() {
        let err = RemoteServiceError::transport("  ");
        assert_eq!(err.to_string(), "An error occurred");
    }
}
