//! The error type shared by every fallible operation of this crate

use thiserror::Error;

/// Everything that can go wrong while talking to the planning API or handling its data
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The request never got a usable response (DNS, TLS, connection reset...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body (or one of its fields) does not have the expected shape
    #[error("Unexpected response from the server: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered, but reported a failure in its body
    #[error("{message}")]
    Server { message: String },

    /// The input has been refused before any request was made
    #[error("{0}")]
    Validation(String),

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub fn server<S: ToString>(message: S) -> Self {
        Self::Server { message: message.to_string() }
    }

    pub fn validation<S: ToString>(message: S) -> Self {
        Self::Validation(message.to_string())
    }

    /// A text that can be displayed to the user as-is
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Transport(err) if err.is_timeout() => "The server took too long to answer".to_string(),
            PlannerError::Transport(_) => "Unable to reach the server".to_string(),
            PlannerError::Decode(_) => "The server sent an unexpected answer".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias used across this crate
pub type PlannerResult<T> = Result<T, PlannerError>;
