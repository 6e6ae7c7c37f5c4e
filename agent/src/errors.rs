//! Error types for the cloudlink agent

use thiserror::Error;

/// Errors raised by the vendor API clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network failure, connection failure or timeout
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials rejected with 401/403
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Anything else the API did wrong
    #[error("API error: {0}")]
    Api(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}

/// Errors a coordinator surfaces to its host after a refresh
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The user must re-authenticate before polling can resume
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The refresh failed; the next tick tries again
    #[error("Update failed: {0}")]
    UpdateFailed(String),
}

impl UpdateError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, UpdateError::AuthFailed(_))
    }
}

impl From<ApiError> for UpdateError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication(msg) => UpdateError::AuthFailed(msg),
            other => UpdateError::UpdateFailed(other.to_string()),
        }
    }
}

/// Main error type for the cloudlink agent
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Internal(err.to_string())
    }
}
