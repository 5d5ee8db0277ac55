use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced while talking to the provider's OAuth endpoints.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("token endpoint returned {status}: {body}")]
    Authorization { status: StatusCode, body: String },
}
