use reqwest::StatusCode;
use thiserror::Error;

use crate::models::VerificationStatus;

#[derive(Debug, Error)]
pub enum ExternalIdError {
    #[error("lookup timed out after {0} ms")]
    TimedOut(u64),

    #[error("external ID not found")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not decode lookup response: {0}")]
    Decode(String),

    #[error("invalid lookup URL: {0}")]
    InvalidUrl(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ExternalIdError {
    /// Status shown to the user when a lookup ends with this error.
    pub fn verification_status(&self) -> VerificationStatus {
        match self {
            ExternalIdError::TimedOut(_) => VerificationStatus::TimedOut,
            ExternalIdError::NotFound => VerificationStatus::NotFound,
            ExternalIdError::Http { status, .. } if *status == StatusCode::NOT_FOUND => {
                VerificationStatus::NotFound
            }
            ExternalIdError::Request(err) if err.is_timeout() => VerificationStatus::TimedOut,
            _ => VerificationStatus::Failed,
        }
    }
}

pub type ExternalIdResult<T> = Result<T, ExternalIdError>;
