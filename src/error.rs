//! Request error types

use thiserror::Error;

/// Why a request could not be completed.
///
/// The UI treats every variant except [`RequestError::InvalidBody`] the same way:
/// a single "unable to execute request" banner, with details going to the log.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status} {status_text}")]
    Status { status: u16, status_text: String },
}
