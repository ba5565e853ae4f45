//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

use hoopstats_models::JobId;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the gateway client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway has no record of the job. Callers treat this as a
    /// soft condition, not a hard failure: a synchronous backend purges
    /// finished jobs before the first poll can see them.
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Request failed: {status_text} - {body}")]
    RequestFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Media(#[from] hoopstats_media::MediaError),
}

impl ClientError {
    /// Build the error for a non-2xx response, once the body is read.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        Self::RequestFailed {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            body,
        }
    }

    /// Whether a polling loop may try again after this error. Only a
    /// missing job is final, everything else is assumed transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::JobNotFound(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Network(err)
        }
    }
}
