//! Relay error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors surfaced by the relay handlers.
///
/// A gateway failure mirrors the gateway's status code; a local failure maps
/// to 500. Either way the response body is the `{"error": "..."}` envelope
/// the frontend parses.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The gateway answered the upload or status route with a non-success
    /// status.
    #[error("Backend error: {status_text} - {body}")]
    Backend {
        status: StatusCode,
        status_text: String,
        body: String,
    },

    /// The gateway refused to serve a processed video.
    #[error("Backend download error: {status_text} - {body}")]
    BackendDownload {
        status: StatusCode,
        status_text: String,
        body: String,
    },

    /// Upload forwarding failed before the gateway answered.
    #[error("Proxy error: {0}")]
    Upload(String),

    /// Status forwarding failed before the gateway answered.
    #[error("Status proxy error: {0}")]
    StatusCheck(String),

    /// Download forwarding failed before the gateway answered.
    #[error("Proxy download error: {0}")]
    Download(String),
}

impl ProxyError {
    /// Wrap a gateway failure, keeping its status code for the response.
    pub fn backend(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Backend {
            status,
            status_text: status_text(status),
            body: body.into(),
        }
    }

    /// Wrap a gateway download failure, keeping its status code.
    pub fn backend_download(status: StatusCode, body: impl Into<String>) -> Self {
        Self::BackendDownload {
            status,
            status_text: status_text(status),
            body: body.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Backend { status, .. } | ProxyError::BackendDownload { status, .. } => {
                *status
            }
            ProxyError::Upload(_) | ProxyError::StatusCheck(_) | ProxyError::Download(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorEnvelope {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_envelope_text() {
        let err = ProxyError::backend(StatusCode::SERVICE_UNAVAILABLE, "gateway draining");
        assert_eq!(
            err.to_string(),
            "Backend error: Service Unavailable - gateway draining"
        );
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_download_envelope_text() {
        let err = ProxyError::backend_download(StatusCode::NOT_FOUND, "no artifact");
        assert_eq!(
            err.to_string(),
            "Backend download error: Not Found - no artifact"
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_local_failures_map_to_500() {
        assert_eq!(
            ProxyError::Upload("connection refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::StatusCheck("timed out".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::Download("reset by peer".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
