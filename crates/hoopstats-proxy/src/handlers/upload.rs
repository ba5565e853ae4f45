//! Upload relay handler.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::metrics;
use crate::state::AppState;

/// Relay a multipart upload to the gateway.
///
/// The payload is forwarded verbatim (body plus content type), so every form
/// field the frontend sent reaches the gateway unchanged. The gateway's JSON
/// answer is relayed back on success; its status code and body are wrapped
/// in the error envelope on failure.
pub async fn upload_proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResult<Response> {
    let url = format!("{}/api/upload", state.config.upload_backend());

    info!(bytes = body.len(), "Forwarding upload to gateway");
    metrics::record_relay_bytes("upload", body.len() as u64);

    let mut request = state.transfer_http.post(&url).body(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request = request.header(header::CONTENT_TYPE, content_type.clone());
    }

    let started = Instant::now();
    let response = request.send().await.map_err(|err| {
        metrics::record_relay_failure("upload");
        error!("Upload relay failed: {err}");
        ProxyError::Upload(err.to_string())
    })?;

    let status = response.status();
    metrics::record_relay_request("upload", status.as_u16(), started.elapsed().as_secs_f64());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Gateway rejected upload");
        return Err(ProxyError::backend(status, body));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|err| ProxyError::Upload(err.to_string()))?;

    Ok(Json(payload).into_response())
}
