//! Download relay handler.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::metrics;
use crate::state::AppState;

/// Relay a processed-video download from the gateway.
///
/// The whole body is buffered so the attachment headers can carry an exact
/// length, then re-served as an `attachment` download.
pub async fn download_proxy(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ProxyResult<Response> {
    let url = format!("{}/api/download/{}", state.config.download_backend(), job_id);

    info!(%job_id, "Forwarding download request to gateway");

    let started = Instant::now();
    let response = state.transfer_http.get(&url).send().await.map_err(|err| {
        metrics::record_relay_failure("download");
        error!("Download relay failed: {err}");
        ProxyError::Download(err.to_string())
    })?;

    let status = response.status();
    metrics::record_relay_request("download", status.as_u16(), started.elapsed().as_secs_f64());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %job_id, "Gateway refused download");
        return Err(ProxyError::backend_download(status, body));
    }

    let video = response
        .bytes()
        .await
        .map_err(|err| ProxyError::Download(err.to_string()))?;

    info!(%job_id, bytes = video.len(), "Relaying processed video");
    metrics::record_relay_bytes("download", video.len() as u64);

    let headers = [
        (header::CONTENT_TYPE, "video/mp4".to_string()),
        (header::CONTENT_LENGTH, video.len().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"processed_video_{job_id}.mp4\""),
        ),
    ];

    Ok((StatusCode::OK, headers, video).into_response())
}
