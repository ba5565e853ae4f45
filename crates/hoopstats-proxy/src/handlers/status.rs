//! Status relay handler.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use crate::error::{ProxyError, ProxyResult};
use crate::metrics;
use crate::state::AppState;

/// Relay a job status check to the gateway.
///
/// Every non-success status is mirrored, including 404. Synchronous gateway
/// deployments purge finished jobs, so the frontend reads a 404 here as
/// completion rather than as an error; swallowing it would break that.
pub async fn status_proxy(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ProxyResult<Response> {
    let url = format!("{}/api/status/{}", state.config.status_backend(), job_id);

    debug!(%job_id, "Forwarding status check to gateway");

    let started = Instant::now();
    let response = state.http.get(&url).send().await.map_err(|err| {
        metrics::record_relay_failure("status");
        error!("Status relay failed: {err}");
        ProxyError::StatusCheck(err.to_string())
    })?;

    let status = response.status();
    metrics::record_relay_request("status", status.as_u16(), started.elapsed().as_secs_f64());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProxyError::backend(status, body));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|err| ProxyError::StatusCheck(err.to_string()))?;

    Ok(Json(payload).into_response())
}
