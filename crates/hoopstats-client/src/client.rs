//! Gateway HTTP client.

use std::path::Path;

use reqwest::multipart;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use hoopstats_models::{JobId, JobReport, UploadResponse};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Client for the analysis gateway, reached through its proxy.
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.status_timeout).build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload a video for analysis. The request asks the backend to
    /// render an annotated video alongside the stats.
    ///
    /// Uses the transfer deadline rather than the status one, since game
    /// footage can take a long time to move.
    pub async fn upload_video(&self, path: impl AsRef<Path>) -> ClientResult<UploadResponse> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());
        let mime = hoopstats_media::mime_for_path(path);

        let bytes = tokio::fs::read(path).await?;
        info!("Uploading {} ({} bytes)", name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(name)
            .mime_str(mime)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("generate_video", "true");

        let url = format!("{}/api/upload", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }

        Ok(response.json().await?)
    }

    /// Fetch the current status of a job.
    ///
    /// A 404 becomes [`ClientError::JobNotFound`], which callers must
    /// treat as a soft condition.
    pub async fn job_status(&self, job_id: &JobId) -> ClientResult<JobReport> {
        let url = format!("{}/api/status/{}", self.config.base_url, job_id);
        debug!("Checking status for job {}", job_id);

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::JobNotFound(job_id.clone()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }

        Ok(response.json().await?)
    }

    /// Status check that swallows errors. Used for the immediate
    /// post-upload check, where any failure just means "keep polling".
    pub async fn job_status_silent(&self, job_id: &JobId) -> Option<JobReport> {
        match self.job_status(job_id).await {
            Ok(report) => Some(report),
            Err(err) => {
                debug!("Silent status check for {} came back empty: {}", job_id, err);
                None
            }
        }
    }

    /// Download the annotated video for a completed job.
    pub async fn download_processed(&self, job_id: &JobId) -> ClientResult<Vec<u8>> {
        let url = format!("{}/api/download/{}", self.config.base_url, job_id);
        debug!("Downloading processed video for job {}", job_id);

        let response = self
            .http
            .get(&url)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Download the annotated video and write it to `path`. Returns the
    /// number of bytes written.
    pub async fn save_processed(
        &self,
        job_id: &JobId,
        path: impl AsRef<Path>,
    ) -> ClientResult<u64> {
        let bytes = self.download_processed(job_id).await?;
        tokio::fs::write(path.as_ref(), &bytes).await?;
        info!(
            "Saved processed video for job {} to {} ({} bytes)",
            job_id,
            path.as_ref().display(),
            bytes.len()
        );
        Ok(bytes.len() as u64)
    }
}
