//! One analysis run, from local file to displayable game data.
//!
//! The session drives upload preparation, the gateway upload, the
//! immediate status check, polling, and the final transformation. Every
//! path lands in a terminal [`AnalysisStage`]; a backend failure becomes
//! a `Failed` outcome instead of an error.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use hoopstats_client::{
    prepare_upload, ApiClient, FfmpegCompressor, PollOutcome, StatusPoller, UploadOptions,
};
use hoopstats_media::LocalVideo;
use hoopstats_models::{
    transform_results, AnalysisProgress, AnalysisResults, AnalysisStage, GameData, JobId,
    JobStatus,
};

/// Observer for progress snapshots.
pub type ProgressCallback = Arc<dyn Fn(AnalysisProgress) + Send + Sync>;

/// Everything a finished run produces.
#[derive(Debug)]
pub struct SessionOutput {
    pub job_id: JobId,
    pub game: GameData,
    /// The gateway finished before the first scheduled poll could see
    /// the job running.
    pub synchronous: bool,
}

/// How a run ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Completed(SessionOutput),
    /// The message has already been emitted as an `Error` snapshot.
    Failed { message: String },
    Cancelled,
}

/// Drives one video through upload and polling to a finished report.
pub struct AnalysisSession {
    client: ApiClient,
    options: UploadOptions,
    cancel_rx: Option<watch::Receiver<bool>>,
    on_progress: Option<ProgressCallback>,
}

impl AnalysisSession {
    pub fn new(client: ApiClient, options: UploadOptions) -> Self {
        Self {
            client,
            options,
            cancel_rx: None,
            on_progress: None,
        }
    }

    /// Stop polling when the channel flips to `true`.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Receive every progress snapshot the session emits.
    pub fn with_progress(
        mut self,
        callback: impl Fn(AnalysisProgress) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Run the full pipeline for one video file.
    pub async fn run(&self, path: impl AsRef<Path>) -> SessionOutcome {
        let path = path.as_ref();
        let mut stage = None;

        self.emit(
            &mut stage,
            AnalysisStage::Initializing,
            10,
            "Preparing video for upload...",
        );

        let video = match LocalVideo::open(path).await {
            Ok(video) => video,
            Err(err) => return self.upload_failure(&mut stage, err),
        };
        let threshold = self.client.config().compression_threshold_bytes;
        let prepared =
            match prepare_upload(&video, &self.options, threshold, &FfmpegCompressor).await {
                Ok(prepared) => prepared,
                Err(err) => return self.upload_failure(&mut stage, err),
            };

        self.emit(
            &mut stage,
            AnalysisStage::Initializing,
            15,
            "Uploading video...",
        );
        let upload = match self.client.upload_video(&prepared.path).await {
            Ok(upload) => upload,
            Err(err) => return self.upload_failure(&mut stage, err),
        };
        let job_id = upload.job_id;
        info!("Upload accepted as job {}", job_id);

        self.emit(
            &mut stage,
            AnalysisStage::Processing,
            20,
            "Video uploaded, checking status immediately...",
        );

        // Synchronous gateways finish small jobs before the first
        // scheduled poll and then purge them, so one silent check runs
        // up front. A hit here skips polling entirely.
        if let Some(report) = self.client.job_status_silent(&job_id).await {
            if report.status == JobStatus::Completed {
                if let Some(results) = &report.results {
                    let game = transform_results(results, report.video_url.as_deref());
                    self.emit(
                        &mut stage,
                        AnalysisStage::Completed,
                        100,
                        "Analysis completed! Results cached.",
                    );
                    return SessionOutcome::Completed(SessionOutput {
                        job_id,
                        game,
                        synchronous: true,
                    });
                }
            }
        }

        self.emit(
            &mut stage,
            AnalysisStage::Processing,
            30,
            "Backend is analyzing video...",
        );

        let mut poller = StatusPoller::for_client(&self.client);
        if let Some(rx) = &self.cancel_rx {
            poller = poller.with_cancel(rx.clone());
        }
        if let Some(callback) = &self.on_progress {
            let callback = Arc::clone(callback);
            poller = poller.with_report_observer(move |_| {
                callback(AnalysisProgress::new(
                    AnalysisStage::Processing,
                    50,
                    "Backend is analyzing video...",
                ));
            });
        }

        match poller.poll_until_terminal(&self.client, &job_id).await {
            Ok(PollOutcome::Completed(report)) => match &report.results {
                Some(results) => {
                    let game = transform_results(results, report.video_url.as_deref());
                    self.emit(
                        &mut stage,
                        AnalysisStage::Completed,
                        100,
                        "Analysis completed! Results ready.",
                    );
                    SessionOutcome::Completed(SessionOutput {
                        job_id,
                        game,
                        synchronous: false,
                    })
                }
                None => self.synchronous_completion(&mut stage, job_id),
            },
            Ok(PollOutcome::Failed(report)) => {
                let message = format!(
                    "Analysis failed: {}",
                    report.error.as_deref().unwrap_or("Unknown error")
                );
                self.emit(&mut stage, AnalysisStage::Error, 0, &message);
                SessionOutcome::Failed { message }
            }
            Ok(PollOutcome::Vanished) => self.synchronous_completion(&mut stage, job_id),
            Ok(PollOutcome::Cancelled) => SessionOutcome::Cancelled,
            Err(err) => {
                let message = err.to_string();
                self.emit(&mut stage, AnalysisStage::Error, 0, &message);
                SessionOutcome::Failed { message }
            }
        }
    }

    /// A job that completed with nothing to show. The empty placeholder
    /// payload keeps the report pipeline uniform.
    fn synchronous_completion(
        &self,
        stage: &mut Option<AnalysisStage>,
        job_id: JobId,
    ) -> SessionOutcome {
        let game = transform_results(&AnalysisResults::placeholder(), None);
        self.emit(
            stage,
            AnalysisStage::Completed,
            100,
            "Analysis completed! (Backend processed synchronously)",
        );
        SessionOutcome::Completed(SessionOutput {
            job_id,
            game,
            synchronous: true,
        })
    }

    fn upload_failure(
        &self,
        stage: &mut Option<AnalysisStage>,
        err: impl fmt::Display,
    ) -> SessionOutcome {
        let message = format!("Upload failed: {err}");
        self.emit(stage, AnalysisStage::Error, 0, &message);
        SessionOutcome::Failed { message }
    }

    /// Emit one snapshot, enforcing the stage transition rules.
    fn emit(
        &self,
        last: &mut Option<AnalysisStage>,
        next: AnalysisStage,
        progress: u8,
        message: &str,
    ) {
        if let Some(current) = *last {
            if !current.can_transition_to(next) {
                debug!("Suppressing stage transition {} -> {}", current, next);
                return;
            }
        }
        *last = Some(next);
        let snapshot = AnalysisProgress::new(next, progress, message);
        debug!(
            stage = %snapshot.stage,
            progress = snapshot.progress,
            "{}",
            snapshot.message
        );
        if let Some(callback) = &self.on_progress {
            callback(snapshot);
        }
    }
}
