//! Timer-driven job status polling.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use hoopstats_models::{JobId, JobReport, JobStatus};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Why polling stopped.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job finished and its report carries results.
    Completed(JobReport),
    /// The job failed; the report may carry an error message.
    Failed(JobReport),
    /// The gateway no longer knows the job. With a synchronous backend
    /// this usually means the work finished and the job was purged
    /// before the first poll could see it.
    Vanished,
    /// Stopped through the cancellation channel.
    Cancelled,
}

/// Polls a job on a fixed interval until it reaches a terminal state.
///
/// Errors other than a missing job are tolerated a bounded number of
/// consecutive times; the counter resets on every successful read.
pub struct StatusPoller {
    interval: Duration,
    max_transient_failures: u32,
    cancel_rx: Option<watch::Receiver<bool>>,
    on_report: Option<Box<dyn Fn(&JobReport) + Send + Sync>>,
}

impl StatusPoller {
    /// Create a new poller.
    pub fn new(interval: Duration, max_transient_failures: u32) -> Self {
        Self {
            interval,
            max_transient_failures,
            cancel_rx: None,
            on_report: None,
        }
    }

    /// Poller configured from the client's settings.
    pub fn for_client(client: &ApiClient) -> Self {
        let config = client.config();
        Self::new(config.poll_interval, config.max_transient_failures)
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Observe every in-flight status report. Terminal reports are not
    /// passed to the observer; they come back in the [`PollOutcome`].
    pub fn with_report_observer(
        mut self,
        observer: impl Fn(&JobReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_report = Some(Box::new(observer));
        self
    }

    /// Poll until the job is terminal, vanishes, or polling is
    /// cancelled. The first check fires immediately.
    pub async fn poll_until_terminal(
        &self,
        client: &ApiClient,
        job_id: &JobId,
    ) -> ClientResult<PollOutcome> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut cancel_rx = self.cancel_rx.clone();
        let mut consecutive_failures: u32 = 0;

        loop {
            match &mut cancel_rx {
                Some(rx) => {
                    if *rx.borrow() {
                        info!("Polling for job {} cancelled", job_id);
                        return Ok(PollOutcome::Cancelled);
                    }
                    tokio::select! {
                        _ = ticker.tick() => {}
                        changed = rx.changed() => {
                            // A dropped sender counts as cancellation.
                            if changed.is_err() || *rx.borrow() {
                                info!("Polling for job {} cancelled", job_id);
                                return Ok(PollOutcome::Cancelled);
                            }
                            continue;
                        }
                    }
                }
                None => {
                    ticker.tick().await;
                }
            }

            match client.job_status(job_id).await {
                Ok(report) => {
                    consecutive_failures = 0;
                    if report.is_terminal() {
                        debug!("Job {} reached {}", job_id, report.status);
                        return Ok(match report.status {
                            JobStatus::Failed => PollOutcome::Failed(report),
                            _ => PollOutcome::Completed(report),
                        });
                    }
                    debug!("Job {} still {}", job_id, report.status);
                    if let Some(observer) = &self.on_report {
                        observer(&report);
                    }
                }
                Err(ClientError::JobNotFound(_)) => {
                    info!(
                        "Job {} is gone from the gateway, assuming it already finished",
                        job_id
                    );
                    return Ok(PollOutcome::Vanished);
                }
                Err(err) => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.max_transient_failures {
                        return Err(err);
                    }
                    warn!(
                        "Status check for {} failed ({} of {}): {}",
                        job_id, consecutive_failures, self.max_transient_failures, err
                    );
                }
            }
        }
    }
}
