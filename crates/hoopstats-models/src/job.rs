//! Job lifecycle types for the analysis gateway.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::results::AnalysisResults;

/// Opaque identifier for a server-side analysis job.
///
/// Assigned by the gateway on upload; the client never fabricates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting for a worker
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response returned by the gateway when an upload is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    pub job_id: JobId,
    pub status: String,
    pub message: String,
}

/// Snapshot of a job as reported by the gateway status route.
///
/// The gateway owns this state. Clients hold a read-only copy refreshed
/// by polling and never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobReport {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobReport {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Placeholder report for a job the gateway purged before the first
    /// status read.
    ///
    /// Synchronous backends delete finished jobs immediately, so a 404 on
    /// status is read as "done, nothing detected" rather than a failure.
    pub fn synthetic_completed(job_id: JobId) -> Self {
        Self {
            job_id,
            status: JobStatus::Completed,
            filename: None,
            created_at: Some(Utc::now()),
            results: Some(AnalysisResults::placeholder()),
            video_url: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(serde_json::to_string(&JobStatus::Queued).unwrap(), "\"queued\"");
        assert_eq!(
            serde_json::from_str::<JobStatus>("\"processing\"").unwrap(),
            JobStatus::Processing
        );
    }

    #[test]
    fn test_status_terminality() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_report_deserializes_minimal_payload() {
        let report: JobReport =
            serde_json::from_str(r#"{"job_id":"abc-123","status":"queued"}"#).unwrap();
        assert_eq!(report.job_id.as_str(), "abc-123");
        assert_eq!(report.status, JobStatus::Queued);
        assert!(report.results.is_none());
        assert!(!report.is_terminal());
    }

    #[test]
    fn test_report_deserializes_full_payload() {
        let raw = r#"{
            "job_id": "job-9",
            "status": "completed",
            "filename": "game.mp4",
            "created_at": "2024-03-01T12:00:00Z",
            "results": {
                "video": {"fps": 30.0, "frames": 3000},
                "scores": [
                    {"type": "score", "frame": 90, "timestamp": 3.0, "confidence": 0.92, "mode": "nbaction_exact"}
                ],
                "total_scores": 1
            },
            "video_url": "/api/download/job-9"
        }"#;
        let report: JobReport = serde_json::from_str(raw).unwrap();
        assert!(report.is_terminal());
        let results = report.results.expect("results present");
        assert_eq!(results.scores.len(), 1);
        assert_eq!(results.scores[0].frame, 90);
    }

    #[test]
    fn test_synthetic_completed_shape() {
        let report = JobReport::synthetic_completed(JobId::from("gone"));
        assert_eq!(report.status, JobStatus::Completed);
        let results = report.results.expect("placeholder results");
        assert!(results.scores.is_empty());
        assert_eq!(results.total_scores, 0);
    }
}
