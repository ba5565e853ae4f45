//! Shared data models for the hoopstats client suite.
//!
//! This crate provides Serde-serializable types for:
//! - Gateway job lifecycle and status payloads
//! - Raw score-detection results
//! - The derived display model (game events, team summary)
//! - Analysis progress reporting

pub mod game;
pub mod job;
pub mod progress;
pub mod results;
pub mod transform;

// Re-export common types
pub use game::{
    GameData, GameEvent, GameEventKind, PlayerSummary, Team, TeamSummary, VideoSummary,
    LOW_CONFIDENCE, TEAM_ID,
};
pub use job::{JobId, JobReport, JobStatus, UploadResponse};
pub use progress::{AnalysisProgress, AnalysisStage};
pub use results::{AnalysisResults, ScoreEvent, ScoreEventKind, VideoStats};
pub use transform::{transform_results, DEFAULT_FILENAME, POINTS_PER_SCORE};
