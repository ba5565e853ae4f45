//! Progress reporting for an analysis run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Initializing,
    Processing,
    Completed,
    Error,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Initializing => "initializing",
            AnalysisStage::Processing => "processing",
            AnalysisStage::Completed => "completed",
            AnalysisStage::Error => "error",
        }
    }

    /// Whether the run is over, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStage::Completed | AnalysisStage::Error)
    }

    /// Legal stage transitions. Initializing may repeat itself while the
    /// upload advances, processing may only move forward, and terminal
    /// stages go nowhere.
    pub fn can_transition_to(&self, next: AnalysisStage) -> bool {
        match self {
            AnalysisStage::Initializing => true,
            AnalysisStage::Processing => !matches!(next, AnalysisStage::Initializing),
            AnalysisStage::Completed | AnalysisStage::Error => false,
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A progress snapshot handed to whoever is watching the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    /// Percent complete, 0 to 100.
    pub progress: u8,
    pub message: String,
}

impl AnalysisProgress {
    /// Builds a snapshot with the percentage pinned to the stage: a
    /// completed run is always 100, a failed run always 0, and anything
    /// in between is capped at 100.
    pub fn new(stage: AnalysisStage, progress: u8, message: impl Into<String>) -> Self {
        let progress = match stage {
            AnalysisStage::Completed => 100,
            AnalysisStage::Error => 0,
            _ => progress.min(100),
        };
        Self {
            stage,
            progress,
            message: message.into(),
        }
    }
}
