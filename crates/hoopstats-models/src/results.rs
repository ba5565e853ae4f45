//! Raw analysis payloads produced by the gateway.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind tag carried by every detection entry. The detector only emits
/// score events today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEventKind {
    #[default]
    Score,
}

/// One detected scoring occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreEvent {
    #[serde(rename = "type", default)]
    pub kind: ScoreEventKind,
    /// Frame index in the source video.
    pub frame: u64,
    /// Position in the source video, seconds.
    pub timestamp: f64,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
    /// Detection mode label, e.g. "nbaction_exact".
    pub mode: String,
}

/// Frame geometry of the analyzed video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoStats {
    pub fps: f64,
    pub frames: u64,
}

impl VideoStats {
    /// Wall-clock duration implied by the frame count, seconds.
    /// Zero when the frame rate is unusable.
    pub fn duration_secs(&self) -> f64 {
        if self.fps > 0.0 {
            self.frames as f64 / self.fps
        } else {
            0.0
        }
    }
}

/// Full result payload attached to a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResults {
    pub video: VideoStats,
    #[serde(default)]
    pub scores: Vec<ScoreEvent>,
    #[serde(default)]
    pub total_scores: u64,
}

impl AnalysisResults {
    /// Stand-in payload for a job the gateway finished and purged before
    /// any result could be read. Frame count and rate are nominal values.
    pub fn placeholder() -> Self {
        Self {
            video: VideoStats {
                fps: 30.0,
                frames: 1000,
            },
            scores: Vec::new(),
            total_scores: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_event_type_tag() {
        let raw = r#"{"type":"score","frame":90,"timestamp":3.0,"confidence":0.92,"mode":"nbaction_exact"}"#;
        let event: ScoreEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind, ScoreEventKind::Score);
        assert_eq!(event.mode, "nbaction_exact");

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "score");
    }

    #[test]
    fn test_duration_from_frames() {
        let stats = VideoStats { fps: 30.0, frames: 3000 };
        assert!((stats.duration_secs() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duration_guards_zero_fps() {
        let stats = VideoStats { fps: 0.0, frames: 3000 };
        assert_eq!(stats.duration_secs(), 0.0);
    }

    #[test]
    fn test_results_tolerate_missing_scores() {
        let raw = r#"{"video":{"fps":25.0,"frames":500}}"#;
        let results: AnalysisResults = serde_json::from_str(raw).unwrap();
        assert!(results.scores.is_empty());
        assert_eq!(results.total_scores, 0);
    }
}
