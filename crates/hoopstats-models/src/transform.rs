//! Conversion from raw gateway results to the game model.
//!
//! This is a pure function. The same payload always yields the same
//! `GameData`, so callers may re-run it freely.

use std::collections::BTreeMap;

use crate::game::{GameData, GameEvent, GameEventKind, Team, TeamSummary, VideoSummary, TEAM_ID};
use crate::results::AnalysisResults;

/// Points credited for every detected score. The detector reports that a
/// basket was made but not its kind, so every event is assumed to be a
/// two-pointer. A known precision loss, kept deliberately.
pub const POINTS_PER_SCORE: u32 = 2;

/// Filename shown when no processed-video URL is known.
pub const DEFAULT_FILENAME: &str = "processed_video.mp4";

/// Builds the display model for one results payload.
///
/// `video_url`, when present, contributes the display filename. Raw
/// timestamps are bounded to the video and confidences to [0, 1].
pub fn transform_results(results: &AnalysisResults, video_url: Option<&str>) -> GameData {
    let duration = results.video.duration_secs();

    let events: Vec<GameEvent> = results
        .scores
        .iter()
        .map(|score| {
            let timestamp = if duration > 0.0 {
                score.timestamp.clamp(0.0, duration)
            } else {
                score.timestamp.max(0.0)
            };
            GameEvent {
                id: format!("score-{}", score.frame),
                kind: GameEventKind::Score,
                team_id: TEAM_ID.to_string(),
                player_id: None,
                score_delta: POINTS_PER_SCORE,
                timestamp,
                confidence: score.confidence.clamp(0.0, 1.0),
                source: score.mode.clone(),
            }
        })
        .collect();

    let mut summary = BTreeMap::new();
    summary.insert(TEAM_ID.to_string(), TeamSummary::from_events(&events));

    GameData {
        video: VideoSummary {
            filename: filename_from_url(video_url)
                .unwrap_or(DEFAULT_FILENAME)
                .to_string(),
            duration,
        },
        teams: vec![Team::synthetic()],
        events,
        summary,
    }
}

/// Last path segment of the URL, ignoring query and fragment. None when
/// the URL has no usable segment.
fn filename_from_url(url: Option<&str>) -> Option<&str> {
    let url = url?;
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ScoreEvent, ScoreEventKind, VideoStats};

    fn score(frame: u64, timestamp: f64, confidence: f64) -> ScoreEvent {
        ScoreEvent {
            kind: ScoreEventKind::Score,
            frame,
            timestamp,
            confidence,
            mode: "nbaction_exact".to_string(),
        }
    }

    fn results(scores: Vec<ScoreEvent>) -> AnalysisResults {
        let total_scores = scores.len() as u64;
        AnalysisResults {
            video: VideoStats {
                fps: 30.0,
                frames: 3000,
            },
            scores,
            total_scores,
        }
    }

    #[test]
    fn test_every_score_becomes_a_two_point_event() {
        let raw = results(vec![
            score(30, 1.0, 0.9),
            score(60, 2.0, 0.8),
            score(90, 3.0, 0.7),
            score(120, 4.0, 0.6),
        ]);
        let data = transform_results(&raw, None);

        assert_eq!(data.events.len(), 4);
        let summary = data.team_summary().unwrap();
        assert_eq!(summary.points, 8);
        assert_eq!(summary.two_point_scores, 4);
        assert_eq!(summary.three_point_scores, 0);
    }

    #[test]
    fn test_empty_scores_yield_zeroed_summary() {
        let data = transform_results(&results(Vec::new()), None);

        assert!(data.events.is_empty());
        let summary = data.team_summary().unwrap();
        assert_eq!(summary.points, 0);
        assert_eq!(summary.two_point_scores, 0);
        assert!((data.video.duration - 100.0).abs() < f64::EPSILON);
        assert_eq!(data.video.filename, DEFAULT_FILENAME);
    }

    #[test]
    fn test_single_score_example() {
        let raw = results(vec![score(90, 3.0, 0.92)]);
        let data = transform_results(&raw, None);

        assert_eq!(data.teams, vec![Team::synthetic()]);
        assert_eq!(data.events.len(), 1);
        let event = &data.events[0];
        assert_eq!(event.id, "score-90");
        assert_eq!(event.team_id, TEAM_ID);
        assert_eq!(event.score_delta, POINTS_PER_SCORE);
        assert!((event.timestamp - 3.0).abs() < f64::EPSILON);
        assert!((event.confidence - 0.92).abs() < f64::EPSILON);
        assert_eq!(event.source, "nbaction_exact");

        let summary = data.team_summary().unwrap();
        assert_eq!(summary.points, 2);
        assert_eq!(summary.two_point_scores, 1);
        assert_eq!(summary.three_point_scores, 0);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let raw = results(vec![score(90, 3.0, 0.92), score(150, 5.0, 0.77)]);
        let first = serde_json::to_vec(&transform_results(&raw, None)).unwrap();
        let second = serde_json::to_vec(&transform_results(&raw, None)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_values_are_bounded() {
        let raw = results(vec![
            score(10, -5.0, 1.7),
            score(20, 400.0, -0.2),
        ]);
        let data = transform_results(&raw, None);

        assert_eq!(data.events[0].timestamp, 0.0);
        assert_eq!(data.events[0].confidence, 1.0);
        assert_eq!(data.events[1].timestamp, 100.0);
        assert_eq!(data.events[1].confidence, 0.0);
    }

    #[test]
    fn test_filename_comes_from_video_url() {
        let raw = results(Vec::new());

        let url = "http://localhost:8000/files/abc123/game_final.mp4?sig=xyz";
        let data = transform_results(&raw, Some(url));
        assert_eq!(data.video.filename, "game_final.mp4");

        let data = transform_results(&raw, Some("http://localhost:8000/files/abc123/"));
        assert_eq!(data.video.filename, DEFAULT_FILENAME);

        let data = transform_results(&raw, None);
        assert_eq!(data.video.filename, DEFAULT_FILENAME);
    }

    #[test]
    fn test_total_scores_field_is_ignored() {
        let mut raw = results(vec![score(30, 1.0, 0.9), score(60, 2.0, 0.8)]);
        raw.total_scores = 99;
        let data = transform_results(&raw, None);

        assert_eq!(data.events.len(), 2);
        assert_eq!(data.team_summary().unwrap().points, 4);
    }

    #[test]
    fn test_placeholder_payload_transforms_cleanly() {
        let data = transform_results(&AnalysisResults::placeholder(), None);

        assert!(data.events.is_empty());
        assert_eq!(data.team_summary().unwrap().points, 0);
        assert!((data.video.duration - 1000.0 / 30.0).abs() < 1e-9);
    }
}
