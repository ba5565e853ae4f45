//! Plain-text rendering of game analysis results.
//!
//! Pure string building over [`GameData`]; the caller decides where the
//! text goes.

use std::collections::BTreeMap;

use hoopstats_models::{GameData, GameEvent};

/// Confidence at or above which a detection counts as high quality.
const HIGH_CONFIDENCE: f64 = 0.8;

/// Bucket edges for the confidence histogram, highest range first.
const CONFIDENCE_BUCKETS: [(f64, f64, &str); 6] = [
    (0.9, 1.0, "90-100%"),
    (0.8, 0.9, "80-89%"),
    (0.7, 0.8, "70-79%"),
    (0.6, 0.7, "60-69%"),
    (0.5, 0.6, "50-59%"),
    (0.0, 0.5, "0-49%"),
];

/// Render the full report for one analyzed game.
pub fn render_report(data: &GameData) -> String {
    let mut out = String::new();

    out.push_str("Game Analysis Report\n");
    out.push_str("====================\n\n");

    out.push_str(&format!("Video:    {}\n", data.video.filename));
    out.push_str(&format!(
        "Duration: {}\n\n",
        format_timestamp(data.video.duration)
    ));

    let points = data.team_summary().map_or(0, |s| s.points);
    let two_point = data.team_summary().map_or(0, |s| s.two_point_scores);
    let three_point = data.team_summary().map_or(0, |s| s.three_point_scores);

    out.push_str(&format!("Total points: {points}\n"));
    out.push_str(&format!(
        "Total scores: {} (2-point: {two_point}, 3-point: {three_point})\n",
        data.events.len()
    ));

    if data.events.is_empty() {
        out.push_str("\nNo scores detected.\n");
        return out;
    }

    let high = data
        .events
        .iter()
        .filter(|e| e.confidence >= HIGH_CONFIDENCE)
        .count();
    let low = data.low_confidence_events().count();
    let medium = data.events.len() - high - low;
    out.push_str(&format!(
        "Avg confidence: {:.1}% (high: {high}, medium: {medium}, low: {low})\n",
        data.average_confidence() * 100.0
    ));

    out.push_str(&section("Score Events"));
    out.push_str("    #   Time  Points  Confidence  Source\n");
    for (index, event) in data.events.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {:>5}     +{}      {:>5.1}%  {}\n",
            index + 1,
            format_timestamp(event.timestamp),
            event.score_delta,
            event.confidence * 100.0,
            event.source
        ));
    }

    out.push_str(&section("Score Timeline"));
    let mut running: u64 = 0;
    for event in &data.events {
        running += u64::from(event.score_delta);
        out.push_str(&format!(
            "  {:>5}  {running:>3} pts\n",
            format_timestamp(event.timestamp)
        ));
    }

    out.push_str(&section("Scores Per Minute"));
    for (minute, count) in per_minute_counts(&data.events) {
        out.push_str(&format!(
            "  {minute}:00-{}:00  {} {count}\n",
            minute + 1,
            "#".repeat(count)
        ));
    }

    out.push_str(&section("Confidence Distribution"));
    for (label, count) in confidence_distribution(&data.events) {
        out.push_str(&format!("  {label:>7}  {} {count}\n", "#".repeat(count)));
    }

    if low > 0 {
        out.push_str(&format!(
            "\nWarning: {low} events were detected with low confidence. \
             Review the score events table to verify these detections.\n"
        ));
    }

    out
}

fn section(title: &str) -> String {
    format!("\n{title}\n{}\n", "-".repeat(title.len()))
}

/// Seconds to `m:ss`, flooring both parts the way the dashboard did.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn per_minute_counts(events: &[GameEvent]) -> BTreeMap<u64, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        let minute = (event.timestamp.max(0.0) / 60.0) as u64;
        *counts.entry(minute).or_insert(0) += 1;
    }
    counts
}

fn confidence_distribution(events: &[GameEvent]) -> Vec<(&'static str, usize)> {
    CONFIDENCE_BUCKETS
        .iter()
        .map(|&(min, max, label)| {
            // The top bucket is closed at 1.0.
            let count = events
                .iter()
                .filter(|e| e.confidence >= min && (e.confidence < max || max >= 1.0))
                .count();
            (label, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopstats_models::{
        transform_results, AnalysisResults, ScoreEvent, VideoStats, LOW_CONFIDENCE,
    };

    fn results_with(scores: Vec<ScoreEvent>) -> AnalysisResults {
        AnalysisResults {
            video: VideoStats {
                fps: 30.0,
                frames: 9000,
            },
            total_scores: scores.len() as u64,
            scores,
        }
    }

    fn score(frame: u64, timestamp: f64, confidence: f64) -> ScoreEvent {
        ScoreEvent {
            kind: Default::default(),
            frame,
            timestamp,
            confidence,
            mode: "nbaction_exact".to_string(),
        }
    }

    #[test]
    fn test_format_timestamp_floors() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(3.9), "0:03");
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(3599.9), "59:59");
        assert_eq!(format_timestamp(-2.0), "0:00");
    }

    #[test]
    fn test_report_for_single_score() {
        let results = results_with(vec![score(90, 3.0, 0.92)]);
        let report = render_report(&transform_results(&results, None));

        assert!(report.contains("Video:    processed_video.mp4"));
        assert!(report.contains("Duration: 5:00"));
        assert!(report.contains("Total points: 2"));
        assert!(report.contains("Total scores: 1 (2-point: 1, 3-point: 0)"));
        assert!(report.contains("0:03"));
        assert!(report.contains("92.0%"));
        assert!(report.contains("nbaction_exact"));
        assert!(!report.contains("Warning:"));
    }

    #[test]
    fn test_empty_game_has_no_charts() {
        let report = render_report(&transform_results(&results_with(vec![]), None));

        assert!(report.contains("Total points: 0"));
        assert!(report.contains("No scores detected."));
        assert!(!report.contains("Score Timeline"));
        assert!(!report.contains("Confidence Distribution"));
    }

    #[test]
    fn test_timeline_accumulates_points() {
        let results = results_with(vec![score(30, 1.0, 0.9), score(60, 2.0, 0.9)]);
        let report = render_report(&transform_results(&results, None));

        assert!(report.contains("  0:01    2 pts"));
        assert!(report.contains("  0:02    4 pts"));
    }

    #[test]
    fn test_per_minute_buckets() {
        let events = [
            score(300, 10.0, 0.9),
            score(1500, 50.0, 0.9),
            score(2100, 70.0, 0.9),
        ];
        let results = results_with(events.to_vec());
        let report = render_report(&transform_results(&results, None));

        assert!(report.contains("0:00-1:00  ## 2"));
        assert!(report.contains("1:00-2:00  # 1"));
    }

    #[test]
    fn test_perfect_confidence_stays_in_top_bucket() {
        let results = results_with(vec![score(30, 1.0, 1.0)]);
        let distribution = confidence_distribution(
            &transform_results(&results, None).events,
        );

        assert_eq!(distribution[0], ("90-100%", 1));
        assert!(distribution[1..].iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_low_confidence_warning() {
        let results = results_with(vec![score(30, 1.0, 0.3), score(60, 2.0, 0.9)]);
        let data = transform_results(&results, None);
        assert_eq!(data.low_confidence_events().count(), 1);

        let report = render_report(&data);
        assert!(report.contains("Warning: 1 events were detected with low confidence."));
    }

    #[test]
    fn test_low_confidence_threshold_matches_model() {
        assert!(LOW_CONFIDENCE < HIGH_CONFIDENCE);
    }
}
