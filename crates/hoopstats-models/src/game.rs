//! Game-level view of an analysis, derived from raw gateway results.
//!
//! Everything here is recomputed wholesale from a results payload. Nothing
//! is mutated incrementally, so two transformations of the same payload
//! always agree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of the single synthetic team every event is attributed to.
/// The detector has no notion of sides, jerseys, or players.
pub const TEAM_ID: &str = "team";

/// Events below this confidence are flagged for review.
pub const LOW_CONFIDENCE: f64 = 0.5;

/// A team participating in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub label: String,
    pub color: String,
}

impl Team {
    /// The one synthetic team attached to every transformed result.
    pub fn synthetic() -> Self {
        Self {
            id: TEAM_ID.to_string(),
            label: "Team".to_string(),
            color: "#3b82f6".to_string(),
        }
    }
}

/// Kind of game event. Only scores exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameEventKind {
    #[default]
    Score,
}

/// A single event on the game timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: GameEventKind,
    pub team_id: String,
    /// Jersey number, when player tracking is available upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub score_delta: u32,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub confidence: f64,
    /// Detection mode that produced the event.
    pub source: String,
}

/// Per-player stat line. The current detector never attributes events to
/// players, so the `players` lists stay empty until upstream data improves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: String,
    pub points: u64,
    pub two_point_scores: u64,
    pub three_point_scores: u64,
    pub foul_shots: u64,
    pub shot_attempts: u64,
    pub two_point_attempts: u64,
    pub three_point_attempts: u64,
    /// Made shots as a percentage of attempts.
    pub hit_rate: f64,
    pub dunks: u64,
    pub blocks: u64,
    pub off_rebounds: u64,
    pub def_rebounds: u64,
    pub assists: u64,
    pub turnovers: u64,
    pub passes: u64,
    pub dribbles: u64,
}

/// Aggregate counters for one team.
///
/// Counters the detector cannot observe stay at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub points: u64,
    pub two_point_scores: u64,
    pub three_point_scores: u64,
    pub foul_shots: u64,
    pub shot_attempts: u64,
    pub off_rebounds: u64,
    pub def_rebounds: u64,
    pub turnovers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_point_attempts: Option<u64>,
    pub blocks: u64,
    pub dunks: u64,
    pub assists: u64,
    pub passes: u64,
    pub dribbles: u64,
    pub players: Vec<PlayerSummary>,
}

impl TeamSummary {
    /// Aggregates a full event list in one pass.
    pub fn from_events(events: &[GameEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.points += u64::from(event.score_delta);
            match event.score_delta {
                1 => summary.foul_shots += 1,
                3 => summary.three_point_scores += 1,
                _ => summary.two_point_scores += 1,
            }
        }
        summary
    }
}

/// Video facts shown alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub filename: String,
    /// Seconds.
    pub duration: f64,
}

/// Complete transformed view of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub video: VideoSummary,
    pub teams: Vec<Team>,
    pub events: Vec<GameEvent>,
    pub summary: BTreeMap<String, TeamSummary>,
}

impl GameData {
    /// Summary for the synthetic team. Present in every transformed payload.
    pub fn team_summary(&self) -> Option<&TeamSummary> {
        self.summary.get(TEAM_ID)
    }

    /// Events the detector was not sure about.
    pub fn low_confidence_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(|event| event.confidence < LOW_CONFIDENCE)
    }

    /// Mean confidence across all events, or zero when there are none.
    pub fn average_confidence(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        let total: f64 = self.events.iter().map(|event| event.confidence).sum();
        total / self.events.len() as f64
    }
}
