use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the "tracks played" history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub track_id: i64,
    pub track_name: String,
    pub album_image_url: String,
    pub singer_name: String,
    pub user_best_score: i64,
    pub track_total_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedTracksPage {
    pub items: Vec<TrackSummary>,
    pub max_page: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestAttemptSummary {
    pub score: i64,
    pub rank: u32,
    pub perfect: i64,
    pub good: i64,
    pub miss: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackTimeline {
    pub track_id: i64,
    pub best: BestAttemptSummary,
    pub track_total_score: i64,
    pub timeline: Vec<TimelineEntry>,
}

/// Result of a timeline request. A user without attempts on the track gets
/// `Empty`, which serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimelineLookup {
    Found(TrackTimeline),
    Empty {},
}

impl TimelineLookup {
    pub fn is_empty(&self) -> bool {
        matches!(self, TimelineLookup::Empty {})
    }

    pub fn found(&self) -> Option<&TrackTimeline> {
        match self {
            TimelineLookup::Found(timeline) => Some(timeline),
            TimelineLookup::Empty {} => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayDates {
    pub year: i32,
    pub month: u32,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRank {
    pub user_id: i64,
    pub track_id: i64,
    /// `None` when the user never played the track.
    pub rank: Option<u32>,
}
