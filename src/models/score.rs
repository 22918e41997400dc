use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub track_id: i64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// Perfect/good/miss breakdown owned by exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetail {
    pub score_id: i64,
    pub perfect: i64,
    pub good: i64,
    pub miss: i64,
}

/// A user's maximum score on one track and the moment it was first reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestScore {
    pub user_id: i64,
    pub score: i64,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetailInput {
    pub perfect: i64,
    pub good: i64,
    pub miss: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptInsert {
    pub user_id: i64,
    pub track_id: i64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub detail: Option<AttemptDetailInput>,
}
