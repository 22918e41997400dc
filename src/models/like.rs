use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedTrack {
    pub like_id: i64,
    pub track_id: i64,
    pub track_name: String,
    pub singer_name: String,
    pub album_image_url: String,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedTracksPage {
    pub items: Vec<LikedTrack>,
    pub max_page: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeInsert {
    pub user_id: i64,
    pub track_id: i64,
    pub created_at: DateTime<Utc>,
}
