use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: i64,
    pub name: String,
    pub singer_name: String,
    pub album_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInsert {
    pub id: i64,
    pub name: String,
    pub singer_name: String,
    pub album_image_url: String,
    /// Answer-sheet total; `None` leaves the track without one.
    #[serde(default)]
    pub total_score: Option<i64>,
}
