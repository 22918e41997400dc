use tracing::debug;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::ledger::{PlayedTracksPage, TrackSummary};
use crate::services::pagination;
use crate::services::score_query::{ScoreQuery, SqliteScoreQuery};

/// Paginated "tracks played" history with per-track best scores.
pub struct HistoryService {
    db: DbPool,
    page_size: u64,
}

impl HistoryService {
    pub fn new(db: DbPool, page_size: usize) -> Self {
        Self {
            db,
            page_size: page_size as u64,
        }
    }

    /// Lists the distinct tracks the user played. `requested_page <= 0`
    /// returns every track.
    pub fn list_played_tracks(
        &self,
        user_id: i64,
        requested_page: i64,
    ) -> AppResult<PlayedTracksPage> {
        self.db.with_connection(|conn| {
            collect_played_tracks(
                &SqliteScoreQuery::new(conn),
                user_id,
                requested_page,
                self.page_size,
            )
        })
    }
}

pub fn collect_played_tracks(
    query: &dyn ScoreQuery,
    user_id: i64,
    requested_page: i64,
    page_size: u64,
) -> AppResult<PlayedTracksPage> {
    let track_ids = query.distinct_track_ids_played(user_id)?;
    let window = pagination::clamp(track_ids.len() as u64, page_size, requested_page)?;

    let items = window
        .slice(&track_ids)
        .iter()
        .map(|&track_id| summarize_track(query, user_id, track_id))
        .collect::<AppResult<Vec<_>>>()?;

    debug!(
        target: "app::ledger",
        user_id,
        requested_page,
        effective_page = ?window.effective_page(),
        max_page = window.max_page(),
        items = items.len(),
        "played tracks listed"
    );

    Ok(PlayedTracksPage {
        items,
        max_page: window.max_page(),
    })
}

fn summarize_track(query: &dyn ScoreQuery, user_id: i64, track_id: i64) -> AppResult<TrackSummary> {
    let track = query.track_metadata(track_id)?;
    let track_total_score = query.total_possible_score(track_id)?;
    let user_best_score = query
        .attempts_of(user_id, Some(track_id))?
        .iter()
        .map(|attempt| attempt.score)
        .max()
        .ok_or_else(|| AppError::not_found("attempt", format!("user {user_id} track {track_id}")))?;

    Ok(TrackSummary {
        track_id,
        track_name: track.name,
        album_image_url: track.album_image_url,
        singer_name: track.singer_name,
        user_best_score,
        track_total_score,
    })
}
