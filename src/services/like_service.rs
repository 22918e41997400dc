use tracing::debug;

use crate::db::repositories::like_repository::LikeRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::like::LikedTracksPage;
use crate::services::pagination;

/// Paginated list of the tracks a user has liked.
pub struct LikeService {
    db: DbPool,
    page_size: u64,
}

impl LikeService {
    pub fn new(db: DbPool, page_size: usize) -> Self {
        Self {
            db,
            page_size: page_size as u64,
        }
    }

    /// Same paging contract as the played-track history: pages past the end
    /// clamp to the last page and `requested_page <= 0` returns every like.
    pub fn list_liked_tracks(&self, user_id: i64, requested_page: i64) -> AppResult<LikedTracksPage> {
        self.db.with_connection(|conn| {
            let total = LikeRepository::count_by_user(conn, user_id)?;
            let window = pagination::clamp(total, self.page_size, requested_page)?;
            let items = LikeRepository::list_by_user(conn, user_id, window.bounds())?;

            debug!(
                target: "app::ledger",
                user_id,
                requested_page,
                effective_page = ?window.effective_page(),
                max_page = window.max_page(),
                items = items.len(),
                "liked tracks listed"
            );

            Ok(LikedTracksPage {
                items,
                max_page: window.max_page(),
            })
        })
    }
}
