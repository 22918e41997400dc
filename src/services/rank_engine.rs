use std::cmp::Ordering;

use tracing::debug;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::ledger::TrackRank;
use crate::models::score::BestScore;
use crate::services::score_query::{ScoreQuery, SqliteScoreQuery};

/// Global leaderboard position of a player's best score on a track.
pub struct RankEngine {
    db: DbPool,
}

impl RankEngine {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn rank_of(&self, user_id: i64, track_id: i64) -> AppResult<TrackRank> {
        let rank = self
            .db
            .with_connection(|conn| rank_with(&SqliteScoreQuery::new(conn), user_id, track_id))?;

        Ok(TrackRank {
            user_id,
            track_id,
            rank,
        })
    }
}

/// 1-based rank of `user_id` among every player's best score on `track_id`,
/// or `None` when the user has no attempt there.
pub fn rank_with(query: &dyn ScoreQuery, user_id: i64, track_id: i64) -> AppResult<Option<u32>> {
    let leaderboard = order_leaderboard(query.best_score_per_user(track_id)?);
    let rank = position_of(&leaderboard, user_id);

    debug!(
        target: "app::ledger",
        user_id,
        track_id,
        players = leaderboard.len(),
        rank = ?rank,
        "rank computed"
    );

    Ok(rank)
}

/// Sorts best scores into leaderboard order: score descending, then whoever
/// reached the score first, then user id.
pub fn order_leaderboard(mut bests: Vec<BestScore>) -> Vec<BestScore> {
    bests.sort_by(leaderboard_order);
    bests
}

fn leaderboard_order(a: &BestScore, b: &BestScore) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.achieved_at.cmp(&b.achieved_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

pub fn position_of(leaderboard: &[BestScore], user_id: i64) -> Option<u32> {
    leaderboard
        .iter()
        .position(|entry| entry.user_id == user_id)
        .map(|index| u32::try_from(index + 1).unwrap_or(u32::MAX))
}
