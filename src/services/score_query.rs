use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::repositories::score_repository::ScoreRepository;
use crate::db::repositories::track_repository::TrackRepository;
use crate::error::{AppError, AppResult};
use crate::models::score::{Attempt, AttemptDetail, BestScore};
use crate::models::track::Track;

/// Read-only view of the score ledger.
///
/// Keyed lookups (`track_metadata`, `total_possible_score`,
/// `attempt_detail`) fail with [`AppError::NotFound`] when the key is absent;
/// collection lookups return an empty collection instead.
pub trait ScoreQuery {
    /// Attempts by the user, optionally restricted to one track, in
    /// chronological order.
    fn attempts_of(&self, user_id: i64, track_id: Option<i64>) -> AppResult<Vec<Attempt>>;

    /// Every player's best score on the track.
    fn best_score_per_user(&self, track_id: i64) -> AppResult<Vec<BestScore>>;

    fn distinct_track_ids_played(&self, user_id: i64) -> AppResult<Vec<i64>>;

    fn track_metadata(&self, track_id: i64) -> AppResult<Track>;

    fn total_possible_score(&self, track_id: i64) -> AppResult<i64>;

    fn attempt_detail(&self, attempt_id: i64) -> AppResult<AttemptDetail>;

    /// Attempt timestamps inside `[start, end)`.
    fn attempt_times_between(
        &self,
        user_id: i64,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>>;
}

/// [`ScoreQuery`] backed by one open SQLite connection.
pub struct SqliteScoreQuery<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteScoreQuery<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl ScoreQuery for SqliteScoreQuery<'_> {
    fn attempts_of(&self, user_id: i64, track_id: Option<i64>) -> AppResult<Vec<Attempt>> {
        ScoreRepository::list_by_user(self.conn, user_id, track_id)
    }

    fn best_score_per_user(&self, track_id: i64) -> AppResult<Vec<BestScore>> {
        let attempts = ScoreRepository::list_by_track(self.conn, track_id)?;
        Ok(reduce_best_scores(&attempts))
    }

    fn distinct_track_ids_played(&self, user_id: i64) -> AppResult<Vec<i64>> {
        ScoreRepository::distinct_track_ids(self.conn, user_id)
    }

    fn track_metadata(&self, track_id: i64) -> AppResult<Track> {
        TrackRepository::find_by_id(self.conn, track_id)?
            .ok_or_else(|| AppError::not_found("track", track_id))
    }

    fn total_possible_score(&self, track_id: i64) -> AppResult<i64> {
        TrackRepository::find_total_score(self.conn, track_id)?
            .ok_or_else(|| AppError::not_found("track total score", track_id))
    }

    fn attempt_detail(&self, attempt_id: i64) -> AppResult<AttemptDetail> {
        ScoreRepository::find_detail(self.conn, attempt_id)?
            .ok_or_else(|| AppError::not_found("attempt detail", attempt_id))
    }

    fn attempt_times_between(
        &self,
        user_id: i64,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        ScoreRepository::created_at_between(self.conn, user_id, start, end)
    }
}

/// Groups attempts by user and keeps each user's maximum score.
///
/// `achieved_at` is the earliest attempt that reached the maximum. Output is
/// ordered by user id so the result does not depend on input order.
pub fn reduce_best_scores(attempts: &[Attempt]) -> Vec<BestScore> {
    let mut best: HashMap<i64, BestScore> = HashMap::new();

    for attempt in attempts {
        best.entry(attempt.user_id)
            .and_modify(|current| {
                let higher = attempt.score > current.score;
                let earlier_tie =
                    attempt.score == current.score && attempt.created_at < current.achieved_at;
                if higher || earlier_tie {
                    current.score = attempt.score;
                    current.achieved_at = attempt.created_at;
                }
            })
            .or_insert_with(|| BestScore {
                user_id: attempt.user_id,
                score: attempt.score,
                achieved_at: attempt.created_at,
            });
    }

    let mut reduced: Vec<BestScore> = best.into_values().collect();
    reduced.sort_by_key(|entry| entry.user_id);
    reduced
}
