use std::cmp::Ordering;

use tracing::debug;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::ledger::{BestAttemptSummary, TimelineEntry, TimelineLookup, TrackTimeline};
use crate::models::score::Attempt;
use crate::services::rank_engine::rank_with;
use crate::services::score_query::{ScoreQuery, SqliteScoreQuery};

/// Progress-over-time view of one player's attempts on one track.
pub struct TimelineService {
    db: DbPool,
}

impl TimelineService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn build_timeline(&self, user_id: i64, track_id: i64) -> AppResult<TimelineLookup> {
        self.db
            .with_connection(|conn| assemble_timeline(&SqliteScoreQuery::new(conn), user_id, track_id))
    }
}

pub fn assemble_timeline(
    query: &dyn ScoreQuery,
    user_id: i64,
    track_id: i64,
) -> AppResult<TimelineLookup> {
    let attempts = query.attempts_of(user_id, Some(track_id))?;

    let Some(best) = pick_best_attempt(&attempts) else {
        debug!(target: "app::ledger", user_id, track_id, "no attempts, empty timeline");
        return Ok(TimelineLookup::Empty {});
    };

    let detail = query.attempt_detail(best.id)?;
    // The user holds at least one attempt, so a missing rank means the ledger
    // changed between the two reads.
    let rank = rank_with(query, user_id, track_id)?.ok_or_else(|| {
        AppError::other(format!(
            "user {user_id} has attempts on track {track_id} but no leaderboard entry"
        ))
    })?;
    let track_total_score = query.total_possible_score(track_id)?;

    let mut timeline: Vec<TimelineEntry> = attempts
        .iter()
        .map(|attempt| TimelineEntry {
            score: attempt.score,
            created_at: attempt.created_at,
        })
        .collect();
    timeline.sort_by_key(|entry| entry.created_at);

    Ok(TimelineLookup::Found(TrackTimeline {
        track_id,
        best: BestAttemptSummary {
            score: best.score,
            rank,
            perfect: detail.perfect,
            good: detail.good,
            miss: detail.miss,
        },
        track_total_score,
        timeline,
    }))
}

/// Highest score wins; ties go to the earliest attempt, then the lowest id.
pub fn pick_best_attempt(attempts: &[Attempt]) -> Option<&Attempt> {
    attempts.iter().min_by(|a, b| best_first(a, b))
}

fn best_first(a: &Attempt, b: &Attempt) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
