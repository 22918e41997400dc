use crate::models::ledger::{PlayDates, PlayedTracksPage, TimelineLookup, TrackRank};
use crate::models::like::LikedTracksPage;

use super::{run_blocking, AppState, CommandResult};

pub async fn history_played_tracks(
    state: &AppState,
    user_id: i64,
    page: Option<i64>,
) -> CommandResult<PlayedTracksPage> {
    let history = state.history();
    let page = page.unwrap_or(1);
    run_blocking(state.query_timeout(), move || {
        history.list_played_tracks(user_id, page)
    })
    .await
}

pub async fn history_track_timeline(
    state: &AppState,
    user_id: i64,
    track_id: i64,
) -> CommandResult<TimelineLookup> {
    let timeline = state.timeline();
    run_blocking(state.query_timeout(), move || {
        timeline.build_timeline(user_id, track_id)
    })
    .await
}

pub async fn history_play_calendar(
    state: &AppState,
    user_id: i64,
    year: String,
    month: String,
) -> CommandResult<PlayDates> {
    let calendar = state.calendar();
    run_blocking(state.query_timeout(), move || {
        calendar.list_play_dates(user_id, &year, &month)
    })
    .await
}

pub async fn ranking_track_rank(
    state: &AppState,
    user_id: i64,
    track_id: i64,
) -> CommandResult<TrackRank> {
    let ranking = state.ranking();
    run_blocking(state.query_timeout(), move || ranking.rank_of(user_id, track_id)).await
}

pub async fn likes_list(
    state: &AppState,
    user_id: i64,
    page: Option<i64>,
) -> CommandResult<LikedTracksPage> {
    let likes = state.likes();
    let page = page.unwrap_or(1);
    run_blocking(state.query_timeout(), move || likes.list_liked_tracks(user_id, page)).await
}
