use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rhythm_ledger_lib::db::repositories::score_repository::ScoreRepository;
use rhythm_ledger_lib::db::repositories::track_repository::TrackRepository;
use rhythm_ledger_lib::db::DbPool;
use rhythm_ledger_lib::models::score::{AttemptDetailInput, AttemptInsert};
use rhythm_ledger_lib::models::track::TrackInsert;
use rhythm_ledger_lib::services::calendar_service::CalendarService;
use rhythm_ledger_lib::services::history_service::HistoryService;
use rhythm_ledger_lib::services::rank_engine::RankEngine;
use rhythm_ledger_lib::services::timeline_service::TimelineService;
use tempfile::tempdir;

const PLAYER: i64 = 7;
const RIVAL: i64 = 8;

fn seed_track(pool: &DbPool, id: i64, total: i64) {
    pool.with_connection(|conn| {
        TrackRepository::insert(
            conn,
            &TrackInsert {
                id,
                name: format!("Song {id}"),
                singer_name: format!("Artist {id}"),
                album_image_url: format!("https://cdn.example/albums/{id}.jpg"),
                total_score: Some(total),
            },
        )
    })
    .expect("seed track");
}

fn seed_attempt(pool: &DbPool, user_id: i64, track_id: i64, score: i64, at: DateTime<Utc>) -> i64 {
    pool.with_connection(|conn| {
        ScoreRepository::insert_attempt(
            conn,
            &AttemptInsert {
                user_id,
                track_id,
                score,
                created_at: at,
                detail: Some(AttemptDetailInput {
                    perfect: score / 2,
                    good: score / 4,
                    miss: 3,
                }),
            },
        )
    })
    .expect("seed attempt")
}

#[test]
fn march_scenario_timeline_calendar_and_rank() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ledger.sqlite")).expect("db pool");

    seed_track(&pool, 1, 100);
    let first = Utc.with_ymd_and_hms(2024, 3, 4, 19, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 3, 11, 21, 30, 0).unwrap();
    let third = Utc.with_ymd_and_hms(2024, 3, 25, 8, 15, 0).unwrap();
    seed_attempt(&pool, PLAYER, 1, 80, first);
    seed_attempt(&pool, PLAYER, 1, 95, second);
    seed_attempt(&pool, PLAYER, 1, 60, third);

    let timeline_service = TimelineService::new(pool.clone());
    let lookup = timeline_service.build_timeline(PLAYER, 1).expect("timeline");
    let timeline = lookup.found().expect("player has attempts");

    assert_eq!(timeline.best.score, 95);
    assert_eq!(timeline.best.rank, 1);
    assert_eq!(timeline.best.perfect, 47);
    assert_eq!(timeline.best.good, 23);
    assert_eq!(timeline.best.miss, 3);
    assert_eq!(timeline.track_total_score, 100);
    assert_eq!(timeline.timeline.len(), 3);
    let stamps: Vec<DateTime<Utc>> = timeline.timeline.iter().map(|e| e.created_at).collect();
    assert_eq!(stamps, vec![first, second, third]);

    let calendar = CalendarService::new(pool.clone())
        .list_play_dates(PLAYER, "2024", "03")
        .expect("calendar");
    assert_eq!(
        calendar.dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 25).unwrap(),
        ]
    );

    let rank = RankEngine::new(pool.clone()).rank_of(PLAYER, 1).expect("rank");
    assert_eq!(rank.rank, Some(1));
}

#[test]
fn rank_moves_when_a_rival_scores_higher() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ledger.sqlite")).expect("db pool");
    seed_track(&pool, 1, 100);

    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    seed_attempt(&pool, PLAYER, 1, 90, base);
    seed_attempt(&pool, RIVAL, 1, 97, base + Duration::minutes(5));
    seed_attempt(&pool, RIVAL, 1, 10, base + Duration::minutes(9));

    let engine = RankEngine::new(pool.clone());
    assert_eq!(engine.rank_of(RIVAL, 1).unwrap().rank, Some(1));
    assert_eq!(engine.rank_of(PLAYER, 1).unwrap().rank, Some(2));
    assert_eq!(engine.rank_of(99, 1).unwrap().rank, None);

    let timeline = TimelineService::new(pool.clone())
        .build_timeline(PLAYER, 1)
        .expect("timeline");
    assert_eq!(timeline.found().map(|t| t.best.rank), Some(2));
}

#[test]
fn equal_best_scores_rank_by_who_got_there_first() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ledger.sqlite")).expect("db pool");
    seed_track(&pool, 1, 100);

    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    seed_attempt(&pool, RIVAL, 1, 88, base + Duration::hours(2));
    seed_attempt(&pool, PLAYER, 1, 88, base);

    let engine = RankEngine::new(pool.clone());
    assert_eq!(engine.rank_of(PLAYER, 1).unwrap().rank, Some(1));
    assert_eq!(engine.rank_of(RIVAL, 1).unwrap().rank, Some(2));
}

#[test]
fn played_tracks_paginate_by_five() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ledger.sqlite")).expect("db pool");
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for track_id in 1..=12 {
        seed_track(&pool, track_id, 1_000 + track_id);
        seed_attempt(&pool, PLAYER, track_id, 300 + track_id, base + Duration::days(track_id));
        seed_attempt(&pool, PLAYER, track_id, 200, base + Duration::days(40 + track_id));
    }

    let history = HistoryService::new(pool.clone(), 5);

    let third = history.list_played_tracks(PLAYER, 3).expect("page 3");
    assert_eq!(third.max_page, 3);
    let ids: Vec<i64> = third.items.iter().map(|item| item.track_id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(third.items[1].user_best_score, 312);
    assert_eq!(third.items[1].track_total_score, 1_012);
    assert_eq!(third.items[1].singer_name, "Artist 12");

    let clamped = history.list_played_tracks(PLAYER, 30).expect("page 30");
    assert_eq!(clamped, third);

    let everything = history.list_played_tracks(PLAYER, 0).expect("page 0");
    assert_eq!(everything.items.len(), 12);
    assert_eq!(everything.max_page, 3);

    let again = history.list_played_tracks(PLAYER, 3).expect("page 3 again");
    assert_eq!(again, third);
}

#[test]
fn calendar_excludes_neighbouring_months() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ledger.sqlite")).expect("db pool");
    seed_track(&pool, 1, 100);

    seed_attempt(&pool, PLAYER, 1, 50, Utc.with_ymd_and_hms(2023, 11, 30, 23, 59, 59).unwrap());
    seed_attempt(&pool, PLAYER, 1, 50, Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
    seed_attempt(&pool, PLAYER, 1, 50, Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap());
    seed_attempt(&pool, PLAYER, 1, 50, Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap());
    seed_attempt(&pool, PLAYER, 1, 50, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    seed_attempt(&pool, RIVAL, 1, 50, Utc.with_ymd_and_hms(2023, 12, 15, 0, 0, 0).unwrap());

    let calendar = CalendarService::new(pool.clone())
        .list_play_dates(PLAYER, "2023", "12")
        .expect("calendar");

    assert_eq!(calendar.year, 2023);
    assert_eq!(calendar.month, 12);
    assert_eq!(
        calendar.dates,
        vec![
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        ]
    );
}
