// Data-integrity failures, empty results and rejected input

use chrono::{TimeZone, Utc};
use rhythm_ledger_lib::db::repositories::score_repository::ScoreRepository;
use rhythm_ledger_lib::db::repositories::track_repository::TrackRepository;
use rhythm_ledger_lib::db::DbPool;
use rhythm_ledger_lib::error::AppError;
use rhythm_ledger_lib::models::score::{AttemptDetailInput, AttemptInsert};
use rhythm_ledger_lib::models::track::TrackInsert;
use rhythm_ledger_lib::services::calendar_service::CalendarService;
use rhythm_ledger_lib::services::history_service::HistoryService;
use rhythm_ledger_lib::services::timeline_service::TimelineService;
use tempfile::tempdir;

fn setup_pool() -> (DbPool, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("errors.sqlite")).expect("db pool");
    (pool, dir)
}

fn attempt(user_id: i64, track_id: i64, score: i64, detail: bool) -> AttemptInsert {
    AttemptInsert {
        user_id,
        track_id,
        score,
        created_at: Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
        detail: detail.then_some(AttemptDetailInput {
            perfect: 10,
            good: 2,
            miss: 1,
        }),
    }
}

fn track(id: i64, total_score: Option<i64>) -> TrackInsert {
    TrackInsert {
        id,
        name: "Orphaned".into(),
        singer_name: "Nobody".into(),
        album_image_url: "https://cdn.example/none.jpg".into(),
        total_score,
    }
}

#[test]
fn history_fails_when_track_metadata_is_missing() {
    let (pool, _dir) = setup_pool();
    pool.with_connection(|conn| ScoreRepository::insert_attempt(conn, &attempt(1, 404, 70, true)))
        .expect("seed attempt");

    let result = HistoryService::new(pool, 5).list_played_tracks(1, 1);

    match result {
        Err(AppError::NotFound { entity, key }) => {
            assert_eq!(entity, "track");
            assert_eq!(key, "404");
        }
        other => panic!("expected missing track, got {other:?}"),
    }
}

#[test]
fn history_fails_when_total_score_is_missing() {
    let (pool, _dir) = setup_pool();
    pool.with_connection(|conn| {
        TrackRepository::insert(conn, &track(5, None))?;
        ScoreRepository::insert_attempt(conn, &attempt(1, 5, 70, true))
    })
    .expect("seed");

    let result = HistoryService::new(pool, 5).list_played_tracks(1, 1);

    assert!(matches!(
        result,
        Err(AppError::NotFound {
            entity: "track total score",
            ..
        })
    ));
}

#[test]
fn timeline_fails_when_best_attempt_has_no_detail() {
    let (pool, _dir) = setup_pool();
    pool.with_connection(|conn| {
        TrackRepository::insert(conn, &track(5, Some(100)))?;
        ScoreRepository::insert_attempt(conn, &attempt(1, 5, 70, false))
    })
    .expect("seed");

    let result = TimelineService::new(pool).build_timeline(1, 5);

    assert!(matches!(
        result,
        Err(AppError::NotFound {
            entity: "attempt detail",
            ..
        })
    ));
}

#[test]
fn timeline_without_attempts_is_empty_not_an_error() {
    let (pool, _dir) = setup_pool();
    pool.with_connection(|conn| TrackRepository::insert(conn, &track(5, Some(100))))
        .expect("seed");

    let lookup = TimelineService::new(pool)
        .build_timeline(1, 5)
        .expect("empty lookup");

    assert!(lookup.is_empty());
    assert_eq!(serde_json::to_value(&lookup).unwrap(), serde_json::json!({}));
}

#[test]
fn calendar_rejects_invalid_months() {
    let (pool, _dir) = setup_pool();
    let calendar = CalendarService::new(pool);

    for (year, month) in [("2024", "13"), ("2024", "00"), ("2024", "3a"), ("", "3")] {
        let result = calendar.list_play_dates(1, year, month);
        assert!(
            matches!(result, Err(AppError::Validation { .. })),
            "{year:?}/{month:?} should be rejected"
        );
    }
}

#[test]
fn duplicate_attempt_detail_is_a_conflict() {
    let (pool, _dir) = setup_pool();
    let result = pool.with_connection(|conn| {
        let id = ScoreRepository::insert_attempt(conn, &attempt(1, 5, 70, true))?;
        conn.execute(
            "INSERT INTO user_score_details (score_id, perfect, good, miss) VALUES (?1, 1, 1, 1)",
            [id],
        )?;
        Ok(())
    });

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[test]
fn calendar_handles_the_last_four_digit_december() {
    let (pool, _dir) = setup_pool();
    pool.with_connection(|conn| {
        ScoreRepository::insert_attempt(
            conn,
            &AttemptInsert {
                created_at: Utc.with_ymd_and_hms(9999, 12, 15, 0, 0, 0).unwrap(),
                ..attempt(1, 5, 70, false)
            },
        )
    })
    .expect("seed");
    let calendar = CalendarService::new(pool);

    let dates = calendar.list_play_dates(1, "9999", "12").expect("december 9999");
    assert_eq!(dates.dates.len(), 1);

    for year in ["10000", "0", "-12"] {
        assert!(
            matches!(
                calendar.list_play_dates(1, year, "1"),
                Err(AppError::Validation { .. })
            ),
            "year {year} should be rejected"
        );
    }
}
