use chrono::{Duration, TimeZone, Utc};
use rhythm_ledger_lib::db::repositories::like_repository::LikeRepository;
use rhythm_ledger_lib::db::repositories::track_repository::TrackRepository;
use rhythm_ledger_lib::db::DbPool;
use rhythm_ledger_lib::models::like::LikeInsert;
use rhythm_ledger_lib::models::track::TrackInsert;
use rhythm_ledger_lib::services::like_service::LikeService;
use tempfile::tempdir;

#[test]
fn liked_tracks_follow_the_history_paging_contract() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("likes.sqlite")).expect("db pool");
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

    pool.with_connection(|conn| {
        for id in 1..=7 {
            TrackRepository::insert(
                conn,
                &TrackInsert {
                    id,
                    name: format!("Song {id}"),
                    singer_name: format!("Artist {id}"),
                    album_image_url: format!("https://cdn.example/{id}.jpg"),
                    total_score: Some(100),
                },
            )?;
            LikeRepository::insert(
                conn,
                &LikeInsert {
                    user_id: 1,
                    track_id: id,
                    created_at: base + Duration::hours(id),
                },
            )?;
        }
        LikeRepository::insert(
            conn,
            &LikeInsert {
                user_id: 2,
                track_id: 3,
                created_at: base,
            },
        )?;
        Ok(())
    })
    .expect("seed likes");

    let likes = LikeService::new(pool.clone(), 5);

    let first = likes.list_liked_tracks(1, 1).expect("page 1");
    assert_eq!(first.max_page, 2);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].track_name, "Song 1");
    assert_eq!(first.items[0].liked_at, base + Duration::hours(1));

    let last = likes.list_liked_tracks(1, 99).expect("clamped page");
    let ids: Vec<i64> = last.items.iter().map(|item| item.track_id).collect();
    assert_eq!(ids, vec![6, 7]);

    let all = likes.list_liked_tracks(1, -1).expect("everything");
    assert_eq!(all.items.len(), 7);
    assert_eq!(all.max_page, 2);

    let nobody = likes.list_liked_tracks(3, 1).expect("no likes");
    assert!(nobody.items.is_empty());
    assert_eq!(nobody.max_page, 0);
}

#[test]
fn liking_the_same_track_twice_conflicts() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("likes.sqlite")).expect("db pool");
    let like = LikeInsert {
        user_id: 1,
        track_id: 1,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
    };

    let result = pool.with_connection(|conn| {
        TrackRepository::insert(
            conn,
            &TrackInsert {
                id: 1,
                name: "Song".into(),
                singer_name: "Artist".into(),
                album_image_url: "https://cdn.example/1.jpg".into(),
                total_score: None,
            },
        )?;
        LikeRepository::insert(conn, &like)?;
        LikeRepository::insert(conn, &like)?;
        Ok(())
    });

    assert!(matches!(
        result,
        Err(rhythm_ledger_lib::error::AppError::Conflict { .. })
    ));
}
