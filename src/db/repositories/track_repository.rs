use rusqlite::{named_params, Connection, OptionalExtension};

use crate::error::AppResult;
use crate::models::track::{Track, TrackInsert};

pub struct TrackRepository;

impl TrackRepository {
    pub fn insert(conn: &Connection, input: &TrackInsert) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO tracks (id, name, singer_name, album_image_url)
                VALUES (:id, :name, :singer_name, :album_image_url)
            "#,
            named_params! {
                ":id": input.id,
                ":name": input.name.trim(),
                ":singer_name": input.singer_name.trim(),
                ":album_image_url": &input.album_image_url,
            },
        )?;

        if let Some(total_score) = input.total_score {
            Self::upsert_total_score(conn, input.id, total_score)?;
        }

        Ok(())
    }

    pub fn upsert_total_score(conn: &Connection, track_id: i64, total_score: i64) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO track_answers (track_id, total_score)
                VALUES (:track_id, :total_score)
                ON CONFLICT(track_id) DO UPDATE SET
                    total_score = excluded.total_score
            "#,
            named_params! {
                ":track_id": track_id,
                ":total_score": total_score,
            },
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, track_id: i64) -> AppResult<Option<Track>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, name, singer_name, album_image_url
                FROM tracks
                WHERE id = :id
            "#,
        )?;

        let track = stmt
            .query_row(named_params! {":id": track_id}, |row| {
                Ok(Track {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    singer_name: row.get("singer_name")?,
                    album_image_url: row.get("album_image_url")?,
                })
            })
            .optional()?;

        Ok(track)
    }

    pub fn find_total_score(conn: &Connection, track_id: i64) -> AppResult<Option<i64>> {
        let total = conn
            .query_row(
                "SELECT total_score FROM track_answers WHERE track_id = ?1",
                [track_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(total)
    }
}
