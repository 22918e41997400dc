use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::db::{parse_db_timestamp, to_db_timestamp};
use crate::error::{AppError, AppResult};
use crate::models::like::{LikeInsert, LikedTrack};

#[derive(Debug, Clone)]
pub struct LikedTrackRow {
    pub like_id: i64,
    pub track_id: i64,
    pub track_name: String,
    pub singer_name: String,
    pub album_image_url: String,
    pub created_at: String,
}

impl LikedTrackRow {
    pub fn into_record(self) -> AppResult<LikedTrack> {
        Ok(LikedTrack {
            like_id: self.like_id,
            track_id: self.track_id,
            track_name: self.track_name,
            singer_name: self.singer_name,
            album_image_url: self.album_image_url,
            liked_at: parse_db_timestamp(&self.created_at)?,
        })
    }
}

impl TryFrom<&Row<'_>> for LikedTrackRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            like_id: row.get("like_id")?,
            track_id: row.get("track_id")?,
            track_name: row.get("track_name")?,
            singer_name: row.get("singer_name")?,
            album_image_url: row.get("album_image_url")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct LikeRepository;

impl LikeRepository {
    pub fn insert(conn: &Connection, input: &LikeInsert) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO user_likes (user_id, track_id, created_at)
                VALUES (:user_id, :track_id, :created_at)
            "#,
            named_params! {
                ":user_id": input.user_id,
                ":track_id": input.track_id,
                ":created_at": to_db_timestamp(&input.created_at),
            },
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn count_by_user(conn: &Connection, user_id: i64) -> AppResult<u64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_likes WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Liked tracks in like order. `window` is `(offset, limit)`; `None`
    /// returns every like.
    pub fn list_by_user(
        conn: &Connection,
        user_id: i64,
        window: Option<(u64, u64)>,
    ) -> AppResult<Vec<LikedTrack>> {
        // SQLite treats a negative LIMIT as "no limit".
        let (offset, limit) = window
            .map(|(offset, limit)| (offset as i64, limit as i64))
            .unwrap_or((0, -1));

        let mut stmt = conn.prepare(
            r#"
                SELECT
                    l.id AS like_id,
                    l.track_id AS track_id,
                    t.name AS track_name,
                    t.singer_name AS singer_name,
                    t.album_image_url AS album_image_url,
                    l.created_at AS created_at
                FROM user_likes l
                JOIN tracks t ON t.id = l.track_id
                WHERE l.user_id = :user_id
                ORDER BY l.id ASC
                LIMIT :limit OFFSET :offset
            "#,
        )?;

        let rows = stmt
            .query_map(
                named_params! {
                    ":user_id": user_id,
                    ":limit": limit,
                    ":offset": offset,
                },
                |row| LikedTrackRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(LikedTrackRow::into_record)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }
}
