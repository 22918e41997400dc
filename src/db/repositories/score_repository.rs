use std::convert::TryFrom;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::db::{parse_db_timestamp, to_db_timestamp};
use crate::error::{AppError, AppResult};
use crate::models::score::{Attempt, AttemptDetail, AttemptInsert};

const BASE_SELECT: &str = r#"
    SELECT
        id,
        user_id,
        track_id,
        score,
        created_at
    FROM user_scores
"#;

#[derive(Debug, Clone)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub track_id: i64,
    pub score: i64,
    pub created_at: String,
}

impl AttemptRow {
    pub fn into_record(self) -> AppResult<Attempt> {
        Ok(Attempt {
            id: self.id,
            user_id: self.user_id,
            track_id: self.track_id,
            score: self.score,
            created_at: parse_db_timestamp(&self.created_at)?,
        })
    }
}

impl TryFrom<&Row<'_>> for AttemptRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            track_id: row.get("track_id")?,
            score: row.get("score")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct ScoreRepository;

impl ScoreRepository {
    /// Records an attempt and, when supplied, its judgement breakdown.
    pub fn insert_attempt(conn: &Connection, input: &AttemptInsert) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO user_scores (user_id, track_id, score, created_at)
                VALUES (:user_id, :track_id, :score, :created_at)
            "#,
            named_params! {
                ":user_id": input.user_id,
                ":track_id": input.track_id,
                ":score": input.score,
                ":created_at": to_db_timestamp(&input.created_at),
            },
        )?;
        let attempt_id = conn.last_insert_rowid();

        if let Some(detail) = input.detail {
            conn.execute(
                r#"
                    INSERT INTO user_score_details (score_id, perfect, good, miss)
                    VALUES (:score_id, :perfect, :good, :miss)
                "#,
                named_params! {
                    ":score_id": attempt_id,
                    ":perfect": detail.perfect,
                    ":good": detail.good,
                    ":miss": detail.miss,
                },
            )?;
        }

        Ok(attempt_id)
    }

    pub fn list_by_user(
        conn: &Connection,
        user_id: i64,
        track_id: Option<i64>,
    ) -> AppResult<Vec<Attempt>> {
        let sql = format!(
            "{BASE_SELECT}
            WHERE user_id = :user_id
              AND (:track_id IS NULL OR track_id = :track_id)
            ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(
                named_params! {":user_id": user_id, ":track_id": track_id},
                |row| AttemptRow::try_from(row),
            )?
            .map(|row| row.map_err(AppError::from).and_then(AttemptRow::into_record))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn list_by_track(conn: &Connection, track_id: i64) -> AppResult<Vec<Attempt>> {
        let sql = format!(
            "{BASE_SELECT}
            WHERE track_id = :track_id
            ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(named_params! {":track_id": track_id}, |row| {
                AttemptRow::try_from(row)
            })?
            .map(|row| row.map_err(AppError::from).and_then(AttemptRow::into_record))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// Track ids the user has at least one attempt on, ascending.
    pub fn distinct_track_ids(conn: &Connection, user_id: i64) -> AppResult<Vec<i64>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT DISTINCT track_id
                FROM user_scores
                WHERE user_id = :user_id
                ORDER BY track_id ASC
            "#,
        )?;

        let ids = stmt
            .query_map(named_params! {":user_id": user_id}, |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Attempt timestamps in the half-open range `[start, end)`, ascending.
    ///
    /// The bound is sent as the last stored millisecond before `end`, which
    /// keeps it four-digit (and so comparable as text) when `end` is the first
    /// instant of year 10000.
    pub fn created_at_between(
        conn: &Connection,
        user_id: i64,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let last = *end - Duration::milliseconds(1);
        let mut stmt = conn.prepare(
            r#"
                SELECT created_at
                FROM user_scores
                WHERE user_id = :user_id
                  AND created_at >= :start
                  AND created_at <= :last
                ORDER BY created_at ASC
            "#,
        )?;

        let stamps = stmt
            .query_map(
                named_params! {
                    ":user_id": user_id,
                    ":start": to_db_timestamp(start),
                    ":last": to_db_timestamp(&last),
                },
                |row| row.get::<_, String>(0),
            )?
            .map(|raw| {
                raw.map_err(AppError::from)
                    .and_then(|raw| parse_db_timestamp(&raw))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(stamps)
    }

    pub fn find_detail(conn: &Connection, attempt_id: i64) -> AppResult<Option<AttemptDetail>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT score_id, perfect, good, miss
                FROM user_score_details
                WHERE score_id = :score_id
            "#,
        )?;

        let detail = stmt
            .query_row(named_params! {":score_id": attempt_id}, |row| {
                Ok(AttemptDetail {
                    score_id: row.get("score_id")?,
                    perfect: row.get("perfect")?,
                    good: row.get("good")?,
                    miss: row.get("miss")?,
                })
            })
            .optional()?;

        Ok(detail)
    }
}
