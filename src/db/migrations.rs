use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

const USER_VERSION: i32 = 2;

#[derive(Debug)]
pub struct MigrationInfo {
    pub version: i32,
    pub description: String,
    pub applied_at: DateTime<Utc>,
}

pub fn run(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS migration_history (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );
        "#,
    )?;

    let mut current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version < 1 {
        info!(target: "app::db", version = current_version, "running migration v1");
        migrate_to_v1(conn)?;
        current_version = 1;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(conn, 1, "Add track catalog, answer sheets and score ledger")?;
    }

    if current_version < 2 {
        info!(target: "app::db", version = current_version, "running migration v2");
        migrate_to_v2(conn)?;
        current_version = 2;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(conn, 2, "Add user likes")?;
    }

    if current_version != USER_VERSION {
        conn.execute(&format!("PRAGMA user_version = {}", USER_VERSION), [])?;
    }

    Ok(())
}

fn record_migration(conn: &Connection, version: i32, description: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO migration_history (version, description, applied_at) VALUES (?, ?, ?)",
        (version, description, now),
    )?;
    Ok(())
}

pub fn get_migration_history(conn: &Connection) -> AppResult<Vec<MigrationInfo>> {
    let mut stmt = conn.prepare(
        "SELECT version, description, applied_at FROM migration_history ORDER BY version",
    )?;

    let migrations = stmt
        .query_map([], |row| {
            let applied_at_str: String = row.get(2)?;
            let applied_at = DateTime::parse_from_rfc3339(&applied_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        2,
                        "applied_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Utc);

            Ok(MigrationInfo {
                version: row.get(0)?,
                description: row.get(1)?,
                applied_at,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(migrations)
}

fn migrate_to_v1(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            singer_name TEXT NOT NULL,
            album_image_url TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS track_answers (
            track_id INTEGER PRIMARY KEY REFERENCES tracks(id) ON DELETE CASCADE,
            total_score INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            track_id INTEGER NOT NULL,
            score INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_user_scores_user_track
            ON user_scores(user_id, track_id);
        CREATE INDEX IF NOT EXISTS idx_user_scores_track
            ON user_scores(track_id);
        CREATE INDEX IF NOT EXISTS idx_user_scores_user_created
            ON user_scores(user_id, created_at);

        CREATE TABLE IF NOT EXISTS user_score_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            score_id INTEGER NOT NULL UNIQUE REFERENCES user_scores(id) ON DELETE CASCADE,
            perfect INTEGER NOT NULL DEFAULT 0,
            good INTEGER NOT NULL DEFAULT 0,
            miss INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

fn migrate_to_v2(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user_likes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            track_id INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, track_id)
        );

        CREATE INDEX IF NOT EXISTS idx_user_likes_user
            ON user_likes(user_id);
        "#,
    )?;
    Ok(())
}
