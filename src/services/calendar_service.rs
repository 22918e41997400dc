use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;
use tracing::debug;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::ledger::PlayDates;
use crate::services::score_query::{ScoreQuery, SqliteScoreQuery};

/// Stored timestamps only sort chronologically while the year has four digits.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Half-open UTC range covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub year: i32,
    pub month: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthRange {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !YEARS.contains(&year) {
            return Err(AppError::validation_with_details(
                "year must be between 1 and 9999",
                json!({ "year": year }),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(AppError::validation_with_details(
                "month must be between 1 and 12",
                json!({ "month": month }),
            ));
        }

        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1), 1)
        } else {
            (Some(year), month + 1)
        };

        let start = first_instant_of(year, month)?;
        let end = next_year
            .map(|next_year| first_instant_of(next_year, next_month))
            .transpose()?
            .ok_or_else(|| AppError::validation("year out of range"))?;

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// Parses user-supplied year and month strings such as `"2024"` and `"03"`.
    pub fn parse(year: &str, month: &str) -> AppResult<Self> {
        let year_value: i32 = year.trim().parse().map_err(|_| {
            AppError::validation_with_details("year must be numeric", json!({ "year": year }))
        })?;
        let month_value: u32 = month.trim().parse().map_err(|_| {
            AppError::validation_with_details("month must be numeric", json!({ "month": month }))
        })?;
        Self::new(year_value, month_value)
    }
}

fn first_instant_of(year: i32, month: u32) -> AppResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            AppError::validation_with_details(
                "year out of range",
                json!({ "year": year, "month": month }),
            )
        })
}

/// Activity calendar: which days of a month the user played on.
pub struct CalendarService {
    db: DbPool,
}

impl CalendarService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn list_play_dates(&self, user_id: i64, year: &str, month: &str) -> AppResult<PlayDates> {
        let range = MonthRange::parse(year, month)?;
        self.db
            .with_connection(|conn| collect_play_dates(&SqliteScoreQuery::new(conn), user_id, &range))
    }
}

pub fn collect_play_dates(
    query: &dyn ScoreQuery,
    user_id: i64,
    range: &MonthRange,
) -> AppResult<PlayDates> {
    let stamps = query.attempt_times_between(user_id, &range.start, &range.end)?;
    let dates = distinct_dates(&stamps);

    debug!(
        target: "app::ledger",
        user_id,
        year = range.year,
        month = range.month,
        attempts = stamps.len(),
        days = dates.len(),
        "play dates collected"
    );

    Ok(PlayDates {
        year: range.year,
        month: range.month,
        dates,
    })
}

/// Calendar days (UTC) of the given instants, ascending and deduplicated.
pub fn distinct_dates(stamps: &[DateTime<Utc>]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = stamps.iter().map(|stamp| stamp.date_naive()).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}
