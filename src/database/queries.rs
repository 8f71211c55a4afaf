use crate::attendance::record::StoredRecord;
use crate::database::models::AttendanceRow;
use sqlx::{Row, SqlitePool};

// Append-only: this module never issues UPDATE or DELETE.

pub async fn insert_attendance_record(
    pool: &SqlitePool,
    record: &StoredRecord,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO attendance_records (email, action, time, location) VALUES (?, ?, ?, ?)",
    )
    .bind(&record.email)
    .bind(&record.action)
    .bind(&record.time)
    .bind(&record.location)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_recent_records(
    pool: &SqlitePool,
    email: &str,
    limit: usize,
) -> Result<Vec<AttendanceRow>, sqlx::Error> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    sqlx::query_as::<_, AttendanceRow>(
        "SELECT email, action, time, location
         FROM attendance_records
         WHERE email = ? COLLATE NOCASE
         ORDER BY time DESC, id DESC
         LIMIT ?",
    )
    .bind(email)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_latest_action(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    let row_opt = sqlx::query(
        "SELECT action
         FROM attendance_records
         WHERE email = ? COLLATE NOCASE
         ORDER BY time DESC, id DESC
         LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row_opt.map(|row| row.get("action")))
}
