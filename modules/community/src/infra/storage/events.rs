use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id           TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            description  TEXT,
            location     TEXT,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            organizer_id TEXT,
            created_at   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &EventRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, title, description, location, start_time, end_time, organizer_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.title)
    .bind(&row.description)
    .bind(&row.location)
    .bind(row.start_time)
    .bind(row.end_time)
    .bind(&row.organizer_id)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Events ending after `after`, soonest first.
pub async fn find_upcoming(
    pool: &SqlitePool,
    after: DateTime<Utc>,
    limit: u32,
    offset: u32,
) -> Result<Vec<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(
        "SELECT * FROM events WHERE end_time > ? ORDER BY start_time ASC LIMIT ? OFFSET ?",
    )
    .bind(after)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &EventPatch,
) -> Result<Option<EventRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE events SET
            title       = COALESCE(?, title),
            description = COALESCE(?, description),
            location    = COALESCE(?, location),
            start_time  = COALESCE(?, start_time),
            end_time    = COALESCE(?, end_time)
         WHERE id = ?",
    )
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.location)
    .bind(patch.start_time)
    .bind(patch.end_time)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_by_organizer(pool: &SqlitePool, organizer_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE organizer_id = ?")
        .bind(organizer_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn event(id: &str, start_in: Duration) -> EventRow {
        let start = Utc::now() + start_in;
        EventRow {
            id: id.to_string(),
            title: format!("event {id}"),
            description: None,
            location: Some("Main Hall".to_string()),
            start_time: start,
            end_time: start + Duration::hours(2),
            organizer_id: Some("org-1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upcoming_excludes_finished_events_and_sorts_by_start() {
        let pool = test_pool().await;
        insert(&pool, &event("past", Duration::days(-2))).await.unwrap();
        insert(&pool, &event("soon", Duration::hours(1))).await.unwrap();
        insert(&pool, &event("later", Duration::days(3))).await.unwrap();

        let upcoming = find_upcoming(&pool, Utc::now(), 50, 0).await.unwrap();
        let ids: Vec<&str> = upcoming.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["soon", "later"]);
    }
}
