use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnnouncementRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS announcements (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            content    TEXT NOT NULL,
            author_id  TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &AnnouncementRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO announcements (id, title, content, author_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.title)
    .bind(&row.content)
    .bind(&row.author_id)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AnnouncementRow>, sqlx::Error> {
    sqlx::query_as::<_, AnnouncementRow>("SELECT * FROM announcements WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first.
pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<AnnouncementRow>, sqlx::Error> {
    sqlx::query_as::<_, AnnouncementRow>(
        "SELECT * FROM announcements ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &AnnouncementPatch,
    updated_at: DateTime<Utc>,
) -> Result<Option<AnnouncementRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE announcements SET
            title      = COALESCE(?, title),
            content    = COALESCE(?, content),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(&patch.title)
    .bind(&patch.content)
    .bind(updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
