use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CareerPostRow {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub post_type: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub posted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS career_posts (
            id           TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            company      TEXT NOT NULL,
            description  TEXT NOT NULL,
            requirements TEXT,
            location     TEXT,
            post_type    TEXT,
            deadline     TEXT,
            posted_by    TEXT,
            created_at   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &CareerPostRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO career_posts
            (id, title, company, description, requirements, location, post_type, deadline, posted_by, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.title)
    .bind(&row.company)
    .bind(&row.description)
    .bind(&row.requirements)
    .bind(&row.location)
    .bind(&row.post_type)
    .bind(row.deadline)
    .bind(&row.posted_by)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<CareerPostRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerPostRow>("SELECT * FROM career_posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first.
pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<CareerPostRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerPostRow>(
        "SELECT * FROM career_posts ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM career_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
