use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: String,
    pub discussion_id: String,
    pub author_id: String,
    pub content: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id            TEXT PRIMARY KEY,
            discussion_id TEXT NOT NULL,
            author_id     TEXT NOT NULL,
            content       TEXT NOT NULL,
            votes         INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &CommentRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO comments (id, discussion_id, author_id, content, votes, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.discussion_id)
    .bind(&row.author_id)
    .bind(&row.content)
    .bind(row.votes)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Oldest first, the reading order of a thread.
pub async fn find_by_discussion(
    pool: &SqlitePool,
    discussion_id: &str,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        "SELECT * FROM comments WHERE discussion_id = ? ORDER BY created_at ASC",
    )
    .bind(discussion_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_discussion(
    pool: &SqlitePool,
    discussion_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE discussion_id = ?")
        .bind(discussion_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_by_author(pool: &SqlitePool, author_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
