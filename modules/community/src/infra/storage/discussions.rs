use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Discussion row. Tags are stored as a JSON array in a text column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiscussionRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub author_id: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DiscussionPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discussions (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            content    TEXT NOT NULL,
            category   TEXT NOT NULL,
            tags       TEXT NOT NULL DEFAULT '[]',
            author_id  TEXT NOT NULL,
            votes      INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &DiscussionRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO discussions (id, title, content, category, tags, author_id, votes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.title)
    .bind(&row.content)
    .bind(&row.category)
    .bind(&row.tags)
    .bind(&row.author_id)
    .bind(row.votes)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<DiscussionRow>, sqlx::Error> {
    sqlx::query_as::<_, DiscussionRow>("SELECT * FROM discussions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first.
pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<DiscussionRow>, sqlx::Error> {
    sqlx::query_as::<_, DiscussionRow>(
        "SELECT * FROM discussions ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &DiscussionPatch,
    updated_at: DateTime<Utc>,
) -> Result<Option<DiscussionRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE discussions SET
            title      = COALESCE(?, title),
            content    = COALESCE(?, content),
            category   = COALESCE(?, category),
            tags       = COALESCE(?, tags),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(&patch.title)
    .bind(&patch.content)
    .bind(&patch.category)
    .bind(&patch.tags)
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
    let result = sqlx::query("DELETE FROM discussions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply a vote delta; returns the new row, or None when absent.
pub async fn vote(
    pool: &SqlitePool,
    id: &str,
    delta: i64,
) -> Result<Option<DiscussionRow>, sqlx::Error> {
    let result = sqlx::query("UPDATE discussions SET votes = votes + ? WHERE id = ?")
        .bind(delta)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn count_by_author(pool: &SqlitePool, author_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM discussions WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn row(id: &str, title: &str, created_at: DateTime<Utc>) -> DiscussionRow {
        DiscussionRow {
            id: id.to_string(),
            title: title.to_string(),
            content: "body".to_string(),
            category: "general".to_string(),
            tags: r#"["rust"]"#.to_string(),
            author_id: "author-1".to_string(),
            votes: 0,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        let base = Utc::now();
        insert(&pool, &row("d1", "old", base - chrono::Duration::hours(2)))
            .await
            .unwrap();
        insert(&pool, &row("d2", "new", base)).await.unwrap();

        let listed = find_paginated(&pool, 50, 0).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "new");
        assert_eq!(listed[1].title, "old");
    }

    #[tokio::test]
    async fn vote_applies_signed_deltas() {
        let pool = test_pool().await;
        insert(&pool, &row("d1", "t", Utc::now())).await.unwrap();

        let up = vote(&pool, "d1", 1).await.unwrap().unwrap();
        assert_eq!(up.votes, 1);
        let down = vote(&pool, "d1", -1).await.unwrap().unwrap();
        assert_eq!(down.votes, 0);
        assert!(vote(&pool, "missing", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let pool = test_pool().await;
        insert(&pool, &row("d1", "t", Utc::now())).await.unwrap();
        assert!(delete(&pool, "d1").await.unwrap());
        assert!(!delete(&pool, "d1").await.unwrap());
    }
}
