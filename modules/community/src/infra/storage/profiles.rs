use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Profile row; `id` is the owning account's UUID as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields updatable on a profile.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id         TEXT PRIMARY KEY,
            username   TEXT UNIQUE,
            full_name  TEXT,
            avatar_url TEXT,
            role       TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &ProfileRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO profiles (id, username, full_name, avatar_url, role, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.username)
    .bind(&row.full_name)
    .bind(&row.avatar_url)
    .bind(&row.role)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, full_name, avatar_url, role, created_at FROM profiles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, full_name, avatar_url, role, created_at
         FROM profiles ORDER BY created_at ASC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Apply a patch; returns the updated row, or None when absent.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &ProfilePatch,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE profiles SET
            username   = COALESCE(?, username),
            full_name  = COALESCE(?, full_name),
            avatar_url = COALESCE(?, avatar_url)
         WHERE id = ?",
    )
    .bind(&patch.username)
    .bind(&patch.full_name)
    .bind(&patch.avatar_url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn row(id: &str, username: Option<&str>) -> ProfileRow {
        ProfileRow {
            id: id.to_string(),
            username: username.map(str::to_string),
            full_name: None,
            avatar_url: None,
            role: Some("student".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_find_update_round_trip() {
        let pool = test_pool().await;
        insert(&pool, &row("p1", Some("casey"))).await.unwrap();

        let found = find_by_id(&pool, "p1").await.unwrap().unwrap();
        assert_eq!(found.username.as_deref(), Some("casey"));

        let patch = ProfilePatch {
            full_name: Some("Casey Jordan".to_string()),
            ..Default::default()
        };
        let updated = update(&pool, "p1", &patch).await.unwrap().unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Casey Jordan"));
        // Untouched fields survive a partial patch
        assert_eq!(updated.username.as_deref(), Some("casey"));
    }

    #[tokio::test]
    async fn update_of_missing_profile_returns_none() {
        let pool = test_pool().await;
        let patch = ProfilePatch::default();
        assert!(update(&pool, "ghost", &patch).await.unwrap().is_none());
    }
}
