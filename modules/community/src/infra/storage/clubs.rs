use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClubRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ClubPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClubMemberRow {
    pub club_id: String,
    pub member_id: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clubs (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL UNIQUE,
            description  TEXT,
            logo_url     TEXT,
            president_id TEXT,
            created_at   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS club_members (
            club_id   TEXT NOT NULL,
            member_id TEXT NOT NULL,
            role      TEXT NOT NULL DEFAULT 'member',
            joined_at TEXT NOT NULL,
            PRIMARY KEY (club_id, member_id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert(pool: &SqlitePool, row: &ClubRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO clubs (id, name, description, logo_url, president_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.name)
    .bind(&row.description)
    .bind(&row.logo_url)
    .bind(&row.president_id)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<ClubRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubRow>("SELECT * FROM clubs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<ClubRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubRow>("SELECT * FROM clubs ORDER BY name ASC LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &ClubPatch,
) -> Result<Option<ClubRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE clubs SET
            name         = COALESCE(?, name),
            description  = COALESCE(?, description),
            logo_url     = COALESCE(?, logo_url),
            president_id = COALESCE(?, president_id)
         WHERE id = ?",
    )
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(&patch.logo_url)
    .bind(&patch.president_id)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM club_members WHERE club_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let result = sqlx::query("DELETE FROM clubs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_member(pool: &SqlitePool, row: &ClubMemberRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO club_members (club_id, member_id, role, joined_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&row.club_id)
    .bind(&row.member_id)
    .bind(&row.role)
    .bind(row.joined_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn remove_member(
    pool: &SqlitePool,
    club_id: &str,
    member_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM club_members WHERE club_id = ? AND member_id = ?")
        .bind(club_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find_members(
    pool: &SqlitePool,
    club_id: &str,
) -> Result<Vec<ClubMemberRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubMemberRow>(
        "SELECT * FROM club_members WHERE club_id = ? ORDER BY joined_at ASC",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await
}

pub async fn count_memberships(pool: &SqlitePool, member_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM club_members WHERE member_id = ?")
        .bind(member_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::is_unique_violation;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn club(id: &str, name: &str) -> ClubRow {
        ClubRow {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            logo_url: None,
            president_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn joining_twice_is_a_unique_violation() {
        let pool = test_pool().await;
        insert(&pool, &club("c1", "Chess")).await.unwrap();
        let membership = ClubMemberRow {
            club_id: "c1".into(),
            member_id: "m1".into(),
            role: "member".into(),
            joined_at: Utc::now(),
        };
        add_member(&pool, &membership).await.unwrap();
        let err = add_member(&pool, &membership).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn deleting_a_club_drops_its_memberships() {
        let pool = test_pool().await;
        insert(&pool, &club("c1", "Robotics")).await.unwrap();
        add_member(
            &pool,
            &ClubMemberRow {
                club_id: "c1".into(),
                member_id: "m1".into(),
                role: "member".into(),
                joined_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        assert!(delete(&pool, "c1").await.unwrap());
        assert!(find_members(&pool, "c1").await.unwrap().is_empty());
    }
}
