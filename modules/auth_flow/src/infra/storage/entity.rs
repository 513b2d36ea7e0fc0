use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Persisted account row. Ids are stored as canonical UUID text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub email_domain: String,
    pub created_at: DateTime<Utc>,
}

/// Idempotent schema setup for this module's tables.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL,
            email_domain  TEXT NOT NULL,
            created_at    TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<AccountRow>, sqlx::Error> {
    sqlx::query_as::<_, AccountRow>(
        "SELECT id, email, password_hash, role, email_domain, created_at
         FROM accounts WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &SqlitePool, row: &AccountRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO accounts (id, email, password_hash, role, email_domain, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.email)
    .bind(&row.password_hash)
    .bind(&row.role)
    .bind(&row.email_domain)
    .bind(row.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// True when the error is a unique-constraint violation (duplicate email/id).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn row(email: &str) -> AccountRow {
        AccountRow {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: "student".to_string(),
            email_domain: "@university.edu".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let pool = test_pool().await;
        let account = row("student@university.edu");
        insert(&pool, &account).await.unwrap();

        let found = find_by_email(&pool, "student@university.edu")
            .await
            .unwrap()
            .expect("account present");
        assert_eq!(found.id, account.id);
        assert_eq!(found.role, "student");
        assert_eq!(found.email_domain, "@university.edu");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let pool = test_pool().await;
        insert(&pool, &row("dup@university.edu")).await.unwrap();
        let err = insert(&pool, &row("dup@university.edu"))
            .await
            .expect_err("duplicate must fail");
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let pool = test_pool().await;
        assert!(find_by_email(&pool, "ghost@university.edu")
            .await
            .unwrap()
            .is_none());
    }
}
