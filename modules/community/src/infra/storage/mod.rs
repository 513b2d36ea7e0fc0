pub mod alumni;
pub mod announcements;
pub mod career;
pub mod clubs;
pub mod comments;
pub mod discussions;
pub mod events;
pub mod profiles;

use sqlx::SqlitePool;

/// Idempotent schema setup for every community table.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    profiles::ensure_schema(pool).await?;
    discussions::ensure_schema(pool).await?;
    comments::ensure_schema(pool).await?;
    announcements::ensure_schema(pool).await?;
    events::ensure_schema(pool).await?;
    clubs::ensure_schema(pool).await?;
    career::ensure_schema(pool).await?;
    alumni::ensure_schema(pool).await?;
    Ok(())
}

/// True when the error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}
