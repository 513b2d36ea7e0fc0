use sqlx::SqlitePool;

/// Alumni directory row; `id` is the owning profile's id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlumniProfileRow {
    pub id: String,
    pub graduation_year: Option<i64>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub current_company: Option<String>,
    pub linkedin_url: Option<String>,
    pub bio: Option<String>,
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alumni_profiles (
            id              TEXT PRIMARY KEY,
            graduation_year INTEGER,
            degree          TEXT,
            major           TEXT,
            current_company TEXT,
            linkedin_url    TEXT,
            bio             TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or fully replace the alumni entry for a profile.
pub async fn upsert(pool: &SqlitePool, row: &AlumniProfileRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO alumni_profiles
            (id, graduation_year, degree, major, current_company, linkedin_url, bio)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            graduation_year = excluded.graduation_year,
            degree          = excluded.degree,
            major           = excluded.major,
            current_company = excluded.current_company,
            linkedin_url    = excluded.linkedin_url,
            bio             = excluded.bio",
    )
    .bind(&row.id)
    .bind(row.graduation_year)
    .bind(&row.degree)
    .bind(&row.major)
    .bind(&row.current_company)
    .bind(&row.linkedin_url)
    .bind(&row.bio)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AlumniProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, AlumniProfileRow>("SELECT * FROM alumni_profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_paginated(
    pool: &SqlitePool,
    limit: u32,
    offset: u32,
) -> Result<Vec<AlumniProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, AlumniProfileRow>(
        "SELECT * FROM alumni_profiles ORDER BY graduation_year DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let mut row = AlumniProfileRow {
            id: "p1".into(),
            graduation_year: Some(2019),
            degree: Some("BSc".into()),
            major: Some("CS".into()),
            current_company: None,
            linkedin_url: None,
            bio: None,
        };
        upsert(&pool, &row).await.unwrap();

        row.current_company = Some("Initech".into());
        upsert(&pool, &row).await.unwrap();

        let found = find_by_id(&pool, "p1").await.unwrap().unwrap();
        assert_eq!(found.current_company.as_deref(), Some("Initech"));
        assert_eq!(found.graduation_year, Some(2019));
    }
}
