//! University Repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::University;
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct UniversityRepository {
    pool: PgPool,
}

impl UniversityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, university: &University) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO universities (id, name, code, city, state, rank, description, website, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&university.id)
        .bind(&university.name)
        .bind(&university.code)
        .bind(&university.city)
        .bind(&university.state)
        .bind(university.rank)
        .bind(&university.description)
        .bind(&university.website)
        .bind(university.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, university: &University) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE universities SET
                name = $2, code = $3, city = $4, state = $5,
                rank = $6, description = $7, website = $8
            WHERE id = $1
            "#,
        )
        .bind(&university.id)
        .bind(&university.name)
        .bind(&university.code)
        .bind(&university.city)
        .bind(&university.state)
        .bind(university.rank)
        .bind(&university.description)
        .bind(&university.website)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("University", &university.id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM universities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("University", id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<University>> {
        let row = sqlx::query("SELECT * FROM universities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_university))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<University>> {
        let row = sqlx::query("SELECT * FROM universities WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_university))
    }

    /// Ranked universities first, then alphabetical.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<University>> {
        let rows = sqlx::query(
            "SELECT * FROM universities ORDER BY rank NULLS LAST, name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_university).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM universities")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}

fn map_university(row: &PgRow) -> University {
    University {
        id: row.get("id"),
        name: row.get("name"),
        code: row.get("code"),
        city: row.get("city"),
        state: row.get("state"),
        rank: row.get("rank"),
        description: row.get("description"),
        website: row.get("website"),
        created_at: row.get("created_at"),
    }
}
