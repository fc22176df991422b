//! Program Repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::Program;
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct ProgramRepository {
    pool: PgPool,
}

impl ProgramRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, program: &Program) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO programs (
                id, university_id, name, degree, duration_years,
                total_fees, application_fee, description, eligibility, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&program.id)
        .bind(&program.university_id)
        .bind(&program.name)
        .bind(&program.degree)
        .bind(program.duration_years)
        .bind(program.total_fees)
        .bind(program.application_fee)
        .bind(&program.description)
        .bind(&program.eligibility)
        .bind(program.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, program: &Program) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE programs SET
                name = $2, degree = $3, duration_years = $4, total_fees = $5,
                application_fee = $6, description = $7, eligibility = $8
            WHERE id = $1
            "#,
        )
        .bind(&program.id)
        .bind(&program.name)
        .bind(&program.degree)
        .bind(program.duration_years)
        .bind(program.total_fees)
        .bind(program.application_fee)
        .bind(&program.description)
        .bind(&program.eligibility)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("Program", &program.id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("Program", id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT * FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_program))
    }

    pub async fn list_by_university(&self, university_id: &str) -> Result<Vec<Program>> {
        let rows = sqlx::query("SELECT * FROM programs WHERE university_id = $1 ORDER BY name")
            .bind(university_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_program).collect())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Program>> {
        let rows = sqlx::query("SELECT * FROM programs ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_program).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM programs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}

fn map_program(row: &PgRow) -> Program {
    Program {
        id: row.get("id"),
        university_id: row.get("university_id"),
        name: row.get("name"),
        degree: row.get("degree"),
        duration_years: row.get("duration_years"),
        total_fees: row.get("total_fees"),
        application_fee: row.get("application_fee"),
        description: row.get("description"),
        eligibility: row.get("eligibility"),
        created_at: row.get("created_at"),
    }
}
