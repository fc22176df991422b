//! Application Repository

use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{PgPool, Row};

use crate::domain::{AcademicHistory, Application, ApplicationStatus};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executor-generic so the insert can run inside the submission transaction
    /// alongside the profile update.
    pub async fn insert<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        app: &Application,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (
                id, application_number, student_id, university_id, program_id,
                status, application_fee, submission_date,
                tenth_school, tenth_board, tenth_year, tenth_percentage,
                twelfth_school, twelfth_board, twelfth_year, twelfth_percentage,
                graduation_college, graduation_university, graduation_degree,
                graduation_year, graduation_percentage,
                admin_notes, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(&app.id)
        .bind(&app.application_number)
        .bind(&app.student_id)
        .bind(&app.university_id)
        .bind(&app.program_id)
        .bind(app.status.as_str())
        .bind(app.application_fee)
        .bind(app.submission_date)
        .bind(&app.academics.tenth_school)
        .bind(&app.academics.tenth_board)
        .bind(app.academics.tenth_year)
        .bind(app.academics.tenth_percentage)
        .bind(&app.academics.twelfth_school)
        .bind(&app.academics.twelfth_board)
        .bind(app.academics.twelfth_year)
        .bind(app.academics.twelfth_percentage)
        .bind(&app.academics.graduation_college)
        .bind(&app.academics.graduation_university)
        .bind(&app.academics.graduation_degree)
        .bind(app.academics.graduation_year)
        .bind(app.academics.graduation_percentage)
        .bind(&app.admin_notes)
        .bind(app.created_at)
        .bind(app.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update_status(&self, app: &Application) -> Result<()> {
        let result = sqlx::query(
            "UPDATE applications SET status = $2, admin_notes = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(&app.id)
        .bind(app.status.as_str())
        .bind(&app.admin_notes)
        .bind(app.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("Application", &app.id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let row = sqlx::query("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_application).transpose()
    }

    pub async fn list_by_student(&self, student_id: &str) -> Result<Vec<Application>> {
        let rows =
            sqlx::query("SELECT * FROM applications WHERE student_id = $1 ORDER BY created_at DESC")
                .bind(student_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(map_application).collect()
    }

    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Application>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM applications WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM applications ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_application).collect()
    }

    pub async fn count(&self, status: Option<ApplicationStatus>) -> Result<i64> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) AS count FROM applications WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM applications")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(row.get("count"))
    }

    pub async fn count_for_student(&self, student_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM applications WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Total application fees across all submitted applications.
    pub async fn sum_fees(&self) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(application_fee), 0)::BIGINT AS total FROM applications WHERE submission_date IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("total"))
    }

    /// Status label -> count, for the staff dashboard.
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query("SELECT status, COUNT(*) AS count FROM applications GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("status"), row.get("count")))
            .collect())
    }

    /// Whether the student already has a live application for this program.
    pub async fn active_exists(&self, student_id: &str, program_id: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count FROM applications
            WHERE student_id = $1 AND program_id = $2 AND status NOT IN ('rejected')
            "#,
        )
        .bind(student_id)
        .bind(program_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn map_application(row: &PgRow) -> Result<Application> {
    let status: String = row.get("status");
    let status = ApplicationStatus::parse(&status).ok_or_else(|| {
        PortalError::internal(format!("Unknown status '{status}' in applications row"))
    })?;

    Ok(Application {
        id: row.get("id"),
        application_number: row.get("application_number"),
        student_id: row.get("student_id"),
        university_id: row.get("university_id"),
        program_id: row.get("program_id"),
        status,
        application_fee: row.get("application_fee"),
        submission_date: row.get("submission_date"),
        academics: AcademicHistory {
            tenth_school: row.get("tenth_school"),
            tenth_board: row.get("tenth_board"),
            tenth_year: row.get("tenth_year"),
            tenth_percentage: row.get("tenth_percentage"),
            twelfth_school: row.get("twelfth_school"),
            twelfth_board: row.get("twelfth_board"),
            twelfth_year: row.get("twelfth_year"),
            twelfth_percentage: row.get("twelfth_percentage"),
            graduation_college: row.get("graduation_college"),
            graduation_university: row.get("graduation_university"),
            graduation_degree: row.get("graduation_degree"),
            graduation_year: row.get("graduation_year"),
            graduation_percentage: row.get("graduation_percentage"),
        },
        admin_notes: row.get("admin_notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
