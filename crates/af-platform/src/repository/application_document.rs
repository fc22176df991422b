//! Application Document Repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{ApplicationDocument, DocumentStatus};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct ApplicationDocumentRepository {
    pool: PgPool,
}

impl ApplicationDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, doc: &ApplicationDocument) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO application_documents (
                id, application_id, document_type_id, storage_key, file_url, file_name,
                file_size, status, admin_notes, uploaded_at, verified_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&doc.id)
        .bind(&doc.application_id)
        .bind(&doc.document_type_id)
        .bind(&doc.storage_key)
        .bind(&doc.file_url)
        .bind(&doc.file_name)
        .bind(doc.file_size)
        .bind(doc.status.as_str())
        .bind(&doc.admin_notes)
        .bind(doc.uploaded_at)
        .bind(doc.verified_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_verdict(&self, doc: &ApplicationDocument) -> Result<()> {
        let result = sqlx::query(
            "UPDATE application_documents SET status = $2, admin_notes = $3, verified_at = $4 WHERE id = $1",
        )
        .bind(&doc.id)
        .bind(doc.status.as_str())
        .bind(&doc.admin_notes)
        .bind(doc.verified_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("ApplicationDocument", &doc.id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ApplicationDocument>> {
        let row = sqlx::query("SELECT * FROM application_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_document).transpose()
    }

    pub async fn list_by_application(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationDocument>> {
        let rows = sqlx::query(
            "SELECT * FROM application_documents WHERE application_id = $1 ORDER BY uploaded_at",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_document).collect()
    }

    /// Latest upload for a document type on an application, if any.
    pub async fn find_latest(
        &self,
        application_id: &str,
        document_type_id: &str,
    ) -> Result<Option<ApplicationDocument>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM application_documents
            WHERE application_id = $1 AND document_type_id = $2
            ORDER BY uploaded_at DESC
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .bind(document_type_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_document).transpose()
    }

    pub async fn count_pending(&self) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM application_documents WHERE status = 'pending_verification'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("count"))
    }
}

fn map_document(row: &PgRow) -> Result<ApplicationDocument> {
    let status: String = row.get("status");
    let status = DocumentStatus::parse(&status).ok_or_else(|| {
        PortalError::internal(format!("Unknown status '{status}' in application_documents row"))
    })?;

    Ok(ApplicationDocument {
        id: row.get("id"),
        application_id: row.get("application_id"),
        document_type_id: row.get("document_type_id"),
        storage_key: row.get("storage_key"),
        file_url: row.get("file_url"),
        file_name: row.get("file_name"),
        file_size: row.get("file_size"),
        status,
        admin_notes: row.get("admin_notes"),
        uploaded_at: row.get("uploaded_at"),
        verified_at: row.get("verified_at"),
    })
}
