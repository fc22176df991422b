//! Document Type and Program Document Repositories

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{DocumentType, ProgramDocument};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct DocumentTypeRepository {
    pool: PgPool,
}

impl DocumentTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, doc_type: &DocumentType) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO document_types (id, name, description, is_required, max_size_mb, allowed_formats, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&doc_type.id)
        .bind(&doc_type.name)
        .bind(&doc_type.description)
        .bind(doc_type.is_required)
        .bind(doc_type.max_size_mb)
        .bind(&doc_type.allowed_formats)
        .bind(doc_type.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, doc_type: &DocumentType) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE document_types SET
                name = $2, description = $3, is_required = $4,
                max_size_mb = $5, allowed_formats = $6
            WHERE id = $1
            "#,
        )
        .bind(&doc_type.id)
        .bind(&doc_type.name)
        .bind(&doc_type.description)
        .bind(doc_type.is_required)
        .bind(doc_type.max_size_mb)
        .bind(&doc_type.allowed_formats)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("DocumentType", &doc_type.id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM document_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("DocumentType", id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<DocumentType>> {
        let row = sqlx::query("SELECT * FROM document_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_document_type))
    }

    pub async fn list(&self) -> Result<Vec<DocumentType>> {
        let rows = sqlx::query("SELECT * FROM document_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_document_type).collect())
    }

    /// Document types a program requires, via the program_documents join.
    /// The link's is_required flag overrides the catalog default.
    pub async fn list_for_program(&self, program_id: &str) -> Result<Vec<DocumentType>> {
        let rows = sqlx::query(
            r#"
            SELECT dt.*, pd.is_required AS link_required
            FROM document_types dt
            JOIN program_documents pd ON pd.document_type_id = dt.id
            WHERE pd.program_id = $1
            ORDER BY dt.name
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let mut doc_type = map_document_type(row);
                doc_type.is_required = row.get("link_required");
                doc_type
            })
            .collect())
    }
}

#[derive(Clone)]
pub struct ProgramDocumentRepository {
    pool: PgPool,
}

impl ProgramDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, link: &ProgramDocument) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO program_documents (id, program_id, document_type_id, is_required)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&link.id)
        .bind(&link.program_id)
        .bind(&link.document_type_id)
        .bind(link.is_required)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM program_documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("ProgramDocument", id));
        }
        Ok(())
    }

    pub async fn exists(&self, program_id: &str, document_type_id: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM program_documents WHERE program_id = $1 AND document_type_id = $2",
        )
        .bind(program_id)
        .bind(document_type_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn map_document_type(row: &PgRow) -> DocumentType {
    DocumentType {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        is_required: row.get("is_required"),
        max_size_mb: row.get("max_size_mb"),
        allowed_formats: row.get("allowed_formats"),
        created_at: row.get("created_at"),
    }
}
