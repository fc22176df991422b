//! Document Service
//!
//! Uploads are validated against the document type's constraints before any
//! bytes are written; verification verdicts are staff-only and audited.

use std::sync::Arc;

use crate::domain::{
    ApplicationDocument, AuditAction, AuditLog, DocumentStatus, DocumentType,
};
use crate::error::{PortalError, Result};
use crate::repository::{
    ApplicationDocumentRepository, ApplicationRepository, DocumentTypeRepository,
};
use crate::service::audit::AuditService;
use crate::service::auth::{checks, AuthContext};
use crate::service::storage::DocumentStore;
use crate::TsidGenerator;

/// One row of an application's document checklist.
pub struct ChecklistItem {
    pub document_type: DocumentType,
    pub latest_upload: Option<ApplicationDocument>,
}

#[derive(Clone)]
pub struct DocumentService {
    documents: ApplicationDocumentRepository,
    document_types: DocumentTypeRepository,
    applications: ApplicationRepository,
    store: Arc<dyn DocumentStore>,
    audit: AuditService,
}

impl DocumentService {
    pub fn new(
        documents: ApplicationDocumentRepository,
        document_types: DocumentTypeRepository,
        applications: ApplicationRepository,
        store: Arc<dyn DocumentStore>,
        audit: AuditService,
    ) -> Self {
        Self {
            documents,
            document_types,
            applications,
            store,
            audit,
        }
    }

    pub async fn upload(
        &self,
        ctx: &AuthContext,
        application_id: &str,
        document_type_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ApplicationDocument> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", application_id))?;
        checks::require_self_or_staff(ctx, &application.student_id)?;

        let doc_type = self
            .document_types
            .find_by_id(document_type_id)
            .await?
            .ok_or_else(|| PortalError::not_found("DocumentType", document_type_id))?;
        doc_type.validate_upload(file_name, bytes.len() as u64)?;

        let key = format!(
            "{}/{}/{}_{}",
            application_id,
            document_type_id,
            TsidGenerator::generate(),
            file_name
        );
        let file_url = self.store.store(&key, bytes).await?;

        let document = ApplicationDocument::new(
            application_id,
            document_type_id,
            key,
            file_url,
            file_name,
            bytes.len() as i64,
        );
        self.documents.insert(&document).await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::Create,
                    "ApplicationDocument",
                    &document.id,
                    format!("Uploaded {} for {}", file_name, doc_type.name),
                ),
            )
            .await;

        Ok(document)
    }

    /// Record a staff verdict on a pending document.
    pub async fn verify(
        &self,
        ctx: &AuthContext,
        document_id: &str,
        verdict: DocumentStatus,
        notes: Option<String>,
    ) -> Result<ApplicationDocument> {
        checks::require_staff(ctx)?;

        let mut document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| PortalError::not_found("ApplicationDocument", document_id))?;

        document.decide(verdict, notes)?;
        self.documents.update_verdict(&document).await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::DocumentVerdict,
                    "ApplicationDocument",
                    document_id,
                    format!("Document {} marked {}", document.file_name, verdict.as_str()),
                ),
            )
            .await;

        Ok(document)
    }

    /// Fetch a document's stored bytes. Owner or staff only.
    pub async fn download(
        &self,
        ctx: &AuthContext,
        document_id: &str,
    ) -> Result<(ApplicationDocument, Vec<u8>)> {
        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| PortalError::not_found("ApplicationDocument", document_id))?;

        let application = self
            .applications
            .find_by_id(&document.application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", &document.application_id))?;
        checks::require_self_or_staff(ctx, &application.student_id)?;

        let bytes = self.store.load(&document.storage_key).await?;
        Ok((document, bytes))
    }

    pub async fn list_for_application(
        &self,
        ctx: &AuthContext,
        application_id: &str,
    ) -> Result<Vec<ApplicationDocument>> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", application_id))?;
        checks::require_self_or_staff(ctx, &application.student_id)?;

        self.documents.list_by_application(application_id).await
    }

    /// Required document types for the application's program, each paired
    /// with its most recent upload.
    pub async fn checklist(
        &self,
        ctx: &AuthContext,
        application_id: &str,
    ) -> Result<Vec<ChecklistItem>> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", application_id))?;
        checks::require_self_or_staff(ctx, &application.student_id)?;

        let mut items = Vec::new();
        for doc_type in self
            .document_types
            .list_for_program(&application.program_id)
            .await?
        {
            let latest_upload = self
                .documents
                .find_latest(application_id, &doc_type.id)
                .await?;
            items.push(ChecklistItem {
                document_type: doc_type,
                latest_upload,
            });
        }
        Ok(items)
    }

    pub async fn count_pending(&self) -> Result<i64> {
        self.documents.count_pending().await
    }
}
