//! Document Entities
//!
//! Document types describe required uploads (format/size constraints);
//! application documents track an uploaded file and its verification status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry describing a required upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_required: bool,
    pub max_size_mb: i32,
    /// Lowercase file extensions, e.g. ["pdf", "jpg", "png"].
    pub allowed_formats: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            name: name.into(),
            description: None,
            is_required: true,
            max_size_mb: 5,
            allowed_formats: vec!["pdf".to_string(), "jpg".to_string(), "png".to_string()],
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_formats(mut self, formats: Vec<String>) -> Self {
        self.allowed_formats = formats.into_iter().map(|f| f.to_lowercase()).collect();
        self
    }

    pub fn with_max_size_mb(mut self, max_size_mb: i32) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Validate an upload against this type's constraints before any write.
    pub fn validate_upload(&self, file_name: &str, file_size: u64) -> crate::error::Result<()> {
        let extension = file_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != file_name)
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| {
                crate::PortalError::validation(format!("File '{}' has no extension", file_name))
            })?;

        if !self.allowed_formats.iter().any(|f| f == &extension) {
            return Err(crate::PortalError::validation(format!(
                "Format '{}' not allowed for {} (allowed: {})",
                extension,
                self.name,
                self.allowed_formats.join(", ")
            )));
        }

        let max_bytes = self.max_size_mb as u64 * 1024 * 1024;
        if file_size > max_bytes {
            return Err(crate::PortalError::validation(format!(
                "File exceeds {}MB limit for {}",
                self.max_size_mb, self.name
            )));
        }

        Ok(())
    }
}

/// Which document types a program requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDocument {
    pub id: String,
    pub program_id: String,
    pub document_type_id: String,
    pub is_required: bool,
}

impl ProgramDocument {
    pub fn new(program_id: impl Into<String>, document_type_id: impl Into<String>) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            program_id: program_id.into(),
            document_type_id: document_type_id.into(),
            is_required: true,
        }
    }
}

/// Verification status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    PendingVerification,
    Verified,
    Rejected,
}

impl DocumentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::PendingVerification => "pending_verification",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_verification" => Some(DocumentStatus::PendingVerification),
            "verified" => Some(DocumentStatus::Verified),
            "rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }
}

/// An uploaded file attached to an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocument {
    pub id: String,
    pub application_id: String,
    pub document_type_id: String,
    /// Where the bytes live in the document store; not exposed to clients.
    #[serde(skip_serializing, default)]
    pub storage_key: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl ApplicationDocument {
    pub fn new(
        application_id: impl Into<String>,
        document_type_id: impl Into<String>,
        storage_key: impl Into<String>,
        file_url: impl Into<String>,
        file_name: impl Into<String>,
        file_size: i64,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            application_id: application_id.into(),
            document_type_id: document_type_id.into(),
            storage_key: storage_key.into(),
            file_url: file_url.into(),
            file_name: file_name.into(),
            file_size,
            status: DocumentStatus::PendingVerification,
            admin_notes: None,
            uploaded_at: Utc::now(),
            verified_at: None,
        }
    }

    /// Record a staff verdict. Only pending documents can be decided.
    pub fn decide(&mut self, verdict: DocumentStatus, notes: Option<String>) -> crate::error::Result<()> {
        if self.status != DocumentStatus::PendingVerification {
            return Err(crate::PortalError::invalid_transition(
                self.status.as_str(),
                verdict.as_str(),
            ));
        }
        if verdict == DocumentStatus::PendingVerification {
            return Err(crate::PortalError::validation(
                "Verdict must be verified or rejected",
            ));
        }
        self.status = verdict;
        self.admin_notes = notes;
        self.verified_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_type() -> DocumentType {
        DocumentType::new("10th Marksheet")
            .with_formats(vec!["pdf".to_string(), "jpg".to_string()])
            .with_max_size_mb(2)
    }

    #[test]
    fn upload_validation_checks_extension() {
        let dt = doc_type();
        assert!(dt.validate_upload("marks.pdf", 1024).is_ok());
        assert!(dt.validate_upload("marks.PDF", 1024).is_ok());
        assert!(dt.validate_upload("marks.exe", 1024).is_err());
        assert!(dt.validate_upload("marksheet", 1024).is_err());
    }

    #[test]
    fn upload_validation_checks_size() {
        let dt = doc_type();
        assert!(dt.validate_upload("marks.pdf", 2 * 1024 * 1024).is_ok());
        assert!(dt.validate_upload("marks.pdf", 2 * 1024 * 1024 + 1).is_err());
    }

    #[test]
    fn verdict_only_from_pending() {
        let mut doc =
            ApplicationDocument::new("a1", "dt1", "a1/dt1/f.pdf", "http://x/f.pdf", "f.pdf", 100);
        doc.decide(DocumentStatus::Verified, None).unwrap();
        assert!(doc.verified_at.is_some());

        let err = doc.decide(DocumentStatus::Rejected, None).unwrap_err();
        assert!(matches!(err, crate::PortalError::InvalidTransition { .. }));
    }

    #[test]
    fn pending_is_not_a_verdict() {
        let mut doc =
            ApplicationDocument::new("a1", "dt1", "a1/dt1/f.pdf", "http://x/f.pdf", "f.pdf", 100);
        assert!(doc.decide(DocumentStatus::PendingVerification, None).is_err());
    }
}
