//! Application Document Endpoints
//!
//! Uploads arrive as multipart form data with a `document_type_id` text part
//! and a `file` part. Constraint checks run before any bytes hit storage.

use axum::extract::{Multipart, Path};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApplicationDocument, DocumentStatus};
use crate::error::{PortalError, Result};
use crate::service::ChecklistItem;

use super::document_types::DocumentTypeResponse;
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocumentResponse {
    pub id: String,
    pub application_id: String,
    pub document_type_id: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub uploaded_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
}

impl From<ApplicationDocument> for ApplicationDocumentResponse {
    fn from(doc: ApplicationDocument) -> Self {
        Self {
            id: doc.id,
            application_id: doc.application_id,
            document_type_id: doc.document_type_id,
            file_url: doc.file_url,
            file_name: doc.file_name,
            file_size: doc.file_size,
            status: doc.status.as_str().to_string(),
            admin_notes: doc.admin_notes,
            uploaded_at: doc.uploaded_at.to_rfc3339(),
            verified_at: doc.verified_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// A required document type paired with its most recent upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemResponse {
    pub document_type: DocumentTypeResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_upload: Option<ApplicationDocumentResponse>,
}

impl From<ChecklistItem> for ChecklistItemResponse {
    fn from(item: ChecklistItem) -> Self {
        Self {
            document_type: item.document_type.into(),
            latest_upload: item.latest_upload.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerdictRequest {
    /// "verified" or "rejected".
    pub status: String,
    pub admin_notes: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/applications/:id/documents", post(upload_document))
        .route("/applications/:id/documents", get(list_documents))
        .route("/applications/:id/documents/checklist", get(checklist))
        .route("/documents/:id/download", get(download_document))
}

pub fn admin_router() -> Router {
    Router::new().route("/documents/:id/verdict", put(record_verdict))
}

/// Upload a document for an application.
#[utoipa::path(
    post,
    path = "/bff/applications/{id}/documents",
    tag = "documents",
    params(("id" = String, Path, description = "Application id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, body = ApplicationDocumentResponse),
        (status = 404, description = "Application or document type not found"),
        (status = 422, description = "File violates the type's constraints")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn upload_document(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationDocumentResponse>)> {
    let mut document_type_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PortalError::validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("document_type_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| PortalError::validation(format!("Bad form field: {e}")))?;
                document_type_id = Some(value);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| PortalError::validation("File part must carry a filename"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| PortalError::validation(format!("Bad file part: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let document_type_id = document_type_id
        .ok_or_else(|| PortalError::validation("Missing document_type_id field"))?;
    let (file_name, bytes) =
        file.ok_or_else(|| PortalError::validation("Missing file field"))?;

    let document = state
        .documents
        .upload(&ctx, &id, &document_type_id, &file_name, &bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(document.into())))
}

/// All uploads for an application, oldest first.
#[utoipa::path(
    get,
    path = "/bff/applications/{id}/documents",
    tag = "documents",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, body = [ApplicationDocumentResponse]),
        (status = 404, description = "Application not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_documents(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<ApplicationDocumentResponse>>> {
    let documents = state.documents.list_for_application(&ctx, &id).await?;
    Ok(Json(
        documents
            .into_iter()
            .map(ApplicationDocumentResponse::from)
            .collect(),
    ))
}

/// Required documents for the application's program with upload status.
#[utoipa::path(
    get,
    path = "/bff/applications/{id}/documents/checklist",
    tag = "documents",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, body = [ChecklistItemResponse]),
        (status = 404, description = "Application not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn checklist(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChecklistItemResponse>>> {
    let items = state.documents.checklist(&ctx, &id).await?;
    Ok(Json(
        items.into_iter().map(ChecklistItemResponse::from).collect(),
    ))
}

/// Download a document's bytes. Owners see their own uploads; staff see all.
#[utoipa::path(
    get,
    path = "/bff/documents/{id}/download",
    tag = "documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "File bytes as an attachment"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn download_document(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let (document, bytes) = state.documents.download(&ctx, &id).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, bytes))
}

/// Record a verification verdict on a pending document. Staff only.
#[utoipa::path(
    put,
    path = "/api/admin/documents/{id}/verdict",
    tag = "documents",
    params(("id" = String, Path, description = "Document id")),
    request_body = VerdictRequest,
    responses(
        (status = 200, body = ApplicationDocumentResponse),
        (status = 404, description = "Document not found"),
        (status = 422, description = "Document already decided")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn record_verdict(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<VerdictRequest>,
) -> Result<Json<ApplicationDocumentResponse>> {
    let verdict = DocumentStatus::parse(&request.status).ok_or_else(|| {
        PortalError::validation(format!("Unknown verdict: {}", request.status))
    })?;

    let document = state
        .documents
        .verify(&ctx, &id, verdict, request.admin_notes)
        .await?;

    Ok(Json(document.into()))
}
