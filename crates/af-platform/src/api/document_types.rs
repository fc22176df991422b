//! Document Type Catalog Endpoints

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuditAction, AuditLog, DocumentType};
use crate::error::{PortalError, Result};
use crate::service::checks;

use super::common::SuccessResponse;
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_required: bool,
    pub max_size_mb: i32,
    pub allowed_formats: Vec<String>,
    pub created_at: String,
}

impl From<DocumentType> for DocumentTypeResponse {
    fn from(doc_type: DocumentType) -> Self {
        Self {
            id: doc_type.id,
            name: doc_type.name,
            description: doc_type.description,
            is_required: doc_type.is_required,
            max_size_mb: doc_type.max_size_mb,
            allowed_formats: doc_type.allowed_formats,
            created_at: doc_type.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentTypeRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub is_required: bool,
    pub max_size_mb: Option<i32>,
    pub allowed_formats: Option<Vec<String>>,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_required: Option<bool>,
    pub max_size_mb: Option<i32>,
    pub allowed_formats: Option<Vec<String>>,
}

pub fn router() -> Router {
    Router::new()
        .route("/document-types", get(list_document_types))
        .route("/document-types/:id", get(get_document_type))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/document-types", post(create_document_type))
        .route("/document-types/:id", put(update_document_type))
        .route("/document-types/:id", delete(delete_document_type))
}

#[utoipa::path(
    get,
    path = "/bff/document-types",
    tag = "catalog",
    responses((status = 200, body = [DocumentTypeResponse])),
    security(("bearer" = []))
)]
pub(crate) async fn list_document_types(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
) -> Result<Json<Vec<DocumentTypeResponse>>> {
    let doc_types = state.document_types.list().await?;
    Ok(Json(
        doc_types.into_iter().map(DocumentTypeResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/bff/document-types/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Document type id")),
    responses(
        (status = 200, body = DocumentTypeResponse),
        (status = 404, description = "Document type not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DocumentTypeResponse>> {
    let doc_type = state
        .document_types
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("DocumentType", &id))?;

    Ok(Json(doc_type.into()))
}

/// Add a document type. Staff only.
#[utoipa::path(
    post,
    path = "/api/admin/document-types",
    tag = "catalog",
    request_body = CreateDocumentTypeRequest,
    responses((status = 201, body = DocumentTypeResponse)),
    security(("bearer" = []))
)]
pub(crate) async fn create_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Json(request): Json<CreateDocumentTypeRequest>,
) -> Result<(StatusCode, Json<DocumentTypeResponse>)> {
    checks::require_staff(&ctx)?;

    if request.name.trim().is_empty() {
        return Err(PortalError::validation("Name must not be empty"));
    }

    let mut doc_type = DocumentType::new(request.name);
    doc_type.description = request.description;
    doc_type.is_required = request.is_required;
    if let Some(max_size_mb) = request.max_size_mb {
        if max_size_mb <= 0 {
            return Err(PortalError::validation("Max size must be positive"));
        }
        doc_type.max_size_mb = max_size_mb;
    }
    if let Some(formats) = request.allowed_formats {
        if formats.is_empty() {
            return Err(PortalError::validation("At least one format is required"));
        }
        doc_type = doc_type.with_formats(formats);
    }
    state.document_types.insert(&doc_type).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Create,
                "DocumentType",
                &doc_type.id,
                format!("Document type {} added", doc_type.name),
            ),
        )
        .await;

    Ok((StatusCode::CREATED, Json(doc_type.into())))
}

#[utoipa::path(
    put,
    path = "/api/admin/document-types/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Document type id")),
    request_body = UpdateDocumentTypeRequest,
    responses(
        (status = 200, body = DocumentTypeResponse),
        (status = 404, description = "Document type not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateDocumentTypeRequest>,
) -> Result<Json<DocumentTypeResponse>> {
    checks::require_staff(&ctx)?;

    let mut doc_type = state
        .document_types
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("DocumentType", &id))?;

    if let Some(name) = request.name {
        doc_type.name = name;
    }
    if request.description.is_some() {
        doc_type.description = request.description;
    }
    if let Some(is_required) = request.is_required {
        doc_type.is_required = is_required;
    }
    if let Some(max_size_mb) = request.max_size_mb {
        if max_size_mb <= 0 {
            return Err(PortalError::validation("Max size must be positive"));
        }
        doc_type.max_size_mb = max_size_mb;
    }
    if let Some(formats) = request.allowed_formats {
        if formats.is_empty() {
            return Err(PortalError::validation("At least one format is required"));
        }
        doc_type = doc_type.with_formats(formats);
    }
    state.document_types.update(&doc_type).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Update,
                "DocumentType",
                &id,
                format!("Document type {} updated", doc_type.name),
            ),
        )
        .await;

    Ok(Json(doc_type.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/document-types/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Document type id")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 404, description = "Document type not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    checks::require_staff(&ctx)?;

    state.document_types.delete(&id).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Delete,
                "DocumentType",
                &id,
                "Document type removed",
            ),
        )
        .await;

    Ok(Json(SuccessResponse::new("Document type deleted")))
}
