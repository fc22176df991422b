//! Program Catalog Endpoints
//!
//! Programs belong to a university and carry the fee amounts applications
//! snapshot at submission. Staff manage the program-to-document-type links
//! here as well.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuditAction, AuditLog, Program, ProgramDocument};
use crate::error::{PortalError, Result};
use crate::service::checks;

use super::common::{PaginatedResponse, PaginationParams, SuccessResponse};
use super::document_types::DocumentTypeResponse;
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    pub id: String,
    pub university_id: String,
    pub name: String,
    pub degree: String,
    pub duration_years: i32,
    pub total_fees: i64,
    pub application_fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    pub created_at: String,
}

impl From<Program> for ProgramResponse {
    fn from(program: Program) -> Self {
        Self {
            id: program.id,
            university_id: program.university_id,
            name: program.name,
            degree: program.degree,
            duration_years: program.duration_years,
            total_fees: program.total_fees,
            application_fee: program.application_fee,
            description: program.description,
            eligibility: program.eligibility,
            created_at: program.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub university_id: String,
    pub name: String,
    pub degree: String,
    pub duration_years: i32,
    pub total_fees: i64,
    pub application_fee: i64,
    pub description: Option<String>,
    pub eligibility: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub degree: Option<String>,
    pub duration_years: Option<i32>,
    pub total_fees: Option<i64>,
    pub application_fee: Option<i64>,
    pub description: Option<String>,
    pub eligibility: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkDocumentTypeRequest {
    pub document_type_id: String,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProgramListQuery {
    pub university_id: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs/:id", get(get_program))
        .route("/programs/:id/document-types", get(list_program_document_types))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/programs", post(create_program))
        .route("/programs/:id", put(update_program))
        .route("/programs/:id", delete(delete_program))
        .route("/programs/:id/document-types", post(link_document_type))
        .route(
            "/programs/:id/document-types/:link_id",
            delete(unlink_document_type),
        )
}

/// Browse programs, optionally for one university.
#[utoipa::path(
    get,
    path = "/bff/programs",
    tag = "catalog",
    params(
        PaginationParams,
        ("university_id" = Option<String>, Query, description = "Filter by university")
    ),
    responses((status = 200, body = PaginatedResponse<ProgramResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_programs(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProgramListQuery>,
) -> Result<Json<PaginatedResponse<ProgramResponse>>> {
    let (programs, total) = match filter.university_id.as_deref() {
        Some(university_id) => {
            let programs = state.programs.list_by_university(university_id).await?;
            let total = programs.len() as i64;
            (programs, total)
        }
        None => {
            let programs = state.programs.list(params.limit(), params.offset()).await?;
            let total = state.programs.count().await?;
            (programs, total)
        }
    };

    let items = programs.into_iter().map(ProgramResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}

#[utoipa::path(
    get,
    path = "/bff/programs/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Program id")),
    responses(
        (status = 200, body = ProgramResponse),
        (status = 404, description = "Program not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_program(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ProgramResponse>> {
    let program = state
        .programs
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Program", &id))?;

    Ok(Json(program.into()))
}

/// Document types this program requires from applicants.
#[utoipa::path(
    get,
    path = "/bff/programs/{id}/document-types",
    tag = "catalog",
    params(("id" = String, Path, description = "Program id")),
    responses((status = 200, body = [DocumentTypeResponse])),
    security(("bearer" = []))
)]
pub(crate) async fn list_program_document_types(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<DocumentTypeResponse>>> {
    if state.programs.find_by_id(&id).await?.is_none() {
        return Err(PortalError::not_found("Program", &id));
    }

    let doc_types = state.document_types.list_for_program(&id).await?;
    Ok(Json(
        doc_types.into_iter().map(DocumentTypeResponse::from).collect(),
    ))
}

/// Add a program to the catalog. Staff only.
#[utoipa::path(
    post,
    path = "/api/admin/programs",
    tag = "catalog",
    request_body = CreateProgramRequest,
    responses(
        (status = 201, body = ProgramResponse),
        (status = 404, description = "University not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_program(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Json(request): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramResponse>)> {
    checks::require_staff(&ctx)?;

    if request.name.trim().is_empty() {
        return Err(PortalError::validation("Name must not be empty"));
    }
    if request.duration_years <= 0 {
        return Err(PortalError::validation("Duration must be positive"));
    }
    if request.total_fees < 0 || request.application_fee < 0 {
        return Err(PortalError::validation("Fees must not be negative"));
    }
    if state
        .universities
        .find_by_id(&request.university_id)
        .await?
        .is_none()
    {
        return Err(PortalError::not_found("University", &request.university_id));
    }

    let mut program = Program::new(
        request.university_id,
        request.name,
        request.degree,
        request.duration_years,
    )
    .with_fees(request.total_fees, request.application_fee);
    program.description = request.description;
    program.eligibility = request.eligibility;
    state.programs.insert(&program).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Create,
                "Program",
                &program.id,
                format!("Program {} added", program.name),
            ),
        )
        .await;

    Ok((StatusCode::CREATED, Json(program.into())))
}

#[utoipa::path(
    put,
    path = "/api/admin/programs/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Program id")),
    request_body = UpdateProgramRequest,
    responses(
        (status = 200, body = ProgramResponse),
        (status = 404, description = "Program not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_program(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramResponse>> {
    checks::require_staff(&ctx)?;

    let mut program = state
        .programs
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Program", &id))?;

    if let Some(name) = request.name {
        program.name = name;
    }
    if let Some(degree) = request.degree {
        program.degree = degree;
    }
    if let Some(duration_years) = request.duration_years {
        if duration_years <= 0 {
            return Err(PortalError::validation("Duration must be positive"));
        }
        program.duration_years = duration_years;
    }
    if let Some(total_fees) = request.total_fees {
        program.total_fees = total_fees;
    }
    if let Some(application_fee) = request.application_fee {
        program.application_fee = application_fee;
    }
    if request.description.is_some() {
        program.description = request.description;
    }
    if request.eligibility.is_some() {
        program.eligibility = request.eligibility;
    }
    state.programs.update(&program).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Update,
                "Program",
                &id,
                format!("Program {} updated", program.name),
            ),
        )
        .await;

    Ok(Json(program.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/programs/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Program id")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 404, description = "Program not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_program(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    checks::require_staff(&ctx)?;

    state.programs.delete(&id).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(AuditAction::Delete, "Program", &id, "Program removed"),
        )
        .await;

    Ok(Json(SuccessResponse::new("Program deleted")))
}

/// Require a document type for a program. Staff only.
#[utoipa::path(
    post,
    path = "/api/admin/programs/{id}/document-types",
    tag = "catalog",
    params(("id" = String, Path, description = "Program id")),
    request_body = LinkDocumentTypeRequest,
    responses(
        (status = 201, description = "Link created"),
        (status = 409, description = "Already linked")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn link_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<LinkDocumentTypeRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>)> {
    checks::require_staff(&ctx)?;

    if state.programs.find_by_id(&id).await?.is_none() {
        return Err(PortalError::not_found("Program", &id));
    }
    if state
        .document_types
        .find_by_id(&request.document_type_id)
        .await?
        .is_none()
    {
        return Err(PortalError::not_found(
            "DocumentType",
            &request.document_type_id,
        ));
    }
    if state
        .program_documents
        .exists(&id, &request.document_type_id)
        .await?
    {
        return Err(PortalError::duplicate(
            "ProgramDocument",
            "document_type_id",
            &request.document_type_id,
        ));
    }

    let mut link = ProgramDocument::new(&id, &request.document_type_id);
    link.is_required = request.is_required;
    state.program_documents.insert(&link).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new("Document type linked")),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/programs/{id}/document-types/{link_id}",
    tag = "catalog",
    params(
        ("id" = String, Path, description = "Program id"),
        ("link_id" = String, Path, description = "Link id")
    ),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 404, description = "Link not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn unlink_document_type(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path((_id, link_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    checks::require_staff(&ctx)?;

    state.program_documents.delete(&link_id).await?;
    Ok(Json(SuccessResponse::new("Document type unlinked")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProgramDocument;

    #[test]
    fn link_requests_default_to_required() {
        let request: LinkDocumentTypeRequest =
            serde_json::from_str(r#"{"documentTypeId": "dt1"}"#).unwrap();
        assert!(request.is_required);

        let optional: LinkDocumentTypeRequest =
            serde_json::from_str(r#"{"documentTypeId": "dt1", "isRequired": false}"#).unwrap();
        assert!(!optional.is_required);
    }

    #[test]
    fn link_flag_carries_through_to_the_link() {
        let request: LinkDocumentTypeRequest =
            serde_json::from_str(r#"{"documentTypeId": "dt1", "isRequired": false}"#).unwrap();

        let mut link = ProgramDocument::new("p1", &request.document_type_id);
        link.is_required = request.is_required;
        assert!(!link.is_required);
    }
}
