//! University Catalog Endpoints

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuditAction, AuditLog, University};
use crate::error::{PortalError, Result};
use crate::service::checks;

use super::common::{PaginatedResponse, PaginationParams, SuccessResponse};
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UniversityResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: String,
}

impl From<University> for UniversityResponse {
    fn from(university: University) -> Self {
        Self {
            id: university.id,
            name: university.name,
            code: university.code,
            city: university.city,
            state: university.state,
            rank: university.rank,
            description: university.description,
            website: university.website,
            created_at: university.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUniversityRequest {
    pub name: String,
    pub code: String,
    pub city: String,
    pub state: String,
    pub rank: Option<i32>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUniversityRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rank: Option<i32>,
    pub description: Option<String>,
    pub website: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/universities", get(list_universities))
        .route("/universities/:id", get(get_university))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/universities", post(create_university))
        .route("/universities/:id", put(update_university))
        .route("/universities/:id", delete(delete_university))
}

/// Browse the university catalog.
#[utoipa::path(
    get,
    path = "/bff/universities",
    tag = "catalog",
    params(PaginationParams),
    responses((status = 200, body = PaginatedResponse<UniversityResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_universities(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<UniversityResponse>>> {
    let universities = state
        .universities
        .list(params.limit(), params.offset())
        .await?;
    let total = state.universities.count().await?;

    let items = universities
        .into_iter()
        .map(UniversityResponse::from)
        .collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}

#[utoipa::path(
    get,
    path = "/bff/universities/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "University id")),
    responses(
        (status = 200, body = UniversityResponse),
        (status = 404, description = "University not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_university(
    Extension(state): Extension<AppState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<UniversityResponse>> {
    let university = state
        .universities
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("University", &id))?;

    Ok(Json(university.into()))
}

/// Add a university to the catalog. Staff only.
#[utoipa::path(
    post,
    path = "/api/admin/universities",
    tag = "catalog",
    request_body = CreateUniversityRequest,
    responses(
        (status = 201, body = UniversityResponse),
        (status = 409, description = "Code already in use")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_university(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Json(request): Json<CreateUniversityRequest>,
) -> Result<(StatusCode, Json<UniversityResponse>)> {
    checks::require_staff(&ctx)?;

    if request.name.trim().is_empty() || request.code.trim().is_empty() {
        return Err(PortalError::validation("Name and code must not be empty"));
    }
    if state
        .universities
        .find_by_code(&request.code)
        .await?
        .is_some()
    {
        return Err(PortalError::duplicate("University", "code", &request.code));
    }

    let mut university =
        University::new(request.name, request.code, request.city, request.state);
    university.rank = request.rank;
    university.description = request.description;
    university.website = request.website;
    state.universities.insert(&university).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Create,
                "University",
                &university.id,
                format!("University {} added", university.name),
            ),
        )
        .await;

    Ok((StatusCode::CREATED, Json(university.into())))
}

#[utoipa::path(
    put,
    path = "/api/admin/universities/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "University id")),
    request_body = UpdateUniversityRequest,
    responses(
        (status = 200, body = UniversityResponse),
        (status = 404, description = "University not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_university(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateUniversityRequest>,
) -> Result<Json<UniversityResponse>> {
    checks::require_staff(&ctx)?;

    let mut university = state
        .universities
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("University", &id))?;

    if let Some(name) = request.name {
        university.name = name;
    }
    if let Some(code) = request.code {
        if code != university.code {
            if state.universities.find_by_code(&code).await?.is_some() {
                return Err(PortalError::duplicate("University", "code", &code));
            }
            university.code = code;
        }
    }
    if let Some(city) = request.city {
        university.city = city;
    }
    if let Some(state_name) = request.state {
        university.state = state_name;
    }
    if request.rank.is_some() {
        university.rank = request.rank;
    }
    if request.description.is_some() {
        university.description = request.description;
    }
    if request.website.is_some() {
        university.website = request.website;
    }
    state.universities.update(&university).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Update,
                "University",
                &id,
                format!("University {} updated", university.name),
            ),
        )
        .await;

    Ok(Json(university.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/universities/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "University id")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 404, description = "University not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn delete_university(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    checks::require_staff(&ctx)?;

    state.universities.delete(&id).await?;

    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Delete,
                "University",
                &id,
                "University removed from catalog",
            ),
        )
        .await;

    Ok(Json(SuccessResponse::new("University deleted")))
}
