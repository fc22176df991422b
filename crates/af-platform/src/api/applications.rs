//! Application Endpoints
//!
//! Submission is a single transactional operation that also persists the
//! wizard's contact details onto the applicant's profile.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AcademicHistory, Application, ApplicationStatus};
use crate::error::{PortalError, Result};
use crate::service::SubmitApplication;

use super::common::{PaginatedResponse, PaginationParams};
use super::middleware::{AppState, Authenticated};
use super::profiles::ContactUpdate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub application_number: String,
    pub student_id: String,
    pub university_id: String,
    pub program_id: String,
    pub status: String,
    pub application_fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<String>,
    #[serde(flatten)]
    pub academics: AcademicsPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            application_number: app.application_number,
            student_id: app.student_id,
            university_id: app.university_id,
            program_id: app.program_id,
            status: app.status.as_str().to_string(),
            application_fee: app.application_fee,
            submission_date: app.submission_date.map(|d| d.to_rfc3339()),
            academics: app.academics.into(),
            admin_notes: app.admin_notes,
            created_at: app.created_at.to_rfc3339(),
            updated_at: app.updated_at.to_rfc3339(),
        }
    }
}

/// Academic history fields of the application wizard.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademicsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_college: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_percentage: Option<f64>,
}

impl From<AcademicHistory> for AcademicsPayload {
    fn from(a: AcademicHistory) -> Self {
        Self {
            tenth_school: a.tenth_school,
            tenth_board: a.tenth_board,
            tenth_year: a.tenth_year,
            tenth_percentage: a.tenth_percentage,
            twelfth_school: a.twelfth_school,
            twelfth_board: a.twelfth_board,
            twelfth_year: a.twelfth_year,
            twelfth_percentage: a.twelfth_percentage,
            graduation_college: a.graduation_college,
            graduation_university: a.graduation_university,
            graduation_degree: a.graduation_degree,
            graduation_year: a.graduation_year,
            graduation_percentage: a.graduation_percentage,
        }
    }
}

impl From<AcademicsPayload> for AcademicHistory {
    fn from(a: AcademicsPayload) -> Self {
        Self {
            tenth_school: a.tenth_school,
            tenth_board: a.tenth_board,
            tenth_year: a.tenth_year,
            tenth_percentage: a.tenth_percentage,
            twelfth_school: a.twelfth_school,
            twelfth_board: a.twelfth_board,
            twelfth_year: a.twelfth_year,
            twelfth_percentage: a.twelfth_percentage,
            graduation_college: a.graduation_college,
            graduation_university: a.graduation_university,
            graduation_degree: a.graduation_degree,
            graduation_year: a.graduation_year,
            graduation_percentage: a.graduation_percentage,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    pub university_id: String,
    pub program_id: String,
    #[serde(default)]
    pub academics: AcademicsPayload,
    #[serde(default)]
    pub contact: ContactUpdate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status label, e.g. "under_review".
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/applications", post(submit_application))
        .route("/applications", get(list_own_applications))
        .route("/applications/:id", get(get_application))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/:id/status", put(update_status))
}

/// Submit a new application.
#[utoipa::path(
    post,
    path = "/bff/applications",
    tag = "applications",
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, body = ApplicationResponse),
        (status = 404, description = "Program not found"),
        (status = 409, description = "Already applied to this program"),
        (status = 422, description = "Invalid input")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn submit_application(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>)> {
    let application = state
        .applications
        .submit(
            &ctx,
            SubmitApplication {
                university_id: request.university_id,
                program_id: request.program_id,
                academics: request.academics.into(),
                contact: request.contact.into_details()?,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(application.into())))
}

/// The caller's own applications, newest first.
#[utoipa::path(
    get,
    path = "/bff/applications",
    tag = "applications",
    responses((status = 200, body = [ApplicationResponse])),
    security(("bearer" = []))
)]
pub(crate) async fn list_own_applications(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<Vec<ApplicationResponse>>> {
    let applications = state
        .applications
        .list_for_student(&ctx, &ctx.profile_id.clone())
        .await?;

    Ok(Json(
        applications.into_iter().map(ApplicationResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/bff/applications/{id}",
    tag = "applications",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, body = ApplicationResponse),
        (status = 403, description = "Not your application"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_application(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.applications.get(&ctx, &id).await?;
    Ok(Json(application.into()))
}

/// Review queue, optionally filtered by status. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/applications",
    tag = "applications",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses((status = 200, body = PaginatedResponse<ApplicationResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_applications(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ApplicationListQuery>,
) -> Result<Json<PaginatedResponse<ApplicationResponse>>> {
    let status = filter
        .status
        .as_deref()
        .map(|raw| {
            ApplicationStatus::parse(raw)
                .ok_or_else(|| PortalError::validation(format!("Unknown status: {raw}")))
        })
        .transpose()?;

    let (applications, total) = state
        .applications
        .list(&ctx, status, params.limit(), params.offset())
        .await?;

    let items = applications
        .into_iter()
        .map(ApplicationResponse::from)
        .collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}

/// Move an application along the review pipeline. Staff only.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/status",
    tag = "applications",
    params(("id" = String, Path, description = "Application id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, body = ApplicationResponse),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Transition not allowed")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_status(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationResponse>> {
    let status = ApplicationStatus::parse(&request.status).ok_or_else(|| {
        PortalError::validation(format!("Unknown status: {}", request.status))
    })?;

    let application = state
        .applications
        .transition(&ctx, &id, status, request.admin_notes)
        .await?;

    Ok(Json(application.into()))
}
