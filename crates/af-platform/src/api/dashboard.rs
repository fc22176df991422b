//! Dashboard Endpoints

use std::collections::HashMap;

use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::UserRole;
use crate::error::Result;
use crate::service::checks;

use super::applications::ApplicationResponse;
use super::middleware::{AppState, Authenticated};

/// Summary counts for an applicant's home screen.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboardResponse {
    pub application_count: i64,
    pub applications_by_status: HashMap<String, i64>,
    pub ticket_count: i64,
    pub open_ticket_count: i64,
}

/// Portal-wide counts for the staff overview.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub total_applications: i64,
    pub applications_by_status: HashMap<String, i64>,
    /// Application fees across submitted applications, whole currency units.
    pub total_fees: i64,
    pub tickets_by_status: HashMap<String, i64>,
    pub pending_documents: i64,
    pub student_count: i64,
    pub recent_applications: Vec<ApplicationResponse>,
}

pub fn router() -> Router {
    Router::new().route("/dashboard", get(student_dashboard))
}

pub fn admin_router() -> Router {
    Router::new().route("/dashboard", get(admin_dashboard))
}

/// The caller's own counts.
#[utoipa::path(
    get,
    path = "/bff/dashboard",
    tag = "dashboard",
    responses((status = 200, body = StudentDashboardResponse)),
    security(("bearer" = []))
)]
pub(crate) async fn student_dashboard(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<StudentDashboardResponse>> {
    let student_id = ctx.profile_id.clone();
    let applications = state
        .applications
        .list_for_student(&ctx, &student_id)
        .await?;
    let tickets = state.tickets.list_for_student(&ctx, &student_id).await?;

    let mut applications_by_status: HashMap<String, i64> = HashMap::new();
    for application in &applications {
        *applications_by_status
            .entry(application.status.as_str().to_string())
            .or_default() += 1;
    }
    let open_ticket_count = tickets.iter().filter(|t| !t.is_closed()).count() as i64;

    Ok(Json(StudentDashboardResponse {
        application_count: applications.len() as i64,
        applications_by_status,
        ticket_count: tickets.len() as i64,
        open_ticket_count,
    }))
}

/// Portal-wide counts. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "dashboard",
    responses((status = 200, body = AdminDashboardResponse)),
    security(("bearer" = []))
)]
pub(crate) async fn admin_dashboard(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<AdminDashboardResponse>> {
    checks::require_staff(&ctx)?;

    let stats = state.applications.stats(&ctx).await?;
    let tickets_by_status: HashMap<String, i64> =
        state.tickets.stats().await?.into_iter().collect();
    let pending_documents = state.documents.count_pending().await?;
    let student_count = state.profiles.count(Some(UserRole::Student)).await?;
    let (recent, _) = state.applications.list(&ctx, None, 5, 0).await?;

    Ok(Json(AdminDashboardResponse {
        total_applications: stats.total,
        applications_by_status: stats.by_status,
        total_fees: stats.total_fees,
        tickets_by_status,
        pending_documents,
        student_count,
        recent_applications: recent.into_iter().map(ApplicationResponse::from).collect(),
    }))
}
