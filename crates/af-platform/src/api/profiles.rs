//! Profile Endpoints

use axum::extract::{Path, Query};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ContactDetails, Profile, UserRole};
use crate::error::{PortalError, Result};
use crate::service::checks;

use super::common::{PaginatedResponse, PaginationParams};
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub role: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// ISO date, e.g. "2001-06-15".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            role: profile.role.as_str().to_string(),
            full_name: profile.full_name,
            email: profile.email,
            phone: profile.contact.phone,
            date_of_birth: profile.contact.date_of_birth.map(|d| d.to_string()),
            gender: profile.contact.gender,
            nationality: profile.contact.nationality,
            address: profile.contact.address,
            city: profile.contact.city,
            state: profile.contact.state,
            pincode: profile.contact.pincode,
            father_name: profile.contact.father_name,
            mother_name: profile.contact.mother_name,
            emergency_contact: profile.contact.emergency_contact,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Contact fields accepted by profile updates and the application wizard.
/// Absent fields keep their stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    pub phone: Option<String>,
    /// ISO date, e.g. "2001-06-15".
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub emergency_contact: Option<String>,
}

impl ContactUpdate {
    pub fn into_details(self) -> Result<ContactDetails> {
        let date_of_birth = self
            .date_of_birth
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    PortalError::validation(format!("Invalid date of birth: {raw}"))
                })
            })
            .transpose()?;

        Ok(ContactDetails {
            phone: self.phone,
            date_of_birth,
            gender: self.gender,
            nationality: self.nationality,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            father_name: self.father_name,
            mother_name: self.mother_name,
            emergency_contact: self.emergency_contact,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub contact: ContactUpdate,
}

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub role: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/profiles/:id", get(get_profile))
        .route("/profiles/:id", put(update_profile))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/profiles", get(list_profiles))
        .route("/students", get(student_directory))
}

/// A student with their activity counts, for the staff directory.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDirectoryEntry {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub application_count: i64,
    pub ticket_count: i64,
}

/// Fetch a profile. Applicants can only read their own.
#[utoipa::path(
    get,
    path = "/bff/profiles/{id}",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_profile(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    checks::require_self_or_staff(&ctx, &id)?;

    let profile = state
        .profiles
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Profile", &id))?;

    Ok(Json(profile.into()))
}

/// Update contact details and display name.
#[utoipa::path(
    put,
    path = "/bff/profiles/{id}",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, body = ProfileResponse),
        (status = 403, description = "Not your profile")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_profile(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    checks::require_self_or_staff(&ctx, &id)?;

    let mut profile = state
        .profiles
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Profile", &id))?;

    if let Some(full_name) = request.full_name {
        if full_name.trim().is_empty() {
            return Err(PortalError::validation("Name must not be empty"));
        }
        profile.full_name = full_name;
    }
    profile.apply_contact_update(request.contact.into_details()?);
    state.profiles.update(&state.pool, &profile).await?;

    Ok(Json(profile.into()))
}

/// List profiles, optionally filtered by role. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/profiles",
    tag = "profiles",
    params(PaginationParams, ("role" = Option<String>, Query, description = "Filter by role")),
    responses((status = 200, body = PaginatedResponse<ProfileResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_profiles(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProfileListQuery>,
) -> Result<Json<PaginatedResponse<ProfileResponse>>> {
    checks::require_staff(&ctx)?;

    let role = filter
        .role
        .as_deref()
        .map(|raw| {
            UserRole::parse(raw)
                .ok_or_else(|| PortalError::validation(format!("Unknown role: {raw}")))
        })
        .transpose()?;

    let profiles = state
        .profiles
        .list(role, params.limit(), params.offset())
        .await?;
    let total = state.profiles.count(role).await?;

    let items = profiles.into_iter().map(ProfileResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}

/// Student directory with application and ticket counts. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/students",
    tag = "profiles",
    params(PaginationParams),
    responses((status = 200, body = PaginatedResponse<StudentDirectoryEntry>)),
    security(("bearer" = []))
)]
pub(crate) async fn student_directory(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<StudentDirectoryEntry>>> {
    checks::require_staff(&ctx)?;

    let students = state
        .profiles
        .list(Some(UserRole::Student), params.limit(), params.offset())
        .await?;
    let total = state.profiles.count(Some(UserRole::Student)).await?;

    let mut items = Vec::with_capacity(students.len());
    for student in students {
        let application_count = state.applications.count_for_student(&student.id).await?;
        let ticket_count = state.tickets.count_for_student(&student.id).await?;
        items.push(StudentDirectoryEntry {
            profile: student.into(),
            application_count,
            ticket_count,
        });
    }

    Ok(Json(PaginatedResponse::new(items, total, &params)))
}
