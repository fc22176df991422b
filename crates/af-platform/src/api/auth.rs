//! Authentication Endpoints
//!
//! Registration creates an applicant profile; staff accounts are seeded or
//! promoted out of band. Sessions are stateless bearer tokens, so logout only
//! audits the event and the client discards the token.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuditAction, AuditLog, Profile, UserRole};
use crate::error::{PortalError, Result};
use crate::service::PasswordService;

use super::common::SuccessResponse;
use super::middleware::{AppState, Authenticated, RequestMeta};
use super::profiles::ProfileResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub profile: ProfileResponse,
}

pub fn router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// Register a new applicant account.
#[utoipa::path(
    post,
    path = "/bff/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, body = AuthResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid input")
    )
)]
pub(crate) async fn register(
    Extension(state): Extension<AppState>,
    meta: RequestMeta,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if request.full_name.trim().is_empty() {
        return Err(PortalError::validation("Name must not be empty"));
    }
    if !request.email.contains('@') {
        return Err(PortalError::validation("Invalid email address"));
    }
    PasswordService::validate_strength(&request.password)?;

    if state.profiles.find_by_email(&request.email).await?.is_some() {
        return Err(PortalError::duplicate("Profile", "email", &request.email));
    }

    let hash = PasswordService::hash(&request.password)?;
    let profile = Profile::new(request.full_name.trim(), request.email, UserRole::Student)
        .with_password_hash(hash);
    state.profiles.insert(&profile).await?;

    state
        .audit
        .record(
            AuditLog::for_entity(
                AuditAction::Create,
                "Profile",
                &profile.id,
                format!("Account registered for {}", profile.email),
            )
            .with_actor(&profile.id, Some(profile.email.clone()))
            .with_request_context(meta.request_id, meta.ip_address),
        )
        .await;

    let token = state.auth.issue_token(&profile)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            profile: profile.into(),
        }),
    ))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/bff/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub(crate) async fn login(
    Extension(state): Extension<AppState>,
    meta: RequestMeta,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let profile = state
        .profiles
        .find_by_email(&request.email)
        .await?
        .ok_or(PortalError::InvalidCredentials)?;

    let verified = profile
        .password_hash
        .as_deref()
        .map(|hash| PasswordService::verify(&request.password, hash))
        .unwrap_or(false);
    if !verified {
        state
            .audit
            .record(
                AuditLog::for_entity(
                    AuditAction::Login,
                    "Profile",
                    &profile.id,
                    format!("Failed login attempt for {}", profile.email),
                )
                .with_request_context(meta.request_id, meta.ip_address),
            )
            .await;
        return Err(PortalError::InvalidCredentials);
    }

    state
        .audit
        .record(
            AuditLog::for_entity(
                AuditAction::Login,
                "Profile",
                &profile.id,
                format!("{} logged in", profile.email),
            )
            .with_actor(&profile.id, Some(profile.email.clone()))
            .with_request_context(meta.request_id, meta.ip_address),
        )
        .await;

    let token = state.auth.issue_token(&profile)?;
    Ok(Json(AuthResponse {
        token,
        profile: profile.into(),
    }))
}

/// The authenticated caller's own profile.
#[utoipa::path(
    get,
    path = "/bff/auth/me",
    tag = "auth",
    responses(
        (status = 200, body = ProfileResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn me(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .profiles
        .find_by_id(&ctx.profile_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Profile", &ctx.profile_id))?;

    Ok(Json(profile.into()))
}

/// Audit the logout; the client discards the token.
#[utoipa::path(
    post,
    path = "/bff/auth/logout",
    tag = "auth",
    responses((status = 200, body = SuccessResponse)),
    security(("bearer" = []))
)]
pub(crate) async fn logout(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<SuccessResponse>> {
    state
        .audit
        .record_for(
            &ctx,
            AuditLog::for_entity(
                AuditAction::Logout,
                "Profile",
                &ctx.profile_id,
                format!("{} logged out", ctx.email),
            ),
        )
        .await;

    Ok(Json(SuccessResponse::new("Logged out")))
}
