//! HTTP API
//!
//! Applicant-facing routes are mounted under `/bff`, staff routes under
//! `/api/admin`. Handlers receive [`middleware::AppState`] as a request
//! extension and authenticate via the [`middleware::Authenticated`] extractor.

pub mod applications;
pub mod audit_logs;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod document_types;
pub mod documents;
pub mod middleware;
pub mod openapi;
pub mod profiles;
pub mod programs;
pub mod tickets;
pub mod universities;

use axum::Router;

/// Applicant-facing routes, mounted under `/bff`.
pub fn bff_router() -> Router {
    Router::new()
        .merge(auth::router())
        .merge(profiles::router())
        .merge(universities::router())
        .merge(programs::router())
        .merge(document_types::router())
        .merge(applications::router())
        .merge(documents::router())
        .merge(tickets::router())
        .merge(dashboard::router())
}

/// Staff routes, mounted under `/api/admin`. Role checks live in the
/// services; these routes just group the staff surface.
pub fn admin_router() -> Router {
    Router::new()
        .merge(profiles::admin_router())
        .merge(universities::admin_router())
        .merge(programs::admin_router())
        .merge(document_types::admin_router())
        .merge(applications::admin_router())
        .merge(documents::admin_router())
        .merge(tickets::admin_router())
        .merge(dashboard::admin_router())
        .merge(audit_logs::router())
}
