//! Audit Log Endpoints

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AuditLog;
use crate::error::Result;
use crate::service::checks;

use super::common::{PaginatedResponse, PaginationParams};
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            action: log.action.as_str().to_string(),
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            description: log.description,
            actor_id: log.actor_id,
            actor_email: log.actor_email,
            ip_address: log.ip_address,
            request_id: log.request_id,
            metadata: log.metadata,
            created_at: log.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

pub fn router() -> Router {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

/// Browse the audit trail, newest first. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    tag = "audit",
    params(
        PaginationParams,
        ("entity_type" = Option<String>, Query, description = "Filter by entity type"),
        ("entity_id" = Option<String>, Query, description = "Filter by entity id")
    ),
    responses((status = 200, body = PaginatedResponse<AuditLogResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_audit_logs(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<AuditLogQuery>,
) -> Result<Json<PaginatedResponse<AuditLogResponse>>> {
    checks::require_staff(&ctx)?;

    let logs = state
        .audit
        .list(
            filter.entity_type.as_deref(),
            filter.entity_id.as_deref(),
            params.limit(),
            params.offset(),
        )
        .await?;
    let total = state.audit.count(filter.entity_type.as_deref()).await?;

    let items = logs.into_iter().map(AuditLogResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}
