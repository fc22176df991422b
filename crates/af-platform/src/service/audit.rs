//! Audit Service
//!
//! Records audit entries without failing the request that produced them; a
//! lost audit row is logged, not surfaced.

use crate::domain::AuditLog;
use crate::error::Result;
use crate::repository::AuditLogRepository;
use crate::service::auth::AuthContext;

#[derive(Clone)]
pub struct AuditService {
    repository: AuditLogRepository,
}

impl AuditService {
    pub fn new(repository: AuditLogRepository) -> Self {
        Self { repository }
    }

    /// Record an entry on behalf of an authenticated caller, stamping it
    /// with the actor and the request's client metadata.
    pub async fn record_for(&self, ctx: &AuthContext, log: AuditLog) {
        self.record(
            log.with_actor(&ctx.profile_id, Some(ctx.email.clone()))
                .with_request_context(ctx.request_id.clone(), ctx.ip_address.clone()),
        )
        .await;
    }

    pub async fn record(&self, log: AuditLog) {
        if let Err(e) = self.repository.insert(&log).await {
            tracing::warn!(
                action = log.action.as_str(),
                entity_type = %log.entity_type,
                error = %e,
                "Failed to record audit entry"
            );
        }
    }

    pub async fn list(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>> {
        self.repository
            .list(entity_type, entity_id, limit, offset)
            .await
    }

    pub async fn count(&self, entity_type: Option<&str>) -> Result<i64> {
        self.repository.count(entity_type).await
    }
}
