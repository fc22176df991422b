//! Audit Log Repository
//!
//! Metadata is stored as a JSON string column so the table stays portable.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{AuditAction, AuditLog};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, log: &AuditLog) -> Result<()> {
        let metadata = log
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, action, entity_type, entity_id, description,
                actor_id, actor_email, ip_address, request_id, metadata, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&log.id)
        .bind(log.action.as_str())
        .bind(&log.entity_type)
        .bind(&log.entity_id)
        .bind(&log.description)
        .bind(&log.actor_id)
        .bind(&log.actor_email)
        .bind(&log.ip_address)
        .bind(&log.request_id)
        .bind(metadata)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>> {
        let rows = match (entity_type, entity_id) {
            (Some(entity_type), Some(entity_id)) => {
                sqlx::query(
                    r#"
                    SELECT * FROM audit_logs
                    WHERE entity_type = $1 AND entity_id = $2
                    ORDER BY created_at DESC LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(entity_type)
                .bind(entity_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(entity_type), None) => {
                sqlx::query(
                    "SELECT * FROM audit_logs WHERE entity_type = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(entity_type)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query("SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_log).collect()
    }

    pub async fn count(&self, entity_type: Option<&str>) -> Result<i64> {
        let row = match entity_type {
            Some(entity_type) => {
                sqlx::query("SELECT COUNT(*) AS count FROM audit_logs WHERE entity_type = $1")
                    .bind(entity_type)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM audit_logs")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(row.get("count"))
    }
}

fn map_log(row: &PgRow) -> Result<AuditLog> {
    let action: String = row.get("action");
    let action = AuditAction::parse(&action).ok_or_else(|| {
        PortalError::internal(format!("Unknown action '{action}' in audit_logs row"))
    })?;

    let metadata: Option<String> = row.get("metadata");
    let metadata = metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(AuditLog {
        id: row.get("id"),
        action,
        entity_type: row.get("entity_type"),
        entity_id: row.get("entity_id"),
        description: row.get("description"),
        actor_id: row.get("actor_id"),
        actor_email: row.get("actor_email"),
        ip_address: row.get("ip_address"),
        request_id: row.get("request_id"),
        metadata,
        created_at: row.get("created_at"),
    })
}
