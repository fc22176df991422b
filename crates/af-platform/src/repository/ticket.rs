//! Support Ticket Repositories

use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{PgPool, Row};

use crate::domain::{SupportTicket, TicketMessage, TicketPriority, TicketStatus};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executor-generic so ticket creation and its first message commit
    /// atomically.
    pub async fn insert<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        ticket: &SupportTicket,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, ticket_number, student_id, application_id, subject,
                priority, status, assigned_to, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.ticket_number)
        .bind(&ticket.student_id)
        .bind(&ticket.application_id)
        .bind(&ticket.subject)
        .bind(ticket.priority.as_str())
        .bind(ticket.status.as_str())
        .bind(&ticket.assigned_to)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update(&self, ticket: &SupportTicket) -> Result<()> {
        let result = sqlx::query(
            "UPDATE support_tickets SET status = $2, assigned_to = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(&ticket.id)
        .bind(ticket.status.as_str())
        .bind(&ticket.assigned_to)
        .bind(ticket.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("SupportTicket", &ticket.id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<SupportTicket>> {
        let row = sqlx::query("SELECT * FROM support_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_ticket).transpose()
    }

    pub async fn list_by_student(&self, student_id: &str) -> Result<Vec<SupportTicket>> {
        let rows = sqlx::query(
            "SELECT * FROM support_tickets WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_ticket).collect()
    }

    pub async fn list(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupportTicket>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM support_tickets WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM support_tickets ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_ticket).collect()
    }

    pub async fn count(&self, status: Option<TicketStatus>) -> Result<i64> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) AS count FROM support_tickets WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM support_tickets")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(row.get("count"))
    }

    pub async fn count_for_student(&self, student_id: &str) -> Result<i64> {
        let row =
            sqlx::query("SELECT COUNT(*) AS count FROM support_tickets WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.get("count"))
    }

    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let rows =
            sqlx::query("SELECT status, COUNT(*) AS count FROM support_tickets GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("status"), row.get("count")))
            .collect())
    }
}

#[derive(Clone)]
pub struct TicketMessageRepository {
    pool: PgPool,
}

impl TicketMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        message: &TicketMessage,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ticket_messages (id, ticket_id, sender_id, message, is_internal, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&message.id)
        .bind(&message.ticket_id)
        .bind(&message.sender_id)
        .bind(&message.message)
        .bind(message.is_internal)
        .bind(message.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Conversation in creation order; the id tiebreak keeps same-millisecond
    /// messages stable.
    pub async fn list_for_ticket(
        &self,
        ticket_id: &str,
        include_internal: bool,
    ) -> Result<Vec<TicketMessage>> {
        let rows = if include_internal {
            sqlx::query(
                "SELECT * FROM ticket_messages WHERE ticket_id = $1 ORDER BY created_at, id",
            )
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT * FROM ticket_messages WHERE ticket_id = $1 AND is_internal = FALSE ORDER BY created_at, id",
            )
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows.iter().map(map_message).collect())
    }
}

fn map_ticket(row: &PgRow) -> Result<SupportTicket> {
    let priority: String = row.get("priority");
    let priority = TicketPriority::parse(&priority).ok_or_else(|| {
        PortalError::internal(format!("Unknown priority '{priority}' in support_tickets row"))
    })?;

    let status: String = row.get("status");
    let status = TicketStatus::parse(&status).ok_or_else(|| {
        PortalError::internal(format!("Unknown status '{status}' in support_tickets row"))
    })?;

    Ok(SupportTicket {
        id: row.get("id"),
        ticket_number: row.get("ticket_number"),
        student_id: row.get("student_id"),
        application_id: row.get("application_id"),
        subject: row.get("subject"),
        priority,
        status,
        assigned_to: row.get("assigned_to"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_message(row: &PgRow) -> TicketMessage {
    TicketMessage {
        id: row.get("id"),
        ticket_id: row.get("ticket_id"),
        sender_id: row.get("sender_id"),
        message: row.get("message"),
        is_internal: row.get("is_internal"),
        created_at: row.get("created_at"),
    }
}
