//! Ticket Service
//!
//! Opening a ticket writes the ticket and its first message atomically.
//! Replies to closed tickets are rejected; internal notes are staff-only and
//! invisible to applicants.

use sqlx::PgPool;

use crate::domain::{
    AuditAction, AuditLog, SupportTicket, TicketMessage, TicketPriority, TicketStatus,
};
use crate::error::{PortalError, Result};
use crate::repository::{TicketMessageRepository, TicketRepository};
use crate::service::audit::AuditService;
use crate::service::auth::{checks, AuthContext};
use crate::service::notify::{ChangeEvent, ChangeNotifier};

pub struct OpenTicket {
    pub subject: String,
    pub priority: TicketPriority,
    pub application_id: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct TicketService {
    pool: PgPool,
    tickets: TicketRepository,
    messages: TicketMessageRepository,
    audit: AuditService,
    notifier: ChangeNotifier,
}

impl TicketService {
    pub fn new(
        pool: PgPool,
        tickets: TicketRepository,
        messages: TicketMessageRepository,
        audit: AuditService,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            pool,
            tickets,
            messages,
            audit,
            notifier,
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Open a ticket with its first message in one transaction.
    pub async fn open(&self, ctx: &AuthContext, request: OpenTicket) -> Result<SupportTicket> {
        if request.subject.trim().is_empty() {
            return Err(PortalError::validation("Subject must not be empty"));
        }
        if request.message.trim().is_empty() {
            return Err(PortalError::validation("Message must not be empty"));
        }

        let mut ticket = SupportTicket::open(&ctx.profile_id, &request.subject, request.priority);
        if let Some(application_id) = request.application_id {
            ticket = ticket.with_application(application_id);
        }
        let message = TicketMessage::new(&ticket.id, &ctx.profile_id, &request.message);

        let mut tx = self.pool.begin().await?;
        self.tickets.insert(&mut *tx, &ticket).await?;
        self.messages.insert(&mut *tx, &message).await?;
        tx.commit().await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::Create,
                    "SupportTicket",
                    &ticket.id,
                    format!("Ticket {} opened: {}", ticket.ticket_number, ticket.subject),
                ),
            )
            .await;

        self.notifier.publish(ChangeEvent {
            ticket_id: ticket.id.clone(),
            message_id: message.id,
            sender_id: ctx.profile_id.clone(),
            is_internal: false,
        });

        Ok(ticket)
    }

    pub async fn post_message(
        &self,
        ctx: &AuthContext,
        ticket_id: &str,
        body: &str,
        is_internal: bool,
    ) -> Result<TicketMessage> {
        if body.trim().is_empty() {
            return Err(PortalError::validation("Message must not be empty"));
        }
        if is_internal {
            checks::require_staff(ctx)?;
        }

        let mut ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| PortalError::not_found("SupportTicket", ticket_id))?;
        checks::require_self_or_staff(ctx, &ticket.student_id)?;

        if ticket.is_closed() {
            return Err(PortalError::validation("Ticket is closed"));
        }

        let mut message = TicketMessage::new(ticket_id, &ctx.profile_id, body);
        if is_internal {
            message = message.internal();
        }

        self.messages.insert(&self.pool, &message).await?;

        // Bump the conversation timestamp.
        ticket.updated_at = chrono::Utc::now();
        self.tickets.update(&ticket).await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::MessagePosted,
                    "SupportTicket",
                    ticket_id,
                    format!("Message posted on {}", ticket.ticket_number),
                ),
            )
            .await;

        self.notifier.publish(ChangeEvent {
            ticket_id: ticket_id.to_string(),
            message_id: message.id.clone(),
            sender_id: ctx.profile_id.clone(),
            is_internal,
        });

        Ok(message)
    }

    /// Assign or unassign a ticket. Assignment moves open tickets to
    /// in-progress; unassignment reopens in-progress tickets.
    pub async fn assign(
        &self,
        ctx: &AuthContext,
        ticket_id: &str,
        admin_id: Option<String>,
    ) -> Result<SupportTicket> {
        checks::require_staff(ctx)?;

        let mut ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| PortalError::not_found("SupportTicket", ticket_id))?;

        ticket.assign(admin_id.clone());
        self.tickets.update(&ticket).await?;

        let description = match admin_id {
            Some(admin_id) => format!("Ticket {} assigned to {}", ticket.ticket_number, admin_id),
            None => format!("Ticket {} unassigned", ticket.ticket_number),
        };
        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::TicketAssigned,
                    "SupportTicket",
                    ticket_id,
                    description,
                ),
            )
            .await;

        Ok(ticket)
    }

    pub async fn set_status(
        &self,
        ctx: &AuthContext,
        ticket_id: &str,
        status: TicketStatus,
    ) -> Result<SupportTicket> {
        checks::require_staff(ctx)?;

        let mut ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| PortalError::not_found("SupportTicket", ticket_id))?;

        let previous = ticket.status;
        ticket.set_status(status);
        self.tickets.update(&ticket).await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::StatusChanged,
                    "SupportTicket",
                    ticket_id,
                    format!(
                        "Ticket {} moved from {} to {}",
                        ticket.ticket_number,
                        previous.as_str(),
                        status.as_str()
                    ),
                )
                .with_metadata(serde_json::json!({
                    "from": previous.as_str(),
                    "to": status.as_str(),
                })),
            )
            .await;

        Ok(ticket)
    }

    pub async fn get(&self, ctx: &AuthContext, ticket_id: &str) -> Result<SupportTicket> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| PortalError::not_found("SupportTicket", ticket_id))?;

        checks::require_self_or_staff(ctx, &ticket.student_id)?;
        Ok(ticket)
    }

    pub async fn list_for_student(
        &self,
        ctx: &AuthContext,
        student_id: &str,
    ) -> Result<Vec<SupportTicket>> {
        checks::require_self_or_staff(ctx, student_id)?;
        self.tickets.list_by_student(student_id).await
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SupportTicket>, i64)> {
        checks::require_staff(ctx)?;
        let items = self.tickets.list(status, limit, offset).await?;
        let total = self.tickets.count(status).await?;
        Ok((items, total))
    }

    /// Conversation for a ticket; internal notes only for staff.
    pub async fn messages(&self, ctx: &AuthContext, ticket_id: &str) -> Result<Vec<TicketMessage>> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| PortalError::not_found("SupportTicket", ticket_id))?;
        checks::require_self_or_staff(ctx, &ticket.student_id)?;

        self.messages
            .list_for_ticket(ticket_id, ctx.is_staff())
            .await
    }

    pub async fn stats(&self) -> Result<Vec<(String, i64)>> {
        self.tickets.count_by_status().await
    }

    pub async fn count_for_student(&self, student_id: &str) -> Result<i64> {
        self.tickets.count_for_student(student_id).await
    }
}
