//! Support Ticket Entities
//!
//! A ticket is a support conversation thread between an applicant and staff.
//! Messages are immutable and ordered by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TicketPriority::Low),
            "medium" => Some(TicketPriority::Medium),
            "high" => Some(TicketPriority::High),
            "urgent" => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

/// A support conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    /// Human-facing reference, e.g. "TKT02411358".
    pub ticket_number: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    pub subject: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// Admin profile the ticket is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportTicket {
    pub fn open(
        student_id: impl Into<String>,
        subject: impl Into<String>,
        priority: TicketPriority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::TsidGenerator::generate(),
            ticket_number: generate_ticket_number(),
            student_id: student_id.into(),
            application_id: None,
            subject: subject.into(),
            priority,
            status: TicketStatus::Open,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_application(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }

    pub fn set_status(&mut self, status: TicketStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Assigning an open ticket moves it to in-progress; unassigning an
    /// in-progress ticket reopens it.
    pub fn assign(&mut self, admin_id: Option<String>) {
        match &admin_id {
            Some(_) => {
                if self.status == TicketStatus::Open {
                    self.status = TicketStatus::InProgress;
                }
            }
            None => {
                if self.status == TicketStatus::InProgress {
                    self.status = TicketStatus::Open;
                }
            }
        }
        self.assigned_to = admin_id;
        self.updated_at = Utc::now();
    }
}

/// A single message in a ticket conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: String,
    pub ticket_id: String,
    pub sender_id: String,
    pub message: String,
    /// Staff-only note, hidden from applicants.
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

impl TicketMessage {
    pub fn new(
        ticket_id: impl Into<String>,
        sender_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            ticket_id: ticket_id.into(),
            sender_id: sender_id.into(),
            message: message.into(),
            is_internal: false,
            created_at: Utc::now(),
        }
    }

    pub fn internal(mut self) -> Self {
        self.is_internal = true;
        self
    }
}

fn generate_ticket_number() -> String {
    format!("TKT{:08}", Utc::now().timestamp_millis() % 100_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ticket_defaults() {
        let ticket = SupportTicket::open("s1", "Fee query", TicketPriority::Medium);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.assigned_to.is_none());
        assert!(ticket.ticket_number.starts_with("TKT"));
        assert_eq!(ticket.ticket_number.len(), 11);
    }

    #[test]
    fn assignment_drives_status() {
        let mut ticket = SupportTicket::open("s1", "Fee query", TicketPriority::High);

        ticket.assign(Some("admin1".to_string()));
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.assigned_to.as_deref(), Some("admin1"));

        ticket.assign(None);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.assigned_to.is_none());
    }

    #[test]
    fn assignment_leaves_resolved_status_alone() {
        let mut ticket = SupportTicket::open("s1", "Fee query", TicketPriority::Low);
        ticket.set_status(TicketStatus::Resolved);

        ticket.assign(Some("admin1".to_string()));
        assert_eq!(ticket.status, TicketStatus::Resolved);
    }

    #[test]
    fn internal_messages_flagged() {
        let msg = TicketMessage::new("t1", "admin1", "internal note").internal();
        assert!(msg.is_internal);
    }
}
