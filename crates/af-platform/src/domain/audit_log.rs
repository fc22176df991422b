//! Audit Log Entity
//!
//! Records all significant actions in the portal for compliance and debugging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit action type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Entity created
    Create,
    /// Entity updated
    Update,
    /// Entity deleted
    Delete,
    /// Login attempt
    Login,
    /// Logout
    Logout,
    /// Application or ticket status changed
    StatusChanged,
    /// Document verdict recorded
    DocumentVerdict,
    /// Ticket assigned or unassigned
    TicketAssigned,
    /// Conversation message posted
    MessagePosted,
    /// Other custom action
    Other,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::StatusChanged => "STATUS_CHANGED",
            AuditAction::DocumentVerdict => "DOCUMENT_VERDICT",
            AuditAction::TicketAssigned => "TICKET_ASSIGNED",
            AuditAction::MessagePosted => "MESSAGE_POSTED",
            AuditAction::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(AuditAction::Create),
            "UPDATE" => Some(AuditAction::Update),
            "DELETE" => Some(AuditAction::Delete),
            "LOGIN" => Some(AuditAction::Login),
            "LOGOUT" => Some(AuditAction::Logout),
            "STATUS_CHANGED" => Some(AuditAction::StatusChanged),
            "DOCUMENT_VERDICT" => Some(AuditAction::DocumentVerdict),
            "TICKET_ASSIGNED" => Some(AuditAction::TicketAssigned),
            "MESSAGE_POSTED" => Some(AuditAction::MessagePosted),
            "OTHER" => Some(AuditAction::Other),
            _ => None,
        }
    }
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,

    /// Action performed
    pub action: AuditAction,

    /// Entity type affected (e.g., "Application", "SupportTicket")
    pub entity_type: String,

    /// Entity ID affected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Description of the action
    pub description: String,

    /// Profile who performed the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    /// Actor email (denormalized for display)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,

    /// IP address of the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Request ID for correlation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// Timestamp
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        action: AuditAction,
        entity_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            description: description.into(),
            actor_id: None,
            actor_email: None,
            ip_address: None,
            request_id: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_entity(
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut log = Self::new(action, entity_type, description);
        log.entity_id = Some(entity_id.into());
        log
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>, email: Option<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self.actor_email = email;
        self
    }

    pub fn with_request_context(
        mut self,
        request_id: Option<String>,
        ip_address: Option<String>,
    ) -> Self {
        self.request_id = request_id;
        self.ip_address = ip_address;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_carry_actor_and_client_context() {
        let log = AuditLog::for_entity(
            AuditAction::StatusChanged,
            "Application",
            "app1",
            "Application APP00000001 moved from SUBMITTED to UNDER_REVIEW",
        )
        .with_actor("admin1", Some("admin@example.com".to_string()))
        .with_request_context(Some("req-42".to_string()), Some("203.0.113.7".to_string()))
        .with_metadata(serde_json::json!({"from": "SUBMITTED", "to": "UNDER_REVIEW"}));

        assert_eq!(log.actor_id.as_deref(), Some("admin1"));
        assert_eq!(log.actor_email.as_deref(), Some("admin@example.com"));
        assert_eq!(log.request_id.as_deref(), Some("req-42"));
        assert_eq!(log.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(log.metadata.unwrap()["to"], "UNDER_REVIEW");
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            AuditAction::Create,
            AuditAction::StatusChanged,
            AuditAction::DocumentVerdict,
            AuditAction::Other,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("NOT_AN_ACTION"), None);
    }
}
