//! Platform behavior tests that run without a database: domain rules, auth
//! tokens, access checks, and error mapping.

use af_platform::domain::{
    AcademicHistory, Application, ApplicationDocument, ApplicationStatus, DocumentStatus,
    DocumentType, Profile, SupportTicket, TicketMessage, TicketPriority, TicketStatus, UserRole,
};
use af_platform::service::{checks, AuthConfig, AuthContext, AuthService, PasswordService};
use af_platform::{PortalError, TsidGenerator};

fn student_ctx(id: &str) -> AuthContext {
    AuthContext {
        profile_id: id.to_string(),
        email: format!("{id}@example.com"),
        role: UserRole::Student,
        ip_address: None,
        request_id: None,
    }
}

fn admin_ctx() -> AuthContext {
    AuthContext {
        profile_id: "admin1".to_string(),
        email: "admin@example.com".to_string(),
        role: UserRole::Admin,
        ip_address: None,
        request_id: None,
    }
}

#[test]
fn application_review_pipeline_happy_path() {
    let mut app = Application::submitted("s1", "u1", "p1", 1500, AcademicHistory::default());
    assert_eq!(app.status, ApplicationStatus::Submitted);

    app.transition_to(ApplicationStatus::UnderReview).unwrap();
    app.transition_to(ApplicationStatus::DocsPending).unwrap();
    app.transition_to(ApplicationStatus::UnderReview).unwrap();
    app.transition_to(ApplicationStatus::Approved).unwrap();

    assert!(app.status.is_terminal());
}

#[test]
fn application_cannot_skip_review() {
    let mut app = Application::submitted("s1", "u1", "p1", 1500, AcademicHistory::default());
    let err = app.transition_to(ApplicationStatus::Approved).unwrap_err();
    assert!(matches!(err, PortalError::InvalidTransition { .. }));
    assert_eq!(app.status, ApplicationStatus::Submitted);
}

#[test]
fn terminal_states_are_frozen() {
    let mut app = Application::submitted("s1", "u1", "p1", 1500, AcademicHistory::default());
    app.transition_to(ApplicationStatus::UnderReview).unwrap();
    app.transition_to(ApplicationStatus::Rejected).unwrap();

    for next in [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
    ] {
        assert!(app.transition_to(next).is_err());
    }
}

#[test]
fn reference_numbers_have_fixed_shape() {
    let app = Application::submitted("s1", "u1", "p1", 0, AcademicHistory::default());
    assert!(app.application_number.starts_with("APP"));
    assert_eq!(app.application_number.len(), 11);

    let ticket = SupportTicket::open("s1", "Subject", TicketPriority::Low);
    assert!(ticket.ticket_number.starts_with("TKT"));
    assert_eq!(ticket.ticket_number.len(), 11);
}

#[test]
fn ticket_assignment_lifecycle() {
    let mut ticket = SupportTicket::open("s1", "Fee refund", TicketPriority::High);
    assert_eq!(ticket.status, TicketStatus::Open);

    ticket.assign(Some("admin1".to_string()));
    assert_eq!(ticket.status, TicketStatus::InProgress);

    ticket.assign(None);
    assert_eq!(ticket.status, TicketStatus::Open);

    ticket.set_status(TicketStatus::Resolved);
    ticket.assign(Some("admin2".to_string()));
    assert_eq!(ticket.status, TicketStatus::Resolved);
    assert_eq!(ticket.assigned_to.as_deref(), Some("admin2"));
}

#[test]
fn internal_messages_stay_flagged() {
    let note = TicketMessage::new("t1", "admin1", "escalate to finance").internal();
    assert!(note.is_internal);

    let reply = TicketMessage::new("t1", "s1", "any update?");
    assert!(!reply.is_internal);
}

#[test]
fn document_constraints_enforced_before_write() {
    let doc_type = DocumentType::new("ID Proof")
        .with_formats(vec!["pdf".to_string(), "jpg".to_string()])
        .with_max_size_mb(2);

    assert!(doc_type.validate_upload("aadhaar.pdf", 1024).is_ok());
    assert!(doc_type.validate_upload("AADHAAR.JPG", 1024).is_ok());
    assert!(doc_type.validate_upload("aadhaar.docx", 1024).is_err());
    assert!(doc_type.validate_upload("aadhaar", 1024).is_err());
    assert!(doc_type
        .validate_upload("aadhaar.pdf", 3 * 1024 * 1024)
        .is_err());
}

#[test]
fn document_verdicts_are_final() {
    let mut doc =
        ApplicationDocument::new("a1", "dt1", "a1/dt1/f.pdf", "http://x/f.pdf", "f.pdf", 2048);
    assert_eq!(doc.status, DocumentStatus::PendingVerification);

    doc.decide(DocumentStatus::Rejected, Some("blurry scan".to_string()))
        .unwrap();
    assert_eq!(doc.status, DocumentStatus::Rejected);
    assert!(doc.verified_at.is_some());
    assert_eq!(doc.admin_notes.as_deref(), Some("blurry scan"));

    assert!(doc.decide(DocumentStatus::Verified, None).is_err());
}

#[test]
fn storage_keys_stay_out_of_api_payloads() {
    let doc =
        ApplicationDocument::new("a1", "dt1", "a1/dt1/f.pdf", "http://x/f.pdf", "f.pdf", 100);
    assert_eq!(doc.storage_key, "a1/dt1/f.pdf");

    let json = serde_json::to_value(&doc).unwrap();
    assert!(json.get("storageKey").is_none());
    assert_eq!(json["fileUrl"], "http://x/f.pdf");
}

#[test]
fn password_round_trip_and_strength() {
    assert!(PasswordService::validate_strength("tiny").is_err());

    let hash = PasswordService::hash("a sensible password").unwrap();
    assert_ne!(hash, "a sensible password");
    assert!(PasswordService::verify("a sensible password", &hash));
    assert!(!PasswordService::verify("a different password", &hash));
}

#[test]
fn session_tokens_carry_identity() {
    let auth = AuthService::new(&AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..Default::default()
    });

    let profile = Profile::new("Asha Rao", "Asha@Example.com", UserRole::Student);
    let token = auth.issue_token(&profile).unwrap();
    let claims = auth.validate_token(&token).unwrap();

    assert_eq!(claims.sub, profile.id);
    assert_eq!(claims.email, "asha@example.com");
    assert!(claims.exp > claims.iat);

    let ctx: AuthContext = claims.into();
    assert!(!ctx.is_staff());
}

#[test]
fn garbage_tokens_rejected() {
    let auth = AuthService::new(&AuthConfig::default());
    assert!(matches!(
        auth.validate_token("not.a.jwt"),
        Err(PortalError::InvalidToken { .. })
    ));
}

#[test]
fn access_rules_split_staff_and_owners() {
    let student = student_ctx("s1");
    let admin = admin_ctx();

    assert!(checks::require_staff(&admin).is_ok());
    assert!(matches!(
        checks::require_staff(&student),
        Err(PortalError::Forbidden { .. })
    ));

    assert!(checks::require_self_or_staff(&student, "s1").is_ok());
    assert!(checks::require_self_or_staff(&admin, "s1").is_ok());
    assert!(checks::require_self_or_staff(&student, "s2").is_err());
}

#[test]
fn profile_contact_merge_is_partial() {
    let mut profile = Profile::new("Asha Rao", "asha@example.com", UserRole::Student);
    profile.contact.city = Some("Pune".to_string());
    profile.contact.phone = Some("9000000000".to_string());

    profile.apply_contact_update(af_platform::domain::ContactDetails {
        phone: Some("9111111111".to_string()),
        ..Default::default()
    });

    assert_eq!(profile.contact.phone.as_deref(), Some("9111111111"));
    assert_eq!(profile.contact.city.as_deref(), Some("Pune"));
}

#[test]
fn error_codes_map_to_api_contract() {
    assert_eq!(PortalError::not_found("Profile", "x").code(), "NOT_FOUND");
    assert_eq!(
        PortalError::duplicate("Profile", "email", "a@b.c").code(),
        "DUPLICATE"
    );
    assert_eq!(PortalError::validation("bad").code(), "VALIDATION_ERROR");
    assert_eq!(
        PortalError::conflict("still referenced").code(),
        "CONFLICT"
    );
    assert_eq!(PortalError::InvalidCredentials.code(), "UNAUTHORIZED");
    assert_eq!(PortalError::TokenExpired.code(), "UNAUTHORIZED");
    assert_eq!(PortalError::forbidden("no").code(), "FORBIDDEN");
    assert_eq!(
        PortalError::invalid_transition("draft", "approved").code(),
        "INVALID_TRANSITION"
    );
    assert_eq!(PortalError::internal("boom").code(), "INTERNAL_ERROR");
}

#[test]
fn tsids_are_unique_and_time_ordered() {
    let earlier = TsidGenerator::generate();
    std::thread::sleep(std::time::Duration::from_millis(3));
    let later = TsidGenerator::generate();

    assert_eq!(earlier.len(), 13);
    assert_ne!(earlier, later);
    assert!(earlier < later);
}
