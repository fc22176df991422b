//! OpenAPI Documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::applications::{
    AcademicsPayload, ApplicationResponse, SubmitApplicationRequest, UpdateStatusRequest,
};
use super::audit_logs::AuditLogResponse;
use super::auth::{AuthResponse, LoginRequest, RegisterRequest};
use super::common::{ApiError, PaginatedResponse, SuccessResponse};
use super::dashboard::{AdminDashboardResponse, StudentDashboardResponse};
use super::document_types::{
    CreateDocumentTypeRequest, DocumentTypeResponse, UpdateDocumentTypeRequest,
};
use super::documents::{ApplicationDocumentResponse, ChecklistItemResponse, VerdictRequest};
use super::profiles::{
    ContactUpdate, ProfileResponse, StudentDirectoryEntry, UpdateProfileRequest,
};
use super::programs::{
    CreateProgramRequest, LinkDocumentTypeRequest, ProgramResponse, UpdateProgramRequest,
};
use super::tickets::{
    AssignTicketRequest, CreateTicketRequest, PostMessageRequest, TicketMessageResponse,
    TicketResponse, UpdateTicketStatusRequest,
};
use super::universities::{
    CreateUniversityRequest, UniversityResponse, UpdateUniversityRequest,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AdmitFlow Portal API",
        description = "University application management: catalogs, applications, document verification, and support tickets.",
        version = "0.1.0"
    ),
    paths(
        super::auth::register,
        super::auth::login,
        super::auth::me,
        super::auth::logout,
        super::profiles::get_profile,
        super::profiles::update_profile,
        super::profiles::list_profiles,
        super::profiles::student_directory,
        super::universities::list_universities,
        super::universities::get_university,
        super::universities::create_university,
        super::universities::update_university,
        super::universities::delete_university,
        super::programs::list_programs,
        super::programs::get_program,
        super::programs::list_program_document_types,
        super::programs::create_program,
        super::programs::update_program,
        super::programs::delete_program,
        super::programs::link_document_type,
        super::programs::unlink_document_type,
        super::document_types::list_document_types,
        super::document_types::get_document_type,
        super::document_types::create_document_type,
        super::document_types::update_document_type,
        super::document_types::delete_document_type,
        super::applications::submit_application,
        super::applications::list_own_applications,
        super::applications::get_application,
        super::applications::list_applications,
        super::applications::update_status,
        super::documents::upload_document,
        super::documents::list_documents,
        super::documents::checklist,
        super::documents::download_document,
        super::documents::record_verdict,
        super::tickets::create_ticket,
        super::tickets::list_own_tickets,
        super::tickets::get_ticket,
        super::tickets::list_messages,
        super::tickets::post_message,
        super::tickets::stream_messages,
        super::tickets::list_tickets,
        super::tickets::update_ticket_status,
        super::tickets::assign_ticket,
        super::dashboard::student_dashboard,
        super::dashboard::admin_dashboard,
        super::audit_logs::list_audit_logs,
    ),
    components(schemas(
        ApiError,
        SuccessResponse,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        ProfileResponse,
        ContactUpdate,
        UpdateProfileRequest,
        PaginatedResponse<ProfileResponse>,
        StudentDirectoryEntry,
        PaginatedResponse<StudentDirectoryEntry>,
        UniversityResponse,
        CreateUniversityRequest,
        UpdateUniversityRequest,
        PaginatedResponse<UniversityResponse>,
        ProgramResponse,
        CreateProgramRequest,
        UpdateProgramRequest,
        LinkDocumentTypeRequest,
        PaginatedResponse<ProgramResponse>,
        DocumentTypeResponse,
        CreateDocumentTypeRequest,
        UpdateDocumentTypeRequest,
        AcademicsPayload,
        ApplicationResponse,
        SubmitApplicationRequest,
        UpdateStatusRequest,
        PaginatedResponse<ApplicationResponse>,
        ApplicationDocumentResponse,
        ChecklistItemResponse,
        VerdictRequest,
        TicketResponse,
        TicketMessageResponse,
        CreateTicketRequest,
        PostMessageRequest,
        AssignTicketRequest,
        UpdateTicketStatusRequest,
        PaginatedResponse<TicketResponse>,
        StudentDashboardResponse,
        AdminDashboardResponse,
        AuditLogResponse,
        PaginatedResponse<AuditLogResponse>,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "profiles", description = "User profiles"),
        (name = "catalog", description = "Universities, programs, and document types"),
        (name = "applications", description = "Application submission and review"),
        (name = "documents", description = "Uploads and verification"),
        (name = "tickets", description = "Support conversations"),
        (name = "dashboard", description = "Summary counts"),
        (name = "audit", description = "Audit trail"),
    )
)]
pub struct ApiDoc;
