//! Repository Layer
//!
//! PostgreSQL repositories for all domain entities. SQL is hand-written and
//! rows are mapped manually; the schema is created idempotently at startup
//! via [`schema::init_schema`].

pub mod application;
pub mod application_document;
pub mod audit_log;
pub mod document_type;
pub mod profile;
pub mod program;
pub mod schema;
pub mod ticket;
pub mod university;

pub use application::ApplicationRepository;
pub use application_document::ApplicationDocumentRepository;
pub use audit_log::AuditLogRepository;
pub use document_type::{DocumentTypeRepository, ProgramDocumentRepository};
pub use profile::ProfileRepository;
pub use schema::init_schema;
pub use program::ProgramRepository;
pub use ticket::{TicketMessageRepository, TicketRepository};
pub use university::UniversityRepository;
