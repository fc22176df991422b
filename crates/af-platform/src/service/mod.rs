//! Service Layer
//!
//! Business workflows that coordinate repositories, enforce access rules, and
//! wrap multi-write flows in transactions.

pub mod applications;
pub mod audit;
pub mod auth;
pub mod documents;
pub mod notify;
pub mod password;
pub mod storage;
pub mod tickets;

pub use applications::{ApplicationService, ApplicationStats, SubmitApplication};
pub use audit::AuditService;
pub use auth::{checks, AuthConfig, AuthContext, AuthService, SessionClaims};
pub use documents::{ChecklistItem, DocumentService};
pub use notify::{ChangeEvent, ChangeNotifier};
pub use password::PasswordService;
pub use storage::{DocumentStore, LocalDocumentStore};
pub use tickets::{OpenTicket, TicketService};
