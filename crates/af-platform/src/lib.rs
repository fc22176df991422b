//! AdmitFlow Platform
//!
//! Core platform providing:
//! - Applicant and staff identity with role-based access control
//! - University and program catalog management
//! - Application lifecycle (submission through review decision)
//! - Document upload, storage, and verification
//! - Support tickets with per-ticket conversations and change notification
//! - Audit logging for every mutation

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;
pub mod seed;
pub mod tsid;

pub use domain::*;
pub use error::PortalError;
pub use tsid::TsidGenerator;
