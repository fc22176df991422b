//! Domain Models
//!
//! Core entities backing the portal. All entities use TSID (Crockford
//! Base32) string IDs and UTC timestamps.

pub mod application;
pub mod audit_log;
pub mod document;
pub mod profile;
pub mod ticket;
pub mod university;

pub use application::*;
pub use audit_log::*;
pub use document::*;
pub use profile::*;
pub use ticket::*;
pub use university::*;
