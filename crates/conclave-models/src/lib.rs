//! # Conclave Models
//!
//! Domain models and DTOs for the Conclave API.
//!
//! - [`roles`]: The closed [`Role`] classification
//! - [`permissions`]: Capability bundles derived from a role
//! - [`session`]: The persisted [`Session`] row
//! - [`audit`]: Audit trail entries
//! - [`auth`]: Request and response bodies of the `/auth` endpoints

pub mod audit;
pub mod auth;
pub mod permissions;
pub mod roles;
pub mod session;

pub use audit::{AuditAction, AuditEntry, AuditQuery};
pub use auth::{LoginRequest, LoginResponse, MeResponse, MessageResponse, SessionResponse};
pub use permissions::{PermissionSet, permissions_for};
pub use roles::Role;
pub use session::{Provenance, Session};
