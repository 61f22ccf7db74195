//! # Conclave Auth
//!
//! Session-based authentication and role resolution for the Conclave API.
//!
//! - [`roles`]: [`RoleProvider`] and the list-backed [`StaticRoleProvider`]
//! - [`store`]: [`PgSessionStore`], the durable session table
//! - [`audit`]: [`AuditSink`], a best-effort login/logout trail
//! - [`reaper`]: [`SessionReaper`], the background expiry sweep
//! - [`service`]: [`SessionService`], which ties the above to the in-process cache
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use conclave_auth::{SessionService, StaticRoleProvider};
//! use conclave_config::SessionConfig;
//! use conclave_models::Provenance;
//!
//! let sessions = SessionService::new(
//!     pool,
//!     Arc::new(StaticRoleProvider::from_env()),
//!     SessionConfig::from_env(),
//! );
//!
//! let session = sessions.login("chair@org.example", Provenance::default()).await?;
//! assert!(sessions.verify(&session.token).await.is_some());
//! sessions.destroy(&session.token).await?;
//! ```

pub mod audit;
pub mod error;
pub mod reaper;
pub mod roles;
pub mod service;
pub mod store;

pub use audit::AuditSink;
pub use error::{AuditError, AuthError, StoreError};
pub use reaper::{ReapReport, SessionReaper};
pub use roles::{RoleProvider, StaticRoleProvider};
pub use service::SessionService;
pub use store::{PgSessionStore, generate_token};
