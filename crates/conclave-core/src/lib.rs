//! # Conclave Core
//!
//! Core types and helpers shared by every Conclave crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`identity`]: Email normalization and token redaction
//!
//! # Example
//!
//! ```ignore
//! use conclave_core::{AppError, normalize_email, token_fragment};
//!
//! let email = normalize_email("  Chair@Org.Example ");
//! assert_eq!(email, "chair@org.example");
//!
//! let error = AppError::forbidden(anyhow::anyhow!("Access denied"));
//! ```

pub mod errors;
pub mod identity;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use identity::{normalize_email, token_fragment};
