//! # Conclave Cache
//!
//! In-process session cache for the Conclave API.
//!
//! The cache mirrors rows recently read from or written to the session
//! store. It is a performance layer only: it is filled exclusively after a
//! successful store operation and never originates a session.
//!
//! Each process owns its own cache. Nothing here is shared between
//! instances, so a logout handled elsewhere is only observed locally once
//! the entry expires or (when configured) outlives its maximum age.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use conclave_cache::SessionCache;
//!
//! let cache = Arc::new(SessionCache::new(None));
//! cache.put(session.clone());
//!
//! if let Some(hit) = cache.get(&session.token) {
//!     // fast path, no store round-trip
//! }
//! ```

pub mod session_cache;

pub use session_cache::SessionCache;
