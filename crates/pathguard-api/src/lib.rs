//! # pathguard-api
//!
//! The administrative HTTP surface: protect/unprotect, listing, path
//! checks, cache management, and the status map the UI renders badges
//! from. Mutating endpoints require the admin bearer token; the check
//! endpoint is safe for any caller.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
