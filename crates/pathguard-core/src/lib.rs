//! # pathguard-core
//!
//! Core crate for PathGuard. Contains configuration schemas, shared traits,
//! common types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other PathGuard crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
