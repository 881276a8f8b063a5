//! # pathguard-database
//!
//! PostgreSQL persistence: connection pool, migrations, and the
//! protection store (the ground truth for every protection decision).

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use store::ProtectionStore;
