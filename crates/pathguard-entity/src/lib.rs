//! # pathguard-entity
//!
//! Persisted entity models. PathGuard stores exactly one entity: the
//! protection record.

pub mod protection;
