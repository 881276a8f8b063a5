//! Shared trait definitions.
//!
//! Traits live here so that leaf crates (cache, storage, engine) can
//! implement them without depending on each other.

pub mod cache;
pub mod notify;
pub mod storage;
