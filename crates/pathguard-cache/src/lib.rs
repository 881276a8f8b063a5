//! # pathguard-cache
//!
//! Cache layer fronting the protection store. Two providers: in-memory
//! (single node, tests) and Redis (shared across worker processes). The
//! cache is a best-effort accelerator; the store is ground truth.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::MemoryCacheProvider;
pub use provider::CacheManager;
