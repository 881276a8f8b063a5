//! Protection decision engine.
//!
//! The [`ProtectionChecker`] answers every "is this path protected?"
//! question in the system. It fronts the durable store with a short-TTL
//! cache and owns cache coherency: every mutation flushes the cache
//! namespace so stale positives and negatives cannot outlive a write.

pub mod checker;
pub mod memstore;
pub mod notify;
pub mod path;

pub use checker::{ProtectionChecker, ProtectionInfo};
pub use memstore::MemoryProtectionStore;
pub use notify::RateLimitedNotifier;
