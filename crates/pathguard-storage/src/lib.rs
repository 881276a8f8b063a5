//! Storage-layer protection interception.
//!
//! [`ProtectedStorage`] decorates any [`StorageBackend`] and denies the
//! mutating operations that would touch a protected folder. The
//! [`WrapperRegistry`] applies the decorator to every eligible mount
//! exactly once per process.
//!
//! [`StorageBackend`]: pathguard_core::traits::storage::StorageBackend

pub mod memory;
pub mod probe;
pub mod registry;
pub mod wrapper;

pub use memory::MemoryStorage;
pub use registry::{ExecutionContext, WrapperRegistry};
pub use wrapper::ProtectedStorage;
