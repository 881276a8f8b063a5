//! Protection record entity.

pub mod model;

pub use model::{CreateProtection, ProtectionRecord};
