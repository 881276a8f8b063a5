//! Common value types shared across crates.

pub mod action;
pub mod permissions;

pub use action::ProtectedAction;
pub use permissions::Permissions;
