//! WebDAV protocol interception.
//!
//! Sync clients poll and cache server state locally, so this layer does
//! more than reject: it shapes denial responses the client understands
//! (status, headers, structured error body), nudges change-tracking
//! metadata so clients reconcile instead of diverging, and augments
//! property listings with protection flags.

pub mod guard;
pub mod interceptor;
pub mod properties;
pub mod resolve;

pub use guard::{DavGuard, Denial, DenialCause, GuardVerdict};
pub use interceptor::{ChangeTracker, DavInterceptor, DavTree, DenialResponse};
pub use properties::ResourceFlags;
pub use resolve::MountResolver;
