//! The set of operations the protection layers intercept.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A guarded operation kind.
///
/// Used in notification de-duplication keys, denial response headers, and
/// log messages, so the string form is part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectedAction {
    /// Delete a file or directory.
    Delete,
    /// Rename or move.
    Move,
    /// Copy over or copy out.
    Copy,
    /// Create a directory or bind a new resource.
    Create,
    /// Write file content.
    Write,
    /// Take an exclusive lock.
    Lock,
    /// Modify resource properties.
    PropertyWrite,
    /// Read or list contents.
    Read,
}

impl ProtectedAction {
    /// Stable string form used in cache keys and response headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Create => "create",
            Self::Write => "write",
            Self::Lock => "lock",
            Self::PropertyWrite => "proppatch",
            Self::Read => "read",
        }
    }

    /// Whether denying this action requires fail-closed handling when the
    /// protection check itself errors.
    pub fn is_destructive(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for ProtectedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
