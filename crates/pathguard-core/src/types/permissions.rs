//! File permission bitmask.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

/// Effective permission bitmask for a path.
///
/// Compatible with the bit layout sync clients expect: the client only
/// attempts an operation when the corresponding bit is present, so
/// stripping bits here proactively prevents denied round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions(pub u32);

impl Permissions {
    /// Read file contents / list directories.
    pub const READ: Permissions = Permissions(1);
    /// Update existing content.
    pub const UPDATE: Permissions = Permissions(2);
    /// Create new children.
    pub const CREATE: Permissions = Permissions(4);
    /// Delete.
    pub const DELETE: Permissions = Permissions(8);
    /// Re-share read-only.
    pub const SHARE_READ: Permissions = Permissions(16);
    /// Re-share with write access.
    pub const SHARE_WRITE: Permissions = Permissions(32);

    /// All permission bits.
    pub const ALL: Permissions = Permissions(1 | 2 | 4 | 8 | 16 | 32);

    /// No permission bits.
    pub const NONE: Permissions = Permissions(0);

    /// Check whether all bits of `other` are present.
    pub fn contains(&self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    /// The mask applied to protected paths: read and read-only re-share.
    ///
    /// Write, delete, and share-write bits are stripped so clients that
    /// honor the mask disable the corresponding actions up front.
    pub fn read_only(&self) -> Permissions {
        Permissions(self.0 & (Self::READ.0 | Self::SHARE_READ.0))
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 | rhs.0)
    }
}

impl BitAnd for Permissions {
    type Output = Permissions;

    fn bitand(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 & rhs.0)
    }
}

impl fmt::Display for Permissions {
    /// Compact letter form exposed to DAV clients (`RWCDS` subset).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::READ) {
            f.write_str("R")?;
        }
        if self.contains(Self::UPDATE) {
            f.write_str("W")?;
        }
        if self.contains(Self::CREATE) {
            f.write_str("C")?;
        }
        if self.contains(Self::DELETE) {
            f.write_str("D")?;
        }
        if self.contains(Self::SHARE_READ) {
            f.write_str("S")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_strips_write_bits() {
        let full = Permissions::ALL;
        let stripped = full.read_only();
        assert!(stripped.contains(Permissions::READ));
        assert!(stripped.contains(Permissions::SHARE_READ));
        assert!(!stripped.contains(Permissions::UPDATE));
        assert!(!stripped.contains(Permissions::DELETE));
        assert!(!stripped.contains(Permissions::SHARE_WRITE));
    }

    #[test]
    fn test_display_omits_stripped_bits() {
        assert_eq!(Permissions::ALL.to_string(), "RWCDS");
        assert_eq!(Permissions::ALL.read_only().to_string(), "RS");
    }
}
