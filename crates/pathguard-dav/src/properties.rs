//! PROPFIND property augmentation for protected resources.
//!
//! Clients that honor capability flags disable the corresponding UI
//! actions up front, which avoids round-trips that would be denied
//! anyway. The desktop sync client additionally reads the permissions
//! string and only attempts DELETE when the delete flag is present, so
//! that flag is stripped for protected folders.

use pathguard_engine::checker::ProtectionChecker;

pub const PROP_IS_PROTECTED: &str = "pg:is-protected";
pub const PROP_PROTECTION_REASON: &str = "pg:protection-reason";
pub const PROP_IS_DELETABLE: &str = "pg:is-deletable";
pub const PROP_IS_RENAMEABLE: &str = "pg:is-renameable";
pub const PROP_IS_MOVEABLE: &str = "pg:is-moveable";

/// Protection-derived flags for one resource in a PROPFIND response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFlags {
    pub protected: bool,
    pub reason: Option<String>,
}

impl ResourceFlags {
    /// Compute flags for a resolved canonical path.
    ///
    /// Degrades to unprotected on check failure; PROPFIND augmentation
    /// is advisory and must never fail a listing.
    pub async fn for_path(checker: &ProtectionChecker, path: &str) -> Self {
        match checker.is_protected(path).await {
            Ok(true) => {
                let reason = match checker.protection_info(path).await {
                    Ok(Some(record)) => record.reason,
                    _ => None,
                };
                Self {
                    protected: true,
                    reason,
                }
            }
            _ => Self {
                protected: false,
                reason: None,
            },
        }
    }

    pub fn deletable(&self) -> bool {
        !self.protected
    }

    pub fn renameable(&self) -> bool {
        !self.protected
    }

    pub fn moveable(&self) -> bool {
        !self.protected
    }

    /// Property name/value pairs to merge into the response.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            (PROP_IS_PROTECTED, bool_str(self.protected).to_string()),
            (
                PROP_PROTECTION_REASON,
                self.reason.clone().unwrap_or_default(),
            ),
            (PROP_IS_DELETABLE, bool_str(self.deletable()).to_string()),
            (PROP_IS_RENAMEABLE, bool_str(self.renameable()).to_string()),
            (PROP_IS_MOVEABLE, bool_str(self.moveable()).to_string()),
        ]
    }

    /// Rewrite a client-facing permissions string for this resource.
    pub fn apply_to_permissions(&self, permissions: &str) -> String {
        if self.protected {
            strip_delete_flag(permissions)
        } else {
            permissions.to_string()
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Remove the delete capability letter from a permissions string.
pub fn strip_delete_flag(permissions: &str) -> String {
    permissions.chars().filter(|c| *c != 'D').collect()
}
