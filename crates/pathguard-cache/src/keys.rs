//! Cache key builders for all PathGuard cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Paths are canonical at this
//! point, so they embed safely in keys. Namespacing is the provider's
//! job: the Redis provider prepends its configured `key_prefix`, so
//! keys built here carry no prefix of their own.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Cache key for the boolean exact-match protection lookup.
pub fn protected(path: &str) -> String {
    format!("protected:{path}")
}

/// Cache key for the full protection record lookup (reason, creator).
pub fn protection_info(path: &str) -> String {
    format!("info:{path}")
}

/// Cache key for the list of all protected paths.
pub fn all_protected() -> String {
    "all_protected".to_string()
}

/// Cache key marking that a notification was already sent for a
/// (path, action) pair within the de-duplication window.
///
/// The path is hashed so the key length stays bounded for arbitrarily
/// deep trees. `DefaultHasher::new` is deterministic, so worker
/// processes sharing a Redis instance agree on the key.
pub fn notification_sent(path: &str, action: &str) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    format!("notified:{action}:{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_carry_no_namespace_prefix() {
        // The provider owns the namespace; a prefix here would double up
        // in Redis (`pathguard:pathguard:...`).
        assert_eq!(protected("/Projects/Alpha"), "protected:/Projects/Alpha");
        assert_eq!(protection_info("/X"), "info:/X");
        assert_eq!(all_protected(), "all_protected");
        assert!(notification_sent("/X", "delete").starts_with("notified:delete:"));
    }

    #[test]
    fn test_notification_key_distinguishes_actions() {
        assert_ne!(
            notification_sent("/X", "delete"),
            notification_sent("/X", "move")
        );
    }

    #[test]
    fn test_notification_key_is_stable_and_bounded() {
        let deep = format!("/{}", "segment/".repeat(200));
        let key = notification_sent(&deep, "delete");
        assert_eq!(key, notification_sent(&deep, "delete"));
        assert!(key.len() < 64);
    }
}
