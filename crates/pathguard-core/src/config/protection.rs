//! Protection policy configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the protection decision engine and interception layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// TTL for cached protection lookups in seconds.
    #[serde(default = "default_lookup_ttl")]
    pub lookup_ttl_seconds: u64,
    /// De-duplication window for blocked-operation notifications in seconds.
    #[serde(default = "default_notification_window")]
    pub notification_window_seconds: u64,
    /// Denial reason shown to clients when a record has no reason set.
    #[serde(default = "default_reason")]
    pub default_reason: String,
    /// Maximum depth when walking a storage wrapper chain looking for a
    /// group-mount capability.
    #[serde(default = "default_probe_depth")]
    pub probe_depth_limit: usize,
    /// Internal path prefix under which group mounts are tracked.
    #[serde(default = "default_group_mount_prefix")]
    pub group_mount_prefix: String,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            lookup_ttl_seconds: default_lookup_ttl(),
            notification_window_seconds: default_notification_window(),
            default_reason: default_reason(),
            probe_depth_limit: default_probe_depth(),
            group_mount_prefix: default_group_mount_prefix(),
        }
    }
}

fn default_lookup_ttl() -> u64 {
    300
}

fn default_notification_window() -> u64 {
    1800
}

fn default_reason() -> String {
    "Protected by server policy".to_string()
}

fn default_probe_depth() -> usize {
    10
}

fn default_group_mount_prefix() -> String {
    "/__groupmounts".to_string()
}
