//! Canonical path handling.
//!
//! Every path entering the engine is normalized to the canonical form
//! `/segment/segment` before being stored, cached, or compared. All
//! lookups therefore operate on byte-equal strings.

/// Normalize a raw path to canonical form.
///
/// Drops empty segments (leading, trailing, and doubled slashes) and
/// re-attaches a single leading slash. The empty string and any run of
/// slashes normalize to `/` (the root). Idempotent.
pub fn normalize(path: &str) -> String {
    let segments: Vec<&str> = path.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// The final path segment, or the empty string for the root.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// The parent of a canonical path. The root has no parent.
pub fn parent(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => None,
    }
}

/// All ancestors of a canonical path, root first, excluding the path
/// itself and excluding the root.
///
/// `/a/b/c` yields `/a`, `/a/b`. Checks walk top-down so a protection
/// near the root short-circuits the walk early.
pub fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    if path == "/" {
        return out;
    }
    let mut prefix = String::new();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        prefix.push('/');
        prefix.push_str(segment);
        out.push(prefix.clone());
    }
    out
}

/// Internal alias path for a group mount: `{prefix}/{id}`.
pub fn group_mount_path(prefix: &str, id: i64) -> String {
    format!("{}/{id}", prefix.trim_end_matches('/'))
}
