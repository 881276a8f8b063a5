//! URI to canonical path resolution.
//!
//! DAV URIs arrive percent-encoded and prefixed with the endpoint root
//! (`/dav/files/{principal}` or the legacy `/webdav`). Guards operate on
//! canonical storage paths, so every identifier is decoded, stripped,
//! and normalized here first. Group mounts add a second wrinkle: their
//! externally visible name differs from the internal identifier path the
//! protection records use, and the exact-match engine must be consultable
//! with either form.

use std::collections::HashMap;
use std::sync::RwLock;

use percent_encoding::percent_decode_str;

use pathguard_engine::path;

/// Decode and canonicalize a request URI into a storage path.
///
/// Strips the DAV endpoint prefix (and the principal segment for the
/// per-user endpoint). Unknown prefixes pass through, normalized.
pub fn resolve_uri(uri: &str) -> String {
    let raw = uri.split('?').next().unwrap_or(uri);
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let canonical = path::normalize(&decoded);

    if let Some(rest) = canonical.strip_prefix("/dav/files/") {
        // Drop the principal segment: /dav/files/{user}/a/b -> /a/b
        let after_principal = rest.find('/').map(|i| &rest[i..]).unwrap_or("/");
        return path::normalize(after_principal);
    }
    if let Some(rest) = canonical.strip_prefix("/webdav") {
        return path::normalize(rest);
    }
    canonical
}

/// Parse a `Destination` header into a canonical storage path.
///
/// The header carries either an absolute URL or an absolute path.
pub fn parse_destination(header: &str) -> Option<String> {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path_part = if let Some(scheme_end) = trimmed.find("://") {
        let after_scheme = &trimmed[scheme_end + 3..];
        match after_scheme.find('/') {
            Some(idx) => &after_scheme[idx..],
            None => "/",
        }
    } else {
        trimmed
    };
    Some(resolve_uri(path_part))
}

/// Lookup variants for a resolved path.
///
/// Protection records created through different entry points historically
/// stored the user-visible path either bare or under a `/files` prefix;
/// exact-match checks consult both forms.
pub fn path_variants(canonical: &str) -> Vec<String> {
    let mut variants = vec![canonical.to_string()];
    if let Some(stripped) = canonical.strip_prefix("/files") {
        let stripped = path::normalize(stripped);
        if stripped != "/" {
            variants.push(stripped);
        }
    } else if canonical != "/" {
        variants.push(format!("/files{canonical}"));
    }
    variants
}

/// Two-way mapping between group mounts' visible paths and their
/// internal protection-tracking identifier paths.
#[derive(Debug, Default)]
pub struct MountResolver {
    prefix: String,
    /// visible mount path -> group mount id
    mounts: RwLock<HashMap<String, i64>>,
}

impl MountResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mounts: RwLock::new(HashMap::new()),
        }
    }

    /// Register a group mount's visible path.
    pub fn register(&self, visible_path: &str, id: i64) {
        let canonical = path::normalize(visible_path);
        if let Ok(mut mounts) = self.mounts.write() {
            mounts.insert(canonical, id);
        }
    }

    /// Internal identifier path for a visible path, when it sits inside
    /// a registered group mount.
    pub fn to_internal(&self, visible: &str) -> Option<String> {
        let canonical = path::normalize(visible);
        let mounts = self.mounts.read().ok()?;
        for (mount, id) in mounts.iter() {
            let internal = path::group_mount_path(&self.prefix, *id);
            if canonical == *mount {
                return Some(internal);
            }
            if let Some(rest) = canonical.strip_prefix(&format!("{mount}/")) {
                return Some(format!("{internal}/{rest}"));
            }
        }
        None
    }

    /// Visible path for an internal identifier path.
    pub fn to_visible(&self, internal: &str) -> Option<String> {
        let canonical = path::normalize(internal);
        let mounts = self.mounts.read().ok()?;
        for (mount, id) in mounts.iter() {
            let prefix_path = path::group_mount_path(&self.prefix, *id);
            if canonical == prefix_path {
                return Some(mount.clone());
            }
            if let Some(rest) = canonical.strip_prefix(&format!("{prefix_path}/")) {
                return Some(format!("{mount}/{rest}"));
            }
        }
        None
    }

    /// All forms under which a path may appear in protection records:
    /// the path itself plus its internal or visible alias.
    pub fn aliases(&self, canonical: &str) -> Vec<String> {
        let mut out = vec![canonical.to_string()];
        if let Some(internal) = self.to_internal(canonical) {
            out.push(internal);
        } else if let Some(visible) = self.to_visible(canonical) {
            out.push(visible);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_per_user_endpoint() {
        assert_eq!(resolve_uri("/dav/files/alice/Projects/Alpha"), "/Projects/Alpha");
        assert_eq!(resolve_uri("/dav/files/alice"), "/");
        assert_eq!(resolve_uri("/dav/files/alice/"), "/");
    }

    #[test]
    fn test_resolve_legacy_endpoint() {
        assert_eq!(resolve_uri("/webdav/Projects"), "/Projects");
        assert_eq!(resolve_uri("/webdav"), "/");
    }

    #[test]
    fn test_resolve_percent_decoding() {
        assert_eq!(
            resolve_uri("/dav/files/alice/My%20Folder/a%26b"),
            "/My Folder/a&b"
        );
    }

    #[test]
    fn test_parse_destination_absolute_url() {
        assert_eq!(
            parse_destination("https://cloud.example.com/dav/files/alice/Target"),
            Some("/Target".to_string())
        );
        assert_eq!(
            parse_destination("/dav/files/alice/Target"),
            Some("/Target".to_string())
        );
        assert_eq!(parse_destination("   "), None);
    }

    #[test]
    fn test_path_variants_cover_files_prefix() {
        assert_eq!(
            path_variants("/Projects"),
            vec!["/Projects".to_string(), "/files/Projects".to_string()]
        );
        assert_eq!(
            path_variants("/files/Projects"),
            vec!["/files/Projects".to_string(), "/Projects".to_string()]
        );
    }

    #[test]
    fn test_mount_resolver_two_way() {
        let resolver = MountResolver::new("/__groupmounts");
        resolver.register("/Team Folder", 7);

        assert_eq!(
            resolver.to_internal("/Team Folder/Docs"),
            Some("/__groupmounts/7/Docs".to_string())
        );
        assert_eq!(
            resolver.to_internal("/Team Folder"),
            Some("/__groupmounts/7".to_string())
        );
        assert_eq!(
            resolver.to_visible("/__groupmounts/7/Docs"),
            Some("/Team Folder/Docs".to_string())
        );
        assert_eq!(resolver.to_internal("/Elsewhere"), None);
    }

    #[test]
    fn test_aliases_include_internal_form() {
        let resolver = MountResolver::new("/__groupmounts");
        resolver.register("/Team Folder", 7);

        assert_eq!(
            resolver.aliases("/Team Folder"),
            vec!["/Team Folder".to_string(), "/__groupmounts/7".to_string()]
        );
        assert_eq!(
            resolver.aliases("/__groupmounts/7"),
            vec!["/__groupmounts/7".to_string(), "/Team Folder".to_string()]
        );
        assert_eq!(resolver.aliases("/plain"), vec!["/plain".to_string()]);
    }
}
