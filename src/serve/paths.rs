//! Path decoding and confinement helpers.
//!
//! Request paths are attacker-controlled. Everything that turns a URL path
//! into a filesystem path goes through here: percent-decoding, stripping the
//! confining prefix, and component-wise resolution that refuses to leave the
//! shared root.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Index file names recognized at the shared root, in preference order.
pub const INDEX_FILES: [&str; 6] = [
    "index.html",
    "index.htm",
    "index.php",
    "default.html",
    "default.htm",
    "default.php",
];

/// Percent-decode a raw request path. Fails on invalid UTF-8 after
/// decoding, which the router maps to 400.
pub fn decode_path(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Strip the confining `/{base}` prefix from a path the router has already
/// verified to be inside the shared subtree.
///
/// `/{base}/` becomes `/`, `/{base}/x` becomes `/x`.
pub fn strip_share_prefix<'a>(path: &'a str, base: &str) -> &'a str {
    let stripped = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(base))
        .unwrap_or(path);
    if stripped.is_empty() {
        "/"
    } else {
        stripped
    }
}

/// Resolve a decoded request path against the shared root, component by
/// component. Any `.` is skipped; any `..` fails closed. The result is a
/// candidate path that never lexically escapes the root.
pub fn resolve_within_root(root: &Path, path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            // A component with a path separator baked in would bypass the
            // split above on Windows roots.
            c if c.contains('\\') || c.contains('\0') => return None,
            c => resolved.push(c),
        }
    }
    Some(resolved)
}

/// Verify that an existing path really lives under the root once symlinks
/// are resolved. Fails closed on any canonicalization error.
pub fn confine_existing(root: &Path, candidate: &Path) -> Option<PathBuf> {
    let canonical_root = root.canonicalize().ok()?;
    let canonical = candidate.canonicalize().ok()?;
    if canonical.starts_with(&canonical_root) {
        Some(canonical)
    } else {
        None
    }
}

/// First recognized index file present directly under the shared root.
pub fn find_index(root: &Path) -> Option<&'static str> {
    INDEX_FILES
        .iter()
        .copied()
        .find(|name| root.join(name).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/demo/a%20b.html").as_deref(), Some("/demo/a b.html"));
        assert_eq!(decode_path("/plain").as_deref(), Some("/plain"));
        // Invalid UTF-8 after decoding
        assert_eq!(decode_path("/%ff%fe"), None);
    }

    #[test]
    fn test_strip_share_prefix() {
        assert_eq!(strip_share_prefix("/demo/", "demo"), "/");
        assert_eq!(strip_share_prefix("/demo/css/site.css", "demo"), "/css/site.css");
        assert_eq!(strip_share_prefix("/demo", "demo"), "/");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let root = Path::new("/www/demo");
        assert_eq!(resolve_within_root(root, "/../../etc/passwd"), None);
        assert_eq!(resolve_within_root(root, "/a/../../b"), None);
    }

    #[test]
    fn test_resolve_normal_paths() {
        let root = Path::new("/www/demo");
        assert_eq!(
            resolve_within_root(root, "/css/site.css"),
            Some(PathBuf::from("/www/demo/css/site.css"))
        );
        // `.` and empty components are inert
        assert_eq!(
            resolve_within_root(root, "/./a//b"),
            Some(PathBuf::from("/www/demo/a/b"))
        );
        assert_eq!(resolve_within_root(root, "/"), Some(PathBuf::from("/www/demo")));
    }

    #[test]
    fn test_resolve_rejects_backslash_components() {
        let root = Path::new("/www/demo");
        assert_eq!(resolve_within_root(root, "/..\\..\\secret"), None);
    }

    #[test]
    fn test_find_index() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_index(dir.path()), None);

        std::fs::write(dir.path().join("default.php"), "<?php ?>").unwrap();
        assert_eq!(find_index(dir.path()), Some("default.php"));

        // index.html outranks default.php
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert_eq!(find_index(dir.path()), Some("index.html"));
    }

    #[test]
    fn test_confine_rejects_symlink_escape() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let root = tempfile::tempdir().unwrap();
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(
                outside.path().join("secret.txt"),
                root.path().join("link.txt"),
            )
            .unwrap();
            assert_eq!(confine_existing(root.path(), &root.path().join("link.txt")), None);
        }

        std::fs::write(root.path().join("ok.txt"), "ok").unwrap();
        assert!(confine_existing(root.path(), &root.path().join("ok.txt")).is_some());
    }
}
