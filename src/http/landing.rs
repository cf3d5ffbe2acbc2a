//! Landing page loading.
//!
//! Shown instead of a directory listing when the shared directory has no
//! recognizable index file. A custom document can be configured; when it is
//! absent or unreadable the built-in placeholder is used, never an error.

use std::path::Path;

use axum::body::Bytes;

/// Built-in placeholder served when no custom landing page is configured.
const DEFAULT_LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>SiteShare</title>
  <style>
    body { font-family: sans-serif; max-width: 40em; margin: 4em auto; padding: 0 1em; }
    h1 { color: #2c3e50; }
    code { background: #f4f4f4; padding: 0.1em 0.3em; border-radius: 3px; }
  </style>
</head>
<body>
  <h1>SiteShare is running</h1>
  <p>This directory is being shared on your local network, but it does not
  contain an index file (<code>index.html</code>, <code>index.php</code>, ...).</p>
  <p>Add an index file to the shared directory, or browse to a specific file
  by name.</p>
</body>
</html>
"#;

/// Load the landing page document.
///
/// Reads the configured file when given; falls back to the built-in
/// placeholder when unset or unreadable.
pub fn load(custom: Option<&Path>) -> Bytes {
    if let Some(path) = custom {
        match std::fs::read(path) {
            Ok(contents) => return Bytes::from(contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e,
                    "Could not read landing page, using built-in placeholder");
            }
        }
    }
    Bytes::from_static(DEFAULT_LANDING_PAGE.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_placeholder_when_unset() {
        let page = load(None);
        assert!(std::str::from_utf8(&page).unwrap().contains("SiteShare"));
    }

    #[test]
    fn test_custom_page_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html>custom welcome</html>").unwrap();

        let page = load(Some(file.path()));
        assert_eq!(&page[..], b"<html>custom welcome</html>");
    }

    #[test]
    fn test_missing_custom_page_falls_back() {
        let page = load(Some(Path::new("/no/such/welcome.html")));
        assert!(std::str::from_utf8(&page).unwrap().contains("SiteShare"));
    }
}
