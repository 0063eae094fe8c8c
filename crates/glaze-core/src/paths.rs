use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "glaze.yaml";
pub const MANIFEST_FILE: &str = "glaze-manifest.yaml";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "html";
pub const DEFAULT_COOKIE_FILE: &str = "cookies.txt";
pub const DEFAULT_REPORT_FILE: &str = "page_test_report.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// Resolve a configured path against the project root. Absolute paths pass
/// through unchanged.
pub fn resolve(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

/// Document identity: the path relative to the corpus root, with `/`
/// separators so manifests written on one platform match on another.
pub fn document_id(corpus_root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(corpus_root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// True if `path` carries the template extension (ASCII case-insensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/srv/hs-bus");
        assert_eq!(config_path(root), PathBuf::from("/srv/hs-bus/glaze.yaml"));
        assert_eq!(
            manifest_path(root),
            PathBuf::from("/srv/hs-bus/glaze-manifest.yaml")
        );
        assert_eq!(
            resolve(root, Path::new("templates")),
            PathBuf::from("/srv/hs-bus/templates")
        );
        assert_eq!(
            resolve(root, Path::new("/tmp/other")),
            PathBuf::from("/tmp/other")
        );
    }

    #[test]
    fn document_id_is_relative_with_forward_slashes() {
        let root = Path::new("/srv/templates");
        let nested = root.join("partials").join("nav.html");
        assert_eq!(document_id(root, &nested), "partials/nav.html");
        assert_eq!(document_id(root, &root.join("fleet.html")), "fleet.html");
    }

    #[test]
    fn extension_match_ignores_case_and_dot() {
        assert!(has_extension(Path::new("a/fleet.html"), "html"));
        assert!(has_extension(Path::new("a/FLEET.HTML"), ".html"));
        assert!(!has_extension(Path::new("a/fleet.htm"), "html"));
        assert!(!has_extension(Path::new("a/README"), "html"));
    }
}
