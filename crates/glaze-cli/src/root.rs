use glaze_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `GLAZE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `glaze.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd)
}

fn find_root_from(start: &Path) -> PathBuf {
    if let Some(dir) = walk_up(start, |d| paths::config_path(d).is_file()) {
        return dir;
    }
    if let Some(dir) = walk_up(start, |d| d.join(".git").is_dir()) {
        return dir;
    }
    start.to_path_buf()
}

fn walk_up(start: &Path, found: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|d| found(d)).map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_config_above_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("glaze.yaml"), "{}\n").unwrap();
        let subdir = dir.path().join("templates/partials");
        std::fs::create_dir_all(&subdir).unwrap();
        assert_eq!(find_root_from(&subdir), dir.path());
    }

    #[test]
    fn config_beats_git() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let app = dir.path().join("app");
        std::fs::create_dir_all(app.join("templates")).unwrap();
        std::fs::write(app.join("glaze.yaml"), "{}\n").unwrap();
        assert_eq!(find_root_from(&app.join("templates")), app);
    }

    #[test]
    fn falls_back_to_git_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let deep = dir.path().join("web/templates");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_root_from(&deep), dir.path());
    }
}
