//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /srv/site/public/files/     ← start
/// /srv/site/content-url.toml  ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // Absolute paths are taken as-is
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_start_dir() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("content-url.toml");
        fs::write(&config, "").unwrap();

        assert_eq!(
            find_config_file(dir.path(), Path::new("content-url.toml")),
            Some(config)
        );
    }

    #[test]
    fn test_find_in_parent_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public/files");
        fs::create_dir_all(&nested).unwrap();
        let config = dir.path().join("content-url.toml");
        fs::write(&config, "").unwrap();

        assert_eq!(
            find_config_file(&nested, Path::new("content-url.toml")),
            Some(config)
        );
    }

    #[test]
    fn test_absolute_path() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");
        assert_eq!(find_config_file(Path::new("/"), &config), None);

        fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &config), Some(config));
    }

    #[test]
    fn test_directory_with_config_name_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/missing-config-name.toml")).unwrap();
        assert_eq!(
            find_config_file(&dir.path().join("sub"), Path::new("missing-config-name.toml")),
            None
        );
    }
}
