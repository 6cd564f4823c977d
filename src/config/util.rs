//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/assets/fullsize/  ← start
/// /home/user/site/respimg.toml      ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("assets/fullsize/x");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("respimg.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("respimg.toml"));
        assert_eq!(found, Some(dir.path().join("respimg.toml")));
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("respimg.toml")).unwrap();
        let found = find_config_file(dir.path(), Path::new("respimg.toml"));
        assert_ne!(found, Some(dir.path().join("respimg.toml")));
    }

    #[test]
    fn test_find_config_absolute_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(find_config_file(Path::new("/"), &missing), None);
    }
}
