use std::fs;
use std::path::{Path, PathBuf};

use super::core::RoiConfig;
use crate::error::{Result, RoiError};

pub const CONFIG_FILE_NAME: &str = ".praedi-roi.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub fn parse_config(contents: &str, path: Option<&Path>) -> Result<RoiConfig> {
    toml::from_str::<RoiConfig>(contents).map_err(|e| {
        RoiError::config(
            format!("failed to parse {CONFIG_FILE_NAME}: {}", e.message()),
            path.map(Path::to_path_buf),
        )
    })
}

/// Load an explicitly named file. A missing file is an error here.
pub fn load_config_from_path(path: &Path) -> Result<RoiConfig> {
    let contents = fs::read_to_string(path).map_err(|e| RoiError::io(e, path))?;
    let config = parse_config(&contents, Some(path))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Candidate directories from `start` upwards, at most `max_depth` of them.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest config file walking up from `start`, then the user config dir.
pub fn discover_config_path(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .or_else(user_config_path)
}

fn user_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("praedi-roi").join("config.toml");
    path.is_file().then_some(path)
}

/// Discovered config, or defaults when none exists. A file that exists but
/// does not parse is still an error.
pub fn load_config() -> Result<(RoiConfig, Option<PathBuf>)> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("failed to get current directory: {e}; using default config");
            return Ok((RoiConfig::default(), None));
        }
    };

    match discover_config_path(&current) {
        Some(path) => Ok((load_config_from_path(&path)?, Some(path))),
        None => {
            tracing::debug!(
                "no config found after checking {MAX_TRAVERSAL_DEPTH} directories; using defaults"
            );
            Ok((RoiConfig::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ancestors_stop_at_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn finds_config_in_parent_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("site").join("reports");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "organization = \"small\"\n").unwrap();

        let found = discover_config_path(&nested).unwrap();
        assert_eq!(found, root.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let err = load_config_from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.code().as_str(), "E001");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "model = 7\n").unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        assert_eq!(err.code().as_str(), "E020");
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
