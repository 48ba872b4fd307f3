use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write text, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    write_bytes(path, content.as_bytes())
}

pub fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_file_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("reports").join("out.md");
        write_file(&path, "# Report").unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report");
    }

    #[test]
    fn bare_file_name_has_no_parent_to_create() {
        assert!(ensure_parent_dir(Path::new("report.pdf")).is_ok());
    }

    #[test]
    fn write_failure_names_the_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("taken");
        fs::write(&blocker, "").unwrap();
        let err = write_file(&blocker.join("out.md"), "x").unwrap_err();
        assert!(format!("{err:#}").contains("taken"));
    }
}
