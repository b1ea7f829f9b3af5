//! File system utilities for the calculator

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensures a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
    } else if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {:?}", path),
        )
        .into());
    }
    Ok(())
}

/// The application's config directory (`<config_dir>/levercalc`). Not created.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("levercalc"))
}

/// Reads a file to a string with context about the operation
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Writes a string to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir() {
        let temp_dir = tempdir().unwrap();
        let test_dir = temp_dir.path().join("test_dir");

        ensure_dir(&test_dir).unwrap();
        assert!(test_dir.is_dir());

        // Already existing is fine
        ensure_dir(&test_dir).unwrap();

        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_read_write_file() {
        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("a").join("b").join("test.txt");

        write_file(&test_file, "test content").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "test content");
    }

    #[test]
    fn test_read_missing_file_has_context() {
        let temp_dir = tempdir().unwrap();
        let err = read_file(temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read file"));
    }
}
