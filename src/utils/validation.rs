//! Path and input validation utilities.
//!
//! This module provides common validation functions to ensure consistent
//! error handling across the command line entry points.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Validate that a path exists and return an error if it doesn't.
///
/// # Arguments
///
/// * `path` - The path to validate
///
/// # Returns
///
/// * `Ok(())` if the path exists
/// * `Err` with a formatted error message if the path doesn't exist
pub fn validate_path_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display().bold()).into());
    }
    Ok(())
}

/// Expand a leading `~` and check the result exists.
pub fn resolve_user_path(raw: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
    validate_path_exists(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_path_exists_valid() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_path_exists(temp_dir.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_path_exists_invalid() {
        let path = Path::new("/this/path/does/not/exist/hopefully/12345");
        let result = validate_path_exists(path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_user_path_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("track.wav");
        fs::write(&file_path, "test").unwrap();

        let resolved = resolve_user_path(file_path.to_str().unwrap()).unwrap();
        assert_eq!(resolved, file_path);
    }

    #[test]
    fn test_resolve_user_path_missing() {
        assert!(resolve_user_path("/no/such/dir/track.wav").is_err());
    }
}
