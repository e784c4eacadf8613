// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info};
use std::path::Path;

/// Check that a file may be created or overwritten.
///
/// A missing file, or `force`, is always fine. Otherwise the user is asked.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    if confirm(format!("The file '{}' already exists. Overwrite?", path.display())) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "cancelled: '{}' was not overwritten",
            path.display()
        )))
    }
}

/// Output paths must be absolute, and their folder must exist.
pub(crate) fn require_absolute(path: &Path) -> AppResult<()> {
    if !path.is_absolute() {
        return Err(AppError::Validation(format!(
            "output file path must be absolute: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        return Err(AppError::Validation(format!(
            "output folder does not exist: {}",
            parent.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_rejected() {
        assert!(require_absolute(Path::new("out.csv")).unwrap_err().is_validation());
    }

    #[test]
    fn forced_or_missing_files_are_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert!(ensure_writable(&path, false).is_ok());
        std::fs::write(&path, "x").unwrap();
        assert!(ensure_writable(&path, true).is_ok());
    }
}
