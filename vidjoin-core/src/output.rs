//! Output location handling.
//!
//! The pipeline writes exactly one file. Before encoding, the parent
//! directory is created if needed and any previous artifact at the exact
//! output path is removed.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Prepares `output_path` for a fresh encode.
///
/// Returns true when a previous file was removed. A directory at the output
/// path is an error rather than something to delete.
pub fn prepare_output_path(output_path: &Path) -> CoreResult<bool> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    if output_path.is_dir() {
        return Err(CoreError::PathError(format!(
            "Output path '{}' is a directory",
            output_path.display()
        )));
    }

    if output_path.exists() {
        log::debug!("Removing previous output: {}", output_path.display());
        fs::remove_file(output_path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Fails when `output_path` names one of the `inputs`.
///
/// Paths that exist are compared after canonicalization, so a relative path
/// or a symlink that resolves to an input is caught too.
pub fn ensure_output_not_input(output_path: &Path, inputs: &[PathBuf]) -> CoreResult<()> {
    let output = resolve_path(output_path);
    match inputs.iter().position(|input| resolve_path(input) == output) {
        Some(index) => Err(CoreError::InvalidConfig(format!(
            "Output path '{}' is also input #{}",
            output_path.display(),
            index + 1
        ))),
        None => Ok(()),
    }
}

fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Size of the produced file in bytes.
pub fn output_size(output_path: &Path) -> CoreResult<u64> {
    Ok(fs::metadata(output_path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("output").join("output.mp4");

        assert!(!prepare_output_path(&output).unwrap());
        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_removes_existing_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        fs::write(&output, b"old").unwrap();

        assert!(prepare_output_path(&output).unwrap());
        assert!(!output.exists());
    }

    #[test]
    fn test_output_matching_input_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.mp4");
        fs::write(&input, b"clip").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let other = dir.path().join("b.mp4");

        let inputs = vec![other.clone(), input.clone()];
        let same_file = dir.path().join("sub").join("..").join("a.mp4");
        assert!(matches!(
            ensure_output_not_input(&same_file, &inputs),
            Err(CoreError::InvalidConfig(msg)) if msg.contains("input #2")
        ));
        assert!(ensure_output_not_input(&dir.path().join("joined.mp4"), &inputs).is_ok());
        // Neither path exists yet, so they are compared as given.
        assert!(ensure_output_not_input(&other, &inputs).is_err());
    }

    #[test]
    fn test_directory_at_output_path_is_rejected() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output.mp4");
        fs::create_dir(&output).unwrap();

        assert!(matches!(prepare_output_path(&output), Err(CoreError::PathError(_))));
    }
}
