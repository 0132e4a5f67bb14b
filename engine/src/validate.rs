//! Pre-flight argument checks shared by every public operation.

use std::fs;
use std::path::Path;

use crate::error::EngineError;

/// Check a source/destination pair before any I/O is attempted.
///
/// Fails with `InvalidArgument` if either path is empty and with `NotFound`
/// if `source` is not an existing regular file. The destination may or may
/// not exist; it is created or truncated by the copy itself, so a destination
/// naming the same file as the source is rejected with `InvalidArgument`.
pub fn validate_paths(source: &Path, destination: &Path) -> Result<(), EngineError> {
    require_non_empty("source", source)?;
    require_non_empty("destination", destination)?;
    validate_existing(source)?;
    if same_file(source, destination) {
        return Err(EngineError::invalid_argument(
            "destination",
            format!("{} is the source file", destination.display()),
        ));
    }
    Ok(())
}

/// Check two paths that are both read, never written.
///
/// Fails with `InvalidArgument` if either path is empty, then with
/// `NotFound` if either is not an existing regular file.
pub fn validate_inputs(a: &Path, b: &Path) -> Result<(), EngineError> {
    require_non_empty("a", a)?;
    require_non_empty("b", b)?;
    validate_existing(a)?;
    validate_existing(b)
}

/// Fail with `NotFound` unless `path` is an existing regular file.
pub fn validate_existing(path: &Path) -> Result<(), EngineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EngineError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn require_non_empty(name: &'static str, path: &Path) -> Result<(), EngineError> {
    if path.as_os_str().is_empty() {
        return Err(EngineError::invalid_argument(name, "path is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_source_is_invalid() {
        let err = validate_paths(Path::new(""), Path::new("out.bin")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_destination_is_invalid() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("in.bin");
        std::fs::write(&src, b"data").expect("Failed to write source");

        let err = validate_paths(&src, Path::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_check_precedes_existence_check() {
        // Both problems present: the argument error wins.
        let err = validate_paths(Path::new("/nonexistent/in.bin"), Path::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("missing.bin");
        let dst = temp_dir.path().join("out.bin");

        let err = validate_paths(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_directory_source_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dst = temp_dir.path().join("out.bin");

        let err = validate_paths(temp_dir.path(), &dst).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_destination_equal_to_source_is_invalid() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("in.bin");
        std::fs::write(&src, b"data").expect("Failed to write source");

        let err = validate_paths(&src, &src).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        // Another spelling of the same file is caught as well.
        let dotted = temp_dir.path().join(".").join("in.bin");
        let err = validate_paths(&src, &dotted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_link_to_source_is_invalid() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("in.bin");
        let link = temp_dir.path().join("link.bin");
        std::fs::write(&src, b"data").expect("Failed to write source");
        std::fs::hard_link(&src, &link).expect("Failed to create hard link");

        let err = validate_paths(&src, &link).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_inputs_must_both_exist() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let a = temp_dir.path().join("a.bin");
        std::fs::write(&a, b"data").expect("Failed to write file");

        validate_inputs(&a, &a).expect("Reading one file twice is allowed");
        let err = validate_inputs(&a, &temp_dir.path().join("b.bin")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_destination_is_allowed() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("in.bin");
        std::fs::write(&src, b"data").expect("Failed to write source");

        validate_paths(&src, &temp_dir.path().join("new.bin")).expect("Validation should pass");
    }
}
