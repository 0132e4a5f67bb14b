//! Error types for the copy engine.
//!
//! Every public operation returns `EngineError`. Variants carry the path (or
//! argument name) they relate to so callers can report them without extra
//! context. `ErrorKind` collapses the variants into the three outcomes a
//! caller usually branches on.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Coarse classification of an `EngineError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was empty, absent or out of range. No I/O was done.
    InvalidArgument,
    /// A file that must exist does not. No I/O was done.
    NotFound,
    /// A read or write failed part way through an operation.
    IoFailure,
}

/// Errors returned by copy strategies and the comparator.
///
/// None of these are retried by the engine. When a `WriteError` or
/// `ReadError` happens mid-copy, the partially written destination is left
/// on disk.
#[derive(Debug)]
pub enum EngineError {
    /// An argument is empty, missing, or otherwise unusable
    InvalidArgument { name: &'static str, reason: String },

    /// A file expected to exist was not found
    NotFound { path: PathBuf },

    /// Failed to open or read from a file
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to create or write to a file
    WriteError { path: PathBuf, source: io::Error },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { name, reason } => {
                write!(f, "Invalid argument '{}': {}", name, reason)
            }
            Self::NotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            Self::ReadError { path, source } => {
                write!(f, "Failed to read file: {} ({})", path.display(), source)
            }
            Self::WriteError { path, source } => {
                write!(f, "Failed to write file: {} ({})", path.display(), source)
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadError { source, .. } | Self::WriteError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl EngineError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ReadError { .. } | Self::WriteError { .. } => ErrorKind::IoFailure,
        }
    }

    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::ReadError { source, .. } | Self::WriteError { source, .. } => {
                source.raw_os_error().map(|e| e as u32)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let invalid = EngineError::invalid_argument("source", "path is empty");
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let missing = EngineError::NotFound {
            path: PathBuf::from("missing.bin"),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let read = EngineError::ReadError {
            path: PathBuf::from("in.bin"),
            source: io::Error::new(io::ErrorKind::Other, "device error"),
        };
        assert_eq!(read.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_display_includes_path() {
        let err = EngineError::NotFound {
            path: PathBuf::from("missing.bin"),
        };
        assert_eq!(err.to_string(), "File not found: missing.bin");
    }

    #[test]
    fn test_source_exposes_io_error() {
        let err = EngineError::WriteError {
            path: PathBuf::from("out.bin"),
            source: io::Error::from_raw_os_error(28),
        };
        assert!(err.source().is_some());
        assert_eq!(err.raw_os_error(), Some(28));
    }
}
