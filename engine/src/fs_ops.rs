//! Filesystem operations module.
//!
//! Thin wrappers over `std::fs` that open, read and write files and map
//! `io::Error` into `EngineError` with the path that failed. Strategies go
//! through these helpers so every failure is classified the same way.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::EngineError;

/// Open `path` for reading.
pub fn open_source(path: &Path) -> Result<File, EngineError> {
    File::open(path).map_err(|e| read_error(path, e))
}

/// Open `path` for writing, creating it or truncating existing content.
pub fn create_destination(path: &Path) -> Result<File, EngineError> {
    File::create(path).map_err(|e| write_error(path, e))
}

/// Read the whole of `path` into memory.
pub fn read_whole(path: &Path) -> Result<Vec<u8>, EngineError> {
    fs::read(path).map_err(|e| read_error(path, e))
}

/// Read into `buf` once, retrying on `Interrupted`.
///
/// Returns the number of bytes read; zero means end of input.
pub fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8], path: &Path) -> Result<usize, EngineError> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(path, e)),
        }
    }
}

/// Write all of `data`, mapping failures to `WriteError`.
pub fn write_chunk<W: Write>(writer: &mut W, data: &[u8], path: &Path) -> Result<(), EngineError> {
    writer.write_all(data).map_err(|e| write_error(path, e))
}

/// Flush `writer`, mapping failures to `WriteError`.
///
/// Buffered writers swallow flush errors on drop, so callers flush explicitly
/// before returning a count.
pub fn flush<W: Write>(writer: &mut W, path: &Path) -> Result<(), EngineError> {
    writer.flush().map_err(|e| write_error(path, e))
}

pub(crate) fn read_error(path: &Path, source: io::Error) -> EngineError {
    EngineError::ReadError {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn write_error(path: &Path, source: io::Error) -> EngineError {
    EngineError::WriteError {
        path: path.to_path_buf(),
        source,
    }
}
