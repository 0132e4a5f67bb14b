//! Byte-granular copy over raw file handles.
//!
//! This is the reference strategy: one read and one write per byte, no
//! buffering in user space. It is slow on purpose and serves as the baseline
//! the other strategies are measured against.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::EngineError;
use crate::fs_ops;
use crate::strategy::CopyStrategy;
use crate::validate::validate_paths;

/// Byte-at-a-time copy strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteCopy;

impl CopyStrategy for ByteCopy {
    fn name(&self) -> &'static str {
        "ByteCopy"
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;

        debug!(target: "streams::copy", strategy = "byte", src = %source.display(), dst = %destination.display(), "starting copy");

        let src_file = fs_ops::open_source(source)?;
        let mut dst_file = fs_ops::create_destination(destination)?;

        let mut amount_of_bytes: u64 = 0;
        #[allow(unknown_lints, clippy::unbuffered_bytes)]
        for byte in src_file.bytes() {
            let byte = byte.map_err(|e| fs_ops::read_error(source, e))?;
            fs_ops::write_chunk(&mut dst_file, &[byte], destination)?;
            amount_of_bytes += 1;
        }

        debug!(target: "streams::copy", strategy = "byte", bytes = amount_of_bytes, "copy finished");
        Ok(amount_of_bytes)
    }
}

/// Copy `source` to `destination` one byte at a time.
///
/// Returns the number of bytes written, which equals the source length.
pub fn copy_by_byte(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    ByteCopy.copy(source.as_ref(), destination.as_ref())
}
