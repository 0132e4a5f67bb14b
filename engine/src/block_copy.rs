//! Fixed-size block copies.
//!
//! `BlockCopy` moves data through one working buffer straight between the
//! file handles. `BufferedCopy` runs the same loop but with a `BufReader` and
//! a `BufWriter` of the same capacity wrapped around the handles, so every
//! chunk passes through a second buffer on each side. Output is identical;
//! only the staging differs.

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::EngineError;
use crate::fs_ops;
use crate::strategy::CopyStrategy;
use crate::validate::validate_paths;

/// Working buffer capacity used when none is configured (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Block copy over raw file handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCopy {
    block_size: usize,
}

impl Default for BlockCopy {
    fn default() -> Self {
        BlockCopy {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockCopy {
    /// Use a working buffer of `block_size` bytes. Zero is rejected at copy time.
    pub fn with_block_size(block_size: usize) -> Self {
        BlockCopy { block_size }
    }
}

impl CopyStrategy for BlockCopy {
    fn name(&self) -> &'static str {
        "BlockCopy"
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;
        let mut buffer = allocate(self.block_size)?;

        debug!(target: "streams::copy", strategy = "block", block_size = self.block_size, src = %source.display(), dst = %destination.display(), "starting copy");

        let mut src_file = fs_ops::open_source(source)?;
        let mut dst_file = fs_ops::create_destination(destination)?;
        let amount_of_bytes =
            transfer_blocks(&mut src_file, &mut dst_file, &mut buffer, source, destination)?;

        debug!(target: "streams::copy", strategy = "block", bytes = amount_of_bytes, "copy finished");
        Ok(amount_of_bytes)
    }
}

/// Block copy through buffered reader and writer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferedCopy {
    block_size: usize,
}

impl Default for BufferedCopy {
    fn default() -> Self {
        BufferedCopy {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BufferedCopy {
    /// Use `block_size` bytes for the working buffer and both buffering layers.
    pub fn with_block_size(block_size: usize) -> Self {
        BufferedCopy { block_size }
    }
}

impl CopyStrategy for BufferedCopy {
    fn name(&self) -> &'static str {
        "BufferedCopy"
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;
        let mut buffer = allocate(self.block_size)?;

        debug!(target: "streams::copy", strategy = "buffered", block_size = self.block_size, src = %source.display(), dst = %destination.display(), "starting copy");

        let mut reader = BufReader::with_capacity(self.block_size, fs_ops::open_source(source)?);
        let mut writer =
            BufWriter::with_capacity(self.block_size, fs_ops::create_destination(destination)?);
        let amount_of_bytes =
            transfer_blocks(&mut reader, &mut writer, &mut buffer, source, destination)?;
        fs_ops::flush(&mut writer, destination)?;

        debug!(target: "streams::copy", strategy = "buffered", bytes = amount_of_bytes, "copy finished");
        Ok(amount_of_bytes)
    }
}

/// Copy `source` to `destination` in 1 MiB blocks.
///
/// Returns the number of bytes read from the source.
pub fn copy_by_block(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    BlockCopy::default().copy(source.as_ref(), destination.as_ref())
}

/// Copy `source` to `destination` in 1 MiB blocks through buffered streams.
///
/// Returns the number of bytes read from the source.
pub fn copy_buffered(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    BufferedCopy::default().copy(source.as_ref(), destination.as_ref())
}

fn allocate(block_size: usize) -> Result<Vec<u8>, EngineError> {
    if block_size == 0 {
        return Err(EngineError::invalid_argument(
            "block_size",
            "block size must be greater than zero",
        ));
    }
    Ok(vec![0u8; block_size])
}

/// Read until a zero-length read, writing exactly what each read returned.
fn transfer_blocks<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut [u8],
    source: &Path,
    destination: &Path,
) -> Result<u64, EngineError> {
    let mut amount_of_bytes: u64 = 0;
    loop {
        let bytes_read = fs_ops::read_chunk(reader, buffer, source)?;
        if bytes_read == 0 {
            break;
        }
        fs_ops::write_chunk(writer, &buffer[..bytes_read], destination)?;
        amount_of_bytes += bytes_read as u64;
    }
    Ok(amount_of_bytes)
}
