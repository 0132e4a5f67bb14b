//! In-memory staged copies.
//!
//! Both strategies load the entire source into memory, pass it through a
//! decode/re-encode text round-trip, and only then write the destination.
//! The round-trip uses `x-user-defined`, a single-byte encoding that maps
//! each of the 256 byte values to its own character, so the staged bytes are
//! identical to the source bytes and the copy stays byte-exact.
//!
//! Memory use is proportional to the file size.

use std::path::Path;

use encoding_rs::{Encoding, X_USER_DEFINED};
use tracing::debug;

use crate::error::EngineError;
use crate::fs_ops;
use crate::strategy::CopyStrategy;
use crate::validate::validate_paths;

const STAGING_ENCODING: &Encoding = X_USER_DEFINED;

/// Stage the whole file, then write it with a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemoryCopy;

impl CopyStrategy for InMemoryCopy {
    fn name(&self) -> &'static str {
        "InMemoryCopy"
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;

        debug!(target: "streams::copy", strategy = "memory", src = %source.display(), dst = %destination.display(), "starting copy");

        let staged = stage(source)?;
        let mut dst_file = fs_ops::create_destination(destination)?;
        fs_ops::write_chunk(&mut dst_file, &staged, destination)?;

        debug!(target: "streams::copy", strategy = "memory", bytes = staged.len(), "copy finished");
        Ok(staged.len() as u64)
    }
}

/// Stage the whole file, then move it byte by byte into a second buffer
/// before writing it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemoryByteCopy;

impl CopyStrategy for InMemoryByteCopy {
    fn name(&self) -> &'static str {
        "InMemoryByteCopy"
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;

        debug!(target: "streams::copy", strategy = "memory-byte", src = %source.display(), dst = %destination.display(), "starting copy");

        let staged = stage(source)?;
        let mut output = Vec::with_capacity(staged.len());
        let mut amount_of_bytes: u64 = 0;
        for byte in staged.iter().copied() {
            output.push(byte);
            amount_of_bytes += 1;
        }

        let mut dst_file = fs_ops::create_destination(destination)?;
        fs_ops::write_chunk(&mut dst_file, &output, destination)?;

        debug!(target: "streams::copy", strategy = "memory-byte", bytes = amount_of_bytes, "copy finished");
        Ok(amount_of_bytes)
    }
}

/// Copy `source` to `destination` after staging the whole file in memory.
///
/// Returns the number of bytes written. A zero-length source yields a
/// zero-length destination and a count of 0.
pub fn copy_in_memory(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    InMemoryCopy.copy(source.as_ref(), destination.as_ref())
}

/// Like [`copy_in_memory`], but transfers the staged buffer one byte at a time.
pub fn copy_in_memory_by_byte(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    InMemoryByteCopy.copy(source.as_ref(), destination.as_ref())
}

/// Read `source` fully and round-trip it through the staging encoding.
fn stage(source: &Path) -> Result<Vec<u8>, EngineError> {
    let raw = fs_ops::read_whole(source)?;
    let (text, _) = STAGING_ENCODING.decode_without_bom_handling(&raw);
    let (encoded, _, _) = STAGING_ENCODING.encode(&text);
    Ok(encoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_staging_preserves_every_byte_value() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let content: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        fs::write(&src, &content).expect("Failed to write source");

        assert_eq!(stage(&src).expect("Failed to stage"), content);
    }

    #[test]
    fn test_staging_keeps_byte_order_mark() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("bom.txt");
        let content = b"\xEF\xBB\xBFtext";
        fs::write(&src, content).expect("Failed to write source");

        assert_eq!(stage(&src).expect("Failed to stage"), content);
    }

    #[test]
    fn test_copy_in_memory_reproduces_content() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.txt");
        let dst = temp_dir.path().join("dest.txt");
        let content = "Größe ändern – 日本語\r\nline two\n".as_bytes();
        fs::write(&src, content).expect("Failed to write source");

        let bytes = copy_in_memory(&src, &dst).expect("Failed to copy");
        assert_eq!(bytes, content.len() as u64);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), content);
    }

    #[test]
    fn test_copy_in_memory_by_byte_reproduces_content() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        let content: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
        fs::write(&src, &content).expect("Failed to write source");

        let bytes = copy_in_memory_by_byte(&src, &dst).expect("Failed to copy");
        assert_eq!(bytes, 4096);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), content);
    }

    #[test]
    fn test_copy_in_memory_by_byte_counts_every_staged_byte() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        let content = binary_tail(70_000);
        fs::write(&src, &content).expect("Failed to write source");

        let bytes = copy_in_memory_by_byte(&src, &dst).expect("Failed to copy");
        assert_eq!(bytes, content.len() as u64);
        assert_eq!(fs::metadata(&dst).expect("dest").len(), bytes);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), content);
    }

    fn binary_tail(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).rev().collect()
    }

    #[test]
    fn test_copy_in_memory_empty_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("empty.bin");
        let dst = temp_dir.path().join("dest.bin");
        fs::write(&src, b"").expect("Failed to write source");

        assert_eq!(copy_in_memory(&src, &dst).expect("Failed to copy"), 0);
        assert_eq!(copy_in_memory_by_byte(&src, &dst).expect("Failed to copy"), 0);
        assert_eq!(fs::metadata(&dst).expect("dest should exist").len(), 0);
    }
}
