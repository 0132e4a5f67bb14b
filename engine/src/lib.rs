//! # Streams Engine - File Copy Strategies
//!
//! A set of interchangeable strategies for copying one file to another, plus
//! a byte-exact comparator for checking the result. The strategies share one
//! contract and differ only in how they move data, which makes them useful
//! for comparing I/O access patterns on the same input.
//!
//! ## Overview
//!
//! - **Byte copy**: one byte per read and write, no user-space buffering
//! - **Block copy**: 1 MiB blocks straight between file handles
//! - **Buffered copy**: 1 MiB blocks through buffered reader/writer layers
//! - **In-memory copy**: whole file staged in memory before writing
//! - **Line copy**: text decoded and re-encoded one line at a time
//!
//! All byte-oriented strategies reproduce the source exactly and return the
//! number of bytes copied. The line strategy returns the number of
//! terminated lines and may change bytes when encodings differ.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use streams_engine::{contents_equal, copy_by_block};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = copy_by_block("input.bin", "output.bin")?;
//! println!("BlockCopy() done. Total bytes: {}", bytes);
//! println!("Identical: {}", contents_equal("input.bin", "output.bin")?);
//! # Ok(())
//! # }
//! ```
//!
//! Selecting a strategy at runtime:
//!
//! ```no_run
//! use streams_engine::{create_strategy, run_strategy, StrategyKind, StrategySettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let strategy = create_strategy(StrategyKind::Buffered, &StrategySettings::default());
//! let report = run_strategy(strategy.as_ref(), "input.bin", "output.bin")?;
//! println!("{} copied {} {}", report.strategy, report.count, report.unit);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **strategy**: `CopyStrategy` trait, `StrategyKind`, strategy factory
//! - **byte_copy**, **block_copy**, **memory_copy**, **line_copy**: the strategies
//! - **compare**: byte-for-byte file comparison
//! - **validate**: argument checks run before any I/O
//! - **fs_ops**: file open/read/write helpers with error mapping
//! - **model**: report and mismatch types
//! - **error**: error types and handling

pub mod block_copy;
pub mod byte_copy;
pub mod compare;
pub mod error;
pub mod fs_ops;
pub mod line_copy;
pub mod memory_copy;
pub mod model;
pub mod strategy;
pub mod validate;

// Re-export main types and functions
pub use block_copy::{copy_buffered, copy_by_block, BlockCopy, BufferedCopy, DEFAULT_BLOCK_SIZE};
pub use byte_copy::{copy_by_byte, ByteCopy};
pub use compare::{contents_equal, first_mismatch};
pub use error::{EngineError, ErrorKind};
pub use line_copy::{
    copy_by_line, copy_by_line_with, encoding_for_label, LineCopy, LineCopyOptions, LineEnding,
};
pub use memory_copy::{copy_in_memory, copy_in_memory_by_byte, InMemoryByteCopy, InMemoryCopy};
pub use model::{Mismatch, TransferReport, UnitKind};
pub use strategy::{create_strategy, run_strategy, CopyStrategy, StrategyKind, StrategySettings};
pub use validate::{validate_inputs, validate_paths};
