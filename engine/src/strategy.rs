//! The copy strategy capability and strategy selection.
//!
//! Every strategy implements [`CopyStrategy`]. Callers that pick a strategy
//! at runtime go through [`StrategyKind`] and [`create_strategy`]; callers
//! that know what they want can use the free functions or the strategy
//! types directly.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::block_copy::{BlockCopy, BufferedCopy, DEFAULT_BLOCK_SIZE};
use crate::byte_copy::ByteCopy;
use crate::error::EngineError;
use crate::line_copy::{LineCopy, LineCopyOptions};
use crate::memory_copy::{InMemoryByteCopy, InMemoryCopy};
use crate::model::{TransferReport, UnitKind};

/// One way of copying a file's contents to another path.
///
/// Implementations validate their arguments before touching the filesystem,
/// create or truncate the destination, and return the number of units
/// transferred. They hold no state between calls.
pub trait CopyStrategy: Send + Sync {
    /// Short display name, e.g. `"BlockCopy"`.
    fn name(&self) -> &'static str;

    /// What the returned count measures.
    fn unit(&self) -> UnitKind {
        UnitKind::Bytes
    }

    /// Copy `source` to `destination`.
    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError>;
}

/// Selector for the available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// One byte per read and write
    Byte,
    /// Fixed-size blocks over raw handles
    Block,
    /// Fixed-size blocks through buffered reader/writer layers
    Buffered,
    /// Whole file staged in memory, written in one call
    Memory,
    /// Whole file staged in memory, transferred byte by byte
    MemoryByte,
    /// Decoded and re-encoded one line at a time
    Line,
}

impl StrategyKind {
    /// All strategies, in the order the CLI runs them.
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Byte,
        StrategyKind::Memory,
        StrategyKind::Block,
        StrategyKind::MemoryByte,
        StrategyKind::Buffered,
        StrategyKind::Line,
    ];

    /// Parse a strategy name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "byte" => Some(Self::Byte),
            "block" => Some(Self::Block),
            "buffered" => Some(Self::Buffered),
            "memory" => Some(Self::Memory),
            "memory-byte" => Some(Self::MemoryByte),
            "line" => Some(Self::Line),
            _ => None,
        }
    }

    /// True for strategies whose output must equal the source byte for byte.
    pub fn is_byte_exact(&self) -> bool {
        !matches!(self, Self::Line)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "byte"),
            Self::Block => write!(f, "block"),
            Self::Buffered => write!(f, "buffered"),
            Self::Memory => write!(f, "memory"),
            Self::MemoryByte => write!(f, "memory-byte"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// Tunables passed to [`create_strategy`]. Each strategy reads only the
/// fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySettings {
    pub block_size: usize,
    pub line: LineCopyOptions,
}

impl Default for StrategySettings {
    fn default() -> Self {
        StrategySettings {
            block_size: DEFAULT_BLOCK_SIZE,
            line: LineCopyOptions::default(),
        }
    }
}

/// Create the strategy selected by `kind`.
pub fn create_strategy(kind: StrategyKind, settings: &StrategySettings) -> Box<dyn CopyStrategy> {
    match kind {
        StrategyKind::Byte => Box::new(ByteCopy),
        StrategyKind::Block => Box::new(BlockCopy::with_block_size(settings.block_size)),
        StrategyKind::Buffered => Box::new(BufferedCopy::with_block_size(settings.block_size)),
        StrategyKind::Memory => Box::new(InMemoryCopy),
        StrategyKind::MemoryByte => Box::new(InMemoryByteCopy),
        StrategyKind::Line => Box::new(LineCopy::new(settings.line)),
    }
}

/// Run `strategy` and time it.
pub fn run_strategy(
    strategy: &dyn CopyStrategy,
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<TransferReport, EngineError> {
    let start = Instant::now();
    let count = strategy.copy(source.as_ref(), destination.as_ref())?;
    Ok(TransferReport {
        strategy: strategy.name(),
        unit: strategy.unit(),
        count,
        elapsed: start.elapsed(),
    })
}
