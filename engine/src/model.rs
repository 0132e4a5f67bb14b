//! Core data model for copy operations.
//!
//! This module defines the values that flow out of the engine:
//! - UnitKind: what a strategy's count measures
//! - TransferReport: a timed result of one strategy run
//! - Mismatch: why two files compare unequal

use std::fmt;
use std::time::Duration;

/// The unit a strategy counts when it reports a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Raw bytes written to the destination
    Bytes,
    /// Lines written with a terminator
    Lines,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Bytes => write!(f, "bytes"),
            UnitKind::Lines => write!(f, "lines"),
        }
    }
}

/// Outcome of running one strategy to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Name of the strategy that produced this report
    pub strategy: &'static str,

    /// What `count` measures
    pub unit: UnitKind,

    /// Units transferred
    pub count: u64,

    /// Wall-clock time spent in the copy
    pub elapsed: Duration,
}

/// First observed difference between two files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// The files have different lengths; contents were not inspected
    Length { left: u64, right: u64 },
    /// Same length, first differing byte at `offset`
    Byte { offset: u64 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Length { left, right } => {
                write!(f, "lengths differ ({} vs {} bytes)", left, right)
            }
            Mismatch::Byte { offset } => write!(f, "first difference at byte {}", offset),
        }
    }
}
