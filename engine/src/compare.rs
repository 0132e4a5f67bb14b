//! Byte-for-byte file comparison.
//!
//! Used to check the output of the copy strategies. Both files are read
//! fully into memory; there is no hashing.

use std::path::Path;

use tracing::debug;

use crate::error::EngineError;
use crate::fs_ops;
use crate::model::Mismatch;
use crate::validate::validate_inputs;

/// Return true iff `a` and `b` have identical length and bytes.
///
/// Both paths must be non-empty and name existing files, otherwise this
/// fails with `InvalidArgument` or `NotFound` before reading anything.
/// The result does not depend on argument order.
pub fn contents_equal(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool, EngineError> {
    Ok(first_mismatch(a, b)?.is_none())
}

/// Find the first difference between `a` and `b`, if any.
///
/// A length difference is reported without inspecting content. Otherwise the
/// offset of the first differing byte is returned.
pub fn first_mismatch(
    a: impl AsRef<Path>,
    b: impl AsRef<Path>,
) -> Result<Option<Mismatch>, EngineError> {
    let (a, b) = (a.as_ref(), b.as_ref());
    validate_inputs(a, b)?;

    let left = fs_ops::read_whole(a)?;
    let right = fs_ops::read_whole(b)?;

    let mismatch = if left.len() != right.len() {
        Some(Mismatch::Length {
            left: left.len() as u64,
            right: right.len() as u64,
        })
    } else {
        left.iter()
            .zip(&right)
            .position(|(l, r)| l != r)
            .map(|offset| Mismatch::Byte {
                offset: offset as u64,
            })
    };

    debug!(
        target: "streams::compare",
        left = %a.display(),
        right = %b.display(),
        equal = mismatch.is_none(),
        "compared files"
    );
    Ok(mismatch)
}
