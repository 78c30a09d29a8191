//! Error types for runtime contract violations

use derive_more::{Display, Error};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// A precondition violation detected by a runtime operation.
///
/// The `Display` form is the diagnostic line printed before the process
/// terminates, so it always names the operation and the offending values.
#[derive(Display, Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[display("{op}: index {index} out of bounds for size {size}")]
    IndexOutOfBounds {
        op: &'static str,
        index: i64,
        size: i64,
    },

    #[display("{op}: invalid range [{from}, {to}) for size {size}")]
    InvalidRange {
        op: &'static str,
        from: i64,
        to: i64,
        size: i64,
    },

    #[display("{op}: negative size {size}")]
    NegativeSize { op: &'static str, size: i64 },

    #[display("random: empty range [{from}, {to})")]
    EmptyRandomRange { from: i64, to: i64 },

    #[display("readInt: {reason}")]
    InvalidInteger { reason: &'static str },

    #[display("{op}: {message}")]
    Io { op: &'static str, message: String },

    #[display("{op}: null value")]
    NullValue { op: &'static str },
}

impl RuntimeError {
    pub(crate) fn io(op: &'static str, error: &std::io::Error) -> Self {
        RuntimeError::Io {
            op,
            message: error.to_string(),
        }
    }
}

/// Validate `index` against a logical size and convert it to a slot offset.
pub(crate) fn check_index(op: &'static str, index: i64, size: usize) -> RuntimeResult<usize> {
    match usize::try_from(index) {
        Ok(slot) if slot < size => Ok(slot),
        _ => Err(RuntimeError::IndexOutOfBounds {
            op,
            index,
            size: size as i64,
        }),
    }
}

/// Validate a requested logical size.
pub(crate) fn check_size(op: &'static str, size: i64) -> RuntimeResult<usize> {
    usize::try_from(size).map_err(|_| RuntimeError::NegativeSize { op, size })
}
