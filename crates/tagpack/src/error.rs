use thiserror::Error;

use tagpack_buffers::BufError;

/// Failure kinds reported by the codecs and the pack entry points.
///
/// Buffer failures propagate into this taxonomy with their kind preserved.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("out of memory")]
    OutOfMemory,
    #[error("out of space")]
    OutOfSpace,
    #[error("buffer is read-only")]
    ReadOnly,
    /// The active format or backing does not implement the operation, or
    /// the value contains a kind the format's encoder table omits.
    #[error("unsupported operation or value kind")]
    Unsupported,
    /// Wire bytes do not match the expected structure: wrong major type,
    /// truncated extension, or truncated payload.
    #[error("malformed encoding")]
    MalformedEncoding,
    /// A decoded magnitude exceeds the target integer's range.
    #[error("value exceeds the target range")]
    Overflow,
}

impl From<BufError> for PackError {
    fn from(err: BufError) -> Self {
        match err {
            BufError::InvalidArgument => PackError::InvalidArgument,
            BufError::OutOfMemory => PackError::OutOfMemory,
            BufError::OutOfSpace => PackError::OutOfSpace,
            BufError::ReadOnly => PackError::ReadOnly,
            BufError::Unsupported => PackError::Unsupported,
        }
    }
}
