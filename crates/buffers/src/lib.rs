//! Cursor-addressed byte buffers with pluggable backing storage.
//!
//! A [`Buf`] is a byte region with a `used` length and a `cursor`, written
//! and read through a [`Backing`] strategy. Five backings cover the common
//! cases: a growable heap region, borrowed caller memory (read-only or
//! read-write), a discarding sink for size dry-runs, and a line-output
//! forwarder for streaming encoded text to an `io::Write`.

mod backing;
mod buf;

pub use backing::{Backing, FixedRo, FixedRw, Heap, LineOut, Sink, UNBOUNDED};
pub use buf::{Buf, Whence};

use thiserror::Error;

/// Failure kinds reported by buffer operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufError {
    /// Bad call parameters, e.g. a seek or truncate target outside the
    /// valid range.
    #[error("invalid argument")]
    InvalidArgument,
    /// A capacity computation overflowed; the request can never be
    /// satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// A fixed-capacity backing cannot hold the requested bytes.
    #[error("out of space")]
    OutOfSpace,
    /// Mutation attempted on a read-only backing.
    #[error("buffer is read-only")]
    ReadOnly,
    /// The active backing does not implement the operation.
    #[error("operation not supported by this backing")]
    Unsupported,
}
