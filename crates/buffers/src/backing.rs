//! Backing strategies for [`Buf`](crate::Buf).
//!
//! Each backing implements the [`Backing`] operation set; the optional
//! hooks (`grow`, `check_seek`, `check_truncate`, `clear`) have default
//! implementations so a backing only overrides what it actually supports.

use std::io;

use crate::BufError;

/// Capacity sentinel for backings that accept any amount of data.
pub const UNBOUNDED: usize = usize::MAX;

/// Smallest heap allocation made when a zero-size buffer first grows.
const MIN_ALLOC: usize = 64;

/// Storage strategy behind a [`Buf`](crate::Buf).
///
/// `copy_in` and `capacity` are the only operations every backing must
/// provide; everything else defaults to the most restrictive behavior and
/// is overridden where a backing supports more.
pub trait Backing {
    /// Total bytes the region can hold, or [`UNBOUNDED`].
    fn capacity(&self) -> usize;

    /// Copies `data` into the region at `offset`. The caller guarantees
    /// `offset + data.len() <= capacity()`.
    fn copy_in(&mut self, offset: usize, data: &[u8]) -> Result<(), BufError>;

    /// Grows the region to hold at least `min_capacity` bytes.
    fn grow(&mut self, min_capacity: usize) -> Result<(), BufError> {
        let _ = min_capacity;
        Err(BufError::Unsupported)
    }

    /// Copies bytes out of the region starting at `offset`. The caller
    /// guarantees the range is within the used region.
    fn copy_out(&self, offset: usize, out: &mut [u8]) -> Result<(), BufError> {
        let _ = (offset, out);
        Err(BufError::Unsupported)
    }

    /// Zero-fills `len` bytes starting at `offset` when a truncate exposes
    /// a new region.
    fn clear(&mut self, offset: usize, len: usize) -> Result<(), BufError> {
        let _ = (offset, len);
        Ok(())
    }

    /// Veto hook for cursor moves. `target` is the absolute offset the
    /// cursor would land on.
    fn check_seek(&self, cursor: usize, target: usize) -> Result<(), BufError> {
        let _ = (cursor, target);
        Ok(())
    }

    /// Veto hook for length changes.
    fn check_truncate(&self) -> Result<(), BufError> {
        Ok(())
    }

    /// Borrows the stored bytes, for backings that keep them resident.
    fn as_slice(&self) -> Result<&[u8], BufError> {
        Err(BufError::Unsupported)
    }
}

/// Growable heap region. The default backing.
pub struct Heap {
    bytes: Vec<u8>,
}

impl Heap {
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            bytes: vec![0u8; expected],
        }
    }
}

impl Backing for Heap {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn copy_in(&mut self, offset: usize, data: &[u8]) -> Result<(), BufError> {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn grow(&mut self, min_capacity: usize) -> Result<(), BufError> {
        let doubled = self
            .bytes
            .len()
            .checked_mul(2)
            .ok_or(BufError::OutOfMemory)?;
        let new_size = min_capacity.max(doubled).max(MIN_ALLOC);
        self.bytes.resize(new_size, 0);
        Ok(())
    }

    fn copy_out(&self, offset: usize, out: &mut [u8]) -> Result<(), BufError> {
        out.copy_from_slice(&self.bytes[offset..offset + out.len()]);
        Ok(())
    }

    fn clear(&mut self, offset: usize, len: usize) -> Result<(), BufError> {
        self.bytes[offset..offset + len].fill(0);
        Ok(())
    }

    fn as_slice(&self) -> Result<&[u8], BufError> {
        Ok(&self.bytes)
    }
}

/// Borrowed read-only region. All mutation fails with `ReadOnly`.
pub struct FixedRo<'a> {
    data: &'a [u8],
}

impl<'a> FixedRo<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Backing for FixedRo<'_> {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn copy_in(&mut self, _offset: usize, _data: &[u8]) -> Result<(), BufError> {
        Err(BufError::ReadOnly)
    }

    fn grow(&mut self, _min_capacity: usize) -> Result<(), BufError> {
        Err(BufError::ReadOnly)
    }

    fn copy_out(&self, offset: usize, out: &mut [u8]) -> Result<(), BufError> {
        out.copy_from_slice(&self.data[offset..offset + out.len()]);
        Ok(())
    }

    fn clear(&mut self, _offset: usize, _len: usize) -> Result<(), BufError> {
        Err(BufError::ReadOnly)
    }

    fn check_truncate(&self) -> Result<(), BufError> {
        Err(BufError::ReadOnly)
    }

    fn as_slice(&self) -> Result<&[u8], BufError> {
        Ok(self.data)
    }
}

/// Borrowed read-write region. Mutation is allowed but never exceeds the
/// borrowed capacity.
pub struct FixedRw<'a> {
    data: &'a mut [u8],
}

impl<'a> FixedRw<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }
}

impl Backing for FixedRw<'_> {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn copy_in(&mut self, offset: usize, data: &[u8]) -> Result<(), BufError> {
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn grow(&mut self, _min_capacity: usize) -> Result<(), BufError> {
        Err(BufError::OutOfSpace)
    }

    fn copy_out(&self, offset: usize, out: &mut [u8]) -> Result<(), BufError> {
        out.copy_from_slice(&self.data[offset..offset + out.len()]);
        Ok(())
    }

    fn clear(&mut self, offset: usize, len: usize) -> Result<(), BufError> {
        self.data[offset..offset + len].fill(0);
        Ok(())
    }

    fn as_slice(&self) -> Result<&[u8], BufError> {
        Ok(self.data)
    }
}

/// Accepts and discards all writes. Reads are unsupported.
///
/// Lets an encoder compute its output size without allocating a payload.
pub struct Sink;

impl Backing for Sink {
    fn capacity(&self) -> usize {
        UNBOUNDED
    }

    fn copy_in(&mut self, _offset: usize, _data: &[u8]) -> Result<(), BufError> {
        Ok(())
    }
}

/// Forwards every write straight to an external sink.
///
/// A forwarding failure is fatal: the stream is already partially emitted
/// and the caller has no way to repair it.
pub struct LineOut<'a> {
    out: Box<dyn io::Write + 'a>,
}

impl<'a> LineOut<'a> {
    pub fn new(out: impl io::Write + 'a) -> Self {
        Self { out: Box::new(out) }
    }
}

impl Backing for LineOut<'_> {
    fn capacity(&self) -> usize {
        UNBOUNDED
    }

    fn copy_in(&mut self, _offset: usize, data: &[u8]) -> Result<(), BufError> {
        if let Err(err) = self.out.write_all(data) {
            panic!("line-output write failed mid-stream: {err}");
        }
        Ok(())
    }

    fn check_seek(&self, cursor: usize, target: usize) -> Result<(), BufError> {
        if cursor == target {
            Ok(())
        } else {
            Err(BufError::Unsupported)
        }
    }

    fn check_truncate(&self) -> Result<(), BufError> {
        Err(BufError::Unsupported)
    }
}
