//! The [`Buf`] type: generic cursor/length bookkeeping over a [`Backing`].

use std::io;

use crate::backing::{FixedRo, FixedRw, Heap, LineOut, Sink};
use crate::{Backing, BufError};

/// Reference point for [`Buf::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

/// A byte region with a used length and a cursor.
///
/// All operations keep the invariant `cursor <= used <= capacity` for any
/// backing with a finite capacity. The backing decides policy (growth,
/// mutability, readability); `Buf` owns the bookkeeping.
///
/// # Example
///
/// ```
/// use tagpack_buffers::Buf;
///
/// let mut buf = Buf::heap(0);
/// buf.append(b"abc").unwrap();
/// assert_eq!(buf.used(), 3);
/// assert_eq!(buf.as_slice().unwrap(), b"abc");
/// ```
pub struct Buf<'a> {
    backing: Box<dyn Backing + 'a>,
    used: usize,
    cursor: usize,
}

impl std::fmt::Debug for Buf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buf")
            .field("used", &self.used)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Buf<'static> {
    /// Growable heap buffer. `expected` is a size hint; zero is valid and
    /// defers allocation to the first append.
    pub fn heap(expected: usize) -> Self {
        Self::with_backing(Heap::with_capacity(expected))
    }

    /// Write-counting buffer that discards its payload. Used to compute
    /// encoded sizes without allocating.
    pub fn sink() -> Self {
        Self::with_backing(Sink)
    }
}

impl<'a> Buf<'a> {
    /// Wraps caller memory read-only. The region's full length counts as
    /// used bytes.
    pub fn fixed(data: &'a [u8]) -> Self {
        let used = data.len();
        Self {
            backing: Box::new(FixedRo::new(data)),
            used,
            cursor: 0,
        }
    }

    /// Wraps caller memory read-write. Starts empty; writes never exceed
    /// the borrowed capacity.
    pub fn fixed_mut(data: &'a mut [u8]) -> Self {
        Self::with_backing(FixedRw::new(data))
    }

    /// Forwards every write to `out`. A forwarding failure is fatal.
    pub fn line_out(out: impl io::Write + 'a) -> Self {
        Self::with_backing(LineOut::new(out))
    }

    /// Builds a buffer over any custom backing.
    pub fn with_backing(backing: impl Backing + 'a) -> Self {
        Self {
            backing: Box::new(backing),
            used: 0,
            cursor: 0,
        }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.backing.capacity()
    }

    /// Bytes between the cursor and the end of the used region.
    pub fn remaining(&self) -> usize {
        self.used - self.cursor
    }

    /// Borrows the used bytes, for backings that keep them resident.
    pub fn as_slice(&self) -> Result<&[u8], BufError> {
        Ok(&self.backing.as_slice()?[..self.used])
    }

    /// Copies the used bytes out into an owned vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, BufError> {
        self.as_slice().map(<[u8]>::to_vec)
    }

    /// Appends `data` at the end of the used region, growing the backing
    /// if it supports growth. Appending zero bytes always succeeds, even
    /// on a read-only backing.
    pub fn append(&mut self, data: &[u8]) -> Result<(), BufError> {
        if data.is_empty() {
            return Ok(());
        }
        let needed = self
            .used
            .checked_add(data.len())
            .ok_or(BufError::OutOfMemory)?;
        if needed > self.backing.capacity() {
            self.backing.grow(needed)?;
        }
        self.backing.copy_in(self.used, data)?;
        self.used = needed;
        Ok(())
    }

    /// Moves the cursor. The target must land within `[0, used]`; the
    /// backing may further veto the move. Returns the new absolute offset.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize, BufError> {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor,
            Whence::End => self.used,
        };
        let target = base as i128 + offset as i128;
        if target < 0 || target > self.used as i128 {
            return Err(BufError::InvalidArgument);
        }
        let target = target as usize;
        self.backing.check_seek(self.cursor, target)?;
        self.cursor = target;
        Ok(target)
    }

    /// Grows or shrinks the apparent length. Growth zero-fills exactly the
    /// newly exposed bytes; shrinking clamps the cursor.
    pub fn truncate(&mut self, size: usize) -> Result<(), BufError> {
        self.backing.check_truncate()?;
        if size > self.used {
            if size > self.backing.capacity() {
                self.backing.grow(size)?;
            }
            self.backing.clear(self.used, size - self.used)?;
        }
        self.used = size;
        if self.cursor > self.used {
            self.cursor = self.used;
        }
        Ok(())
    }

    /// Reads up to `out.len()` bytes starting at `offset`. Returns the
    /// number of bytes actually available — zero past the end, clipped at
    /// the end — never an error for a short read.
    pub fn pread(&self, out: &mut [u8], offset: usize) -> Result<usize, BufError> {
        if offset >= self.used {
            return Ok(0);
        }
        let n = out.len().min(self.used - offset);
        self.backing.copy_out(offset, &mut out[..n])?;
        Ok(n)
    }

    /// Writes `data` at `offset`, growing as needed and zero-filling any
    /// gap between the old end and the write offset. Returns the number of
    /// bytes written.
    pub fn pwrite(&mut self, data: &[u8], offset: usize) -> Result<usize, BufError> {
        if data.is_empty() {
            return Ok(0);
        }
        let end = offset
            .checked_add(data.len())
            .ok_or(BufError::OutOfMemory)?;
        if end > self.backing.capacity() {
            self.backing.grow(end)?;
        }
        if offset > self.used {
            self.backing.clear(self.used, offset - self.used)?;
        }
        self.backing.copy_in(offset, data)?;
        self.used = self.used.max(end);
        Ok(data.len())
    }

    /// Reads at the cursor and advances it by the number of bytes read.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize, BufError> {
        let n = self.pread(out, self.cursor)?;
        self.cursor += n;
        Ok(n)
    }

    /// Writes at the cursor and advances it by the number of bytes written.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, BufError> {
        let n = self.pwrite(data, self.cursor)?;
        self.cursor += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_append_and_read_back() {
        let mut buf = Buf::heap(4);
        buf.append(b"hello").unwrap();
        assert_eq!(buf.used(), 5);
        assert_eq!(buf.as_slice().unwrap(), b"hello");
    }

    #[test]
    fn heap_grows_from_zero() {
        let mut buf = Buf::heap(0);
        for i in 0..256u16 {
            buf.append(&[i as u8]).unwrap();
        }
        assert_eq!(buf.used(), 256);
        let bytes = buf.to_vec().unwrap();
        for (i, b) in bytes.iter().enumerate() {
            assert_eq!(*b, i as u8);
        }
    }

    #[test]
    fn append_zero_is_noop_even_read_only() {
        let data = [1u8, 2, 3];
        let mut buf = Buf::fixed(&data);
        assert_eq!(buf.append(&[]), Ok(()));
        assert_eq!(buf.used(), 3);
    }

    #[test]
    fn read_only_rejects_mutation() {
        let data = [1u8, 2, 3];
        let mut buf = Buf::fixed(&data);
        assert_eq!(buf.append(b"x"), Err(BufError::ReadOnly));
        assert_eq!(buf.pwrite(b"x", 0), Err(BufError::ReadOnly));
        assert_eq!(buf.truncate(1), Err(BufError::ReadOnly));
        assert_eq!(buf.as_slice().unwrap(), &data);
    }

    #[test]
    fn fixed_rw_bounded_by_capacity() {
        let mut region = [0u8; 4];
        let mut buf = Buf::fixed_mut(&mut region);
        buf.append(b"abcd").unwrap();
        assert_eq!(buf.append(b"e"), Err(BufError::OutOfSpace));
        assert_eq!(buf.as_slice().unwrap(), b"abcd");
    }

    #[test]
    fn fixed_rw_failed_append_leaves_content_unchanged() {
        let mut region = [0u8; 2];
        let mut buf = Buf::fixed_mut(&mut region);
        buf.append(b"ab").unwrap();
        assert_eq!(buf.append(b"cd"), Err(BufError::OutOfSpace));
        assert_eq!(buf.used(), 2);
        assert_eq!(buf.as_slice().unwrap(), b"ab");
    }

    #[test]
    fn seek_whence_variants() {
        let data = [0u8; 10];
        let mut buf = Buf::fixed(&data);
        assert_eq!(buf.seek(4, Whence::Start), Ok(4));
        assert_eq!(buf.seek(2, Whence::Current), Ok(6));
        assert_eq!(buf.seek(-1, Whence::End), Ok(9));
        assert_eq!(buf.seek(-10, Whence::Current), Err(BufError::InvalidArgument));
        assert_eq!(buf.seek(11, Whence::Start), Err(BufError::InvalidArgument));
        assert_eq!(buf.cursor(), 9);
    }

    #[test]
    fn truncate_growth_zero_fills() {
        let mut buf = Buf::heap(0);
        buf.append(&[0xff; 8]).unwrap();
        buf.truncate(4).unwrap();
        buf.truncate(8).unwrap();
        assert_eq!(buf.as_slice().unwrap(), &[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
    }

    #[test]
    fn truncate_shrink_clamps_cursor() {
        let mut buf = Buf::heap(0);
        buf.append(&[1; 8]).unwrap();
        buf.seek(8, Whence::Start).unwrap();
        buf.truncate(3).unwrap();
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.used(), 3);
    }

    #[test]
    fn pread_clips_and_never_errors_short() {
        let data = [1u8, 2, 3, 4];
        let buf = Buf::fixed(&data);
        let mut out = [0u8; 8];
        assert_eq!(buf.pread(&mut out, 2), Ok(2));
        assert_eq!(&out[..2], &[3, 4]);
        assert_eq!(buf.pread(&mut out, 4), Ok(0));
        assert_eq!(buf.pread(&mut out, 100), Ok(0));
    }

    #[test]
    fn pwrite_gap_zero_fills() {
        let mut buf = Buf::heap(0);
        buf.append(b"ab").unwrap();
        assert_eq!(buf.pwrite(b"cd", 5), Ok(2));
        assert_eq!(buf.used(), 7);
        assert_eq!(buf.as_slice().unwrap(), &[b'a', b'b', 0, 0, 0, b'c', b'd']);
    }

    #[test]
    fn sink_counts_but_does_not_store() {
        let mut buf = Buf::sink();
        buf.append(&[0u8; 1000]).unwrap();
        assert_eq!(buf.used(), 1000);
        let mut out = [0u8; 4];
        assert_eq!(buf.pread(&mut out, 0), Err(BufError::Unsupported));
        assert_eq!(buf.as_slice(), Err(BufError::Unsupported));
    }

    #[test]
    fn line_out_forwards_writes() {
        let mut sink = Vec::new();
        {
            let mut buf = Buf::line_out(&mut sink);
            buf.append(b"one\n").unwrap();
            buf.append(b"two\n").unwrap();
            assert_eq!(buf.used(), 8);
            // Only no-op seeks are allowed on a forwarding buffer.
            assert_eq!(buf.seek(0, Whence::Current), Ok(0));
            assert_eq!(buf.seek(0, Whence::End), Err(BufError::Unsupported));
            assert_eq!(buf.truncate(0), Err(BufError::Unsupported));
        }
        assert_eq!(sink, b"one\ntwo\n");
    }

    #[test]
    fn cursor_read_write_wrappers_advance() {
        let mut buf = Buf::heap(0);
        assert_eq!(buf.write(b"abcd").unwrap(), 4);
        assert_eq!(buf.cursor(), 4);
        buf.seek(0, Whence::Start).unwrap();
        let mut out = [0u8; 2];
        assert_eq!(buf.read(&mut out).unwrap(), 2);
        assert_eq!(&out, b"ab");
        assert_eq!(buf.cursor(), 2);
    }
}
