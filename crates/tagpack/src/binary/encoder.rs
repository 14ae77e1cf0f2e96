//! Binary encoder: writes [`Value`]s and raw primitives into a [`Buf`].

use tagpack_buffers::Buf;

use super::constants::*;
use crate::ops;
use crate::value::{Data, Value};
use crate::PackError;

/// Encodes values into the compact binary format.
///
/// Borrows the output buffer so a single buffer can interleave encoded
/// items with other writes.
pub struct Encoder<'e, 'a> {
    buf: &'e mut Buf<'a>,
}

impl<'e, 'a> Encoder<'e, 'a> {
    pub fn new(buf: &'e mut Buf<'a>) -> Self {
        Self { buf }
    }

    /// The shared byte-minimal header routine: integers, payload lengths,
    /// and container counts all pass through here. Emits the immediate
    /// form when the value fits in the additional-information bits, else
    /// the smallest of the 1/2/4/8-byte extensions.
    fn write_hdr(&mut self, major: u8, value: u64) -> Result<(), PackError> {
        let m = major << 5;
        if value <= AI_MAX_IMMEDIATE as u64 {
            self.buf.append(&[m | value as u8])?;
        } else if value <= 0xff {
            self.buf.append(&[m | AI_U8, value as u8])?;
        } else if value <= 0xffff {
            let b = (value as u16).to_be_bytes();
            self.buf.append(&[m | AI_U16, b[0], b[1]])?;
        } else if value <= 0xffff_ffff {
            let b = (value as u32).to_be_bytes();
            self.buf.append(&[m | AI_U32, b[0], b[1], b[2], b[3]])?;
        } else {
            let b = value.to_be_bytes();
            self.buf.append(&[
                m | AI_U64,
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
            ])?;
        }
        Ok(())
    }

    pub fn write_uint(&mut self, n: u64) -> Result<(), PackError> {
        self.write_hdr(MAJOR_UINT, n)
    }

    /// Non-negative values use the unsigned major type. The negative-int
    /// major type (`value = -(encoded + 1)`) is not implemented.
    pub fn write_i64(&mut self, n: i64) -> Result<(), PackError> {
        if n >= 0 {
            self.write_uint(n as u64)
        } else {
            Err(PackError::Unsupported)
        }
    }

    pub fn write_bool(&mut self, b: bool) -> Result<(), PackError> {
        let simple = if b { SIMPLE_TRUE } else { SIMPLE_FALSE };
        self.buf.append(&[(MAJOR_SIMPLE << 5) | simple])?;
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), PackError> {
        self.buf.append(&[(MAJOR_SIMPLE << 5) | SIMPLE_NULL])?;
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), PackError> {
        self.write_hdr(MAJOR_STR, s.len() as u64)?;
        self.buf.append(s.as_bytes())?;
        Ok(())
    }

    pub fn write_blob(&mut self, data: &[u8]) -> Result<(), PackError> {
        self.write_hdr(MAJOR_BLOB, data.len() as u64)?;
        self.buf.append(data)?;
        Ok(())
    }

    /// Definite-length array header: the exact element count, no break.
    pub fn write_array_hdr(&mut self, count: usize) -> Result<(), PackError> {
        self.write_hdr(MAJOR_ARRAY, count as u64)
    }

    /// Definite-length map header: the exact pair count, no break.
    pub fn write_map_hdr(&mut self, count: usize) -> Result<(), PackError> {
        self.write_hdr(MAJOR_MAP, count as u64)
    }

    /// Opens an indefinite-length array, closed by [`Encoder::write_break`].
    pub fn begin_array(&mut self) -> Result<(), PackError> {
        self.buf.append(&[(MAJOR_ARRAY << 5) | AI_INDEFINITE])?;
        Ok(())
    }

    /// Opens an indefinite-length map, closed by [`Encoder::write_break`].
    pub fn begin_map(&mut self) -> Result<(), PackError> {
        self.buf.append(&[(MAJOR_MAP << 5) | AI_INDEFINITE])?;
        Ok(())
    }

    pub fn write_break(&mut self) -> Result<(), PackError> {
        self.buf.append(&[BREAK_BYTE])?;
        Ok(())
    }

    /// Packs a whole value. Leaves and arrays recurse directly; maps go
    /// through the dispatch table so map framing is identical on every
    /// pack path.
    pub fn write_value(&mut self, value: &Value) -> Result<(), PackError> {
        match value.data() {
            Data::None => self.write_null(),
            Data::Uint(n) => self.write_uint(*n),
            Data::Bool(b) => self.write_bool(*b),
            Data::Str(s) => self.write_str(s.as_str()),
            Data::Blob(b) => self.write_blob(b.as_slice()),
            Data::Array(items) => {
                self.write_array_hdr(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            Data::Map(map) => ops::pack_map_with(&super::BinaryOps, map, self.buf),
            Data::Sym(_) | Data::Pair(..) | Data::Char(_) => Err(PackError::Unsupported),
        }
    }
}
