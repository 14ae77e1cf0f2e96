//! Binary decoder: reconstructs [`Value`]s from wire bytes.
//!
//! The decoder holds a private cursor over the input slice; callers that
//! maintain their own cursor commit it by [`Decoder::consumed`] only after
//! a read succeeds, so a failed decode never moves the caller's position.

use super::constants::*;
use crate::value::{Kind, Map, Value};
use crate::PackError;

pub struct Decoder<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), PackError> {
        if self.x + n > self.data.len() {
            Err(PackError::MalformedEncoding)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, PackError> {
        self.check(1)?;
        let v = self.data[self.x];
        self.x += 1;
        Ok(v)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], PackError> {
        self.check(n)?;
        let bytes = &self.data[self.x..self.x + n];
        self.x += n;
        Ok(bytes)
    }

    /// Reads the big-endian extension selected by the additional-info
    /// code, or returns the immediate value.
    fn read_ext(&mut self, ai: u8) -> Result<u64, PackError> {
        match ai {
            0..=AI_MAX_IMMEDIATE => Ok(ai as u64),
            AI_U8 => Ok(self.u8()? as u64),
            AI_U16 => {
                let b = self.take(2)?;
                Ok(u16::from_be_bytes([b[0], b[1]]) as u64)
            }
            AI_U32 => {
                let b = self.take(4)?;
                Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64)
            }
            AI_U64 => {
                let b = self.take(8)?;
                Ok(u64::from_be_bytes([
                    b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                ]))
            }
            _ => Err(PackError::InvalidArgument),
        }
    }

    /// Reads a header whose major type must match `expect`.
    fn read_hdr(&mut self, expect: u8) -> Result<u64, PackError> {
        let b = self.u8()?;
        if b >> 5 != expect {
            return Err(PackError::MalformedEncoding);
        }
        self.read_ext(b & 0x1f)
    }

    /// Reports the kind the next item would decode to, without consuming
    /// it. Array and map headers are reported directly; callers that must
    /// tell an empty map from an empty array peek before decoding.
    pub fn peek_kind(&self) -> Result<Kind, PackError> {
        self.check(1)?;
        let b = self.data[self.x];
        let ai = b & 0x1f;
        match b >> 5 {
            MAJOR_UINT | MAJOR_NINT => Ok(Kind::Uint),
            MAJOR_BLOB => Ok(Kind::Blob),
            MAJOR_STR => Ok(Kind::Str),
            MAJOR_ARRAY => Ok(Kind::Array),
            MAJOR_MAP => Ok(Kind::Map),
            MAJOR_TAG => Err(PackError::Unsupported),
            _ => match ai {
                SIMPLE_FALSE | SIMPLE_TRUE => Ok(Kind::Bool),
                SIMPLE_NULL => Ok(Kind::None),
                // A bare break is never a decodable item.
                AI_INDEFINITE => Err(PackError::MalformedEncoding),
                _ => Err(PackError::Unsupported),
            },
        }
    }

    pub fn read_uint(&mut self) -> Result<u64, PackError> {
        self.read_hdr(MAJOR_UINT)
    }

    /// Unsigned first; the negative-int major type is recognized but its
    /// two's-complement decode (`-(encoded + 1)`) is not implemented.
    pub fn read_i64(&mut self) -> Result<i64, PackError> {
        self.check(1)?;
        match self.data[self.x] >> 5 {
            MAJOR_UINT => {
                let n = self.read_uint()?;
                i64::try_from(n).map_err(|_| PackError::Overflow)
            }
            MAJOR_NINT => Err(PackError::Unsupported),
            _ => Err(PackError::MalformedEncoding),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, PackError> {
        let b = self.u8()?;
        match (b >> 5, b & 0x1f) {
            (MAJOR_SIMPLE, SIMPLE_TRUE) => Ok(true),
            (MAJOR_SIMPLE, SIMPLE_FALSE) => Ok(false),
            _ => Err(PackError::MalformedEncoding),
        }
    }

    pub fn read_null(&mut self) -> Result<(), PackError> {
        let b = self.u8()?;
        if b == (MAJOR_SIMPLE << 5) | SIMPLE_NULL {
            Ok(())
        } else {
            Err(PackError::MalformedEncoding)
        }
    }

    /// A declared length followed by exactly that many bytes of UTF-8.
    /// A short payload is a malformed encoding, not a partial success.
    pub fn read_str(&mut self) -> Result<String, PackError> {
        let len = self.read_hdr(MAJOR_STR)?;
        let len = usize::try_from(len).map_err(|_| PackError::MalformedEncoding)?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PackError::MalformedEncoding)
    }

    pub fn read_value(&mut self) -> Result<Value, PackError> {
        self.check(1)?;
        let b = self.data[self.x];
        let ai = b & 0x1f;
        match b >> 5 {
            MAJOR_UINT => Ok(Value::uint(self.read_uint()?)),
            MAJOR_STR => Ok(Value::str(self.read_str()?)),
            MAJOR_ARRAY => self.read_array(ai),
            MAJOR_MAP => self.read_map(ai),
            MAJOR_SIMPLE => match ai {
                SIMPLE_FALSE | SIMPLE_TRUE => Ok(Value::bool(self.read_bool()?)),
                SIMPLE_NULL => {
                    self.read_null()?;
                    Ok(Value::NONE)
                }
                AI_INDEFINITE => Err(PackError::MalformedEncoding),
                _ => Err(PackError::Unsupported),
            },
            // Negative ints, blobs, and tags are recognized but this core
            // does not reconstruct them.
            MAJOR_NINT | MAJOR_BLOB | MAJOR_TAG => Err(PackError::Unsupported),
            _ => unreachable!("major type is three bits"),
        }
    }

    fn read_array(&mut self, ai: u8) -> Result<Value, PackError> {
        let mut items = Vec::new();
        if ai == AI_INDEFINITE {
            self.x += 1;
            while !self.at_break()? {
                items.push(self.read_value()?);
            }
            self.x += 1;
        } else {
            let count = self.read_hdr(MAJOR_ARRAY)?;
            for _ in 0..count {
                items.push(self.read_value()?);
            }
        }
        Ok(Value::array(items))
    }

    fn read_map(&mut self, ai: u8) -> Result<Value, PackError> {
        let mut map = Map::new();
        if ai == AI_INDEFINITE {
            self.x += 1;
            while !self.at_break()? {
                let key = self.read_str()?;
                map.insert(key, self.read_value()?);
            }
            self.x += 1;
        } else {
            let count = self.read_hdr(MAJOR_MAP)?;
            for _ in 0..count {
                let key = self.read_str()?;
                map.insert(key, self.read_value()?);
            }
        }
        Ok(Value::map(map))
    }

    fn at_break(&self) -> Result<bool, PackError> {
        self.check(1)?;
        Ok(self.data[self.x] == BREAK_BYTE)
    }
}

/// Decodes one value from the start of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Value, PackError> {
    Decoder::new(bytes).read_value()
}

/// Decodes one value and reports how many bytes it occupied.
pub fn decode_with_consumed(bytes: &[u8]) -> Result<(Value, usize), PackError> {
    let mut dec = Decoder::new(bytes);
    let value = dec.read_value()?;
    Ok((value, dec.consumed()))
}

/// Checks that `bytes` holds exactly one value of `expected_size` bytes.
pub fn validate_exact_size(bytes: &[u8], expected_size: usize) -> Result<(), PackError> {
    let (_, consumed) = decode_with_consumed(bytes)?;
    if consumed == expected_size {
        Ok(())
    } else {
        Err(PackError::MalformedEncoding)
    }
}

/// Reports the kind of the first item in `bytes` without decoding it.
pub fn peek_kind(bytes: &[u8]) -> Result<Kind, PackError> {
    Decoder::new(bytes).peek_kind()
}
