//! Binary operation table: indefinite container framing, no separators.

use tagpack_buffers::Buf;

use super::Encoder;
use crate::ops::PackOps;
use crate::PackError;

/// Packs containers with indefinite-length headers and a trailing break;
/// leaves go through the binary primitive encoders. Pairs need no
/// separators on the wire.
pub struct BinaryOps;

impl PackOps for BinaryOps {
    fn map_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).begin_map()
    }

    fn map_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).write_break()
    }

    fn array_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).begin_array()
    }

    fn array_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).write_break()
    }

    fn put_null(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).write_null()
    }

    fn put_bool(&self, buf: &mut Buf<'_>, b: bool) -> Result<(), PackError> {
        Encoder::new(buf).write_bool(b)
    }

    fn put_uint(&self, buf: &mut Buf<'_>, n: u64) -> Result<(), PackError> {
        Encoder::new(buf).write_uint(n)
    }

    fn put_str(&self, buf: &mut Buf<'_>, s: &str) -> Result<(), PackError> {
        Encoder::new(buf).write_str(s)
    }

    fn put_blob(&self, buf: &mut Buf<'_>, data: &[u8]) -> Result<(), PackError> {
        Encoder::new(buf).write_blob(data)
    }
}
