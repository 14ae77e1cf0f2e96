//! Text operation table: structural punctuation, comma/colon separators.

use tagpack_buffers::Buf;

use super::Encoder;
use crate::ops::PackOps;
use crate::PackError;

/// Packs containers with `{}`/`[]` punctuation; separators follow the
/// first-element-has-no-separator rule enforced by the generic traversal.
pub struct TextOps;

impl PackOps for TextOps {
    fn map_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).begin_map()
    }

    fn map_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).end_map()
    }

    fn name_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).name_sep()
    }

    fn pair_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).elem_sep()
    }

    fn array_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).begin_array()
    }

    fn array_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).end_array()
    }

    fn elem_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        Encoder::new(buf).elem_sep()
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

    fn put_char(&self, buf: &mut Buf<'_>, c: char) -> Result<(), PackError> {
        Encoder::new(buf).write_char(c)
    }
}
