//! Format-selectable operation tables and the single generic traversal
//! they parameterize.
//!
//! Each wire format supplies a [`PackOps`] table: framing and separator
//! hooks (default no-ops) plus leaf encoders (default `Unsupported`). The
//! traversal below walks maps, arrays, and leaves exactly once for every
//! format, so the codecs differ only in punctuation and framing.

use tagpack_buffers::Buf;

use crate::value::{Data, Map, Value};
use crate::PackError;

/// Per-format encoding hooks.
///
/// A format that omits a leaf encoder fails with `Unsupported` when a
/// value of that kind is encountered; it never crashes.
pub trait PackOps {
    /// Opens a key/value container.
    fn map_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Closes a key/value container.
    fn map_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Wraps one key/value pair, before the name is written.
    fn pair_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Wraps one key/value pair, after the value is written.
    fn pair_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Separates a pair's name from its value.
    fn name_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Separates consecutive pairs. Not called before the first pair.
    fn pair_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    fn array_begin(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    fn array_end(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    /// Separates consecutive elements. Not called before the first.
    fn elem_sep(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Ok(())
    }

    fn put_null(&self, buf: &mut Buf<'_>) -> Result<(), PackError> {
        let _ = buf;
        Err(PackError::Unsupported)
    }

    fn put_bool(&self, buf: &mut Buf<'_>, b: bool) -> Result<(), PackError> {
        let _ = (buf, b);
        Err(PackError::Unsupported)
    }

    fn put_uint(&self, buf: &mut Buf<'_>, n: u64) -> Result<(), PackError> {
        let _ = (buf, n);
        Err(PackError::Unsupported)
    }

    fn put_str(&self, buf: &mut Buf<'_>, s: &str) -> Result<(), PackError> {
        let _ = (buf, s);
        Err(PackError::Unsupported)
    }

    fn put_blob(&self, buf: &mut Buf<'_>, data: &[u8]) -> Result<(), PackError> {
        let _ = (buf, data);
        Err(PackError::Unsupported)
    }

    fn put_char(&self, buf: &mut Buf<'_>, c: char) -> Result<(), PackError> {
        let _ = (buf, c);
        Err(PackError::Unsupported)
    }
}

/// Hook table shape for format-driven unpacking. No format implements it
/// yet; the trait is reserved so the two tables stay symmetric.
pub trait UnpackOps {
    fn take_null(&self, buf: &mut Buf<'_>) -> Result<(), PackError>;
    fn take_bool(&self, buf: &mut Buf<'_>) -> Result<bool, PackError>;
    fn take_uint(&self, buf: &mut Buf<'_>) -> Result<u64, PackError>;
    fn take_str(&self, buf: &mut Buf<'_>) -> Result<String, PackError>;
}

/// Packs a key/value container: prologue, then per pair the name, the
/// name separator, the value, a pair separator between pairs, then the
/// epilogue.
pub fn pack_map_with(
    ops: &dyn PackOps,
    map: &Map,
    buf: &mut Buf<'_>,
) -> Result<(), PackError> {
    ops.map_begin(buf)?;
    let mut first = true;
    for (name, value) in map.iter() {
        if !first {
            ops.pair_sep(buf)?;
        }
        first = false;
        ops.pair_begin(buf)?;
        ops.put_str(buf, name)?;
        ops.name_sep(buf)?;
        pack_value_with(ops, value, buf)?;
        ops.pair_end(buf)?;
    }
    ops.map_end(buf)
}

pub fn pack_array_with(
    ops: &dyn PackOps,
    items: &[Value],
    buf: &mut Buf<'_>,
) -> Result<(), PackError> {
    ops.array_begin(buf)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ops.elem_sep(buf)?;
        }
        pack_value_with(ops, item, buf)?;
    }
    ops.array_end(buf)
}

pub fn pack_value_with(
    ops: &dyn PackOps,
    value: &Value,
    buf: &mut Buf<'_>,
) -> Result<(), PackError> {
    match value.data() {
        Data::None => ops.put_null(buf),
        Data::Bool(b) => ops.put_bool(buf, *b),
        Data::Uint(n) => ops.put_uint(buf, *n),
        Data::Str(s) => ops.put_str(buf, s.as_str()),
        Data::Char(c) => ops.put_char(buf, *c),
        Data::Blob(b) => ops.put_blob(buf, b.as_slice()),
        Data::Array(items) => pack_array_with(ops, items, buf),
        Data::Map(map) => pack_map_with(ops, map, buf),
        Data::Sym(_) | Data::Pair(..) => Err(PackError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    /// A table that implements nothing: every leaf must fail with
    /// `Unsupported`, and framing hooks must be harmless no-ops.
    struct EmptyOps;
    impl PackOps for EmptyOps {}

    #[test]
    fn missing_leaf_encoder_is_unsupported() {
        let mut buf = Buf::heap(0);
        assert_eq!(
            pack_value_with(&EmptyOps, &Value::uint(1), &mut buf),
            Err(PackError::Unsupported)
        );
        assert_eq!(
            pack_value_with(&EmptyOps, &Value::NONE, &mut buf),
            Err(PackError::Unsupported)
        );
    }

    #[test]
    fn empty_containers_only_touch_framing_hooks() {
        let mut buf = Buf::heap(0);
        assert!(pack_map_with(&EmptyOps, &Map::new(), &mut buf).is_ok());
        assert!(pack_array_with(&EmptyOps, &[], &mut buf).is_ok());
        assert_eq!(buf.used(), 0);
    }

    /// Counts separator calls to pin the first-element-has-no-separator
    /// rule.
    struct SepCounter(std::cell::Cell<usize>);
    impl PackOps for SepCounter {
        fn pair_sep(&self, _buf: &mut Buf<'_>) -> Result<(), PackError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
        fn put_str(&self, _buf: &mut Buf<'_>, _s: &str) -> Result<(), PackError> {
            Ok(())
        }
        fn put_uint(&self, _buf: &mut Buf<'_>, _n: u64) -> Result<(), PackError> {
            Ok(())
        }
    }

    #[test]
    fn pair_separator_skips_first_pair() {
        let mut map = Map::new();
        map.insert("a", Value::uint(1));
        map.insert("b", Value::uint(2));
        map.insert("c", Value::uint(3));
        let ops = SepCounter(std::cell::Cell::new(0));
        let mut buf = Buf::heap(0);
        pack_map_with(&ops, &map, &mut buf).unwrap();
        assert_eq!(ops.0.get(), 2);
    }
}
