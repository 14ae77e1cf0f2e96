//! Format-selected pack/unpack entry points.

use tagpack_buffers::{Buf, Whence};

use crate::binary;
use crate::ops;
use crate::text::TextOps;
use crate::value::Value;
use crate::PackError;

/// The wire formats this runtime speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Binary,
    Text,
}

/// Packs `value` into a fresh heap buffer.
pub fn pack(value: &Value, format: Format) -> Result<Buf<'static>, PackError> {
    let mut buf = Buf::heap(0);
    pack_to(value, &mut buf, format)?;
    Ok(buf)
}

/// Packs `value` into any caller-supplied buffer.
pub fn pack_to(value: &Value, buf: &mut Buf<'_>, format: Format) -> Result<(), PackError> {
    match format {
        Format::Binary => binary::Encoder::new(buf).write_value(value),
        Format::Text => ops::pack_value_with(&TextOps, value, buf),
    }
}

/// Packs `value` into a raw caller region, returning the byte count.
/// Fails with `OutOfSpace` when the region is too small, leaving its
/// prior contents intact up to the failure point.
pub fn pack_into(value: &Value, region: &mut [u8], format: Format) -> Result<usize, PackError> {
    let mut buf = Buf::fixed_mut(region);
    pack_to(value, &mut buf, format)?;
    Ok(buf.used())
}

/// Computes the packed size of `value` without allocating a payload, by
/// encoding into the discarding sink backend.
pub fn packed_size(value: &Value, format: Format) -> Result<usize, PackError> {
    let mut buf = Buf::sink();
    pack_to(value, &mut buf, format)?;
    Ok(buf.used())
}

/// Decodes one value from `bytes`. Only the binary format has a decoder.
pub fn unpack(bytes: &[u8], format: Format) -> Result<Value, PackError> {
    match format {
        Format::Binary => binary::decode(bytes),
        Format::Text => Err(PackError::Unsupported),
    }
}

/// Decodes one value at `buf`'s cursor, advancing the cursor by exactly
/// the bytes consumed — and only when the decode succeeds. On failure the
/// cursor stays where it was.
pub fn unpack_from(buf: &mut Buf<'_>, format: Format) -> Result<Value, PackError> {
    match format {
        Format::Binary => {
            let (value, consumed) = {
                let remaining = &buf.as_slice()?[buf.cursor()..];
                binary::decode_with_consumed(remaining)?
            };
            buf.seek(consumed as i64, Whence::Current)?;
            Ok(value)
        }
        Format::Text => Err(PackError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    fn abc_map() -> Value {
        let mut map = Map::new();
        map.insert("abc", Value::uint(5));
        Value::map(map)
    }

    #[test]
    fn pack_empty_map_both_formats() {
        let v = Value::map(Map::new());
        let bin = pack(&v, Format::Binary).unwrap();
        assert_eq!(bin.as_slice().unwrap(), &[0xbf, 0xff]);
        let text = pack(&v, Format::Text).unwrap();
        assert_eq!(text.as_slice().unwrap(), b"{}");
    }

    #[test]
    fn pack_abc_map_both_formats() {
        let v = abc_map();
        let bin = pack(&v, Format::Binary).unwrap();
        assert_eq!(
            bin.as_slice().unwrap(),
            &[0xbf, 0x63, b'a', b'b', b'c', 0x05, 0xff]
        );
        let text = pack(&v, Format::Text).unwrap();
        assert_eq!(text.as_slice().unwrap(), b"{\"abc\":5}");
    }

    #[test]
    fn packed_size_matches_pack() {
        let v = abc_map();
        for format in [Format::Binary, Format::Text] {
            let buf = pack(&v, format).unwrap();
            assert_eq!(packed_size(&v, format).unwrap(), buf.used());
        }
    }

    #[test]
    fn pack_into_reports_count_and_bounds() {
        let v = abc_map();
        let mut region = [0u8; 16];
        let n = pack_into(&v, &mut region, Format::Binary).unwrap();
        assert_eq!(&region[..n], &[0xbf, 0x63, b'a', b'b', b'c', 0x05, 0xff]);
        let mut small = [0u8; 3];
        assert_eq!(
            pack_into(&v, &mut small, Format::Binary),
            Err(PackError::OutOfSpace)
        );
    }

    #[test]
    fn unpack_text_unsupported() {
        assert_eq!(unpack(b"{}", Format::Text), Err(PackError::Unsupported));
    }

    #[test]
    fn unpack_from_commits_cursor_on_success_only() {
        let bytes = [0x17u8, 0x18, 0x18, 0x19, 0x01];
        let mut buf = Buf::fixed(&bytes);
        assert_eq!(unpack_from(&mut buf, Format::Binary), Ok(Value::uint(23)));
        assert_eq!(buf.cursor(), 1);
        assert_eq!(unpack_from(&mut buf, Format::Binary), Ok(Value::uint(24)));
        assert_eq!(buf.cursor(), 3);
        // Truncated extension: the decode fails and the cursor is
        // untouched.
        assert_eq!(
            unpack_from(&mut buf, Format::Binary),
            Err(PackError::MalformedEncoding)
        );
        assert_eq!(buf.cursor(), 3);
    }
}
