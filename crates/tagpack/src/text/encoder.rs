//! Text encoder: writes values as JSON-shaped UTF-8 into a [`Buf`].

use base64::Engine;
use tagpack_buffers::Buf;

use crate::PackError;

/// `data:application/octet-stream;base64,` with the opening quote.
const BIN_URI_PREFIX: &[u8] = b"\"data:application/octet-stream;base64,";

pub struct Encoder<'e, 'a> {
    buf: &'e mut Buf<'a>,
}

impl<'e, 'a> Encoder<'e, 'a> {
    pub fn new(buf: &'e mut Buf<'a>) -> Self {
        Self { buf }
    }

    pub fn write_uint(&mut self, n: u64) -> Result<(), PackError> {
        self.buf.append(n.to_string().as_bytes())?;
        Ok(())
    }

    pub fn write_bool(&mut self, b: bool) -> Result<(), PackError> {
        self.buf
            .append(if b { "true" } else { "false" }.as_bytes())?;
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), PackError> {
        self.buf.append(b"null")?;
        Ok(())
    }

    /// Double-quoted with the control-character escape table: named
    /// escapes for backspace, form feed, newline, carriage return and tab,
    /// `\uXXXX` for the remaining controls, and a backslash before `\`
    /// and `"`.
    pub fn write_str(&mut self, s: &str) -> Result<(), PackError> {
        let mut out = Vec::with_capacity(s.len() + 2);
        out.push(b'"');
        escape_into(s, &mut out);
        out.push(b'"');
        self.buf.append(&out)?;
        Ok(())
    }

    /// A unicode scalar packs as a one-character string.
    pub fn write_char(&mut self, c: char) -> Result<(), PackError> {
        let mut scratch = [0u8; 4];
        self.write_str(c.encode_utf8(&mut scratch))
    }

    /// Blobs render as base64 data-URI strings.
    pub fn write_blob(&mut self, data: &[u8]) -> Result<(), PackError> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(data);
        let mut out = Vec::with_capacity(BIN_URI_PREFIX.len() + b64.len() + 1);
        out.extend_from_slice(BIN_URI_PREFIX);
        out.extend_from_slice(b64.as_bytes());
        out.push(b'"');
        self.buf.append(&out)?;
        Ok(())
    }

    pub fn begin_array(&mut self) -> Result<(), PackError> {
        self.buf.append(b"[")?;
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), PackError> {
        self.buf.append(b"]")?;
        Ok(())
    }

    pub fn begin_map(&mut self) -> Result<(), PackError> {
        self.buf.append(b"{")?;
        Ok(())
    }

    pub fn end_map(&mut self) -> Result<(), PackError> {
        self.buf.append(b"}")?;
        Ok(())
    }

    pub fn name_sep(&mut self) -> Result<(), PackError> {
        self.buf.append(b":")?;
        Ok(())
    }

    pub fn elem_sep(&mut self) -> Result<(), PackError> {
        self.buf.append(b",")?;
        Ok(())
    }
}

fn escape_into(s: &str, out: &mut Vec<u8>) {
    for &b in s.as_bytes() {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x00..=0x1f => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                out.extend_from_slice(b"\\u00");
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0x0f) as usize]);
            }
            // Multi-byte UTF-8 passes through untouched.
            _ => out.push(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(f: impl FnOnce(&mut Encoder) -> Result<(), PackError>) -> Vec<u8> {
        let mut buf = Buf::heap(0);
        f(&mut Encoder::new(&mut buf)).unwrap();
        buf.to_vec().unwrap()
    }

    #[test]
    fn uint_decimal() {
        assert_eq!(encode(|e| e.write_uint(0)), b"0");
        assert_eq!(encode(|e| e.write_uint(42)), b"42");
        assert_eq!(
            encode(|e| e.write_uint(u64::MAX)),
            b"18446744073709551615"
        );
    }

    #[test]
    fn literals() {
        assert_eq!(encode(|e| e.write_bool(true)), b"true");
        assert_eq!(encode(|e| e.write_bool(false)), b"false");
        assert_eq!(encode(|e| e.write_null()), b"null");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(encode(|e| e.write_str("hi")), b"\"hi\"");
        assert_eq!(encode(|e| e.write_str("a\"b")), b"\"a\\\"b\"");
        assert_eq!(encode(|e| e.write_str("a\\b")), b"\"a\\\\b\"");
        assert_eq!(
            encode(|e| e.write_str("\x08\x0c\n\r\t")),
            b"\"\\b\\f\\n\\r\\t\""
        );
        assert_eq!(encode(|e| e.write_str("\x01")), b"\"\\u0001\"");
        assert_eq!(encode(|e| e.write_str("\x1f")), b"\"\\u001f\"");
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(encode(|e| e.write_str("café")), "\"café\"".as_bytes());
        assert_eq!(encode(|e| e.write_char('é')), "\"é\"".as_bytes());
    }

    #[test]
    fn escapes_parse_as_json() {
        let out = encode(|e| e.write_str("quote \" slash \\ bell \x07 tab \t"));
        let parsed: serde_json::Value =
            serde_json::from_slice(&out).expect("escaped output is valid JSON");
        assert_eq!(
            parsed,
            serde_json::json!("quote \" slash \\ bell \x07 tab \t")
        );
    }

    #[test]
    fn blob_data_uri() {
        let out = encode(|e| e.write_blob(b"hello"));
        assert_eq!(
            out,
            b"\"data:application/octet-stream;base64,aGVsbG8=\""
        );
    }
}
