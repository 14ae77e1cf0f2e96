//! [`Value`] — the tagged, reference-counted unit of data both codecs
//! serialize.
//!
//! A `Value` is a cheap handle over immutable [`Data`]: either an
//! `Arc`-owned allocation or a reference to a compiled-in singleton.
//! Cloning increments an atomic count; singletons are immortal and skip
//! refcounting entirely. Call sites never branch on which case they hold.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::PackError;

/// Payload bytes that fit directly inside a [`Text`] or [`Bytes`] without
/// a separate allocation.
pub const INLINE_CAP: usize = 14;

/// Largest unsigned integer served from the singleton table.
const SMALL_UINT_MAX: u64 = 63;

/// The ten value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    None,
    Uint,
    Str,
    Sym,
    Bool,
    Pair,
    Char,
    Blob,
    Array,
    Map,
}

/// String payload with explicit ownership: heap-owned, borrowed from
/// static storage, or stored inline.
#[derive(Clone)]
pub enum Text {
    Owned(String),
    Static(&'static str),
    Inline(u8, [u8; INLINE_CAP]),
}

impl Text {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.len() <= INLINE_CAP {
            let mut bytes = [0u8; INLINE_CAP];
            bytes[..s.len()].copy_from_slice(s.as_bytes());
            Text::Inline(s.len() as u8, bytes)
        } else {
            Text::Owned(s)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::Owned(s) => s,
            Text::Static(s) => s,
            Text::Inline(len, bytes) => std::str::from_utf8(&bytes[..*len as usize])
                .expect("inline text is constructed from valid UTF-8"),
        }
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Text {}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

/// Blob payload with the same three-way ownership as [`Text`].
#[derive(Clone)]
pub enum Bytes {
    Owned(Vec<u8>),
    Static(&'static [u8]),
    Inline(u8, [u8; INLINE_CAP]),
}

impl Bytes {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        if data.len() <= INLINE_CAP {
            let mut bytes = [0u8; INLINE_CAP];
            bytes[..data.len()].copy_from_slice(&data);
            Bytes::Inline(data.len() as u8, bytes)
        } else {
            Bytes::Owned(data)
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Bytes::Owned(data) => data,
            Bytes::Static(data) => data,
            Bytes::Inline(len, bytes) => &bytes[..*len as usize],
        }
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Bytes {}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

/// Ordered key/value container.
///
/// Entries live in the external ordered-map engine and iterate in
/// sorted-key order; both codecs observe that order when packing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Map {
    entries: BTreeMap<String, Value>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The tagged payload behind a [`Value`]. Exactly one representation is
/// active per kind; the kind never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    None,
    Uint(u64),
    Str(Text),
    Sym(Text),
    Bool(bool),
    Pair(Value, Value),
    Char(char),
    Blob(Bytes),
    Array(Vec<Value>),
    Map(Map),
}

#[derive(Clone)]
enum Repr {
    Owned(Arc<Data>),
    Static(&'static Data),
}

/// Shared handle to immutable [`Data`].
#[derive(Clone)]
pub struct Value(Repr);

static SMALL_UINTS: [Data; 64] = [
    Data::Uint(0), Data::Uint(1), Data::Uint(2), Data::Uint(3),
    Data::Uint(4), Data::Uint(5), Data::Uint(6), Data::Uint(7),
    Data::Uint(8), Data::Uint(9), Data::Uint(10), Data::Uint(11),
    Data::Uint(12), Data::Uint(13), Data::Uint(14), Data::Uint(15),
    Data::Uint(16), Data::Uint(17), Data::Uint(18), Data::Uint(19),
    Data::Uint(20), Data::Uint(21), Data::Uint(22), Data::Uint(23),
    Data::Uint(24), Data::Uint(25), Data::Uint(26), Data::Uint(27),
    Data::Uint(28), Data::Uint(29), Data::Uint(30), Data::Uint(31),
    Data::Uint(32), Data::Uint(33), Data::Uint(34), Data::Uint(35),
    Data::Uint(36), Data::Uint(37), Data::Uint(38), Data::Uint(39),
    Data::Uint(40), Data::Uint(41), Data::Uint(42), Data::Uint(43),
    Data::Uint(44), Data::Uint(45), Data::Uint(46), Data::Uint(47),
    Data::Uint(48), Data::Uint(49), Data::Uint(50), Data::Uint(51),
    Data::Uint(52), Data::Uint(53), Data::Uint(54), Data::Uint(55),
    Data::Uint(56), Data::Uint(57), Data::Uint(58), Data::Uint(59),
    Data::Uint(60), Data::Uint(61), Data::Uint(62), Data::Uint(63),
];

impl Value {
    /// The absence singleton.
    pub const NONE: Value = Value(Repr::Static(&Data::None));
    pub const TRUE: Value = Value(Repr::Static(&Data::Bool(true)));
    pub const FALSE: Value = Value(Repr::Static(&Data::Bool(false)));

    fn owned(data: Data) -> Value {
        Value(Repr::Owned(Arc::new(data)))
    }

    /// Resolves the handle to its payload. This is the single point where
    /// owned and static representations converge.
    pub fn data(&self) -> &Data {
        match &self.0 {
            Repr::Owned(data) => data,
            Repr::Static(data) => data,
        }
    }

    pub fn kind(&self) -> Kind {
        match self.data() {
            Data::None => Kind::None,
            Data::Uint(_) => Kind::Uint,
            Data::Str(_) => Kind::Str,
            Data::Sym(_) => Kind::Sym,
            Data::Bool(_) => Kind::Bool,
            Data::Pair(..) => Kind::Pair,
            Data::Char(_) => Kind::Char,
            Data::Blob(_) => Kind::Blob,
            Data::Array(_) => Kind::Array,
            Data::Map(_) => Kind::Map,
        }
    }

    pub fn bool(b: bool) -> Value {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Small values come from the singleton table without allocating.
    pub fn uint(n: u64) -> Value {
        if n <= SMALL_UINT_MAX {
            Value(Repr::Static(&SMALL_UINTS[n as usize]))
        } else {
            Value::owned(Data::Uint(n))
        }
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::owned(Data::Str(Text::new(s)))
    }

    /// String over compiled-in bytes; the payload is borrowed, never freed.
    pub fn str_static(s: &'static str) -> Value {
        Value::owned(Data::Str(Text::Static(s)))
    }

    pub fn sym(s: impl Into<String>) -> Value {
        Value::owned(Data::Sym(Text::new(s)))
    }

    pub fn sym_static(s: &'static str) -> Value {
        Value::owned(Data::Sym(Text::Static(s)))
    }

    pub fn blob(data: impl Into<Vec<u8>>) -> Value {
        Value::owned(Data::Blob(Bytes::new(data)))
    }

    pub fn blob_static(data: &'static [u8]) -> Value {
        Value::owned(Data::Blob(Bytes::Static(data)))
    }

    pub fn ch(c: char) -> Value {
        Value::owned(Data::Char(c))
    }

    pub fn pair(head: Value, tail: Value) -> Value {
        Value::owned(Data::Pair(head, tail))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::owned(Data::Array(items))
    }

    pub fn map(map: Map) -> Value {
        Value::owned(Data::Map(map))
    }

    pub fn is_none(&self) -> bool {
        matches!(self.data(), Data::None)
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.data() {
            Data::Uint(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data() {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.data() {
            Data::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self.data() {
            Data::Sym(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self.data() {
            Data::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self.data() {
            Data::Blob(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self.data() {
            Data::Pair(head, tail) => Some((head, tail)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self.data() {
            Data::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self.data() {
            Data::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality over payloads, not handle identity.
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.data(), f)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        use base64::Engine;
        match v.data() {
            Data::None => serde_json::Value::Null,
            Data::Uint(n) => serde_json::json!(n),
            Data::Str(s) | Data::Sym(s) => serde_json::Value::String(s.as_str().to_owned()),
            Data::Bool(b) => serde_json::Value::Bool(*b),
            Data::Pair(head, tail) => serde_json::Value::Array(vec![
                serde_json::Value::from(head),
                serde_json::Value::from(tail),
            ]),
            Data::Char(c) => serde_json::Value::String(c.to_string()),
            Data::Blob(bytes) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes.as_slice())
            )),
            Data::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Data::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_owned(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = PackError;

    /// JSON numbers must be non-negative integers; the model has no
    /// signed or floating-point kind.
    fn try_from(v: &serde_json::Value) -> Result<Self, PackError> {
        Ok(match v {
            serde_json::Value::Null => Value::NONE,
            serde_json::Value::Bool(b) => Value::bool(*b),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(u) => Value::uint(u),
                None if n.is_i64() => return Err(PackError::Overflow),
                None => return Err(PackError::Unsupported),
            },
            serde_json::Value::String(s) => Value::str(s.clone()),
            serde_json::Value::Array(items) => Value::array(
                items
                    .iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            serde_json::Value::Object(obj) => Value::map(
                obj.iter()
                    .map(|(k, v)| Ok((k.clone(), Value::try_from(v)?)))
                    .collect::<Result<Map, PackError>>()?,
            ),
        })
    }
}
