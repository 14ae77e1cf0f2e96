//! A small data-interchange runtime: a tagged, reference-counted value
//! model with two wire codecs — a compact binary format and a JSON text
//! format — both writing through the pluggable buffers of
//! [`tagpack_buffers`].
//!
//! Application code builds a [`Value`] tree, selects a [`Format`], and
//! calls [`pack`] (or [`pack_into`] / [`packed_size`]); the binary format
//! also decodes via [`unpack`].

mod error;
mod ops;
mod pack;
mod value;

pub mod binary;
pub mod text;

pub use error::PackError;
pub use ops::{pack_array_with, pack_map_with, pack_value_with, PackOps, UnpackOps};
pub use pack::{pack, pack_into, pack_to, packed_size, unpack, unpack_from, Format};
pub use value::{Bytes, Data, Kind, Map, Text, Value, INLINE_CAP};

pub use tagpack_buffers::{Buf, BufError, Whence};
