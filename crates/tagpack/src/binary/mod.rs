//! The compact binary wire format.
//!
//! Every item starts with one byte `(major_type << 5) | additional_info`.
//! The additional-information bits carry the value directly (0–23), select
//! a 1/2/4/8-byte big-endian extension (24–27), or mark an
//! indefinite-length container terminated by a `0xFF` break (31).

mod constants;
mod decoder;
mod encoder;
mod ops;

pub use constants::*;
pub use decoder::{
    decode, decode_with_consumed, peek_kind, validate_exact_size, Decoder,
};
pub use encoder::Encoder;
pub use ops::BinaryOps;
