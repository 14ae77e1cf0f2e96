//! The JSON-shaped text wire format. Encode-only.

mod encoder;
mod ops;

pub use encoder::Encoder;
pub use ops::TextOps;
