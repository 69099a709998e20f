//! Codec layer: PNG bytes in, pixel buffers out, and back.

pub mod png;
pub mod source;
