/// Immutable RGBA8 pixel buffers.
pub mod buffer;
