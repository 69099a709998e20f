//! Layer-stack reduction.

/// Left fold of a layer stack through resolved blend steps.
pub mod pipeline;
