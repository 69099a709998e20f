//! blendstack is a multi-layer RGBA compositing engine.
//!
//! It reduces an ordered stack of images into one through named, pluggable blend algorithms,
//! with a PNG codec at the edges and a benchmark harness over the same pipeline.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: [`Source`] (path or bytes) `->` [`PixelBuffer`] (straight-alpha RGBA8)
//! 2. **Resolve**: [`AlgorithmPlan`] `->` one [`ResolvedStep`] per compositing step, parameters
//!    validated against each algorithm's schema
//! 3. **Composite**: left fold, `acc = layers[0]`, `acc = step(acc, layers[i])`; each step is
//!    data-parallel over rows
//! 4. **Encode** (optional): [`PixelBuffer`] `->` PNG bytes or file, per [`EncodeOpts`]
//!
//! Everything goes through an [`Engine`] handle:
//!
//! ```no_run
//! use blendstack::{Engine, EncodeOpts, MultipleOpts, Output, Source};
//!
//! let engine = Engine::new();
//! let sources: Vec<Source> = ["sole.png", "back.png", "front.png"]
//!     .into_iter()
//!     .map(Source::from)
//!     .collect();
//! engine.blend_multiple(
//!     &sources,
//!     &Output::from("result.png"),
//!     &MultipleOpts::per_step(["alpha", "multiplicative"]),
//!     EncodeOpts::default(),
//! )?;
//! # Ok::<(), blendstack::BlendError>(())
//! ```
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable buffers**: every operation returns a new [`PixelBuffer`]; inputs are never
//!   modified, and a failed call never hands back a partial result.
//! - **Deterministic**: algorithms are pure per-pixel functions.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bench;
mod blend;
mod capabilities;
mod codec;
mod compose;
mod engine;
mod foundation;
mod pixels;

pub use bench::compose::{Background, ComposeOutcome, FIXTURE_LAYERS, compose_fixtures};
pub use bench::harness::{
    BenchBudget, BenchOpts, benchmark_pair, benchmark_sources, benchmark_stack,
};
pub use bench::report::{BenchEntry, BenchOutcome, BenchmarkReport, StageTimings};
pub use blend::algorithms::{BUILTIN_ALGORITHMS, MaskTop, PixelFnAlgorithm};
pub use blend::descriptor::{AlgorithmDescriptor, AlgorithmPlan};
pub use blend::params::{
    BlendParams, ParamKind, ParamSpec, ParamValue, ResolvedParams, UnknownParamPolicy,
    resolve_params,
};
pub use blend::registry::{AlgorithmRegistry, BlendAlgorithm, PixelKernel, ResolvedStep, apply_step};
pub use capabilities::descriptor::{CapabilityDescriptor, capabilities};
pub use codec::png::{
    CompressionLevel, EncodeOpts, FilterStrategy, decode_png, encode_png, ensure_parent_dir,
    read_png, write_bytes, write_png,
};
pub use codec::source::{Encoded, Output, Source, decode_all, deliver};
pub use compose::pipeline::{composite, composite_resolved, resolve_plan};
pub use engine::handle::Engine;
pub use engine::opts::{BlendOpts, DEFAULT_ALGORITHM, EngineOpts, MultipleOpts};
pub use foundation::error::{BlendError, BlendResult};
pub use pixels::buffer::{PixelBuffer, Rgba8, demultiply, premultiply};

/// Per-pixel functions of the built-in algorithms, `(bottom, top) -> out`.
pub mod pixel_ops {
    pub use crate::blend::algorithms::{
        alpha, destination_over, disjoint_debug, disjoint_over, disjoint_under, first_bottom,
        first_top, mask_top, multiplicative, over, source_over,
    };
}
