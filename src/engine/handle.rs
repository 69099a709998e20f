use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::bench::compose::{Background, ComposeOutcome, compose_fixtures};
use crate::bench::harness::{BenchOpts, benchmark_pair, benchmark_sources, benchmark_stack};
use crate::bench::report::BenchmarkReport;
use crate::blend::descriptor::{AlgorithmDescriptor, AlgorithmPlan};
use crate::blend::registry::AlgorithmRegistry;
use crate::capabilities::descriptor::{CapabilityDescriptor, capabilities};
use crate::codec::png::EncodeOpts;
use crate::codec::source::{Encoded, Output, Source, decode_all, deliver};
use crate::compose::pipeline::{composite_resolved, resolve_plan};
use crate::engine::opts::{BlendOpts, EngineOpts, MultipleOpts};
use crate::foundation::error::{BlendError, BlendResult};
use crate::pixels::buffer::PixelBuffer;

/// Handle every public operation goes through.
///
/// Holds the algorithm registry and, optionally, a dedicated rayon pool. Cloning is cheap and
/// clones share both, so one engine can be built at startup and handed to every caller.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<AlgorithmRegistry>,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Engine {
    /// Engine with the built-in algorithms on rayon's global pool.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(AlgorithmRegistry::with_builtins()),
            pool: None,
        }
    }

    /// Engine with the built-in algorithms and `opts`.
    pub fn with_opts(opts: EngineOpts) -> BlendResult<Self> {
        Self::with_registry(AlgorithmRegistry::with_builtins(), opts)
    }

    /// Engine over a caller-provided registry.
    ///
    /// `opts.unknown_params` overrides the registry's own policy.
    pub fn with_registry(registry: AlgorithmRegistry, opts: EngineOpts) -> BlendResult<Self> {
        let pool = match opts.threads {
            Some(_) => Some(Arc::new(build_thread_pool(opts.threads)?)),
            None => None,
        };
        Ok(Self {
            registry: Arc::new(registry.with_unknown_params(opts.unknown_params)),
            pool,
        })
    }

    /// Registry used to resolve algorithm names.
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Blend `top` onto `bottom` in memory.
    #[tracing::instrument(skip(self, bottom, top))]
    pub fn blend_images_data(
        &self,
        bottom: &PixelBuffer,
        top: &PixelBuffer,
        opts: &BlendOpts,
    ) -> BlendResult<PixelBuffer> {
        let steps = resolve_plan(&self.registry, &opts.plan(), 2)?;
        self.install(|| composite_resolved(&[bottom.clone(), top.clone()], &steps))
    }

    /// Decode two sources, blend them and deliver the PNG to `output`.
    ///
    /// The algorithm is resolved before anything is read or written.
    #[tracing::instrument(skip(self, bottom, top))]
    pub fn blend_images(
        &self,
        bottom: &Source,
        top: &Source,
        output: &Output,
        opts: &BlendOpts,
        encode: EncodeOpts,
    ) -> BlendResult<Encoded> {
        let steps = resolve_plan(&self.registry, &opts.plan(), 2)?;
        self.install(|| {
            let layers = decode_all(&[bottom.clone(), top.clone()])?;
            let out = composite_resolved(&layers, &steps)?;
            deliver(&out, output, encode)
        })
    }

    /// Composite an in-memory layer stack, index 0 at the bottom.
    #[tracing::instrument(skip(self, layers), fields(layers = layers.len()))]
    pub fn blend_multiple_data(
        &self,
        layers: &[PixelBuffer],
        opts: &MultipleOpts,
    ) -> BlendResult<PixelBuffer> {
        let steps = resolve_plan(&self.registry, &opts.plan(), layers.len())?;
        self.install(|| composite_resolved(layers, &steps))
    }

    /// Decode `sources`, composite them and deliver the PNG to `output`.
    ///
    /// The plan is resolved and checked against the layer count before anything is read or
    /// written.
    #[tracing::instrument(skip(self, sources), fields(layers = sources.len()))]
    pub fn blend_multiple(
        &self,
        sources: &[Source],
        output: &Output,
        opts: &MultipleOpts,
        encode: EncodeOpts,
    ) -> BlendResult<Encoded> {
        let steps = resolve_plan(&self.registry, &opts.plan(), sources.len())?;
        self.install(|| {
            let layers = decode_all(sources)?;
            let out = composite_resolved(&layers, &steps)?;
            deliver(&out, output, encode)
        })
    }

    /// Process-wide capability descriptor.
    pub fn capabilities(&self) -> &'static CapabilityDescriptor {
        capabilities()
    }

    /// Capability descriptor as the eleven-key JSON object.
    pub fn module_constants(&self) -> serde_json::Value {
        capabilities().to_json()
    }

    /// Time every selected algorithm on one pair.
    #[tracing::instrument(skip(self, bottom, top, opts))]
    pub fn benchmark_pair(
        &self,
        bottom: &PixelBuffer,
        top: &PixelBuffer,
        opts: &BenchOpts,
    ) -> BenchmarkReport {
        self.install(|| benchmark_pair(&self.registry, bottom, top, opts))
    }

    /// Time full pipeline runs over `layers`, either per algorithm or for one `plan`.
    #[tracing::instrument(skip(self, layers, opts), fields(layers = layers.len()))]
    pub fn benchmark_stack(
        &self,
        layers: &[PixelBuffer],
        plan: Option<&AlgorithmPlan>,
        opts: &BenchOpts,
    ) -> BenchmarkReport {
        self.install(|| benchmark_stack(&self.registry, layers, plan, opts))
    }

    /// Read, blend and encode a pair for every algorithm × compression × filter.
    #[tracing::instrument(skip_all)]
    pub fn blend_images_benchmark_all(
        &self,
        bottom: &Source,
        top: &Source,
        opts: &BenchOpts,
    ) -> BenchmarkReport {
        let sources = [bottom.clone(), top.clone()];
        self.install(|| benchmark_sources(&self.registry, &sources, opts))
    }

    /// Read, blend and encode a stack for every algorithm × compression × filter.
    #[tracing::instrument(skip_all, fields(layers = sources.len()))]
    pub fn blend_multiple_benchmark_all(
        &self,
        sources: &[Source],
        opts: &BenchOpts,
    ) -> BenchmarkReport {
        self.install(|| benchmark_sources(&self.registry, sources, opts))
    }

    /// Composite the fixture set in `dir` over `background`.
    pub fn compose_fixtures(
        &self,
        dir: &Path,
        algorithm: &AlgorithmDescriptor,
        background: Background,
        encode: EncodeOpts,
    ) -> BlendResult<ComposeOutcome> {
        self.install(|| compose_fixtures(&self.registry, dir, algorithm, background, encode))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field(
                "threads",
                &self.pool.as_ref().map(|p| p.current_num_threads()),
            )
            .finish()
    }
}

fn build_thread_pool(threads: Option<usize>) -> BlendResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BlendError::Other(anyhow::anyhow!(
            "engine 'threads' must be >= 1 when set"
        )));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BlendError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/handle.rs"]
mod tests;
