//! Algorithm registry: by-name lookup, descriptor resolution, and buffer-level application.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use crate::blend::algorithms::builtins;
use crate::blend::descriptor::AlgorithmDescriptor;
use crate::blend::params::{ParamSpec, ResolvedParams, UnknownParamPolicy, resolve_params};
use crate::foundation::error::{BlendError, BlendResult};
use crate::pixels::buffer::{PixelBuffer, Rgba8};

/// Per-pixel function produced by an algorithm once its parameters are known.
pub type PixelKernel = Arc<dyn Fn(Rgba8, Rgba8) -> Rgba8 + Send + Sync>;

/// A named pixel-combination function.
///
/// Implementations must be pure: the same `(bottom, top)` pair and parameters always produce the
/// same pixel. The registry relies on this to split work across rows.
pub trait BlendAlgorithm: Send + Sync {
    /// Registry key.
    fn name(&self) -> &'static str;

    /// Accepted parameters. Empty by default.
    fn params(&self) -> &[ParamSpec] {
        &[]
    }

    /// Build the per-pixel function for validated `params`.
    fn kernel(&self, params: &ResolvedParams) -> BlendResult<PixelKernel>;
}

/// A descriptor bound to its algorithm, parameters checked, kernel ready to run.
#[derive(Clone)]
pub struct ResolvedStep {
    algorithm: Arc<dyn BlendAlgorithm>,
    params: ResolvedParams,
    kernel: PixelKernel,
}

impl ResolvedStep {
    /// Algorithm name.
    pub fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Parameters after validation and defaulting.
    pub fn params(&self) -> &ResolvedParams {
        &self.params
    }

    /// Blend a single pixel pair.
    pub fn blend_pixel(&self, bottom: Rgba8, top: Rgba8) -> Rgba8 {
        (self.kernel)(bottom, top)
    }
}

impl fmt::Debug for ResolvedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedStep")
            .field("name", &self.name())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry holding blend algorithms for lookup by name.
#[derive(Clone)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Arc<dyn BlendAlgorithm>>,
    unknown_params: UnknownParamPolicy,
}

impl AlgorithmRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            algorithms: HashMap::new(),
            unknown_params: UnknownParamPolicy::default(),
        }
    }

    /// Create a registry with all built-in algorithms registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for algorithm in builtins() {
            registry.register(algorithm);
        }
        info!(
            count = registry.algorithms.len(),
            "registered built-in blend algorithms"
        );
        registry
    }

    /// Set how undeclared parameter keys are treated during resolution.
    pub fn with_unknown_params(mut self, policy: UnknownParamPolicy) -> Self {
        self.unknown_params = policy;
        self
    }

    /// Current policy for undeclared parameter keys.
    pub fn unknown_params(&self) -> UnknownParamPolicy {
        self.unknown_params
    }

    /// Register an algorithm. Overwrites any previous algorithm with the same name.
    pub fn register(&mut self, algorithm: Arc<dyn BlendAlgorithm>) {
        self.algorithms
            .insert(algorithm.name().to_string(), algorithm);
    }

    /// Register an algorithm, failing if the name is already taken.
    pub fn try_register(&mut self, algorithm: Arc<dyn BlendAlgorithm>) -> BlendResult<()> {
        let name = algorithm.name();
        if self.algorithms.contains_key(name) {
            return Err(BlendError::Other(anyhow::anyhow!(
                "algorithm '{name}' is already registered"
            )));
        }
        self.register(algorithm);
        Ok(())
    }

    /// Look up an algorithm by name.
    pub fn get(&self, name: &str) -> Option<&dyn BlendAlgorithm> {
        self.algorithms.get(name).map(|a| a.as_ref())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered algorithms.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Bind `desc` to its algorithm and validate its parameters.
    pub fn resolve(&self, desc: &AlgorithmDescriptor) -> BlendResult<ResolvedStep> {
        let algorithm = self
            .algorithms
            .get(desc.name())
            .cloned()
            .ok_or_else(|| BlendError::unknown_algorithm(desc.name()))?;
        let params = resolve_params(
            algorithm.name(),
            algorithm.params(),
            desc.params(),
            self.unknown_params,
        )?;
        let kernel = algorithm.kernel(&params)?;
        Ok(ResolvedStep {
            algorithm,
            params,
            kernel,
        })
    }

    /// Resolve `desc` and blend `top` onto `bottom`.
    pub fn apply(
        &self,
        desc: &AlgorithmDescriptor,
        bottom: &PixelBuffer,
        top: &PixelBuffer,
    ) -> BlendResult<PixelBuffer> {
        let step = self.resolve(desc)?;
        apply_step(&step, bottom, top)
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.names())
            .field("unknown_params", &self.unknown_params)
            .finish()
    }
}

/// Blend `top` onto `bottom` with an already resolved step, producing a new buffer.
///
/// Rows are processed in parallel on the current rayon pool.
pub fn apply_step(
    step: &ResolvedStep,
    bottom: &PixelBuffer,
    top: &PixelBuffer,
) -> BlendResult<PixelBuffer> {
    if !bottom.same_size(top) {
        return Err(BlendError::DimensionMismatch {
            expected: bottom.dimensions(),
            actual: top.dimensions(),
        });
    }

    let stride = bottom.stride();
    let mut out = vec![0u8; bottom.as_bytes().len()];
    out.par_chunks_mut(stride)
        .zip(bottom.as_bytes().par_chunks(stride))
        .zip(top.as_bytes().par_chunks(stride))
        .for_each(|((dst, b), t)| {
            for ((d, b), t) in dst
                .chunks_exact_mut(4)
                .zip(b.chunks_exact(4))
                .zip(t.chunks_exact(4))
            {
                let px = step.blend_pixel([b[0], b[1], b[2], b[3]], [t[0], t[1], t[2], t[3]]);
                d.copy_from_slice(&px);
            }
        });

    PixelBuffer::from_rgba8(bottom.width(), bottom.height(), out)
}

#[cfg(test)]
#[path = "../../tests/unit/blend/registry.rs"]
mod tests;
