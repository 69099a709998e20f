use serde::{Deserialize, Serialize};

use crate::blend::descriptor::{AlgorithmDescriptor, AlgorithmPlan};
use crate::blend::params::UnknownParamPolicy;

/// Algorithm used when a call names none.
pub const DEFAULT_ALGORITHM: &str = "multiplicative";

/// Engine-wide settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Worker threads for per-pixel work. `None` uses rayon's global pool; `Some(n)` builds a
    /// dedicated pool and must be at least 1.
    pub threads: Option<usize>,
    /// Treatment of parameter keys an algorithm does not declare.
    pub unknown_params: UnknownParamPolicy,
}

/// Options for two-layer blends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendOpts {
    /// Algorithm; `multiplicative` when unset.
    pub algorithm: Option<AlgorithmDescriptor>,
}

impl BlendOpts {
    /// Options naming `algorithm`.
    pub fn algorithm(algorithm: impl Into<AlgorithmDescriptor>) -> Self {
        Self {
            algorithm: Some(algorithm.into()),
        }
    }

    /// Uniform plan for this blend.
    pub fn plan(&self) -> AlgorithmPlan {
        AlgorithmPlan::Uniform(
            self.algorithm
                .clone()
                .unwrap_or_else(|| AlgorithmDescriptor::named(DEFAULT_ALGORITHM)),
        )
    }
}

/// Options for N-layer blends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleOpts {
    /// Uniform algorithm; `multiplicative` when neither field is set.
    pub algorithm: Option<AlgorithmDescriptor>,
    /// Per-step algorithms, one per compositing step. Takes precedence over `algorithm`.
    pub algorithms: Option<Vec<AlgorithmDescriptor>>,
}

impl MultipleOpts {
    /// Uniform options.
    pub fn uniform(algorithm: impl Into<AlgorithmDescriptor>) -> Self {
        Self {
            algorithm: Some(algorithm.into()),
            algorithms: None,
        }
    }

    /// Per-step options.
    pub fn per_step<D: Into<AlgorithmDescriptor>>(steps: impl IntoIterator<Item = D>) -> Self {
        Self {
            algorithm: None,
            algorithms: Some(steps.into_iter().map(Into::into).collect()),
        }
    }

    /// The plan these options describe.
    pub fn plan(&self) -> AlgorithmPlan {
        match &self.algorithms {
            Some(steps) => AlgorithmPlan::PerStep(steps.clone()),
            None => BlendOpts {
                algorithm: self.algorithm.clone(),
            }
            .plan(),
        }
    }
}

impl From<AlgorithmPlan> for MultipleOpts {
    fn from(plan: AlgorithmPlan) -> Self {
        match plan {
            AlgorithmPlan::Uniform(desc) => Self::uniform(desc),
            AlgorithmPlan::PerStep(steps) => Self::per_step(steps),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/opts.rs"]
mod tests;
