use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blend::params::{BlendParams, ParamValue};

/// Names one blend algorithm, optionally with parameters.
///
/// JSON form is either a bare string (`"alpha"`) or an object
/// (`{"algorithm": "mask_top", "params": {"factor": 0.5}}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmDescriptor {
    /// Algorithm with default parameters.
    Named(String),
    /// Algorithm with explicit parameters.
    Parametrized {
        /// Algorithm name.
        algorithm: String,
        /// Parameter map; validated against the algorithm's schema at resolution.
        #[serde(default)]
        params: BlendParams,
    },
}

impl AlgorithmDescriptor {
    /// Descriptor without parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Descriptor with parameters.
    pub fn with_params<K, V>(name: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        Self::Parametrized {
            algorithm: name.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Algorithm name.
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Parametrized { algorithm, .. } => algorithm,
        }
    }

    /// Supplied parameters, if any.
    pub fn params(&self) -> Option<&BlendParams> {
        match self {
            Self::Named(_) => None,
            Self::Parametrized { params, .. } => Some(params),
        }
    }
}

impl From<&str> for AlgorithmDescriptor {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for AlgorithmDescriptor {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a layer stack is reduced: one descriptor for every step, or one per step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmPlan {
    /// Same algorithm for every pairwise step.
    Uniform(AlgorithmDescriptor),
    /// Step `i` blends `layers[i + 1]` onto the accumulator with `steps[i]`.
    PerStep(Vec<AlgorithmDescriptor>),
}

impl AlgorithmPlan {
    /// Uniform plan.
    pub fn uniform(desc: impl Into<AlgorithmDescriptor>) -> Self {
        Self::Uniform(desc.into())
    }

    /// Per-step plan.
    pub fn per_step<D: Into<AlgorithmDescriptor>>(steps: impl IntoIterator<Item = D>) -> Self {
        Self::PerStep(steps.into_iter().map(Into::into).collect())
    }

    /// Descriptors in step order; a uniform plan yields its single descriptor.
    pub fn descriptors(&self) -> Vec<&AlgorithmDescriptor> {
        match self {
            Self::Uniform(desc) => vec![desc],
            Self::PerStep(steps) => steps.iter().collect(),
        }
    }

    /// Short label for reports (`alpha` or `alpha,multiplicative,...`).
    pub fn label(&self) -> String {
        match self {
            Self::Uniform(desc) => desc.name().to_string(),
            Self::PerStep(steps) => steps
                .iter()
                .map(AlgorithmDescriptor::name)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<AlgorithmDescriptor> for AlgorithmPlan {
    fn from(desc: AlgorithmDescriptor) -> Self {
        Self::Uniform(desc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/descriptor.rs"]
mod tests;
