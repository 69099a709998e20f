use std::path::PathBuf;

/// Convenience result type used across blendstack.
pub type BlendResult<T> = Result<T, BlendError>;

/// Error taxonomy surfaced by every engine operation.
///
/// Each variant carries enough context (algorithm name, dimensions, plan lengths, paths) for a
/// caller to act on it. Nothing in the registry or pipeline swallows these; only the benchmark
/// harness records them per run instead of propagating.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// The algorithm name is not registered.
    #[error("unknown algorithm: '{name}'")]
    UnknownAlgorithm {
        /// Name as supplied by the caller.
        name: String,
    },

    /// A parameter is missing, has the wrong type, or is not accepted by the algorithm.
    #[error("invalid algorithm params: '{algorithm}': {reason}")]
    InvalidAlgorithmParams {
        /// Algorithm the parameters were supplied for.
        algorithm: String,
        /// What is wrong with them.
        reason: String,
    },

    /// The two buffers of a blend step do not have the same size.
    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        /// Size of the bottom (accumulated) layer.
        expected: (u32, u32),
        /// Size of the offending top layer.
        actual: (u32, u32),
    },

    /// A per-step plan does not contain exactly one descriptor per compositing step.
    #[error("plan length mismatch: expected {expected} algorithm(s), got {actual}")]
    PlanLengthMismatch {
        /// `layers - 1`.
        expected: usize,
        /// Length of the supplied plan.
        actual: usize,
    },

    /// Compositing was requested over zero layers.
    #[error("empty stack: at least one layer is required")]
    EmptyStack,

    /// Raw pixel data disagrees with its declared dimensions.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Encoded bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Compression or filter value outside the supported set.
    #[error("invalid encoding option: {0}")]
    InvalidEncodingOption(String),

    /// Filesystem failure while reading a source or writing an output.
    #[error("io error: '{}': {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::UnknownAlgorithm`] value.
    pub fn unknown_algorithm(name: impl Into<String>) -> Self {
        Self::UnknownAlgorithm { name: name.into() }
    }

    /// Build a [`BlendError::InvalidAlgorithmParams`] value.
    pub fn invalid_params(algorithm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAlgorithmParams {
            algorithm: algorithm.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`BlendError::InvalidBuffer`] value.
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Build a [`BlendError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BlendError::InvalidEncodingOption`] value.
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidEncodingOption(msg.into())
    }

    /// Build a [`BlendError::Io`] value.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short, stable tag naming the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownAlgorithm { .. } => "UnknownAlgorithm",
            Self::InvalidAlgorithmParams { .. } => "InvalidAlgorithmParams",
            Self::DimensionMismatch { .. } => "DimensionMismatch",
            Self::PlanLengthMismatch { .. } => "PlanLengthMismatch",
            Self::EmptyStack => "EmptyStack",
            Self::InvalidBuffer(_) => "InvalidBuffer",
            Self::Decode(_) => "DecodeError",
            Self::InvalidEncodingOption(_) => "InvalidEncodingOption",
            Self::Io { .. } => "IOError",
            Self::Other(_) => "Other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
