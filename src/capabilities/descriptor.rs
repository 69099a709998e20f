use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::blend::algorithms::BUILTIN_ALGORITHMS;
use crate::codec::png::{CompressionLevel, FilterStrategy};

/// Build and capability metadata, serialized with the upper-case key names front-ends expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CapabilityDescriptor {
    /// Names of the built-in blend algorithms.
    pub algorithms: Vec<String>,
    /// Build date, `"Mon DD YYYY"`.
    pub compilation_date: String,
    /// Build time, `"HH:MM:SS"` UTC.
    pub compilation_time: String,
    /// Compiler name.
    pub compiler: String,
    /// Compiler version.
    pub compiler_version: String,
    /// Accepted compression names.
    pub compression_types: Vec<String>,
    /// Enabled engine features.
    pub features: Vec<String>,
    /// Accepted filter names.
    pub filter_types: Vec<String>,
    /// PNG codec library and version.
    pub libpng_version: String,
    /// Pointer width of the target.
    pub platform_cpu_bits: u32,
    /// Crate version.
    pub version: String,
}

impl CapabilityDescriptor {
    fn build() -> Self {
        let mut features = vec!["cpu".to_string(), "rayon".to_string()];
        if cfg!(feature = "async") {
            features.push("async".to_string());
        }

        Self {
            algorithms: BUILTIN_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
            compilation_date: env!("BLENDSTACK_COMPILATION_DATE").to_string(),
            compilation_time: env!("BLENDSTACK_COMPILATION_TIME").to_string(),
            compiler: "rustc".to_string(),
            compiler_version: env!("BLENDSTACK_COMPILER_VERSION").to_string(),
            compression_types: CompressionLevel::ALL
                .iter()
                .map(|c| c.to_string())
                .collect(),
            features,
            filter_types: FilterStrategy::ALL.iter().map(|f| f.to_string()).collect(),
            libpng_version: "image-0.25".to_string(),
            platform_cpu_bits: usize::BITS,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// JSON object with exactly the eleven capability keys.
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing a struct of strings, lists and integers cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

static CAPABILITIES: OnceLock<CapabilityDescriptor> = OnceLock::new();

/// The process-wide descriptor, built on first use.
pub fn capabilities() -> &'static CapabilityDescriptor {
    CAPABILITIES.get_or_init(CapabilityDescriptor::build)
}

#[cfg(test)]
#[path = "../../tests/unit/capabilities/descriptor.rs"]
mod tests;
