//! Fixture-set composition: a four-layer shoe over a chosen background.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bench::report::StageTimings;
use crate::blend::descriptor::{AlgorithmDescriptor, AlgorithmPlan};
use crate::blend::registry::{AlgorithmRegistry, apply_step};
use crate::codec::png::{EncodeOpts, encode_png, write_bytes};
use crate::codec::source::{Source, decode_all};
use crate::compose::pipeline::composite;
use crate::foundation::error::{BlendError, BlendResult};

/// Foreground layers of the fixture set, bottom first.
pub const FIXTURE_LAYERS: [&str; 4] = ["sole", "back", "front", "shoelace"];

/// Background image placed under the composited foreground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// Transparent.
    #[default]
    Alpha,
    /// Solid white.
    White,
    /// Solid blue.
    Blue,
    /// Textured.
    Texture,
}

impl Background {
    /// Every background.
    pub const ALL: [Self; 4] = [Self::Alpha, Self::White, Self::Blue, Self::Texture];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::White => "white",
            Self::Blue => "blue",
            Self::Texture => "texture",
        }
    }

    /// File stem of the background image, e.g. `background_alpha`.
    pub fn file_stem(self) -> String {
        format!("background_{}", self.as_str())
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Background {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BlendError::invalid_option(format!("unknown background '{s}'")))
    }
}

/// Where a fixture composition went and how long each stage took.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeOutcome {
    /// Written PNG.
    pub path: PathBuf,
    /// Stage timings.
    pub timings: StageTimings,
}

/// Composite the fixture set found in `dir` and write `result_<algorithm>_<bg>_<c>_<f>.png`
/// next to it.
///
/// The foreground layers are folded with `algorithm`, then the result is blended onto the
/// background with the same algorithm.
pub fn compose_fixtures(
    registry: &AlgorithmRegistry,
    dir: &Path,
    algorithm: &AlgorithmDescriptor,
    background: Background,
    encode: EncodeOpts,
) -> BlendResult<ComposeOutcome> {
    let step = registry.resolve(algorithm)?;
    let mut timings = StageTimings::default();

    let start = Instant::now();
    let sources: Vec<Source> = FIXTURE_LAYERS
        .iter()
        .map(|name| format!("{name}.png"))
        .chain(std::iter::once(format!("{}.png", background.file_stem())))
        .map(|file| Source::Path(dir.join(file)))
        .collect();
    let mut layers = decode_all(&sources)?;
    timings.read = start.elapsed();

    let start = Instant::now();
    let backdrop = layers.pop().ok_or(BlendError::EmptyStack)?;
    let foreground = composite(registry, &layers, &AlgorithmPlan::Uniform(algorithm.clone()))?;
    let result = apply_step(&step, &backdrop, &foreground)?;
    timings.blend = start.elapsed();

    let start = Instant::now();
    let path = dir.join(format!(
        "result_{}_{}_{}_{}.png",
        algorithm.name(),
        background,
        encode.compression,
        encode.filter
    ));
    let bytes = encode_png(&result, encode)?;
    write_bytes(&path, &bytes)?;
    timings.write = start.elapsed();

    info!(path = %path.display(), %timings, "composed fixture set");
    Ok(ComposeOutcome { path, timings })
}

#[cfg(test)]
#[path = "../../tests/unit/bench/compose.rs"]
mod tests;
