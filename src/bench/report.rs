use std::fmt;
use std::ops::Add;
use std::time::Duration;

use serde::Serialize;

use crate::codec::png::{CompressionLevel, FilterStrategy};
use crate::foundation::error::BlendError;
use crate::pixels::buffer::PixelBuffer;

/// Wall-clock time spent in each stage of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    /// Decoding inputs.
    pub read: Duration,
    /// Compositing.
    pub blend: Duration,
    /// Encoding the result.
    pub write: Duration,
}

impl StageTimings {
    /// Sum of all stages.
    pub fn total(&self) -> Duration {
        self.read + self.blend + self.write
    }
}

impl Add for StageTimings {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            read: self.read + other.read,
            blend: self.blend + other.blend,
            write: self.write + other.write,
        }
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl fmt::Display for StageTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}ms (blend {:.2}ms, read {:.2}ms, write {:.2}ms)",
            ms(self.total()),
            ms(self.blend),
            ms(self.read),
            ms(self.write)
        )
    }
}

/// Result of one benchmark run.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BenchOutcome {
    /// The run completed.
    Ok {
        /// Stage timings.
        timings: StageTimings,
        /// Composited result, kept only when requested.
        #[serde(skip)]
        output: Option<PixelBuffer>,
    },
    /// The run failed; the sweep carried on.
    Failed {
        /// [`BlendError::kind`] tag.
        kind: &'static str,
        /// Error message.
        message: String,
    },
}

impl BenchOutcome {
    pub(crate) fn failed(err: &BlendError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One row of a [`BenchmarkReport`].
#[derive(Clone, Debug, Serialize)]
pub struct BenchEntry {
    /// Unique label within the report.
    pub label: String,
    /// Algorithm or plan label.
    pub algorithm: String,
    /// Compression used for the write stage, if any.
    pub compression: Option<CompressionLevel>,
    /// Filter used for the write stage, if any.
    pub filter: Option<FilterStrategy>,
    /// What happened.
    pub outcome: BenchOutcome,
}

impl BenchEntry {
    /// Timings of a successful run.
    pub fn timings(&self) -> Option<&StageTimings> {
        match &self.outcome {
            BenchOutcome::Ok { timings, .. } => Some(timings),
            BenchOutcome::Failed { .. } => None,
        }
    }

    /// Kept output of a successful run.
    pub fn output(&self) -> Option<&PixelBuffer> {
        match &self.outcome {
            BenchOutcome::Ok { output, .. } => output.as_ref(),
            BenchOutcome::Failed { .. } => None,
        }
    }

    /// Whether the run failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, BenchOutcome::Failed { .. })
    }
}

/// Comparative timings for a set of runs.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BenchmarkReport {
    /// Runs in execution order.
    pub entries: Vec<BenchEntry>,
    /// Set when the budget stopped the sweep early.
    pub truncated: bool,
}

impl BenchmarkReport {
    /// Entry with the given label.
    pub fn get(&self, label: &str) -> Option<&BenchEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Successful runs.
    pub fn successes(&self) -> impl Iterator<Item = &BenchEntry> {
        self.entries.iter().filter(|e| !e.is_failed())
    }

    /// Failed runs.
    pub fn failures(&self) -> impl Iterator<Item = &BenchEntry> {
        self.entries.iter().filter(|e| e.is_failed())
    }

    /// Successful run with the lowest total time.
    pub fn fastest(&self) -> Option<&BenchEntry> {
        self.successes()
            .min_by_key(|e| e.timings().map(StageTimings::total))
    }

    /// Sum of all successful runs.
    pub fn total(&self) -> StageTimings {
        self.successes()
            .filter_map(BenchEntry::timings)
            .fold(StageTimings::default(), |acc, t| acc + *t)
    }
}

fn opt_name<T: fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20}{:<20}{:<20}{:<20}",
            "Algorithm", "Compression", "Filter", "Times"
        )?;
        for e in &self.entries {
            let times = match &e.outcome {
                BenchOutcome::Ok { timings, .. } => timings.to_string(),
                BenchOutcome::Failed { kind, message } => format!("FAILED {kind}: {message}"),
            };
            writeln!(
                f,
                "{:<20}{:<20}{:<20}{}",
                e.algorithm,
                opt_name(e.compression),
                opt_name(e.filter),
                times
            )?;
        }
        writeln!(f)?;
        write!(f, "Total time: {}", self.total())?;
        if self.truncated {
            write!(f, " (truncated by budget)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bench/report.rs"]
mod tests;
