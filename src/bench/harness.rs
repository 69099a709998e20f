//! Sweeps over algorithm variants, timing each run in isolation.
//!
//! A failing run becomes a [`BenchOutcome::Failed`] entry and the sweep moves on. Runs share no
//! state: every run resolves its own plan and decodes its own inputs.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bench::report::{BenchEntry, BenchOutcome, BenchmarkReport, StageTimings};
use crate::blend::descriptor::{AlgorithmDescriptor, AlgorithmPlan};
use crate::blend::registry::AlgorithmRegistry;
use crate::codec::png::{CompressionLevel, EncodeOpts, FilterStrategy, encode_png};
use crate::codec::source::{Source, decode_all};
use crate::compose::pipeline::composite;
use crate::foundation::error::BlendResult;
use crate::pixels::buffer::PixelBuffer;

/// Upper bounds on a sweep. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchBudget {
    /// Stop launching runs after this many.
    pub max_runs: Option<usize>,
    /// Stop launching runs once this much wall time has elapsed.
    pub max_wall: Option<Duration>,
}

/// What a sweep covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchOpts {
    /// Algorithms to run. `None` runs every registered algorithm.
    pub algorithms: Option<Vec<AlgorithmDescriptor>>,
    /// Compression levels for sweeps that encode. Default: all.
    pub compressions: Vec<CompressionLevel>,
    /// Filters for sweeps that encode. Default: all.
    pub filters: Vec<FilterStrategy>,
    /// Keep each run's composited buffer in the report.
    pub keep_outputs: bool,
    /// Run/time limits.
    pub budget: BenchBudget,
}

impl Default for BenchOpts {
    fn default() -> Self {
        Self {
            algorithms: None,
            compressions: CompressionLevel::ALL.to_vec(),
            filters: FilterStrategy::ALL.to_vec(),
            keep_outputs: false,
            budget: BenchBudget::default(),
        }
    }
}

impl BenchOpts {
    fn algorithms(&self, registry: &AlgorithmRegistry) -> Vec<AlgorithmDescriptor> {
        match &self.algorithms {
            Some(list) => list.clone(),
            None => registry
                .names()
                .into_iter()
                .map(AlgorithmDescriptor::named)
                .collect(),
        }
    }
}

struct Sweep {
    started: Instant,
    budget: BenchBudget,
    report: BenchmarkReport,
}

impl Sweep {
    fn new(budget: BenchBudget) -> Self {
        Self {
            started: Instant::now(),
            budget,
            report: BenchmarkReport::default(),
        }
    }

    fn exhausted(&mut self) -> bool {
        let runs = self.report.entries.len();
        let over_runs = self.budget.max_runs.is_some_and(|max| runs >= max);
        let over_wall = self
            .budget
            .max_wall
            .is_some_and(|max| self.started.elapsed() >= max);
        if over_runs || over_wall {
            if !self.report.truncated {
                warn!(runs, "benchmark budget exhausted, stopping sweep");
            }
            self.report.truncated = true;
        }
        self.report.truncated
    }

    fn record(
        &mut self,
        algorithm: String,
        encode: Option<EncodeOpts>,
        result: BlendResult<(StageTimings, PixelBuffer)>,
        keep_output: bool,
    ) {
        let label = match encode {
            Some(e) => format!("{algorithm}/{}/{}", e.compression, e.filter),
            None => algorithm.clone(),
        };
        let outcome = match result {
            Ok((timings, output)) => BenchOutcome::Ok {
                timings,
                output: keep_output.then_some(output),
            },
            Err(err) => {
                warn!(run = %label, error = %err, "benchmark run failed");
                BenchOutcome::failed(&err)
            }
        };
        self.report.entries.push(BenchEntry {
            label,
            algorithm,
            compression: encode.map(|e| e.compression),
            filter: encode.map(|e| e.filter),
            outcome,
        });
    }
}

fn timed<T>(slot: &mut Duration, f: impl FnOnce() -> BlendResult<T>) -> BlendResult<T> {
    let start = Instant::now();
    let out = f();
    *slot += start.elapsed();
    out
}

/// Blend `top` onto `bottom` once per algorithm.
pub fn benchmark_pair(
    registry: &AlgorithmRegistry,
    bottom: &PixelBuffer,
    top: &PixelBuffer,
    opts: &BenchOpts,
) -> BenchmarkReport {
    let layers = [bottom.clone(), top.clone()];
    benchmark_stack(registry, &layers, None, opts)
}

/// Composite `layers` once per algorithm (uniform plans), or once with `plan` when given.
pub fn benchmark_stack(
    registry: &AlgorithmRegistry,
    layers: &[PixelBuffer],
    plan: Option<&AlgorithmPlan>,
    opts: &BenchOpts,
) -> BenchmarkReport {
    let plans = match plan {
        Some(p) => vec![p.clone()],
        None => opts
            .algorithms(registry)
            .into_iter()
            .map(AlgorithmPlan::Uniform)
            .collect(),
    };

    let mut sweep = Sweep::new(opts.budget);
    for plan in plans {
        if sweep.exhausted() {
            break;
        }
        let mut timings = StageTimings::default();
        let result = timed(&mut timings.blend, || composite(registry, layers, &plan));
        sweep.record(
            plan.label(),
            None,
            result.map(|out| (timings, out)),
            opts.keep_outputs,
        );
    }
    sweep.report
}

/// Decode `sources`, composite and encode them, for every algorithm × compression × filter.
///
/// Each run decodes the sources afresh so read time is part of every measurement.
pub fn benchmark_sources(
    registry: &AlgorithmRegistry,
    sources: &[Source],
    opts: &BenchOpts,
) -> BenchmarkReport {
    let mut sweep = Sweep::new(opts.budget);
    'sweep: for desc in opts.algorithms(registry) {
        let plan = AlgorithmPlan::Uniform(desc);
        for &compression in &opts.compressions {
            for &filter in &opts.filters {
                if sweep.exhausted() {
                    break 'sweep;
                }
                let encode = EncodeOpts {
                    compression,
                    filter,
                };
                let result = run_sources(registry, sources, &plan, encode);
                sweep.record(plan.label(), Some(encode), result, opts.keep_outputs);
            }
        }
    }
    sweep.report
}

fn run_sources(
    registry: &AlgorithmRegistry,
    sources: &[Source],
    plan: &AlgorithmPlan,
    encode: EncodeOpts,
) -> BlendResult<(StageTimings, PixelBuffer)> {
    let mut timings = StageTimings::default();
    let layers = timed(&mut timings.read, || decode_all(sources))?;
    let out = timed(&mut timings.blend, || composite(registry, &layers, plan))?;
    timed(&mut timings.write, || encode_png(&out, encode))?;
    Ok((timings, out))
}

#[cfg(test)]
#[path = "../../tests/unit/bench/harness.rs"]
mod tests;
