//! Benchmark harness and timing reports.

/// Fixture-set composition used by the `compose` command.
pub mod compose;
/// Algorithm sweeps.
pub mod harness;
/// Report types and table rendering.
pub mod report;
