//! Benchmark harness for a test-automation engine.
//!
//! Times named operations (parsing, suite building, execution, model work,
//! memory use), aggregates repeated runs, and renders the results as a
//! console table or a JSON document. See [`runner::BenchmarkSuite`] for the
//! suite lifecycle contract and [`suites`] for the shipped benchmarks.

use clap::ValueEnum;

pub mod alloc;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod metrics;
pub mod registry;
pub mod report;
pub mod runner;
pub mod suites;

// Peak-memory measurement needs the tracking allocator installed for the
// whole process; it is a passthrough until a collector enables tracing.
#[global_allocator]
static GLOBAL_ALLOC: alloc::TrackingAllocator = alloc::TrackingAllocator::new();

/// Benchmark suite selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SuiteKind {
    /// Suite and resource file parsing.
    Parsing,
    /// Suite building and quiet test execution.
    Execution,
    /// Model construction, traversal, and result loading.
    Model,
    /// Peak heap and allocation growth.
    Memory,
}

impl SuiteKind {
    /// Every suite, in the order `run` executes them by default.
    pub fn all() -> [SuiteKind; 4] {
        [
            SuiteKind::Parsing,
            SuiteKind::Execution,
            SuiteKind::Model,
            SuiteKind::Memory,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteKind::Parsing => "parsing",
            SuiteKind::Execution => "execution",
            SuiteKind::Model => "model",
            SuiteKind::Memory => "memory",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SuiteKind::Parsing => "suite and resource file parsing",
            SuiteKind::Execution => "suite building and quiet execution",
            SuiteKind::Model => "model construction, traversal, result loading",
            SuiteKind::Memory => "peak heap usage and allocation growth",
        }
    }
}
