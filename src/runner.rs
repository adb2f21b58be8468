//! Benchmark suite contract and the measured-execution loop.
//!
//! A suite declares its named operations up front as an ordered list (no
//! runtime discovery), implements `setup`/`teardown`, and is driven by
//! [`run`]: setup once, N iterations over every operation, per-name
//! aggregation, teardown on every exit path.

use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::metrics::{BenchmarkResult, MetricsCollector};
use crate::registry::Registry;

/// One named timed operation of a benchmark suite.
///
/// The body receives the suite state and the placeholder result registered
/// under the operation's name before timing starts. Metadata written to the
/// placeholder's `extra` survives into the measured sample, and a peak
/// memory figure supplied by the body is adopted when automatic tracking is
/// off.
pub struct Operation<S> {
    pub name: String,
    pub track_memory: bool,
    pub func: fn(&mut S, &mut BenchmarkResult) -> Result<()>,
}

impl<S> Operation<S> {
    pub fn new(name: impl Into<String>, func: fn(&mut S, &mut BenchmarkResult) -> Result<()>) -> Self {
        Self {
            name: name.into(),
            track_memory: false,
            func,
        }
    }

    /// Same as [`Operation::new`] but with allocation tracking enabled for
    /// the timed region.
    pub fn tracked(
        name: impl Into<String>,
        func: fn(&mut S, &mut BenchmarkResult) -> Result<()>,
    ) -> Self {
        Self {
            name: name.into(),
            track_memory: true,
            func,
        }
    }
}

/// Contract every benchmark suite implements.
///
/// ```
/// use suitebench::error::Result;
/// use suitebench::metrics::BenchmarkResult;
/// use suitebench::runner::{self, BenchmarkSuite, Operation};
///
/// struct Squares {
///     data: Vec<u64>,
/// }
///
/// impl BenchmarkSuite for Squares {
///     fn name(&self) -> &'static str {
///         "squares"
///     }
///
///     fn setup(&mut self) -> Result<()> {
///         self.data = (0..1000u64).collect();
///         Ok(())
///     }
///
///     fn teardown(&mut self) -> Result<()> {
///         self.data.clear();
///         Ok(())
///     }
///
///     fn operations() -> Vec<Operation<Self>> {
///         vec![Operation::new("sum of squares", |suite, _result| {
///             let _: u64 = suite.data.iter().map(|v| v * v).sum();
///             Ok(())
///         })]
///     }
/// }
///
/// let mut suite = Squares { data: Vec::new() };
/// let registry = runner::run(&mut suite).unwrap();
/// assert!(registry.get("sum of squares").is_some());
/// ```
pub trait BenchmarkSuite {
    /// Short identifier used for logging and CLI listings.
    fn name(&self) -> &'static str;

    /// Prepare state and resources. Called exactly once per [`run`].
    fn setup(&mut self) -> Result<()>;

    /// Release resources acquired in `setup`. Called exactly once per
    /// [`run`], on every exit path.
    fn teardown(&mut self) -> Result<()>;

    /// The ordered list of timed operations. Declared explicitly so the
    /// execution order is deterministic.
    fn operations() -> Vec<Operation<Self>>
    where
        Self: Sized;

    /// How many times each operation runs per [`run`] call.
    fn iterations(&self) -> usize {
        1
    }
}

/// Execute a suite: setup, N iterations over every declared operation,
/// per-name aggregation, teardown.
///
/// Teardown runs exactly once no matter how the running phase exits. When
/// setup or an operation fails, that error propagates after teardown
/// completes; a teardown failure during unwind is dropped in favor of the
/// original error. On the success path a teardown failure propagates.
pub fn run<S: BenchmarkSuite>(suite: &mut S) -> Result<Registry> {
    info!(suite = suite.name(), "running benchmark suite");
    let outcome = execute(suite);
    let teardown = suite.teardown();
    match outcome {
        Err(err) => Err(err),
        Ok(registry) => {
            teardown?;
            Ok(registry)
        }
    }
}

fn execute<S: BenchmarkSuite>(suite: &mut S) -> Result<Registry> {
    suite.setup()?;

    let operations = S::operations();
    let iterations = suite.iterations().max(1);
    let mut registry = Registry::new();
    // Samples grouped by operation name, in encounter order. Declaring two
    // operations under one name pools their samples into one aggregate.
    let mut groups: Vec<(String, Vec<BenchmarkResult>)> = Vec::new();

    for iteration in 0..iterations {
        debug!(suite = suite.name(), iteration, "iteration start");
        for op in &operations {
            let sample = run_operation(suite, op, &mut registry)?;
            match groups.iter_mut().find(|(name, _)| *name == op.name) {
                Some((_, group)) => group.push(sample),
                None => groups.push((op.name.clone(), vec![sample])),
            }
        }
    }

    for (_, group) in groups {
        let aggregated = BenchmarkResult::aggregate(group)?;
        debug!(result = %aggregated, "aggregated");
        registry.insert(aggregated);
    }

    Ok(registry)
}

fn run_operation<S: BenchmarkSuite>(
    suite: &mut S,
    op: &Operation<S>,
    registry: &mut Registry,
) -> Result<BenchmarkResult> {
    // Register the placeholder before timing starts so the operation body
    // can enrich it.
    registry.insert(BenchmarkResult::placeholder(&op.name));

    let mut collector = MetricsCollector::new(op.track_memory);
    collector.start();
    let body_outcome = match registry.get_mut(&op.name) {
        Some(slot) => (op.func)(suite, slot),
        None => Err(BenchError::InvalidState(format!(
            "placeholder for {:?} vanished from the registry",
            op.name
        ))),
    };
    // Stop unconditionally so the allocation tracer is released even when
    // the body failed.
    let mut sample = collector.stop(&op.name)?;
    body_outcome?;

    if let Some(placeholder) = registry.get(&op.name) {
        sample.extra = placeholder.extra.clone();
        if sample.peak_memory_bytes.is_none() {
            sample.peak_memory_bytes = placeholder.peak_memory_bytes;
        }
    }
    registry.insert(sample.clone());
    Ok(sample)
}
