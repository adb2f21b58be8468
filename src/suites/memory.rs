//! Memory benchmarks.
//!
//! Tracks peak heap allocation while the engine parses and executes the
//! fixture suite, using the crate's process-wide allocation tracer. One
//! operation drives the tracer from its own body to report net allocation
//! growth across a full suite run, supplying the figure through the
//! placeholder instead of automatic tracking.

use std::path::PathBuf;

use serde_json::json;

use crate::alloc::AllocTracer;
use crate::engine;
use crate::error::Result;
use crate::fixtures;
use crate::runner::{BenchmarkSuite, Operation};

use super::FixtureDir;

pub struct MemorySuite {
    iterations: usize,
    dir: FixtureDir,
}

impl MemorySuite {
    pub fn new(iterations: usize, suite_dir: Option<PathBuf>) -> Self {
        Self {
            iterations,
            dir: FixtureDir::new(suite_dir),
        }
    }
}

impl BenchmarkSuite for MemorySuite {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn setup(&mut self) -> Result<()> {
        self.dir.prepare(fixtures::write_memory_fixture)
    }

    fn teardown(&mut self) -> Result<()> {
        self.dir.cleanup();
        Ok(())
    }

    fn operations() -> Vec<Operation<Self>> {
        vec![
            Operation::tracked("heap usage during parsing", |suite, _result| {
                engine::parse_file(&suite.dir.path()?.join("memory_fixture.robot"))?;
                Ok(())
            }),
            Operation::tracked("heap usage during suite build", |suite, _result| {
                engine::build_suite(suite.dir.path()?)?;
                Ok(())
            }),
            Operation::new("suite run allocation growth", |suite, result| {
                // Automatic tracking is off for this operation; the body
                // reads the tracer directly and reports through the
                // placeholder, which the runner adopts into the sample.
                AllocTracer::begin();
                let model = engine::build_suite(suite.dir.path()?)?;
                let outcome = model.run_quiet()?;
                let growth = AllocTracer::current();
                let peak = AllocTracer::finish();
                drop(outcome);

                result
                    .extra
                    .insert("allocation_growth_bytes".into(), json!(growth));
                result.peak_memory_bytes = Some(peak);
                Ok(())
            }),
        ]
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::test_guard;
    use crate::runner;

    #[test]
    fn memory_suite_reports_tracked_peaks() {
        let _guard = test_guard();
        let mut suite = MemorySuite::new(1, None);
        let registry = runner::run(&mut suite).unwrap();

        assert_eq!(registry.len(), 3);
        let parsing = registry.lookup("heap usage during parsing").unwrap();
        assert!(parsing.peak_memory_bytes.unwrap() > 0);
        let build = registry.lookup("heap usage during suite build").unwrap();
        assert!(build.peak_memory_bytes.unwrap() > 0);
    }

    #[test]
    fn growth_operation_supplies_its_own_figures() {
        let _guard = test_guard();
        let mut suite = MemorySuite::new(1, None);
        let registry = runner::run(&mut suite).unwrap();

        let growth = registry.lookup("suite run allocation growth").unwrap();
        // Peak came from the operation body via the placeholder.
        assert!(growth.peak_memory_bytes.unwrap() > 0);
        assert!(growth.extra["allocation_growth_bytes"].as_u64().is_some());
    }
}
