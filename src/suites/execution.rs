//! Suite building and test execution benchmarks.
//!
//! Measures the cost of building a runnable suite from the filesystem and
//! of executing suites end to end with output suppressed.

use std::path::PathBuf;

use crate::engine;
use crate::error::Result;
use crate::fixtures;
use crate::runner::{BenchmarkSuite, Operation};

use super::FixtureDir;

pub struct ExecutionSuite {
    iterations: usize,
    dir: FixtureDir,
}

impl ExecutionSuite {
    pub fn new(iterations: usize, suite_dir: Option<PathBuf>) -> Self {
        Self {
            iterations,
            dir: FixtureDir::new(suite_dir),
        }
    }

    fn run_file(&self, file: &str) -> Result<()> {
        let suite = engine::build_suite(&self.dir.path()?.join(file))?;
        suite.run_quiet()?;
        Ok(())
    }
}

impl BenchmarkSuite for ExecutionSuite {
    fn name(&self) -> &'static str {
        "execution"
    }

    fn setup(&mut self) -> Result<()> {
        self.dir.prepare(fixtures::write_execution_fixtures)
    }

    fn teardown(&mut self) -> Result<()> {
        self.dir.cleanup();
        Ok(())
    }

    fn operations() -> Vec<Operation<Self>> {
        vec![
            Operation::new("build suite from filesystem", |suite, _result| {
                engine::build_suite(suite.dir.path()?)?;
                Ok(())
            }),
            Operation::new("run simple suite (no output)", |suite, _result| {
                suite.run_file("simple.robot")
            }),
            Operation::new("run keyword suite (no output)", |suite, _result| {
                suite.run_file("keyword.robot")
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
    use crate::runner;

    #[test]
    fn execution_suite_runs_all_operations() {
        let mut suite = ExecutionSuite::new(1, None);
        let registry = runner::run(&mut suite).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.lookup("build suite from filesystem").is_ok());
        assert!(registry.lookup("run simple suite (no output)").is_ok());
        assert!(registry.lookup("run keyword suite (no output)").is_ok());
    }

    #[test]
    fn execution_suite_honors_fixture_override() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_execution_fixtures(dir.path()).unwrap();

        let mut suite = ExecutionSuite::new(1, Some(dir.path().to_path_buf()));
        let registry = runner::run(&mut suite).unwrap();
        assert_eq!(registry.len(), 3);
        // The override directory is left in place after teardown.
        assert!(dir.path().join("simple.robot").exists());
    }
}
