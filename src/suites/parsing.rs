//! Syntax parsing benchmarks.
//!
//! Measures how quickly the engine parses suite and resource files of
//! varying sizes. Fixture files are written to a temp directory during
//! setup unless a fixture directory override is supplied.

use std::path::PathBuf;

use crate::error::Result;
use crate::fixtures;
use crate::runner::{BenchmarkSuite, Operation};
use crate::{engine, metrics::BenchmarkResult};

use super::FixtureDir;

pub struct ParsingSuite {
    iterations: usize,
    dir: FixtureDir,
}

impl ParsingSuite {
    pub fn new(iterations: usize, suite_dir: Option<PathBuf>) -> Self {
        Self {
            iterations,
            dir: FixtureDir::new(suite_dir),
        }
    }

    fn parse(&self, file: &str, _result: &mut BenchmarkResult) -> Result<()> {
        engine::parse_file(&self.dir.path()?.join(file))?;
        Ok(())
    }
}

impl BenchmarkSuite for ParsingSuite {
    fn name(&self) -> &'static str {
        "parsing"
    }

    fn setup(&mut self) -> Result<()> {
        self.dir.prepare(fixtures::write_parsing_fixtures)
    }

    fn teardown(&mut self) -> Result<()> {
        self.dir.cleanup();
        Ok(())
    }

    fn operations() -> Vec<Operation<Self>> {
        vec![
            Operation::new("parse small suite", |suite, result| {
                suite.parse("small.robot", result)
            }),
            Operation::new("parse medium suite", |suite, result| {
                suite.parse("medium.robot", result)
            }),
            Operation::new("parse large suite", |suite, result| {
                suite.parse("large.robot", result)
            }),
            Operation::new("parse resource file", |suite, _result| {
                engine::parse_resource_file(&suite.dir.path()?.join("resource.resource"))?;
                Ok(())
            }),
        ]
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}
