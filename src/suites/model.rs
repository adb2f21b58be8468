//! Model construction and result loading benchmarks.
//!
//! Measures building the in-memory suite model, reloading a persisted
//! result document, and visitor traversal. Setup executes the fixture once
//! to produce the result document the loading benchmark reads back.

use std::path::PathBuf;

use serde_json::json;

use crate::engine::{self, SuiteVisitor, TestCase};
use crate::error::{BenchError, Result};
use crate::fixtures;
use crate::runner::{BenchmarkSuite, Operation};

use super::FixtureDir;

pub struct ModelSuite {
    iterations: usize,
    dir: FixtureDir,
    output_path: Option<PathBuf>,
}

impl ModelSuite {
    pub fn new(iterations: usize, suite_dir: Option<PathBuf>) -> Self {
        Self {
            iterations,
            dir: FixtureDir::new(suite_dir),
            output_path: None,
        }
    }

    fn output_path(&self) -> Result<&PathBuf> {
        self.output_path.as_ref().ok_or_else(|| {
            BenchError::InvalidState("result document accessed before setup".into())
        })
    }
}

/// No-op visitor that counts visited test cases.
struct TestCounter {
    count: usize,
}

impl SuiteVisitor for TestCounter {
    fn visit_test(&mut self, _test: &TestCase) {
        self.count += 1;
    }
}

impl BenchmarkSuite for ModelSuite {
    fn name(&self) -> &'static str {
        "model"
    }

    fn setup(&mut self) -> Result<()> {
        self.dir.prepare(fixtures::write_model_fixture)?;

        // Generate the persisted result document the loading benchmark
        // reads back.
        let dir = self.dir.path()?;
        let output = dir.join("output.json");
        let suite = engine::build_suite(&dir.join("fixture.robot"))?;
        suite.run_quiet()?.save(&output)?;
        self.output_path = Some(output);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.dir.cleanup();
        self.output_path = None;
        Ok(())
    }

    fn operations() -> Vec<Operation<Self>> {
        vec![
            Operation::new("build running model from filesystem", |suite, _result| {
                engine::build_suite(suite.dir.path()?)?;
                Ok(())
            }),
            Operation::new("parse suite model", |suite, _result| {
                engine::parse_file(&suite.dir.path()?.join("fixture.robot"))?;
                Ok(())
            }),
            Operation::new("load execution result (output.json)", |suite, _result| {
                engine::load_result(suite.output_path()?)?;
                Ok(())
            }),
            Operation::new("traverse model with visitor", |suite, result| {
                let model = engine::build_suite(suite.dir.path()?)?;
                let mut counter = TestCounter { count: 0 };
                model.visit(&mut counter);
                result
                    .extra
                    .insert("visited_tests".into(), json!(counter.count));
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
    use crate::runner;

    #[test]
    fn model_suite_runs_and_annotates_traversal() {
        let mut suite = ModelSuite::new(1, None);
        let registry = runner::run(&mut suite).unwrap();

        assert_eq!(registry.len(), 4);
        let traversal = registry.lookup("traverse model with visitor").unwrap();
        assert_eq!(traversal.extra["visited_tests"], json!(1));
    }

    #[test]
    fn result_loading_uses_document_generated_in_setup() {
        let mut suite = ModelSuite::new(2, None);
        let registry = runner::run(&mut suite).unwrap();
        let loading = registry
            .lookup("load execution result (output.json)")
            .unwrap();
        assert_eq!(loading.runs(), 2);
    }
}
