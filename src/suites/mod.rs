//! Concrete benchmark suites measuring the engine under test.

mod execution;
mod memory;
mod model;
mod parsing;

pub use execution::ExecutionSuite;
pub use memory::MemorySuite;
pub use model::ModelSuite;
pub use parsing::ParsingSuite;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{BenchError, Result};
use crate::registry::Registry;
use crate::runner;
use crate::SuiteKind;

/// Fixture directory handling shared by every suite: an optional caller
/// override, otherwise a temp dir created in setup and dropped in teardown.
#[derive(Debug, Default)]
pub(crate) struct FixtureDir {
    override_dir: Option<PathBuf>,
    tmpdir: Option<TempDir>,
}

impl FixtureDir {
    pub(crate) fn new(override_dir: Option<PathBuf>) -> Self {
        Self {
            override_dir,
            tmpdir: None,
        }
    }

    /// Ensure a directory exists, creating a temp dir and populating it via
    /// `populate` when no override was given. Idempotent across one
    /// setup/teardown cycle.
    pub(crate) fn prepare(&mut self, populate: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
        if self.override_dir.is_none() && self.tmpdir.is_none() {
            let tmpdir = TempDir::new()?;
            populate(tmpdir.path())?;
            self.tmpdir = Some(tmpdir);
        }
        Ok(())
    }

    /// Drop the temp dir (removing it from disk). The override is kept.
    pub(crate) fn cleanup(&mut self) {
        self.tmpdir = None;
    }

    pub(crate) fn path(&self) -> Result<&Path> {
        self.override_dir
            .as_deref()
            .or(self.tmpdir.as_ref().map(TempDir::path))
            .ok_or_else(|| {
                BenchError::InvalidState("fixture directory accessed before setup".into())
            })
    }
}

/// Run one suite kind and return its registry. Used by the CLI.
pub fn run_kind(
    kind: SuiteKind,
    iterations: usize,
    suite_dir: Option<PathBuf>,
) -> Result<Registry> {
    match kind {
        SuiteKind::Parsing => runner::run(&mut ParsingSuite::new(iterations, suite_dir)),
        SuiteKind::Execution => runner::run(&mut ExecutionSuite::new(iterations, suite_dir)),
        SuiteKind::Model => runner::run(&mut ModelSuite::new(iterations, suite_dir)),
        SuiteKind::Memory => runner::run(&mut MemorySuite::new(iterations, suite_dir)),
    }
}
