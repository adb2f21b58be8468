//! The subject under test: a miniature test-automation engine.
//!
//! The harness treats this module as an opaque collaborator exposing the
//! operations the benchmark suites measure: parse a suite or resource file,
//! build a runnable suite from a file or directory, run a suite with output
//! suppressed, persist and reload a result document, and traverse a suite
//! model with a visitor.
//!
//! Suite files use a sectioned plain-text format: `*** Settings ***`,
//! `*** Variables ***`, `*** Test Cases ***`, and `*** Keywords ***`
//! headers, with cells separated by two or more spaces and test bodies
//! indented beneath the test name.

mod model;
mod parser;
mod run;

pub use model::{ResourceModel, Step, SuiteModel, SuiteVisitor, TestCase, UserKeyword};
pub use parser::{parse_file, parse_resource_file};
pub use run::{load_result, RunOutcome, TestRecord, TestStatus};

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BenchError, Result};

/// Suite file extension recognized when building from a directory.
const SUITE_EXTENSION: &str = "robot";

/// Build a runnable suite model from a single file or a directory tree.
///
/// Directories are walked recursively; every `.robot` file becomes a child
/// suite, in sorted path order so the resulting model is deterministic.
pub fn build_suite(path: &Path) -> Result<SuiteModel> {
    if path.is_file() {
        return parse_file(path);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| BenchError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SUITE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(BenchError::Parse {
            path: path.display().to_string(),
            message: "no suite files found".into(),
        });
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("suite")
        .to_string();
    let mut root = SuiteModel::directory(name);
    for file in files {
        root.children.push(parse_file(&file)?);
    }
    Ok(root)
}
