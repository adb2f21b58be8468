//! Quiet suite execution and the persisted result document.
//!
//! Execution interprets a handful of built-in keywords plus the suite's own
//! `*** Keywords ***` definitions. All output is suppressed; the caller gets
//! a [`RunOutcome`] with per-test records and pass/fail counts.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BenchError, Result};

use super::model::{Step, SuiteModel, UserKeyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Pass,
    Fail,
}

/// Outcome of one executed test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result document for one suite run. Serializable so it can be saved and
/// reloaded for the model-loading benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub suite: String,
    pub tests: Vec<TestRecord>,
    pub passed: usize,
    pub failed: usize,
}

impl RunOutcome {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Persist this outcome as a JSON document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Load a persisted result document.
pub fn load_result(path: &Path) -> Result<RunOutcome> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Variable bindings live for the duration of one test.
type Scope = HashMap<String, String>;

fn resolve(value: &str, scope: &Scope) -> String {
    let mut resolved = value.to_string();
    for (name, bound) in scope {
        if resolved.contains(name.as_str()) {
            resolved = resolved.replace(name.as_str(), bound);
        }
    }
    resolved
}

fn keyword_failure(message: impl Into<String>) -> BenchError {
    BenchError::Execution(message.into())
}

fn execute_step(step: &Step, scope: &mut Scope, keywords: &[UserKeyword]) -> Result<()> {
    let args: Vec<String> = step.args.iter().map(|a| resolve(a, scope)).collect();
    let value = match step.keyword.as_str() {
        // Output suppressed: Log only validates its argument count.
        "Log" => {
            if args.is_empty() {
                return Err(keyword_failure("Log requires a message"));
            }
            args[0].clone()
        }
        "Create List" => format!("[{}]", args.join(", ")),
        "Create Dictionary" => format!("{{{}}}", args.join(", ")),
        "Set Variable" => args.first().cloned().unwrap_or_default(),
        "Catenate" => args.join(" "),
        "Should Be Equal" => {
            if args.len() < 2 {
                return Err(keyword_failure("Should Be Equal requires two arguments"));
            }
            if args[0] != args[1] {
                return Err(keyword_failure(format!(
                    "{:?} != {:?}",
                    args[0], args[1]
                )));
            }
            String::new()
        }
        name => {
            let keyword = keywords
                .iter()
                .find(|k| k.name == name)
                .ok_or_else(|| keyword_failure(format!("no keyword named {name:?}")))?;
            for inner in &keyword.steps {
                execute_step(inner, scope, keywords)?;
            }
            String::new()
        }
    };

    if let Some(target) = &step.assign {
        scope.insert(target.clone(), value);
    }
    Ok(())
}

fn run_tests(suite: &SuiteModel, records: &mut Vec<TestRecord>) {
    for test in &suite.tests {
        let mut scope: Scope = suite.variables.iter().cloned().collect();
        let outcome = test
            .steps
            .iter()
            .try_for_each(|step| execute_step(step, &mut scope, &suite.keywords));
        records.push(match outcome {
            Ok(()) => TestRecord {
                name: test.name.clone(),
                status: TestStatus::Pass,
                message: None,
            },
            Err(err) => TestRecord {
                name: test.name.clone(),
                status: TestStatus::Fail,
                message: Some(err.to_string()),
            },
        });
    }
    for child in &suite.children {
        run_tests(child, records);
    }
}

impl SuiteModel {
    /// Execute every test with output suppressed. Failing tests are
    /// recorded, not raised; only infrastructure problems error out.
    pub fn run_quiet(&self) -> Result<RunOutcome> {
        let mut records = Vec::new();
        run_tests(self, &mut records);

        let passed = records
            .iter()
            .filter(|r| r.status == TestStatus::Pass)
            .count();
        let failed = records.len() - passed;
        debug!(suite = %self.name, passed, failed, "suite executed");

        Ok(RunOutcome {
            suite: self.name.clone(),
            tests: records,
            passed,
            failed,
        })
    }
}
