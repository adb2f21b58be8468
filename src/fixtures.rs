//! Built-in fixture files for the benchmark suites.
//!
//! Fixtures are plain string templates written into a directory the caller
//! owns (usually a `TempDir` created in a suite's setup). Sizes mirror the
//! shipped fixture set: small (4 tests), medium (52 tests), large (502
//! tests).

use std::fs;
use std::path::Path;

use crate::error::Result;

pub const SMALL_TESTS: usize = 4;
pub const MEDIUM_TESTS: usize = 52;
pub const LARGE_TESTS: usize = 502;

/// Render a suite with `tests` generated test cases.
pub fn suite_template(tests: usize) -> String {
    let mut out = String::from(
        "*** Settings ***\nLibrary    Collections\n\n*** Variables ***\n${BASE}    fixture\n\n*** Test Cases ***\n",
    );
    for i in 0..tests {
        out.push_str(&format!(
            "Generated Case {i}\n    ${{lst}}=    Create List    a{i}    b{i}    c{i}\n    Log    ${{lst}}\n    Should Be Equal    ${{BASE}}    fixture\n\n"
        ));
    }
    out
}

const RESOURCE: &str = "\
*** Variables ***
${SHARED}    resource value

*** Keywords ***
Shared Setup
    Log    ${SHARED}

Shared Check
    Should Be Equal    ${SHARED}    resource value
";

const SIMPLE_SUITE: &str = "\
*** Test Cases ***
Simple One
    Log    simple fixture

Simple Two
    ${v}=    Set Variable    42
    Should Be Equal    ${v}    42
";

const KEYWORD_SUITE: &str = "\
*** Test Cases ***
Keyword Heavy One
    Prepare
    Verify

Keyword Heavy Two
    Prepare
    Prepare
    Verify

*** Keywords ***
Prepare
    ${items}=    Create List    x    y    z
    Log    ${items}

Verify
    ${joined}=    Catenate    fixture    suite
    Should Be Equal    ${joined}    fixture suite
";

const MEMORY_SUITE: &str = "\
*** Settings ***
Library    Collections

*** Test Cases ***
Memory Fixture 1
    ${lst}=    Create List    a    b    c    d    e
    Log    ${lst}

Memory Fixture 2
    ${dct}=    Create Dictionary    key=value    foo=bar
    Log    ${dct}
";

const MODEL_SUITE: &str = "\
*** Test Cases ***
Model Fixture
    Log    model benchmark fixture
";

fn write(dir: &Path, name: &str, contents: &str) -> Result<()> {
    fs::write(dir.join(name), contents)?;
    Ok(())
}

/// Write the parsing fixtures: three suite sizes plus a resource file.
pub fn write_parsing_fixtures(dir: &Path) -> Result<()> {
    write(dir, "small.robot", &suite_template(SMALL_TESTS))?;
    write(dir, "medium.robot", &suite_template(MEDIUM_TESTS))?;
    write(dir, "large.robot", &suite_template(LARGE_TESTS))?;
    write(dir, "resource.resource", RESOURCE)?;
    Ok(())
}

/// Write the execution fixtures: a trivial suite and a keyword-heavy one.
pub fn write_execution_fixtures(dir: &Path) -> Result<()> {
    write(dir, "simple.robot", SIMPLE_SUITE)?;
    write(dir, "keyword.robot", KEYWORD_SUITE)?;
    Ok(())
}

/// Write the single memory fixture suite.
pub fn write_memory_fixture(dir: &Path) -> Result<()> {
    write(dir, "memory_fixture.robot", MEMORY_SUITE)
}

/// Write the single model fixture suite.
pub fn write_model_fixture(dir: &Path) -> Result<()> {
    write(dir, "fixture.robot", MODEL_SUITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use tempfile::tempdir;

    #[test]
    fn parsing_fixtures_have_expected_sizes() {
        let dir = tempdir().unwrap();
        write_parsing_fixtures(dir.path()).unwrap();

        let small = engine::parse_file(&dir.path().join("small.robot")).unwrap();
        let medium = engine::parse_file(&dir.path().join("medium.robot")).unwrap();
        let large = engine::parse_file(&dir.path().join("large.robot")).unwrap();
        assert_eq!(small.tests.len(), SMALL_TESTS);
        assert_eq!(medium.tests.len(), MEDIUM_TESTS);
        assert_eq!(large.tests.len(), LARGE_TESTS);

        let resource =
            engine::parse_resource_file(&dir.path().join("resource.resource")).unwrap();
        assert_eq!(resource.keywords.len(), 2);
    }

    #[test]
    fn generated_suites_pass_when_executed() {
        let dir = tempdir().unwrap();
        write_execution_fixtures(dir.path()).unwrap();

        let simple = engine::parse_file(&dir.path().join("simple.robot")).unwrap();
        let outcome = simple.run_quiet().unwrap();
        assert!(outcome.all_passed(), "{:?}", outcome.tests);

        let keyword = engine::parse_file(&dir.path().join("keyword.robot")).unwrap();
        let outcome = keyword.run_quiet().unwrap();
        assert!(outcome.all_passed(), "{:?}", outcome.tests);
    }

    #[test]
    fn memory_and_model_fixtures_execute_cleanly() {
        let dir = tempdir().unwrap();
        write_memory_fixture(dir.path()).unwrap();
        write_model_fixture(dir.path()).unwrap();

        for name in ["memory_fixture.robot", "fixture.robot"] {
            let suite = engine::parse_file(&dir.path().join(name)).unwrap();
            assert!(suite.run_quiet().unwrap().all_passed());
        }
    }
}
