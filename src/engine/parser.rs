//! Sectioned plain-text parsing for suite and resource files.

use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

use super::model::{ResourceModel, Step, SuiteModel, TestCase, UserKeyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Settings,
    Variables,
    TestCases,
    Keywords,
}

fn parse_error(path: &Path, message: impl Into<String>) -> BenchError {
    BenchError::Parse {
        path: path.display().to_string(),
        message: message.into(),
    }
}

fn section_for(header: &str) -> Option<Section> {
    // Headers tolerate case and surrounding whitespace: `*** Test Cases ***`.
    let inner = header.trim().trim_matches('*').trim().to_ascii_lowercase();
    match inner.as_str() {
        "settings" | "setting" => Some(Section::Settings),
        "variables" | "variable" => Some(Section::Variables),
        "test cases" | "test case" => Some(Section::TestCases),
        "keywords" | "keyword" => Some(Section::Keywords),
        _ => None,
    }
}

/// Split a line into cells on runs of two or more spaces (or tabs).
fn split_cells(line: &str) -> Vec<String> {
    line.split(['\t'])
        .flat_map(|part| part.split("  "))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_step(cells: Vec<String>) -> Step {
    let mut cells = cells;
    let assign = if cells
        .first()
        .is_some_and(|c| c.starts_with("${") && c.ends_with("}="))
    {
        let mut name = cells.remove(0);
        name.pop(); // trailing '='
        Some(name)
    } else {
        None
    };
    let keyword = if cells.is_empty() {
        String::new()
    } else {
        cells.remove(0)
    };
    Step {
        assign,
        keyword,
        args: cells,
    }
}

fn suite_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("suite")
        .to_string()
}

struct Body {
    name: String,
    steps: Vec<Step>,
}

/// Shared parse over the sectioned format; the callers decide which
/// sections are legal.
struct Parsed {
    settings: Vec<(String, String)>,
    variables: Vec<(String, String)>,
    tests: Vec<Body>,
    keywords: Vec<Body>,
}

fn parse_sections(path: &Path, text: &str) -> Result<Parsed> {
    let mut parsed = Parsed {
        settings: Vec::new(),
        variables: Vec::new(),
        tests: Vec::new(),
        keywords: Vec::new(),
    };
    let mut section = Section::None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if line.starts_with("***") {
            section = section_for(line).ok_or_else(|| {
                parse_error(path, format!("unknown section header on line {}", lineno + 1))
            })?;
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        match section {
            Section::None => {
                return Err(parse_error(
                    path,
                    format!("content before the first section header on line {}", lineno + 1),
                ));
            }
            Section::Settings => {
                let mut cells = split_cells(line);
                if cells.is_empty() {
                    continue;
                }
                let key = cells.remove(0);
                parsed.settings.push((key, cells.join("  ")));
            }
            Section::Variables => {
                let mut cells = split_cells(line);
                if cells.is_empty() {
                    continue;
                }
                let name = cells.remove(0);
                parsed.variables.push((name, cells.join("  ")));
            }
            Section::TestCases | Section::Keywords => {
                let bodies = if section == Section::TestCases {
                    &mut parsed.tests
                } else {
                    &mut parsed.keywords
                };
                if indented {
                    let body = bodies.last_mut().ok_or_else(|| {
                        parse_error(path, format!("step without a name on line {}", lineno + 1))
                    })?;
                    body.steps.push(parse_step(split_cells(line)));
                } else {
                    bodies.push(Body {
                        name: line.trim().to_string(),
                        steps: Vec::new(),
                    });
                }
            }
        }
    }

    Ok(parsed)
}

/// Parse one suite file into its model.
pub fn parse_file(path: &Path) -> Result<SuiteModel> {
    let text = fs::read_to_string(path)?;
    let parsed = parse_sections(path, &text)?;

    let mut suite = SuiteModel::new(suite_name(path));
    suite.settings = parsed.settings;
    suite.variables = parsed.variables;
    suite.tests = parsed
        .tests
        .into_iter()
        .map(|b| TestCase {
            name: b.name,
            steps: b.steps,
        })
        .collect();
    suite.keywords = parsed
        .keywords
        .into_iter()
        .map(|b| UserKeyword {
            name: b.name,
            steps: b.steps,
        })
        .collect();
    Ok(suite)
}

/// Parse a resource file: definitions only, a test-case section is an error.
pub fn parse_resource_file(path: &Path) -> Result<ResourceModel> {
    let text = fs::read_to_string(path)?;
    let parsed = parse_sections(path, &text)?;

    if !parsed.tests.is_empty() {
        return Err(parse_error(
            path,
            "resource files cannot contain test cases",
        ));
    }

    Ok(ResourceModel {
        name: suite_name(path),
        settings: parsed.settings,
        variables: parsed.variables,
        keywords: parsed
            .keywords
            .into_iter()
            .map(|b| UserKeyword {
                name: b.name,
                steps: b.steps,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SUITE: &str = "\
*** Settings ***
Library    Collections

*** Variables ***
${GREETING}    hello

*** Test Cases ***
Simple Log
    Log    ${GREETING}

List Handling
    ${lst}=    Create List    a    b    c
    Log    ${lst}

*** Keywords ***
Greet Twice
    Log    once
    Log    twice
";

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn parses_all_sections() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "sample.robot", SUITE);
        let suite = parse_file(&path).unwrap();

        assert_eq!(suite.name, "sample");
        assert_eq!(
            suite.settings,
            vec![("Library".to_string(), "Collections".to_string())]
        );
        assert_eq!(
            suite.variables,
            vec![("${GREETING}".to_string(), "hello".to_string())]
        );
        assert_eq!(suite.tests.len(), 2);
        assert_eq!(suite.keywords.len(), 1);

        let listing = &suite.tests[1];
        assert_eq!(listing.name, "List Handling");
        assert_eq!(listing.steps[0].assign.as_deref(), Some("${lst}"));
        assert_eq!(listing.steps[0].keyword, "Create List");
        assert_eq!(listing.steps[0].args, ["a", "b", "c"]);
    }

    #[test]
    fn resource_file_with_tests_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.resource", SUITE);
        let err = parse_resource_file(&path).unwrap_err();
        assert!(matches!(err, BenchError::Parse { .. }));
    }

    #[test]
    fn resource_file_parses_definitions() {
        let dir = tempdir().unwrap();
        let path = write(
            &dir,
            "common.resource",
            "*** Settings ***\nLibrary    String\n\n*** Keywords ***\nShared Step\n    Log    shared\n",
        );
        let resource = parse_resource_file(&path).unwrap();
        assert_eq!(resource.keywords.len(), 1);
        assert_eq!(resource.keywords[0].name, "Shared Step");
        assert_eq!(
            resource.settings,
            vec![("Library".to_string(), "String".to_string())]
        );
    }

    #[test]
    fn unknown_section_header_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.robot", "*** Bogus ***\nX\n");
        let err = parse_file(&path).unwrap_err();
        assert!(err.to_string().contains("unknown section header"));
    }

    #[test]
    fn step_before_test_name_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.robot", "*** Test Cases ***\n    Log    orphan\n");
        let err = parse_file(&path).unwrap_err();
        assert!(err.to_string().contains("step without a name"));
    }
}
