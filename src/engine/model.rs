//! In-memory suite model and visitor traversal.

use serde::{Deserialize, Serialize};

/// One keyword invocation inside a test or user keyword body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Variable name receiving the keyword's return value, e.g. `${lst}`.
    pub assign: Option<String>,
    pub keyword: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub steps: Vec<Step>,
}

/// A keyword defined in a `*** Keywords ***` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKeyword {
    pub name: String,
    pub steps: Vec<Step>,
}

/// Parsed suite: tests and keywords from one file, or a directory node
/// whose children carry the tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteModel {
    pub name: String,
    pub settings: Vec<(String, String)>,
    pub variables: Vec<(String, String)>,
    pub tests: Vec<TestCase>,
    pub keywords: Vec<UserKeyword>,
    pub children: Vec<SuiteModel>,
}

impl SuiteModel {
    pub fn new(name: impl Into<String>) -> Self {
        SuiteModel {
            name: name.into(),
            settings: Vec::new(),
            variables: Vec::new(),
            tests: Vec::new(),
            keywords: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A directory node aggregating child suites.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// Total number of tests, including child suites.
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.children.iter().map(SuiteModel::test_count).sum::<usize>()
    }

    /// Depth-first traversal: the suite itself, its tests, then children.
    pub fn visit<V: SuiteVisitor>(&self, visitor: &mut V) {
        visitor.visit_suite(self);
        for test in &self.tests {
            visitor.visit_test(test);
        }
        for child in &self.children {
            child.visit(visitor);
        }
    }
}

/// Resource file model: no tests, only reusable definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    pub name: String,
    pub settings: Vec<(String, String)>,
    pub variables: Vec<(String, String)>,
    pub keywords: Vec<UserKeyword>,
}

/// Callback interface for [`SuiteModel::visit`].
pub trait SuiteVisitor {
    fn visit_suite(&mut self, _suite: &SuiteModel) {}
    fn visit_test(&mut self, _test: &TestCase) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(name: &str) -> TestCase {
        TestCase {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    struct Counter {
        suites: usize,
        tests: usize,
    }

    impl SuiteVisitor for Counter {
        fn visit_suite(&mut self, _suite: &SuiteModel) {
            self.suites += 1;
        }

        fn visit_test(&mut self, _test: &TestCase) {
            self.tests += 1;
        }
    }

    #[test]
    fn visit_reaches_nested_tests() {
        let mut child = SuiteModel::new("child");
        child.tests.push(test("a"));
        child.tests.push(test("b"));
        let mut root = SuiteModel::directory("root");
        root.tests.push(test("top"));
        root.children.push(child);

        let mut counter = Counter {
            suites: 0,
            tests: 0,
        };
        root.visit(&mut counter);
        assert_eq!(counter.suites, 2);
        assert_eq!(counter.tests, 3);
        assert_eq!(root.test_count(), 3);
    }
}
