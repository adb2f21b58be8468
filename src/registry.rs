//! Insertion-ordered mapping from benchmark name to its current result.
//!
//! The registry is populated incrementally while a suite runs: each
//! operation first registers a placeholder, which the final aggregated
//! result later replaces under the same name. Iteration preserves the
//! order in which names were first registered.

use crate::error::{BenchError, Result};
use crate::metrics::BenchmarkResult;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<(String, BenchmarkResult)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `result` under its name. Replaces in place when the name is
    /// already registered, keeping the original position.
    pub fn insert(&mut self, result: BenchmarkResult) {
        match self.entries.iter_mut().find(|(n, _)| *n == result.name) {
            Some((_, slot)) => *slot = result,
            None => self.entries.push((result.name.clone(), result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkResult> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BenchmarkResult> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Like [`Registry::get`] but fails with [`BenchError::NotFound`],
    /// listing the registered names.
    pub fn lookup(&self, name: &str) -> Result<&BenchmarkResult> {
        self.get(name).ok_or_else(|| BenchError::NotFound {
            name: name.to_string(),
            available: self.names().map(str::to_string).collect(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BenchmarkResult)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absorb every entry of `other`, replacing same-named entries.
    pub fn merge(&mut self, other: Registry) {
        for (_, result) in other.entries {
            self.insert(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(name: &str, ms: u64) -> BenchmarkResult {
        BenchmarkResult::new(name, Duration::from_millis(ms))
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut registry = Registry::new();
        registry.insert(result("a", 1));
        registry.insert(result("b", 2));
        registry.insert(result("a", 9));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().elapsed, Duration::from_millis(9));
        // "a" keeps its original position.
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn lookup_missing_lists_available_names() {
        let mut registry = Registry::new();
        registry.insert(result("parse", 1));
        registry.insert(result("run", 2));

        let err = registry.lookup("absent").unwrap_err();
        match err {
            BenchError::NotFound { name, available } => {
                assert_eq!(name, "absent");
                assert_eq!(available, ["parse", "run"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn merge_keeps_order_and_replaces() {
        let mut left = Registry::new();
        left.insert(result("a", 1));
        let mut right = Registry::new();
        right.insert(result("a", 5));
        right.insert(result("b", 2));

        left.merge(right);
        assert_eq!(left.get("a").unwrap().elapsed, Duration::from_millis(5));
        let names: Vec<&str> = left.names().collect();
        assert_eq!(names, ["a", "b"]);
    }
}
