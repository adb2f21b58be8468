//! Error types shared across the harness.

use std::io;
use thiserror::Error;

/// Errors produced by the measurement harness and the engine under test.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A collector or suite was driven through its lifecycle out of order,
    /// e.g. `stop()` without a preceding `start()`.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A caller violated an API precondition, e.g. aggregating zero samples.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A named result was requested but the registry has no entry for it.
    #[error("no result named {name:?} (available: {})", available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    /// The engine failed to parse a suite or resource file.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// A test failed while the engine was executing a suite.
    #[error("execution failed: {0}")]
    Execution(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
