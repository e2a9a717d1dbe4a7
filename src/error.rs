//! Error types for adforge operations.
//!
//! Defines error types for the major subsystems:
//! - Benchmark registry lookups and scenario synthesis
//! - Generative completion service calls
//! - The generation driver (checkpointing, output persistence)
//! - Dataset packaging (JSONL read/write)

use thiserror::Error;

/// Which registry table a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Industry,
    Platform,
    PerformanceLevel,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KeyKind::Industry => "industry",
            KeyKind::Platform => "platform",
            KeyKind::PerformanceLevel => "performance level",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while looking up benchmarks or composing scenarios.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("Unknown {kind} key '{key}'")]
    UnknownKey { kind: KeyKind, key: String },

    #[error("Invalid range [{lo}, {hi}] for '{field}' of '{owner}'")]
    InvalidRange {
        owner: String,
        field: String,
        lo: f64,
        hi: f64,
    },

    #[error("Registry table '{0}' is empty")]
    EmptyTable(String),
}

/// Errors that can occur during LLM operations.
///
/// Every variant is a per-item failure from the driver's point of view: the
/// item is logged, skipped, and the batch continues.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Completion was empty")]
    EmptyCompletion,
}

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Checkpoint error at '{path}': {reason}")]
    Checkpoint { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during dataset packaging.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No records found in '{0}'")]
    NoRecords(String),

    #[error("Invalid record on line {line} of '{path}': {reason}")]
    InvalidRecord {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid packaging option: {0}")]
    InvalidOption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
