//! adforge: marketing-strategy fine-tuning dataset generator.
//!
//! Synthesizes statistically plausible advertising-performance scenarios from
//! industry benchmarks, renders them into advisor prompts, collects model
//! answers resumably, and packages the answers as supervised (ShareGPT) and
//! preference (prompt/chosen/rejected) datasets.

pub mod benchmarks;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;
pub mod llm;
pub mod prompts;
pub mod scenario;

// Re-export commonly used error types
pub use config::ConfigError;
pub use error::{DriverError, ExportError, LlmError, ScenarioError};
