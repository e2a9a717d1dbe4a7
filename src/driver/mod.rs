//! Generation driver: scenarios in, advisor answers out.
//!
//! Calls the completion service once per scenario, strictly sequentially,
//! with a fixed delay between calls. Each successful answer is appended to a
//! JSONL file and synced to disk before the checkpoint moves past it, so the
//! checkpoint always names the last item that is durably on disk. A failed
//! call is logged, recorded in the run summary, and skipped; the batch keeps
//! going.

pub mod checkpoint;

pub use checkpoint::{CheckpointStore, InMemoryCheckpoint, JsonFileCheckpoint};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DriverError, LlmError};
use crate::llm::{CompletionParams, CostReport, CostTracker, LlmProvider, ModelPricing};
use crate::prompts::build_advisor_prompt;
use crate::scenario::Scenario;

/// Default output file for generated answers.
pub const DEFAULT_OUTPUT_FILE: &str = "outputs/training_data.jsonl";

/// Default checkpoint file.
pub const DEFAULT_CHECKPOINT_FILE: &str = "outputs/checkpoint.json";

// ============================================================================
// Records
// ============================================================================

/// The prompt side of a generation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub system_prompt: String,
    pub user_prompt: String,
    pub scenario: Scenario,
}

/// Token usage of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

/// One line of driver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// `train_0007` style identifier, zero-padded to four digits.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input: RecordInput,
    pub output: String,
    pub tokens: TokenCounts,
}

/// Formats the record id for the item at `index`.
pub fn record_id(index: usize) -> String {
    format!("train_{:04}", index)
}

// ============================================================================
// Configuration and summary
// ============================================================================

/// Settings for one driver run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub params: CompletionParams,
    pub output_path: PathBuf,
    /// Pause after each call to stay under provider rate limits.
    pub call_delay: Duration,
    /// Stop starting new calls once this many dollars have been spent.
    pub budget_usd: Option<f64>,
    /// Ignore any saved checkpoint and truncate the output file.
    pub fresh: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            params: CompletionParams::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            call_delay: Duration::from_secs(1),
            budget_usd: None,
            fresh: false,
        }
    }
}

/// An item the driver skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub id: String,
    pub error: String,
}

/// Outcome of a driver run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of scenarios in the batch.
    pub total: usize,
    /// First index attempted in this run.
    pub start_index: usize,
    pub generated: usize,
    pub failures: Vec<ItemFailure>,
    /// Tokens and spend for the calls this run made.
    pub cost: CostReport,
    /// The budget ran out before every item was attempted.
    pub stopped_for_budget: bool,
    pub output_path: PathBuf,
}

impl RunSummary {
    pub fn resumed(&self) -> bool {
        self.start_index > 0
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Sequential, resumable generation over a batch of scenarios.
pub struct GenerationDriver {
    llm: Arc<dyn LlmProvider>,
    checkpoint: Box<dyn CheckpointStore>,
    config: DriverConfig,
    cost: CostTracker,
}

impl GenerationDriver {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        checkpoint: Box<dyn CheckpointStore>,
        config: DriverConfig,
    ) -> Self {
        let cost = CostTracker::new(config.budget_usd);
        Self {
            llm,
            checkpoint,
            config,
            cost,
        }
    }

    /// Runs the batch, resuming after the saved checkpoint unless `fresh` is set.
    ///
    /// Per-item completion failures never abort the run; only local I/O and
    /// checkpoint failures do.
    pub async fn run(&self, scenarios: &[Scenario]) -> Result<RunSummary, DriverError> {
        let total = scenarios.len();

        let last_completed = if self.config.fresh {
            self.checkpoint.clear()?;
            None
        } else {
            self.checkpoint.load()?
        };
        let start_index = last_completed.map_or(0, |i| i + 1);

        let mut writer = BufWriter::new(self.open_output(start_index > 0)?);

        if start_index > 0 {
            info!(
                "Resuming from example {}/{}",
                start_index.min(total) + 1,
                total
            );
        } else {
            info!("Starting fresh. Generating {} examples.", total);
        }

        let pricing = ModelPricing::for_model(&self.config.params.model);
        let mut summary = RunSummary {
            total,
            start_index,
            generated: 0,
            failures: Vec::new(),
            cost: CostReport::default(),
            stopped_for_budget: false,
            output_path: self.config.output_path.clone(),
        };

        for (index, scenario) in scenarios.iter().enumerate().skip(start_index) {
            if self.cost.is_over_budget() {
                warn!(
                    spent = self.cost.spent(),
                    next_index = index,
                    "Budget exhausted, stopping early"
                );
                summary.stopped_for_budget = true;
                break;
            }

            let id = record_id(index);
            match self.generate_record(scenario, &id).await {
                Ok(record) => {
                    serde_json::to_writer(&mut writer, &record)?;
                    writer.write_all(b"\n")?;
                    writer.flush()?;
                    writer.get_ref().sync_data()?;

                    self.cost.record_usage(
                        &self.config.params.model,
                        record.tokens.prompt,
                        record.tokens.completion,
                        pricing,
                        Some(&id),
                    );
                    summary.generated += 1;

                    self.checkpoint.save(index)?;
                    debug!(id = %id, tokens = record.tokens.total, "Generated example");
                    info!("[{}/{}] {}", index + 1, total, id);
                }
                Err(e) => {
                    warn!(index, id = %id, error = %e, "Generation failed, skipping");
                    summary.failures.push(ItemFailure {
                        index,
                        id,
                        error: e.to_string(),
                    });
                }
            }

            if index + 1 < total && !self.config.call_delay.is_zero() {
                tokio::time::sleep(self.config.call_delay).await;
            }
        }

        summary.cost = self.cost.report();
        info!(
            generated = summary.generated,
            failed = summary.failures.len(),
            total_tokens = summary.cost.total_tokens,
            cost_usd = summary.cost.spent,
            "Generation complete"
        );
        Ok(summary)
    }

    async fn generate_record(
        &self,
        scenario: &Scenario,
        id: &str,
    ) -> Result<GenerationRecord, LlmError> {
        let prompt = build_advisor_prompt(scenario);
        let completion = self
            .llm
            .complete(&prompt.system, &prompt.user, &self.config.params)
            .await?;

        Ok(GenerationRecord {
            id: id.to_string(),
            timestamp: Utc::now(),
            input: RecordInput {
                system_prompt: prompt.system,
                user_prompt: prompt.user,
                scenario: scenario.clone(),
            },
            output: completion.text,
            tokens: TokenCounts {
                prompt: completion.usage.prompt_tokens,
                completion: completion.usage.completion_tokens,
                total: completion.usage.total_tokens,
            },
        })
    }

    fn open_output(&self, append: bool) -> Result<File, DriverError> {
        let path = &self.config.output_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)?
        } else {
            File::create(path)?
        };
        Ok(file)
    }
}
