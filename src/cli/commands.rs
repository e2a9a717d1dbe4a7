//! CLI command definitions for adforge.
//!
//! Each subcommand loads [`GenerationConfig`] from the environment and then
//! applies its own flags on top.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::GenerationConfig;
use crate::driver::{CheckpointStore, GenerationDriver, JsonFileCheckpoint, RunSummary};
use crate::export::{package_dpo, package_sft, write_jsonl, PreferenceOptions};
use crate::llm::{ChatClient, GenerationRequest, LlmProvider, Message};
use crate::prompts::build_advisor_prompt;
use crate::scenario::{Scenario, ScenarioGenerator, SeededDraws};

/// Default output for supervised records.
const DEFAULT_SFT_OUTPUT: &str = "outputs/sft_data.jsonl";

/// Default output for preference pairs.
const DEFAULT_DPO_OUTPUT: &str = "outputs/dpo_data.jsonl";

const PING_PROMPT: &str = "Say hello in 5 words or less";

/// Marketing-strategy training data generator.
#[derive(Parser)]
#[command(name = "adforge")]
#[command(about = "Generate marketing-strategy fine-tuning datasets from synthetic ad scenarios")]
#[command(version)]
#[command(
    long_about = "adforge synthesizes advertising-performance scenarios from industry benchmarks, asks a chat model for an expert analysis and plan, and packages the answers for supervised and preference fine-tuning.\n\nExample usage:\n  adforge generate --count 100 --seed 42\n  adforge sft --input outputs/training_data.jsonl\n  adforge dpo --pairs-per-example 2"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Synthesize scenarios without calling a model.
    Scenarios(ScenariosArgs),

    /// Generate expert answers for a batch of scenarios.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Convert generated answers into ShareGPT supervised records.
    Sft(SftArgs),

    /// Build preference pairs from generated answers.
    Dpo(DpoArgs),

    /// Send one tiny completion to check credentials and connectivity.
    Ping(PingArgs),
}

/// Arguments for `adforge scenarios`.
#[derive(Parser, Debug)]
pub struct ScenariosArgs {
    /// Number of scenarios (default: ADFORGE_NUM_SCENARIOS or 100).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Sample industry, platform and level instead of cycling through them.
    #[arg(long)]
    pub unbalanced: bool,

    /// Seed for reproducible scenarios.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write scenarios as JSONL here instead of printing a summary.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include the rendered system and user prompts with each scenario.
    #[arg(long)]
    pub with_prompts: bool,
}

/// Arguments for `adforge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of scenarios to generate answers for.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Model to call.
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (overrides OPENAI_API_KEY).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Output JSONL file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Checkpoint file.
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Scenario seed. Pass the same seed to resume an interrupted run.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Delay between calls in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Maximum completion tokens per answer.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Stop once this many dollars have been spent.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Sample industry, platform and level instead of cycling through them.
    #[arg(long)]
    pub unbalanced: bool,

    /// Ignore any checkpoint and overwrite the output file.
    #[arg(long)]
    pub fresh: bool,

    /// Print the run summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `adforge sft`.
#[derive(Parser, Debug)]
pub struct SftArgs {
    /// Driver output to convert (default: ADFORGE_OUTPUT_FILE).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the supervised records.
    #[arg(short, long, default_value = DEFAULT_SFT_OUTPUT)]
    pub output: PathBuf,
}

/// Arguments for `adforge dpo`.
#[derive(Parser, Debug)]
pub struct DpoArgs {
    /// Driver output to convert (default: ADFORGE_OUTPUT_FILE).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the preference pairs.
    #[arg(short, long, default_value = DEFAULT_DPO_OUTPUT)]
    pub output: PathBuf,

    /// Rejection strategies applied to each answer (1-5).
    #[arg(short, long, default_value = "2")]
    pub pairs_per_example: usize,

    /// Seed for strategy sampling and shuffling.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Print the report as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `adforge ping`.
#[derive(Parser, Debug)]
pub struct PingArgs {
    /// Model to call.
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (overrides OPENAI_API_KEY).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long)]
    pub api_base: Option<String>,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scenarios(args) => run_scenarios_command(args),
        Commands::Generate(args) => run_generate_command(args).await,
        Commands::Sft(args) => run_sft_command(args),
        Commands::Dpo(args) => run_dpo_command(args),
        Commands::Ping(args) => run_ping_command(args).await,
    }
}

fn load_config() -> anyhow::Result<GenerationConfig> {
    GenerationConfig::from_env().context("Invalid configuration in environment")
}

fn scenario_draws(seed: Option<u64>) -> SeededDraws {
    match seed {
        Some(seed) => SeededDraws::from_seed(seed),
        None => SeededDraws::from_entropy(),
    }
}

fn build_client(config: &GenerationConfig) -> anyhow::Result<ChatClient> {
    let api_key = config
        .require_api_key()
        .context("Set OPENAI_API_KEY or pass --api-key")?;
    ChatClient::new(
        config.api_base.clone(),
        Some(api_key.to_string()),
        config.model.clone(),
    )
    .context("Failed to create chat client")
}

// ============================================================================
// scenarios
// ============================================================================

#[derive(Serialize)]
struct ScenarioLine<'a> {
    #[serde(flatten)]
    scenario: &'a Scenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_prompt: Option<String>,
}

fn run_scenarios_command(args: ScenariosArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let count = args.count.unwrap_or(config.num_scenarios);
    let balanced = !args.unbalanced && config.balanced;
    let seed = args.seed.or(config.seed);

    let scenarios = ScenarioGenerator::standard(scenario_draws(seed)).generate(count, balanced);

    if let Some(output) = args.output {
        let lines: Vec<ScenarioLine<'_>> = scenarios
            .iter()
            .map(|scenario| {
                let prompt = args.with_prompts.then(|| build_advisor_prompt(scenario));
                ScenarioLine {
                    scenario,
                    system_prompt: prompt.as_ref().map(|p| p.system.clone()),
                    user_prompt: prompt.map(|p| p.user),
                }
            })
            .collect();
        let written = write_jsonl(&output, &lines)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        println!("✓ Wrote {} scenarios", written);
        println!("  Output: {}", output.display());
        return Ok(());
    }

    for (i, scenario) in scenarios.iter().enumerate() {
        println!(
            "{:>4}. {:<24} {:<22} {:<10} {}",
            i + 1,
            scenario.metadata.industry_key,
            scenario.platform,
            scenario.metadata.performance_level,
            scenario.objective
        );
        if args.with_prompts {
            println!("{}\n", build_advisor_prompt(scenario).user);
        }
    }
    Ok(())
}

// ============================================================================
// generate
// ============================================================================

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(api_key) = args.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(api_key);
    }
    if let Some(api_base) = args.api_base {
        config.api_base = api_base;
    }
    if let Some(output) = args.output {
        config.output_file = output;
    }
    if let Some(checkpoint) = args.checkpoint {
        config.checkpoint_file = checkpoint;
    }
    if let Some(count) = args.count {
        config.num_scenarios = count;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.call_delay = Duration::from_millis(delay_ms);
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(budget) = args.budget {
        config.budget_usd = Some(budget);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.unbalanced {
        config.balanced = false;
    }
    config.validate()?;

    let client = build_client(&config)?;
    let checkpoint = JsonFileCheckpoint::new(config.checkpoint_file.clone());

    if !args.fresh && config.seed.is_none() {
        if let Some(last) = checkpoint.load()? {
            warn!(
                last_completed = last,
                "Resuming without --seed: scenarios will differ from the interrupted run"
            );
        }
    }

    info!(
        model = %config.model,
        count = config.num_scenarios,
        balanced = config.balanced,
        seed = ?config.seed,
        output = %config.output_file.display(),
        "Generating scenarios"
    );
    let scenarios = ScenarioGenerator::standard(scenario_draws(config.seed))
        .generate(config.num_scenarios, config.balanced);

    let driver = GenerationDriver::new(
        Arc::new(client),
        Box::new(checkpoint),
        config.driver_config(args.fresh),
    );
    let summary = driver.run(&scenarios).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_run_summary(&summary);
    }
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    println!("✓ Generation completed");
    if summary.resumed() {
        println!("  Resumed at:   {}/{}", summary.start_index + 1, summary.total);
    }
    println!("  Generated:    {}", summary.generated);
    println!("  Failed:       {}", summary.failures.len());
    println!("  Total tokens: {}", summary.cost.total_tokens);
    println!("  Cost:         ${:.4}", summary.cost.spent);
    for (model, spent) in &summary.cost.by_model {
        println!("    {:<20} ${:.4}", model, spent);
    }
    if let Some(remaining) = summary.cost.remaining {
        println!("  Budget left:  ${:.4}", remaining);
    }
    println!("  Output:       {}", summary.output_path.display());
    if summary.stopped_for_budget {
        println!("  Stopped early: budget exhausted");
    }
    for failure in &summary.failures {
        println!("  ✗ {} - {}", failure.id, failure.error);
    }
}

// ============================================================================
// sft / dpo
// ============================================================================

fn driver_output(input: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match input {
        Some(path) => Ok(path),
        None => Ok(load_config()?.output_file),
    }
}

fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Input file does not exist: {} (run `adforge generate` first)",
            path.display()
        );
    }
    Ok(())
}

fn run_sft_command(args: SftArgs) -> anyhow::Result<()> {
    let input = driver_output(args.input)?;
    ensure_exists(&input)?;

    let written = package_sft(&input, &args.output)?;

    println!("✓ Converted {} examples", written);
    println!("  Output: {}", args.output.display());
    Ok(())
}

fn run_dpo_command(args: DpoArgs) -> anyhow::Result<()> {
    let input = driver_output(args.input)?;
    ensure_exists(&input)?;

    let options = PreferenceOptions {
        pairs_per_example: args.pairs_per_example,
        seed: args.seed,
    };
    let report = package_dpo(&input, &args.output, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("✓ Created {} preference pairs", report.pairs);
    println!("  From {} examples", report.examples);
    for (strategy, count) in &report.by_strategy {
        println!("  {:<12} {}", strategy, count);
    }
    println!("  Output: {}", args.output.display());
    Ok(())
}

// ============================================================================
// ping
// ============================================================================

async fn run_ping_command(args: PingArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(api_key) = args.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(api_key);
    }
    if let Some(api_base) = args.api_base {
        config.api_base = api_base;
    }

    let client = build_client(&config)?;
    let request = GenerationRequest::new(config.model.clone(), vec![Message::user(PING_PROMPT)])
        .with_max_tokens(20);
    let response = client.generate(request).await?;

    println!("✓ {} responded", response.model);
    println!("  {}", response.first_content().unwrap_or("").trim());
    println!("  Tokens: {}", response.usage.total_tokens);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_alias_and_flags() {
        let cli = Cli::try_parse_from([
            "adforge", "gen", "-n", "5", "--seed", "42", "--fresh", "--budget", "1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.count, Some(5));
                assert_eq!(args.seed, Some(42));
                assert!(args.fresh);
                assert_eq!(args.budget, Some(1.5));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_dpo_defaults() {
        let cli = Cli::try_parse_from(["adforge", "dpo"]).unwrap();
        match cli.command {
            Commands::Dpo(args) => {
                assert_eq!(args.pairs_per_example, 2);
                assert_eq!(args.output, PathBuf::from(DEFAULT_DPO_OUTPUT));
                assert!(args.input.is_none());
            }
            _ => panic!("expected dpo"),
        }
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::try_parse_from(["adforge", "scenarios", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_scenario_line_flattens_scenario() {
        let scenario = ScenarioGenerator::standard(SeededDraws::from_seed(3))
            .generate(1, true)
            .remove(0);
        let line = ScenarioLine {
            scenario: &scenario,
            system_prompt: None,
            user_prompt: Some("u".to_string()),
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["platform"], scenario.platform.as_str());
        assert_eq!(value["user_prompt"], "u");
        assert!(value.get("system_prompt").is_none());
        assert!(value.get("_metadata").is_some());
    }
}
