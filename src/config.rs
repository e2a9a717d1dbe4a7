//! Generation run configuration.
//!
//! Values come from built-in defaults, then environment variables (a `.env`
//! file is loaded by the binary before this runs), then CLI flags.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::driver::{DriverConfig, DEFAULT_CHECKPOINT_FILE, DEFAULT_OUTPUT_FILE};
use crate::llm::{CompletionParams, DEFAULT_API_BASE, DEFAULT_MODEL};

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Everything a generation run needs.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Bearer token for the completion service.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Pause between completion calls.
    pub call_delay: Duration,
    pub output_file: PathBuf,
    pub checkpoint_file: PathBuf,
    pub num_scenarios: usize,
    /// Round-robin industries, platforms and levels instead of sampling them.
    pub balanced: bool,
    /// Seed for scenario synthesis. Resuming a run needs the same seed to
    /// regenerate the same scenarios.
    pub seed: Option<u64>,
    /// Stop once this many dollars have been spent.
    pub budget_usd: Option<f64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2500,
            temperature: 0.7,
            call_delay: Duration::from_millis(1000),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            checkpoint_file: PathBuf::from(DEFAULT_CHECKPOINT_FILE),
            num_scenarios: 100,
            balanced: true,
            seed: None,
            budget_usd: None,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY`: API key for the completion service
    /// - `ADFORGE_API_BASE`: Base URL (default: https://api.openai.com/v1)
    /// - `ADFORGE_MODEL`: Model (default: gpt-4o-mini)
    /// - `ADFORGE_MAX_TOKENS`: Maximum completion tokens (default: 2500)
    /// - `ADFORGE_TEMPERATURE`: Sampling temperature (default: 0.7)
    /// - `ADFORGE_CALL_DELAY_MS`: Delay between calls in ms (default: 1000)
    /// - `ADFORGE_OUTPUT_FILE`: Output JSONL (default: outputs/training_data.jsonl)
    /// - `ADFORGE_CHECKPOINT_FILE`: Checkpoint (default: outputs/checkpoint.json)
    /// - `ADFORGE_NUM_SCENARIOS`: Scenarios per run (default: 100)
    /// - `ADFORGE_BALANCED`: Balanced key assignment (default: true)
    /// - `ADFORGE_SEED`: Scenario seed (default: unset)
    /// - `ADFORGE_BUDGET_USD`: Spend cap in dollars (default: unset)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GenerationConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.api_key = var("OPENAI_API_KEY");

        if let Some(val) = var("ADFORGE_API_BASE") {
            config.api_base = val;
        }

        if let Some(val) = var("ADFORGE_MODEL") {
            config.model = val;
        }

        if let Some(val) = var("ADFORGE_MAX_TOKENS") {
            config.max_tokens = parse_env_value(&val, "ADFORGE_MAX_TOKENS")?;
        }

        if let Some(val) = var("ADFORGE_TEMPERATURE") {
            config.temperature = parse_env_value(&val, "ADFORGE_TEMPERATURE")?;
        }

        if let Some(val) = var("ADFORGE_CALL_DELAY_MS") {
            let millis: u64 = parse_env_value(&val, "ADFORGE_CALL_DELAY_MS")?;
            config.call_delay = Duration::from_millis(millis);
        }

        if let Some(val) = var("ADFORGE_OUTPUT_FILE") {
            config.output_file = PathBuf::from(val);
        }

        if let Some(val) = var("ADFORGE_CHECKPOINT_FILE") {
            config.checkpoint_file = PathBuf::from(val);
        }

        if let Some(val) = var("ADFORGE_NUM_SCENARIOS") {
            config.num_scenarios = parse_env_value(&val, "ADFORGE_NUM_SCENARIOS")?;
        }

        if let Some(val) = var("ADFORGE_BALANCED") {
            config.balanced = parse_env_bool(&val, "ADFORGE_BALANCED")?;
        }

        if let Some(val) = var("ADFORGE_SEED") {
            config.seed = Some(parse_env_value(&val, "ADFORGE_SEED")?);
        }

        if let Some(val) = var("ADFORGE_BUDGET_USD") {
            config.budget_usd = Some(parse_env_value(&val, "ADFORGE_BUDGET_USD")?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base cannot be empty".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if let Some(budget) = self.budget_usd {
            if !budget.is_finite() || budget <= 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "budget_usd must be a positive amount".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Fails with [`ConfigError::MissingEnvVar`] if no API key is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn driver_config(&self, fresh: bool) -> DriverConfig {
        DriverConfig {
            params: self.completion_params(),
            output_path: self.output_file.clone(),
            call_delay: self.call_delay,
            budget_usd: self.budget_usd,
            fresh,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_budget(mut self, budget_usd: f64) -> Self {
        self.budget_usd = Some(budget_usd);
        self
    }
}

/// Parse an environment variable value.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

/// Parse an environment variable as a boolean.
fn parse_env_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected boolean value, got '{}'", value),
        }),
    }
}
