//! Cost tracking for LLM usage.
//!
//! Costs are kept internally in micro-dollars (millionths of a dollar) so that
//! the per-call cost of small completions does not round away to zero.
//! Public methods accept and return dollar amounts.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

const MICROS_PER_DOLLAR: f64 = 1_000_000.0;
const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Per-token pricing for a model, in dollars per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_1m: f64,
    pub output_per_1m: f64,
}

impl ModelPricing {
    pub const fn new(input_per_1m: f64, output_per_1m: f64) -> Self {
        Self {
            input_per_1m,
            output_per_1m,
        }
    }

    /// Known pricing for `model`, matched by prefix, falling back to gpt-4o-mini rates.
    pub fn for_model(model: &str) -> Self {
        let name = model.rsplit('/').next().unwrap_or(model);
        KNOWN_PRICING
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, pricing)| *pricing)
            .unwrap_or(GPT_4O_MINI)
    }

    /// Dollar cost of one call.
    pub fn cost(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        (prompt_tokens as f64 / TOKENS_PER_MILLION) * self.input_per_1m
            + (completion_tokens as f64 / TOKENS_PER_MILLION) * self.output_per_1m
    }
}

const GPT_4O_MINI: ModelPricing = ModelPricing::new(0.15, 0.60);

// Longer prefixes first so "gpt-4o-mini" wins over "gpt-4o".
const KNOWN_PRICING: &[(&str, ModelPricing)] = &[
    ("gpt-4o-mini", GPT_4O_MINI),
    ("gpt-4o", ModelPricing::new(2.50, 10.00)),
    ("gpt-4.1-mini", ModelPricing::new(0.40, 1.60)),
    ("gpt-4.1-nano", ModelPricing::new(0.10, 0.40)),
    ("gpt-4.1", ModelPricing::new(2.00, 8.00)),
    ("gpt-3.5-turbo", ModelPricing::new(0.50, 1.50)),
];

/// Snapshot of tracked spending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostReport {
    pub calls: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Total spent in dollars.
    pub spent: f64,
    /// Remaining budget in dollars, if a budget is set.
    pub remaining: Option<f64>,
    /// Spend per model in dollars, sorted by model name.
    pub by_model: BTreeMap<String, f64>,
}

/// Thread-safe accumulator of LLM token usage and spend, with an optional budget.
pub struct CostTracker {
    budget_micros: Option<u64>,
    spent_micros: AtomicU64,
    calls: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    cost_by_model: RwLock<BTreeMap<String, u64>>,
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl CostTracker {
    /// A tracker that stops reporting "over budget" once `budget` dollars are spent.
    ///
    /// ```
    /// use adforge::llm::cost::CostTracker;
    ///
    /// let tracker = CostTracker::with_budget(5.0);
    /// assert!(!tracker.is_over_budget());
    /// ```
    pub fn with_budget(budget: f64) -> Self {
        Self::new(Some(budget))
    }

    /// A tracker without a budget.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn new(budget: Option<f64>) -> Self {
        Self {
            budget_micros: budget.map(dollars_to_micros),
            spent_micros: AtomicU64::new(0),
            calls: AtomicU64::new(0),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
            cost_by_model: RwLock::new(BTreeMap::new()),
        }
    }

    /// Records one completion call and returns its cost in dollars.
    ///
    /// `item_id` only labels the debug log line.
    pub fn record_usage(
        &self,
        model: &str,
        prompt_tokens: u32,
        completion_tokens: u32,
        pricing: ModelPricing,
        item_id: Option<&str>,
    ) -> f64 {
        let cost = pricing.cost(prompt_tokens, completion_tokens);
        let cost_micros = dollars_to_micros(cost);

        self.spent_micros.fetch_add(cost_micros, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompt_tokens
            .fetch_add(prompt_tokens as u64, Ordering::SeqCst);
        self.completion_tokens
            .fetch_add(completion_tokens as u64, Ordering::SeqCst);

        {
            let mut by_model = self
                .cost_by_model
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *by_model.entry(model.to_string()).or_insert(0) += cost_micros;
        }

        tracing::debug!(
            model = model,
            prompt_tokens = prompt_tokens,
            completion_tokens = completion_tokens,
            cost_micros = cost_micros,
            item_id = item_id,
            "Recorded LLM usage"
        );

        cost
    }

    pub fn is_over_budget(&self) -> bool {
        match self.budget_micros {
            Some(budget) => self.spent_micros.load(Ordering::SeqCst) >= budget,
            None => false,
        }
    }

    /// Total spent in dollars.
    pub fn spent(&self) -> f64 {
        micros_to_dollars(self.spent_micros.load(Ordering::SeqCst))
    }

    pub fn remaining(&self) -> Option<f64> {
        self.budget_micros.map(|budget| {
            micros_to_dollars(budget.saturating_sub(self.spent_micros.load(Ordering::SeqCst)))
        })
    }

    pub fn report(&self) -> CostReport {
        let by_model = self
            .cost_by_model
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(model, micros)| (model.clone(), micros_to_dollars(*micros)))
            .collect();
        let prompt_tokens = self.prompt_tokens.load(Ordering::SeqCst);
        let completion_tokens = self.completion_tokens.load(Ordering::SeqCst);

        CostReport {
            calls: self.calls.load(Ordering::SeqCst),
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            spent: self.spent(),
            remaining: self.remaining(),
            by_model,
        }
    }
}

fn dollars_to_micros(dollars: f64) -> u64 {
    if dollars.is_finite() && dollars > 0.0 {
        (dollars * MICROS_PER_DOLLAR).round() as u64
    } else {
        0
    }
}

fn micros_to_dollars(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_DOLLAR
}
