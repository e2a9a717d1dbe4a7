//! LLM integration for adforge.
//!
//! The generation driver only depends on the [`LlmProvider`] trait; the
//! bundled [`ChatClient`] talks to any OpenAI-compatible chat-completions
//! endpoint.
//!
//! ```ignore
//! use adforge::llm::{ChatClient, CompletionParams, LlmProvider};
//!
//! let client = ChatClient::from_env()?;
//! let completion = client
//!     .complete("You are helpful.", "Say hi.", &CompletionParams::default())
//!     .await?;
//! println!("{} ({} tokens)", completion.text, completion.usage.total_tokens);
//! ```
//!
//! # Cost Tracking
//!
//! ```
//! use adforge::llm::cost::{CostTracker, ModelPricing};
//!
//! let tracker = CostTracker::with_budget(1.0);
//! tracker.record_usage("gpt-4o-mini", 1200, 800, ModelPricing::for_model("gpt-4o-mini"), None);
//! assert!(!tracker.is_over_budget());
//! ```

pub mod client;
pub mod cost;

pub use client::{
    ChatClient, Choice, Completion, CompletionParams, GenerationRequest, GenerationResponse,
    LlmProvider, Message, Usage, DEFAULT_API_BASE, DEFAULT_MODEL,
};
pub use cost::{CostReport, CostTracker, ModelPricing};
