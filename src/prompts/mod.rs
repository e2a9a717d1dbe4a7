//! LLM prompts for marketing-strategy answer generation.
//!
//! - [`advisor`] - System prompt and scenario rendering for the advisor model
//!
//! # Usage
//!
//! ```no_run
//! use adforge::prompts::build_advisor_prompt;
//! use adforge::scenario::{ScenarioGenerator, SeededDraws};
//!
//! let mut generator = ScenarioGenerator::standard(SeededDraws::from_seed(7));
//! for scenario in generator.generate(3, true) {
//!     let prompt = build_advisor_prompt(&scenario);
//!     println!("{}", prompt.user);
//! }
//! ```

pub mod advisor;

pub use advisor::{
    build_advisor_prompt, render_user_prompt, AdvisorPrompt, ADVISOR_SYSTEM_PROMPT,
    ANALYSIS_HEADING, PLAN_HEADING,
};
