//! Dataset packaging for generated answers.
//!
//! - [`sft`] - ShareGPT-style three-turn conversations for supervised fine-tuning
//! - [`preference`] - (prompt, chosen, rejected) pairs for preference optimization
//! - [`jsonl`] - Line-delimited JSON helpers shared by both

pub mod jsonl;
pub mod preference;
pub mod sft;

pub use jsonl::{read_jsonl, write_jsonl};
pub use preference::{
    build_pairs, count_by_strategy, package_dpo, truncate_answer, PreferenceOptions,
    PreferencePair, PreferenceReport, RejectionStrategy,
};
pub use sft::{package_sft, ShareGptRecord, ShareGptTurn};
