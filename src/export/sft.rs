//! Supervised fine-tuning records in ShareGPT conversation shape.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::jsonl::{read_jsonl, write_jsonl};
use crate::driver::GenerationRecord;
use crate::error::ExportError;

/// One conversation turn. `from` is `system`, `human` or `gpt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGptTurn {
    pub from: String,
    pub value: String,
}

/// A three-turn system/human/assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGptRecord {
    pub conversations: Vec<ShareGptTurn>,
}

impl From<&GenerationRecord> for ShareGptRecord {
    fn from(record: &GenerationRecord) -> Self {
        let turn = |from: &str, value: &str| ShareGptTurn {
            from: from.to_string(),
            value: value.to_string(),
        };
        Self {
            conversations: vec![
                turn("system", &record.input.system_prompt),
                turn("human", &record.input.user_prompt),
                turn("gpt", &record.output),
            ],
        }
    }
}

/// Converts driver output at `input` into ShareGPT records at `output`.
///
/// Returns the number of records written.
pub fn package_sft(input: &Path, output: &Path) -> Result<usize, ExportError> {
    let records: Vec<GenerationRecord> = read_jsonl(input)?;
    if records.is_empty() {
        return Err(ExportError::NoRecords(input.display().to_string()));
    }

    let converted: Vec<ShareGptRecord> = records.iter().map(ShareGptRecord::from).collect();
    let written = write_jsonl(output, &converted)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        records = written,
        "Packaged supervised records"
    );
    Ok(written)
}
