//! Preference pairs (prompt, chosen, rejected) for preference optimization.
//!
//! `chosen` is always the generated answer. `rejected` is derived from it by
//! one of a fixed set of corruption strategies, each producing a recognisably
//! worse answer: cut short, generic, missing the plan, missing the analysis,
//! or focused on the wrong metrics.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::jsonl::{read_jsonl, write_jsonl};
use crate::driver::GenerationRecord;
use crate::error::ExportError;
use crate::prompts::PLAN_HEADING;
use crate::scenario::draws::{pick, shuffle, Draws, SeededDraws};

/// Marker appended to truncated answers.
const INCOMPLETE_MARKER: &str = "\n\n[Response incomplete]";
const ANALYSIS_SIGN_OFF: &str = "\n\nI hope this analysis helps!";
const PLAN_MARKER: &str = "STRATEGIC PLAN";
const SHORT_PLAN_HEADING: &str = "## STRATEGIC PLAN";

/// Share of the answer a truncated rejection keeps, in percent.
const TRUNCATE_KEEP_PERCENT: (u64, u64) = (25, 40);

const VAGUE_RESPONSES: &[&str] = &[
    "The campaign shows mixed results.

Recommendations:
1. Review the metrics
2. Make adjustments as needed
3. Continue monitoring

Let me know if you need anything else.",
    "Looking at the data, there are some areas for improvement.

I suggest:
1. Optimize the campaigns
2. Test different approaches
3. Track performance

Hope this helps!",
    "The performance could be better.

Action items:
1. Analyze what's working
2. Fix what's not
3. Keep testing

Feel free to ask follow-up questions.",
];

/// How a rejected answer is derived from the chosen one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectionStrategy {
    /// The first 25-40% of the answer, ending at a sentence where possible.
    Truncated,
    /// A canned, generic non-answer.
    Vague,
    /// The analysis without the strategic plan.
    NoPlan,
    /// The strategic plan without the analysis.
    NoAnalysis,
    /// A generic answer that ignores the actual problems.
    WrongFocus,
}

impl RejectionStrategy {
    pub const ALL: [RejectionStrategy; 5] = [
        RejectionStrategy::Truncated,
        RejectionStrategy::Vague,
        RejectionStrategy::NoPlan,
        RejectionStrategy::NoAnalysis,
        RejectionStrategy::WrongFocus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RejectionStrategy::Truncated => "truncated",
            RejectionStrategy::Vague => "vague",
            RejectionStrategy::NoPlan => "no_plan",
            RejectionStrategy::NoAnalysis => "no_analysis",
            RejectionStrategy::WrongFocus => "wrong_focus",
        }
    }

    /// Builds the rejected answer for `chosen`.
    ///
    /// `platform` is the scenario's platform display name, used by
    /// [`RejectionStrategy::WrongFocus`].
    pub fn reject<D: Draws + ?Sized>(&self, chosen: &str, platform: &str, draws: &mut D) -> String {
        match self {
            RejectionStrategy::Truncated => {
                let percent = draws.integer(TRUNCATE_KEEP_PERCENT.0, TRUNCATE_KEEP_PERCENT.1);
                truncate_answer(chosen, percent)
            }
            RejectionStrategy::Vague => pick(draws, VAGUE_RESPONSES)
                .copied()
                .unwrap_or(VAGUE_RESPONSES[0])
                .to_string(),
            RejectionStrategy::NoPlan => drop_plan(chosen),
            RejectionStrategy::NoAnalysis => drop_analysis(chosen),
            RejectionStrategy::WrongFocus => wrong_focus(platform),
        }
    }
}

impl fmt::Display for RejectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keeps `percent`% of `chosen` (by bytes, on a char boundary), then snaps
/// back to just after the last `.` if that lies past the halfway point of the cut.
pub fn truncate_answer(chosen: &str, percent: u64) -> String {
    let mut cut = floor_char_boundary(chosen, chosen.len() * percent as usize / 100);
    if let Some(last_period) = chosen[..cut].rfind('.') {
        if last_period > cut / 2 {
            cut = last_period + 1;
        }
    }
    format!("{}{}", &chosen[..cut], INCOMPLETE_MARKER)
}

fn drop_plan(chosen: &str) -> String {
    let marker = if chosen.contains(SHORT_PLAN_HEADING) {
        Some(SHORT_PLAN_HEADING)
    } else if chosen.contains(PLAN_MARKER) {
        Some(PLAN_MARKER)
    } else {
        None
    };

    match marker.and_then(|m| chosen.split(m).next()) {
        Some(analysis) => format!("{}{}", analysis.trim(), ANALYSIS_SIGN_OFF),
        None => chosen[..floor_char_boundary(chosen, chosen.len() / 2)].to_string(),
    }
}

fn drop_analysis(chosen: &str) -> String {
    match chosen.find(SHORT_PLAN_HEADING) {
        Some(idx) => format!("The campaign needs some work.\n\n{}", &chosen[idx..]),
        None => format!(
            "Here are my recommendations:\n{}",
            &chosen[floor_char_boundary(chosen, chosen.len() / 2)..]
        ),
    }
}

fn wrong_focus(platform: &str) -> String {
    format!(
        "## PERFORMANCE ANALYSIS

Looking at the {platform} campaign, the impressions and reach look reasonable. The campaign is running and generating some activity.

{PLAN_HEADING}

1. **Continue Monitoring**: Keep watching the metrics daily.

2. **Maintain Current Strategy**: The campaign is running, so no major changes needed.

3. **Standard Optimization**: Apply general best practices.

4. **Regular Reporting**: Set up weekly reports.

The campaign should be fine with these standard optimizations."
    )
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

// ============================================================================
// Packaging
// ============================================================================

/// One preference pair. Only `prompt`, `chosen` and `rejected` are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferencePair {
    pub prompt: String,
    pub chosen: String,
    pub rejected: String,
    #[serde(skip)]
    pub strategy: RejectionStrategy,
}

/// Options for building preference pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceOptions {
    /// Distinct strategies applied to each example (1 to 5).
    pub pairs_per_example: usize,
    /// Seed for strategy sampling, truncation and output order.
    pub seed: Option<u64>,
}

impl Default for PreferenceOptions {
    fn default() -> Self {
        Self {
            pairs_per_example: 2,
            seed: None,
        }
    }
}

/// What a packaging run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceReport {
    pub examples: usize,
    pub pairs: usize,
    /// Pair count per strategy name, sorted by name.
    pub by_strategy: BTreeMap<String, usize>,
}

/// Builds shuffled preference pairs from generation records.
///
/// Each record contributes `pairs_per_example` pairs, one per distinct
/// strategy. Records with a blank answer are skipped.
pub fn build_pairs<D: Draws + ?Sized>(
    records: &[GenerationRecord],
    pairs_per_example: usize,
    draws: &mut D,
) -> Result<Vec<PreferencePair>, ExportError> {
    if pairs_per_example == 0 || pairs_per_example > RejectionStrategy::ALL.len() {
        return Err(ExportError::InvalidOption(format!(
            "pairs_per_example must be between 1 and {}, got {}",
            RejectionStrategy::ALL.len(),
            pairs_per_example
        )));
    }

    let mut pairs = Vec::with_capacity(records.len() * pairs_per_example);
    for record in records {
        if record.output.trim().is_empty() {
            tracing::warn!(id = %record.id, "Skipping record with empty output");
            continue;
        }

        let prompt = format!("{}\n\n{}", record.input.system_prompt, record.input.user_prompt);
        let mut strategies = RejectionStrategy::ALL;
        shuffle(draws, &mut strategies);

        for strategy in &strategies[..pairs_per_example] {
            let rejected = strategy.reject(&record.output, &record.input.scenario.platform, draws);
            pairs.push(PreferencePair {
                prompt: prompt.clone(),
                chosen: record.output.clone(),
                rejected,
                strategy: *strategy,
            });
        }
    }

    shuffle(draws, &mut pairs);
    Ok(pairs)
}

/// Tallies pairs per strategy name.
pub fn count_by_strategy(pairs: &[PreferencePair]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for pair in pairs {
        *counts.entry(pair.strategy.name().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Reads driver output at `input`, writes preference pairs to `output`.
pub fn package_dpo(
    input: &Path,
    output: &Path,
    options: &PreferenceOptions,
) -> Result<PreferenceReport, ExportError> {
    let records: Vec<GenerationRecord> = read_jsonl(input)?;
    if records.is_empty() {
        return Err(ExportError::NoRecords(input.display().to_string()));
    }

    let mut draws = match options.seed {
        Some(seed) => SeededDraws::from_seed(seed),
        None => SeededDraws::from_entropy(),
    };
    let pairs = build_pairs(&records, options.pairs_per_example, &mut draws)?;
    write_jsonl(output, &pairs)?;

    let report = PreferenceReport {
        examples: records.len(),
        pairs: pairs.len(),
        by_strategy: count_by_strategy(&pairs),
    };

    tracing::info!(
        output = %output.display(),
        examples = report.examples,
        pairs = report.pairs,
        "Packaged preference pairs"
    );
    for (strategy, count) in &report.by_strategy {
        tracing::info!(strategy = %strategy, count, "Rejection strategy");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_record;
    use crate::scenario::draws::ScriptedDraws;
    use std::fs;
    use tempfile::TempDir;

    const ANSWER: &str = "## PERFORMANCE ANALYSIS\nCTR fell. CVR fell too. Costs rose sharply.\n\n## STRATEGIC PLAN FOR RESEARCH AGENT\n1. Audit creatives.\n2. Tighten targeting.";

    #[test]
    fn test_truncate_keeps_prefix_and_marks_incomplete() {
        let text = "a".repeat(100);
        assert_eq!(truncate_answer(&text, 30), format!("{}{}", "a".repeat(30), INCOMPLETE_MARKER));
    }

    #[test]
    fn test_truncate_snaps_to_late_sentence_end() {
        // 40% of 50 bytes is 20; the '.' at 14 lies past 10
        let text = "Sentence one x. and then more words follow here ok";
        assert_eq!(text.len(), 50);
        assert_eq!(truncate_answer(text, 40), format!("Sentence one x.{}", INCOMPLETE_MARKER));
    }

    #[test]
    fn test_truncate_ignores_early_sentence_end() {
        let text = "Hi. then a long run of words without stops";
        let kept = truncate_answer(text, 40);
        assert!(kept.starts_with("Hi. then a long "));
        assert!(kept.ends_with(INCOMPLETE_MARKER));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        // 30% of 20 bytes is byte 6, a boundary; 25% is byte 5, mid-char
        let kept = truncate_answer(&text, 25);
        assert!(kept.starts_with("éé"));
        assert!(!kept.starts_with("ééé"));
    }

    #[test]
    fn test_no_plan_removes_plan_section() {
        let mut draws = ScriptedDraws::new();
        let rejected = RejectionStrategy::NoPlan.reject(ANSWER, "Meta Ads", &mut draws);
        assert!(rejected.starts_with("## PERFORMANCE ANALYSIS"));
        assert!(!rejected.contains("STRATEGIC PLAN"));
        assert!(rejected.ends_with("I hope this analysis helps!"));
    }

    #[test]
    fn test_no_plan_without_heading_halves() {
        let mut draws = ScriptedDraws::new();
        let rejected = RejectionStrategy::NoPlan.reject("abcdefgh", "Meta Ads", &mut draws);
        assert_eq!(rejected, "abcd");
    }

    #[test]
    fn test_no_analysis_keeps_only_plan() {
        let mut draws = ScriptedDraws::new();
        let rejected = RejectionStrategy::NoAnalysis.reject(ANSWER, "Meta Ads", &mut draws);
        assert!(rejected.starts_with("The campaign needs some work.\n\n## STRATEGIC PLAN"));
        assert!(!rejected.contains("PERFORMANCE ANALYSIS"));

        let fallback = RejectionStrategy::NoAnalysis.reject("abcdefgh", "Meta Ads", &mut draws);
        assert_eq!(fallback, "Here are my recommendations:\nefgh");
    }

    #[test]
    fn test_vague_and_wrong_focus() {
        let mut draws = ScriptedDraws::new().with_indices([2]);
        let vague = RejectionStrategy::Vague.reject(ANSWER, "Meta Ads", &mut draws);
        assert_eq!(vague, VAGUE_RESPONSES[2]);

        let wrong = RejectionStrategy::WrongFocus.reject(ANSWER, "Google Ads (Search)", &mut draws);
        assert!(wrong.contains("Looking at the Google Ads (Search) campaign"));
        assert!(wrong.contains(PLAN_HEADING));
    }

    #[test]
    fn test_build_pairs_uses_distinct_strategies_per_example() {
        let records: Vec<GenerationRecord> = (0..10)
            .map(|i| sample_record(&format!("train_{:04}", i), ANSWER))
            .collect();
        let mut draws = SeededDraws::from_seed(8);
        let pairs = build_pairs(&records, 3, &mut draws).unwrap();

        assert_eq!(pairs.len(), 30);
        for pair in &pairs {
            assert_eq!(pair.chosen, ANSWER);
            assert_ne!(pair.rejected, pair.chosen);
            assert!(pair.prompt.contains("\n\nPlatform: "));
        }
        let total: usize = count_by_strategy(&pairs).values().sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn test_build_pairs_rejects_bad_option() {
        let mut draws = SeededDraws::from_seed(1);
        assert!(matches!(
            build_pairs(&[], 0, &mut draws),
            Err(ExportError::InvalidOption(_))
        ));
        assert!(matches!(
            build_pairs(&[], 6, &mut draws),
            Err(ExportError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_package_dpo_writes_three_fields_only() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("training_data.jsonl");
        let output = dir.path().join("dpo.jsonl");
        let records = vec![
            sample_record("train_0000", ANSWER),
            sample_record("train_0001", ANSWER),
        ];
        write_jsonl(&input, &records).unwrap();

        let report = package_dpo(
            &input,
            &output,
            &PreferenceOptions {
                pairs_per_example: 2,
                seed: Some(42),
            },
        )
        .unwrap();

        assert_eq!(report.examples, 2);
        assert_eq!(report.pairs, 4);
        assert_eq!(report.by_strategy.values().sum::<usize>(), 4);

        for line in fs::read_to_string(&output).unwrap().lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            let mut keys: Vec<&str> = value
                .as_object()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["chosen", "prompt", "rejected"]);
        }
    }

    #[test]
    fn test_same_seed_same_pairs() {
        let records = vec![sample_record("train_0000", ANSWER)];
        let a = build_pairs(&records, 2, &mut SeededDraws::from_seed(3)).unwrap();
        let b = build_pairs(&records, 2, &mut SeededDraws::from_seed(3)).unwrap();
        assert_eq!(a, b);
    }
}
