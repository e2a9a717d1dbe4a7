//! Prompt builder for the marketing-strategy advisor.
//!
//! The advisor receives one [`Scenario`] rendered as plain text and answers
//! with a performance analysis followed by a strategic plan for a downstream
//! research agent.

use crate::scenario::{MetricSet, Scenario};

/// System and user prompts for one advisor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorPrompt {
    /// System prompt establishing the advisor's role and output structure.
    pub system: String,
    /// User prompt carrying the rendered scenario.
    pub user: String,
}

impl AdvisorPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// The single-string form used by preference datasets: system, blank line, user.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Heading that opens the analysis section of an advisor answer.
pub const ANALYSIS_HEADING: &str = "## PERFORMANCE ANALYSIS";

/// Heading that opens the plan section of an advisor answer.
pub const PLAN_HEADING: &str = "## STRATEGIC PLAN FOR RESEARCH AGENT";

/// System prompt for the marketing-strategy advisor.
pub const ADVISOR_SYSTEM_PROMPT: &str = r#"You are an expert Marketing Strategy AI Agent. Your role is to:

1. ANALYZE marketing performance metrics from Meta Ads and Google Ads
2. IDENTIFY what's working, what's not, and root causes
3. CREATE a detailed strategic plan for a Research Agent to follow and implement

Your output must be structured in two clear sections:

## PERFORMANCE ANALYSIS
- Provide thorough interpretation of the metrics
- Compare current vs previous performance
- Identify specific problems and their likely causes
- Assess overall campaign health

## STRATEGIC PLAN FOR RESEARCH AGENT
- Create numbered, specific action items
- Each task should tell the Research Agent exactly what to research or do
- Prioritize tasks (immediate, short-term, medium-term)
- Include success metrics for the next cycle
- Be specific about deliverables expected from each task

Make your strategic plan actionable - the Research Agent should be able to execute it without further clarification."#;

const CLOSING_INSTRUCTION: &str =
    "Analyze this performance and create a detailed strategic plan for the Research Agent to execute.";

/// Renders a scenario into the advisor's user prompt.
///
/// Section order is fixed: headers, current metrics, previous period,
/// targets, context, closing instruction.
///
/// # Examples
///
/// ```
/// use adforge::prompts::render_user_prompt;
/// use adforge::scenario::{ScenarioGenerator, SeededDraws};
///
/// let scenario = ScenarioGenerator::standard(SeededDraws::from_seed(1))
///     .generate(1, true)
///     .remove(0);
/// let prompt = render_user_prompt(&scenario);
/// assert!(prompt.starts_with("Platform: "));
/// assert!(prompt.contains("CURRENT METRICS:"));
/// ```
pub fn render_user_prompt(scenario: &Scenario) -> String {
    format!(
        r#"Platform: {}
Industry: {}
Campaign Objective: {}
Time Period: {}

CURRENT METRICS:
{}

PREVIOUS PERIOD (for comparison):
{}

TARGETS:
{}

ADDITIONAL CONTEXT:
{}

{}"#,
        scenario.platform,
        scenario.industry,
        scenario.objective,
        scenario.period,
        bullet_list(&scenario.current_metrics),
        bullet_list(&scenario.previous_metrics),
        bullet_list(&scenario.targets),
        scenario.context,
        CLOSING_INSTRUCTION,
    )
}

/// Builds the full advisor prompt pair for a scenario.
pub fn build_advisor_prompt(scenario: &Scenario) -> AdvisorPrompt {
    AdvisorPrompt::new(ADVISOR_SYSTEM_PROMPT, render_user_prompt(scenario))
}

fn bullet_list(metrics: &MetricSet) -> String {
    metrics
        .iter()
        .map(|(k, v)| format!("- {}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}
