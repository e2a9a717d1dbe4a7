//! Scenario synthesis: the typed scenario record and the pipeline that builds it.
//!
//! Registry → [`synthesizer`] → [`composer`] → [`batch`]. Every number shown in a
//! [`Scenario`] is already a display string; [`format`] is the only place that
//! conversion happens.

pub mod batch;
pub mod composer;
pub mod draws;
pub mod format;
pub mod synthesizer;

pub use batch::ScenarioGenerator;
pub use composer::compose;
pub use draws::{Draws, ScriptedDraws, SeededDraws};
pub use synthesizer::{synthesize, FunnelMetrics, MIN_CONVERSIONS};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Metric sets
// ============================================================================

/// An insertion-ordered mapping of metric name to formatted value.
///
/// Serializes as a JSON object whose keys keep insertion order, which is the
/// order the prompt renderer lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(IndexMap<String, String>);

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a metric, replacing the value in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// The selection keys a scenario was composed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    pub industry_key: String,
    pub platform_key: String,
    pub performance_level: String,
}

/// One fully-formed marketing performance scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Platform display name.
    pub platform: String,
    /// Industry display name.
    pub industry: String,
    pub objective: String,
    /// Reporting period label, e.g. "Last 14 days".
    pub period: String,
    pub current_metrics: MetricSet,
    pub previous_metrics: MetricSet,
    pub targets: MetricSet,
    pub context: String,
    #[serde(rename = "_metadata")]
    pub metadata: ScenarioMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_set_keeps_insertion_order() {
        let mut set = MetricSet::new();
        set.insert("ad_spend", "$3,000");
        set.insert("impressions", "150,000");
        set.insert("clicks", "3,000");
        set.insert("impressions", "150,001");

        assert_eq!(
            set.keys().collect::<Vec<_>>(),
            vec!["ad_spend", "impressions", "clicks"]
        );
        assert_eq!(set.get("impressions"), Some("150,001"));
        assert_eq!(set.len(), 3);
        assert!(!set.contains("roas"));
    }

    #[test]
    fn test_metric_set_serializes_as_ordered_object() {
        let mut set = MetricSet::new();
        set.insert("zeta", "1");
        set.insert("alpha", "2");

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);

        let back: MetricSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(back, set);
    }

    #[test]
    fn test_metric_set_rejects_non_string_values() {
        assert!(serde_json::from_str::<MetricSet>(r#"{"clicks":3000}"#).is_err());
    }

    #[test]
    fn test_metadata_field_is_underscored() {
        let scenario = Scenario {
            platform: "Meta Ads (Facebook/Instagram)".into(),
            industry: "B2B SaaS".into(),
            objective: "Lead Generation".into(),
            period: "Last 7 days".into(),
            current_metrics: MetricSet::new(),
            previous_metrics: MetricSet::new(),
            targets: MetricSet::new(),
            context: "CRM platform targeting small businesses.".into(),
            metadata: ScenarioMetadata {
                industry_key: "b2b_saas".into(),
                platform_key: "meta".into(),
                performance_level: "good".into(),
            },
        };

        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value["_metadata"]["industry_key"], "b2b_saas");
        assert!(value.get("metadata").is_none());
    }
}
