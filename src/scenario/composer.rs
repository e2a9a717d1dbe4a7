//! Scenario composition.
//!
//! Wraps one synthesized funnel with the platform-specific metrics, a
//! previous-period snapshot, targets, and free-text context. Draw order after
//! the synthesizer's own draws: reach ratio, impression share, top-of-page
//! rate (each only when the platform reports it), the four previous-period
//! multipliers, the target CPA factor, the target ROAS factor (revenue only),
//! the context template and its seven placeholder candidates, the period,
//! then the objective.

use super::draws::{pick, Draws};
use super::format::{format_count, format_currency, format_multiple, format_percent};
use super::synthesizer::{synthesize, FunnelMetrics};
use super::{MetricSet, Scenario, ScenarioMetadata};
use crate::benchmarks::{
    BenchmarkRegistry, IndustryProfile, PerformanceLevel, PlatformProfile, MIN_RECOVERY_ROAS,
};
use crate::error::ScenarioError;

/// Share of impressions that reached unique users.
const REACH_RATIO: (f64, f64) = (0.35, 0.50);
/// Search impression share, percent.
const IMPRESSION_SHARE: (f64, f64) = (28.0, 55.0);
/// Top-of-page rate, percent.
const TOP_OF_PAGE: (f64, f64) = (55.0, 82.0);

pub const PERIODS: &[&str] = &["Last 7 days", "Last 14 days", "Last 30 days"];

const AGE_RANGES: &[&str] = &["18-35", "25-45", "30-55", "25-54"];
const RADII: &[&str] = &["10", "15", "20", "25"];
const SEASONS: &[&str] = &["spring", "summer", "fall", "winter"];
const COMPETITORS: &[&str] = &[
    "Monday.com, Asana",
    "HubSpot, Salesforce",
    "Mailchimp, Klaviyo",
];
const PRICES: &[&str] = &["9.99", "14.99", "19.99"];
const PRICE_RANGE: &str = "$50-$500";
const LOCATION_COUNTS: &[&str] = &["5", "12", "25", "50"];

/// Composes a scenario for the given registry keys.
///
/// Fails with [`ScenarioError::UnknownKey`] if any key is absent from the registry.
pub fn compose<D: Draws + ?Sized>(
    registry: &BenchmarkRegistry,
    industry_key: &str,
    platform_key: &str,
    level_key: &str,
    draws: &mut D,
) -> Result<Scenario, ScenarioError> {
    let industry = registry.industry(industry_key)?;
    let platform = registry.platform(platform_key)?;
    let level = registry.performance_level(level_key)?;
    Ok(compose_profiles(industry, platform, level, draws))
}

/// Composes a scenario from already-resolved profiles.
pub fn compose_profiles<D: Draws + ?Sized>(
    industry: &IndustryProfile,
    platform: &PlatformProfile,
    level: &PerformanceLevel,
    draws: &mut D,
) -> Scenario {
    let funnel = synthesize(industry, platform, level, draws);

    let current_metrics = current_metrics(industry, platform, &funnel, draws);
    let previous_metrics = previous_metrics(level, &funnel, draws);
    let targets = targets(level, &funnel, draws);
    let context = context(industry, level, draws);
    let period = pick(draws, PERIODS).copied().unwrap_or(PERIODS[0]);
    let objective = pick(draws, industry.objectives)
        .copied()
        .unwrap_or_default();

    Scenario {
        platform: platform.name.to_string(),
        industry: industry.name.to_string(),
        objective: objective.to_string(),
        period: period.to_string(),
        current_metrics,
        previous_metrics,
        targets,
        context,
        metadata: ScenarioMetadata {
            industry_key: industry.key.to_string(),
            platform_key: platform.key.to_string(),
            performance_level: level.key.to_string(),
        },
    }
}

fn current_metrics<D: Draws + ?Sized>(
    industry: &IndustryProfile,
    platform: &PlatformProfile,
    funnel: &FunnelMetrics,
    draws: &mut D,
) -> MetricSet {
    let mut metrics = MetricSet::new();
    metrics.insert("ad_spend", format_currency(funnel.spend as f64));
    metrics.insert("impressions", format_count(funnel.impressions));
    metrics.insert("clicks", format_count(funnel.clicks));
    metrics.insert("ctr", format_percent(funnel.ctr));
    metrics.insert("cpc", format_currency(funnel.cpc));

    if platform.reports_reach {
        let ratio = draws.uniform(REACH_RATIO.0, REACH_RATIO.1);
        let reach = (funnel.impressions as f64 * ratio).floor() as u64;
        let frequency = if reach > 0 {
            round2(funnel.impressions as f64 / reach as f64)
        } else {
            1.0
        };
        metrics.insert("reach", format_count(reach));
        metrics.insert("frequency", format!("{:.2}", frequency));
    }

    if platform.reports_impression_share {
        let share = draws.uniform(IMPRESSION_SHARE.0, IMPRESSION_SHARE.1);
        metrics.insert("search_impression_share", format_percent(share));
    }

    if platform.reports_top_of_page {
        let top = draws.uniform(TOP_OF_PAGE.0, TOP_OF_PAGE.1);
        metrics.insert("top_of_page_rate", format_percent(top));
    }

    metrics.insert(
        industry.conversion_kind().label(),
        format_count(funnel.conversions),
    );
    metrics.insert("conversion_rate", format_percent(funnel.cvr));
    metrics.insert("cpa", format_currency(funnel.cpa));

    if let (Some(revenue), Some(roas)) = (funnel.revenue, funnel.roas) {
        metrics.insert("revenue", format_currency(revenue));
        metrics.insert("roas", format_multiple(roas, 2));
    }

    metrics
}

fn previous_metrics<D: Draws + ?Sized>(
    level: &PerformanceLevel,
    funnel: &FunnelMetrics,
    draws: &mut D,
) -> MetricSet {
    let shift = level.outlook.previous_shift();
    let ctr_mult = draws.uniform(shift.ctr.lo, shift.ctr.hi);
    let cvr_mult = draws.uniform(shift.cvr.lo, shift.cvr.hi);
    let cpa_mult = draws.uniform(shift.cpa.lo, shift.cpa.hi);
    let roas_mult = draws.uniform(shift.roas.lo, shift.roas.hi);

    let mut metrics = MetricSet::new();
    metrics.insert("ctr", format_percent(funnel.ctr * ctr_mult));
    metrics.insert("conversion_rate", format_percent(funnel.cvr * cvr_mult));
    metrics.insert("cpa", format_currency(funnel.cpa * cpa_mult));
    if let Some(roas) = funnel.roas {
        metrics.insert("roas", format_multiple(roas * roas_mult, 2));
    }
    metrics
}

fn targets<D: Draws + ?Sized>(
    level: &PerformanceLevel,
    funnel: &FunnelMetrics,
    draws: &mut D,
) -> MetricSet {
    let outlook = level.outlook;
    let mut targets = MetricSet::new();

    let cpa_factor = outlook.target_cpa_factor();
    let target_cpa = funnel.cpa * draws.uniform(cpa_factor.lo, cpa_factor.hi);
    targets.insert("target_cpa", format_currency(target_cpa));

    if let Some(roas) = funnel.roas {
        let roas_factor = outlook.target_roas_factor();
        let mut target_roas = roas * draws.uniform(roas_factor.lo, roas_factor.hi);
        if outlook.is_underperforming() {
            target_roas = target_roas.max(MIN_RECOVERY_ROAS);
        }
        targets.insert("target_roas", format_multiple(target_roas, 1));
    }

    targets
}

fn context<D: Draws + ?Sized>(
    industry: &IndustryProfile,
    level: &PerformanceLevel,
    draws: &mut D,
) -> String {
    let template = pick(draws, industry.context_templates)
        .copied()
        .unwrap_or_default();

    let fills = [
        ("{age_range}", pick(draws, AGE_RANGES)),
        ("{radius}", pick(draws, RADII)),
        ("{season}", pick(draws, SEASONS)),
        ("{competitors}", pick(draws, COMPETITORS)),
        ("{price}", pick(draws, PRICES)),
        ("{price_range}", Some(&PRICE_RANGE)),
        ("{num_locations}", pick(draws, LOCATION_COUNTS)),
    ];

    let mut context = template.to_string();
    for (placeholder, value) in fills {
        if let Some(value) = value {
            context = context.replace(placeholder, value);
        }
    }

    if let Some(note) = level.outlook.context_note() {
        context.push(' ');
        context.push_str(note);
    }
    context
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::draws::{ScriptedDraws, SeededDraws};

    #[test]
    fn test_saas_search_poor_golden_scenario() {
        let mut draws = ScriptedDraws::new()
            // base rates, multipliers
            .with_uniforms([3.0, 3.5, 5.0, 0.6, 0.5, 1.25])
            // impression share, top of page
            .with_uniforms([40.0, 70.0])
            // previous-period multipliers, target cpa factor
            .with_uniforms([1.0, 1.0, 1.0, 1.0, 0.8])
            .with_integers([6000])
            // template, age, radius, season, competitors, price, locations, period, objective
            .with_indices([0, 0, 0, 0, 1, 0, 0, 1, 0]);

        let scenario = compose(
            BenchmarkRegistry::standard(),
            "b2b_saas",
            "google_search",
            "poor",
            &mut draws,
        )
        .unwrap();

        let current: Vec<(&str, &str)> = scenario.current_metrics.iter().collect();
        assert_eq!(
            current,
            vec![
                ("ad_spend", "$6,000"),
                ("impressions", "53,333"),
                ("clicks", "960"),
                ("ctr", "1.80%"),
                ("cpc", "$6.25"),
                ("search_impression_share", "40.00%"),
                ("top_of_page_rate", "70.00%"),
                ("leads", "16"),
                ("conversion_rate", "1.67%"),
                ("cpa", "$375"),
            ]
        );

        let previous: Vec<(&str, &str)> = scenario.previous_metrics.iter().collect();
        assert_eq!(
            previous,
            vec![
                ("ctr", "1.80%"),
                ("conversion_rate", "1.67%"),
                ("cpa", "$375"),
            ]
        );
        assert_eq!(scenario.targets.get("target_cpa"), Some("$300"));
        assert!(!scenario.targets.contains("target_roas"));

        assert_eq!(scenario.platform, "Google Ads (Search)");
        assert_eq!(scenario.industry, "B2B SaaS");
        assert_eq!(scenario.objective, "Lead Generation (Demo Requests)");
        assert_eq!(scenario.period, "Last 14 days");
        assert_eq!(
            scenario.context,
            "Project management software. Competing with HubSpot, Salesforce. \
             Campaign struggling to meet targets."
        );
        assert_eq!(scenario.metadata.performance_level, "poor");
        assert_eq!(draws.remaining(), 0);
    }

    #[test]
    fn test_healthcare_meta_good_reach_and_revenue() {
        let mut draws = ScriptedDraws::new()
            .with_uniforms([2.0, 4.5, 1.0, 1.0, 1.0, 1.0])
            // order value, reach ratio
            .with_uniforms([200.0, 0.5])
            // previous-period multipliers, target cpa factor, target roas factor
            .with_uniforms([1.0, 1.0, 1.0, 1.0, 1.0, 1.0])
            .with_integers([3000])
            .with_indices([0, 1, 2]);

        let scenario = compose(
            BenchmarkRegistry::standard(),
            "local_healthcare",
            "meta",
            "good",
            &mut draws,
        )
        .unwrap();

        let m = &scenario.current_metrics;
        assert_eq!(m.get("ad_spend"), Some("$3,000"));
        assert_eq!(m.get("impressions"), Some("150,000"));
        assert_eq!(m.get("clicks"), Some("3,000"));
        assert_eq!(m.get("ctr"), Some("2.00%"));
        assert_eq!(m.get("cpc"), Some("$1.00"));
        assert_eq!(m.get("reach"), Some("75,000"));
        assert_eq!(m.get("frequency"), Some("2.00"));
        assert_eq!(m.get("leads"), Some("135"));
        assert_eq!(m.get("conversion_rate"), Some("4.50%"));
        assert_eq!(m.get("cpa"), Some("$22.22"));
        assert_eq!(m.get("revenue"), Some("$27,000"));
        assert_eq!(m.get("roas"), Some("9.00x"));
        assert!(!m.contains("search_impression_share"));
        assert!(!m.contains("top_of_page_rate"));

        assert_eq!(scenario.previous_metrics.get("roas"), Some("9.00x"));
        assert_eq!(scenario.targets.get("target_cpa"), Some("$22.22"));
        assert_eq!(scenario.targets.get("target_roas"), Some("9.0x"));
        assert_eq!(
            scenario.context,
            "Dental clinic. Targeting 20-mile radius. Ages 25-45."
        );
    }

    #[test]
    fn test_underperforming_target_roas_has_floor() {
        let funnel = FunnelMetrics::from_counts(5000, 100_000, 2000, 20, Some(50.0));
        assert_eq!(funnel.roas, Some(0.2));

        let level = BenchmarkRegistry::standard()
            .performance_level("declining")
            .unwrap();
        let mut draws = ScriptedDraws::new().with_uniforms([0.7, 1.4]);
        let targets = targets(level, &funnel, &mut draws);
        assert_eq!(targets.get("target_roas"), Some("2.0x"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut draws = SeededDraws::from_seed(1);
        let err = compose(
            BenchmarkRegistry::standard(),
            "b2b_saas",
            "tiktok",
            "good",
            &mut draws,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownKey { .. }));
    }

    #[test]
    fn test_context_has_no_unfilled_placeholders() {
        let registry = BenchmarkRegistry::standard();
        let mut draws = SeededDraws::from_seed(11);
        for industry in registry.industry_keys() {
            for level in registry.performance_level_keys() {
                for _ in 0..8 {
                    let scenario = compose(registry, industry, "meta", level, &mut draws).unwrap();
                    assert!(!scenario.context.contains('{'), "{}", scenario.context);
                    assert!(!scenario.context.contains('}'), "{}", scenario.context);
                }
            }
        }
    }

    #[test]
    fn test_regime_note_only_for_non_neutral_levels() {
        let registry = BenchmarkRegistry::standard();
        let mut draws = SeededDraws::from_seed(5);
        let good = compose(registry, "education", "meta", "good", &mut draws).unwrap();
        let excellent = compose(registry, "education", "meta", "excellent", &mut draws).unwrap();
        assert!(!good.context.contains("expectations"));
        assert!(excellent.context.ends_with("Campaign exceeding expectations."));
    }

    #[test]
    fn test_same_seed_same_scenario() {
        let registry = BenchmarkRegistry::standard();
        let a = compose(
            registry,
            "ecommerce_home",
            "google_shopping",
            "mixed",
            &mut SeededDraws::from_seed(2024),
        )
        .unwrap();
        let b = compose(
            registry,
            "ecommerce_home",
            "google_shopping",
            "mixed",
            &mut SeededDraws::from_seed(2024),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
