//! Metric synthesis: turns benchmark ranges into a self-consistent ad funnel.
//!
//! Continuous rates are drawn from the industry ranges and biased by the
//! performance level, but they are only design intent. Whole-number funnel
//! counts are derived from them in a fixed order and every reported rate is
//! recomputed from those counts, so reported rates always agree with reported
//! counts.

use super::draws::Draws;
use crate::benchmarks::{IndustryProfile, PerformanceLevel, PlatformProfile};

/// Conversions are never reported below this count.
pub const MIN_CONVERSIONS: u64 = 8;

/// Continuous rates after the performance multipliers are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRates {
    /// Click-through rate, percent.
    pub ctr: f64,
    /// Conversion rate, percent.
    pub cvr: f64,
    /// Cost per click, dollars.
    pub cpc: f64,
}

/// One period of funnel metrics for a single campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelMetrics {
    pub spend: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Realized click-through rate, percent.
    pub ctr: f64,
    /// Realized conversion rate, percent.
    pub cvr: f64,
    /// Realized cost per click, dollars.
    pub cpc: f64,
    /// Realized cost per acquisition, dollars.
    pub cpa: f64,
    /// Present only for revenue-bearing industries.
    pub revenue: Option<f64>,
    /// Return on ad spend as a multiple; present only with revenue.
    pub roas: Option<f64>,
}

impl FunnelMetrics {
    /// Builds the realized metrics from whole-number counts.
    ///
    /// Divisions by a zero count yield 0 instead of faulting.
    pub fn from_counts(
        spend: u64,
        impressions: u64,
        clicks: u64,
        conversions: u64,
        order_value: Option<f64>,
    ) -> Self {
        let spend_f = spend as f64;
        let ctr = guarded_div(clicks as f64, impressions as f64, "impressions") * 100.0;
        let cvr = guarded_div(conversions as f64, clicks as f64, "clicks") * 100.0;
        let cpc = guarded_div(spend_f, clicks as f64, "clicks");
        let cpa = guarded_div(spend_f, conversions as f64, "conversions");

        let revenue = order_value.map(|aov| conversions as f64 * aov);
        let roas = revenue.map(|rev| guarded_div(rev, spend_f, "spend"));

        Self {
            spend,
            impressions,
            clicks,
            conversions,
            ctr,
            cvr,
            cpc,
            cpa,
            revenue,
            roas,
        }
    }
}

/// Draws the continuous target rates for one (industry, platform, level) triple.
///
/// Draw order: base CTR, base CVR, base CPC, then the CTR, CVR and CPC multipliers.
pub fn draw_target_rates<D: Draws + ?Sized>(
    industry: &IndustryProfile,
    platform: &PlatformProfile,
    level: &PerformanceLevel,
    draws: &mut D,
) -> TargetRates {
    let cpc_range = industry.cpc_for(platform.cpc_channel);

    let base_ctr = draws.uniform(industry.ctr.lo, industry.ctr.hi);
    let base_cvr = draws.uniform(industry.cvr.lo, industry.cvr.hi);
    let base_cpc = draws.uniform(cpc_range.lo, cpc_range.hi);

    TargetRates {
        ctr: base_ctr * draws.uniform(level.ctr_mult.lo, level.ctr_mult.hi),
        cvr: base_cvr * draws.uniform(level.cvr_mult.lo, level.cvr_mult.hi),
        cpc: base_cpc * draws.uniform(level.cpc_mult.lo, level.cpc_mult.hi),
    }
}

/// Derives whole-number funnel counts from spend and target rates.
///
/// Returns `(impressions, clicks, conversions)`; each step rounds down and
/// conversions are raised to [`MIN_CONVERSIONS`].
pub fn derive_counts(spend: u64, rates: &TargetRates) -> (u64, u64, u64) {
    let clicks = floor_count(guarded_div(spend as f64, rates.cpc, "target cpc"));
    let impressions = floor_count(guarded_div(clicks as f64, rates.ctr / 100.0, "target ctr"));
    let conversions = floor_count(clicks as f64 * (rates.cvr / 100.0)).max(MIN_CONVERSIONS);
    (impressions, clicks, conversions)
}

/// Synthesizes one period of funnel metrics.
///
/// Draw order: the six rate draws of [`draw_target_rates`], the weekly spend,
/// then the order value for revenue-bearing industries.
pub fn synthesize<D: Draws + ?Sized>(
    industry: &IndustryProfile,
    platform: &PlatformProfile,
    level: &PerformanceLevel,
    draws: &mut D,
) -> FunnelMetrics {
    let rates = draw_target_rates(industry, platform, level, draws);
    let spend = draws.integer(industry.weekly_spend.lo, industry.weekly_spend.hi);
    let (impressions, clicks, conversions) = derive_counts(spend, &rates);

    let order_value = industry
        .is_revenue_bearing()
        .then(|| draws.uniform(industry.order_value.lo, industry.order_value.hi));

    let metrics = FunnelMetrics::from_counts(spend, impressions, clicks, conversions, order_value);
    tracing::trace!(
        industry = industry.key,
        platform = platform.key,
        level = level.key,
        spend,
        impressions,
        clicks,
        conversions,
        "Synthesized funnel"
    );
    metrics
}

fn guarded_div(numerator: f64, denominator: f64, what: &str) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        tracing::warn!(denominator = what, "Zero denominator in funnel math, using 0");
        0.0
    }
}

fn floor_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}
