//! Performance regimes and the narrative constants that go with them.

use super::BenchmarkRange;

/// Direction a campaign is heading, which shapes both the synthesized metrics
/// and the story told by the previous-period snapshot and targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    Excellent,
    Good,
    Declining,
    Poor,
    Mixed,
}

/// Multipliers applied to the current realized metrics to build the
/// previous-period snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousShift {
    pub ctr: BenchmarkRange,
    pub cvr: BenchmarkRange,
    pub cpa: BenchmarkRange,
    pub roas: BenchmarkRange,
}

impl Outlook {
    /// Declining campaigns had a clearly better previous period, excellent ones a
    /// slightly worse one, poor ones a similarly poor one; the rest vary neutrally.
    pub fn previous_shift(&self) -> PreviousShift {
        match self {
            Outlook::Declining => PreviousShift {
                ctr: BenchmarkRange::new(1.25, 1.50),
                cvr: BenchmarkRange::new(1.30, 1.55),
                cpa: BenchmarkRange::new(0.60, 0.75),
                roas: BenchmarkRange::new(1.30, 1.60),
            },
            Outlook::Excellent => PreviousShift {
                ctr: BenchmarkRange::new(0.88, 0.95),
                cvr: BenchmarkRange::new(0.85, 0.95),
                cpa: BenchmarkRange::new(1.08, 1.18),
                roas: BenchmarkRange::new(0.85, 0.92),
            },
            Outlook::Poor => PreviousShift {
                ctr: BenchmarkRange::new(0.95, 1.15),
                cvr: BenchmarkRange::new(0.90, 1.10),
                cpa: BenchmarkRange::new(0.90, 1.10),
                roas: BenchmarkRange::new(0.90, 1.10),
            },
            Outlook::Good | Outlook::Mixed => PreviousShift {
                ctr: BenchmarkRange::new(0.85, 1.15),
                cvr: BenchmarkRange::new(0.85, 1.15),
                cpa: BenchmarkRange::new(0.85, 1.15),
                roas: BenchmarkRange::new(0.85, 1.15),
            },
        }
    }

    pub fn is_underperforming(&self) -> bool {
        matches!(self, Outlook::Poor | Outlook::Declining)
    }

    /// Multiplier range for the target CPA relative to the current CPA.
    pub fn target_cpa_factor(&self) -> BenchmarkRange {
        if self.is_underperforming() {
            BenchmarkRange::new(0.65, 0.80)
        } else {
            BenchmarkRange::new(0.90, 1.05)
        }
    }

    /// Multiplier range for the target ROAS relative to the current ROAS.
    pub fn target_roas_factor(&self) -> BenchmarkRange {
        if self.is_underperforming() {
            BenchmarkRange::new(1.30, 1.50)
        } else {
            BenchmarkRange::new(0.95, 1.05)
        }
    }

    /// Sentence appended to the scenario context, if the regime has one.
    pub fn context_note(&self) -> Option<&'static str> {
        match self {
            Outlook::Declining => Some("Performance has declined over the past 2 weeks."),
            Outlook::Poor => Some("Campaign struggling to meet targets."),
            Outlook::Excellent => Some("Campaign exceeding expectations."),
            Outlook::Good | Outlook::Mixed => None,
        }
    }
}

/// Absolute floor on the target ROAS for underperforming regimes.
pub const MIN_RECOVERY_ROAS: f64 = 2.0;

/// A named regime biasing CTR, CVR and CPC away from the industry baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceLevel {
    pub key: &'static str,
    pub description: &'static str,
    pub outlook: Outlook,
    pub ctr_mult: BenchmarkRange,
    pub cvr_mult: BenchmarkRange,
    /// Lower is better for cost.
    pub cpc_mult: BenchmarkRange,
}

pub const PERFORMANCE_LEVELS: &[PerformanceLevel] = &[
    PerformanceLevel {
        key: "excellent",
        description: "Exceeding all targets",
        outlook: Outlook::Excellent,
        ctr_mult: BenchmarkRange::new(1.15, 1.35),
        cvr_mult: BenchmarkRange::new(1.20, 1.45),
        cpc_mult: BenchmarkRange::new(0.85, 1.00),
    },
    PerformanceLevel {
        key: "good",
        description: "Meeting targets",
        outlook: Outlook::Good,
        ctr_mult: BenchmarkRange::new(0.95, 1.10),
        cvr_mult: BenchmarkRange::new(0.95, 1.10),
        cpc_mult: BenchmarkRange::new(0.95, 1.10),
    },
    PerformanceLevel {
        key: "declining",
        description: "Was good, getting worse",
        outlook: Outlook::Declining,
        ctr_mult: BenchmarkRange::new(0.75, 0.90),
        cvr_mult: BenchmarkRange::new(0.70, 0.85),
        cpc_mult: BenchmarkRange::new(1.10, 1.30),
    },
    PerformanceLevel {
        key: "poor",
        description: "Below targets",
        outlook: Outlook::Poor,
        ctr_mult: BenchmarkRange::new(0.55, 0.75),
        cvr_mult: BenchmarkRange::new(0.45, 0.65),
        cpc_mult: BenchmarkRange::new(1.20, 1.50),
    },
    PerformanceLevel {
        key: "mixed",
        description: "High variance, inconsistent",
        outlook: Outlook::Mixed,
        ctr_mult: BenchmarkRange::new(0.70, 1.20),
        cvr_mult: BenchmarkRange::new(0.60, 1.15),
        cpc_mult: BenchmarkRange::new(0.90, 1.25),
    },
];
