//! Benchmark registry for scenario synthesis.
//!
//! Static, read-only tables of per-industry, per-platform and per-performance-level
//! statistical ranges. The tables are `'static` data built at compile time; the
//! only way to reach them is through [`BenchmarkRegistry`] lookups and key
//! enumeration, which iterate in table order (the order the balanced batch
//! generator round-robins over).

mod industries;
mod performance;
mod platforms;

pub use industries::{ConversionKind, CpcRanges, IndustryProfile, INDUSTRIES};
pub use performance::{
    Outlook, PerformanceLevel, PreviousShift, MIN_RECOVERY_ROAS, PERFORMANCE_LEVELS,
};
pub use platforms::{CpcChannel, PlatformProfile, PLATFORMS};

use crate::error::{KeyKind, ScenarioError};

/// A closed interval `[lo, hi]` of continuous benchmark values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRange {
    pub lo: f64,
    pub hi: f64,
}

impl BenchmarkRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// The `(0, 0)` sentinel used for "not applicable" (e.g. no order value).
    pub const fn zero() -> Self {
        Self { lo: 0.0, hi: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.lo == 0.0 && self.hi == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }
}

/// A closed interval of whole-dollar weekly spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendRange {
    pub lo: u64,
    pub hi: u64,
}

impl SpendRange {
    pub const fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }
}

/// Read-only view over the benchmark tables.
#[derive(Debug)]
pub struct BenchmarkRegistry {
    industries: &'static [IndustryProfile],
    platforms: &'static [PlatformProfile],
    levels: &'static [PerformanceLevel],
}

static STANDARD: BenchmarkRegistry = BenchmarkRegistry {
    industries: INDUSTRIES,
    platforms: PLATFORMS,
    levels: PERFORMANCE_LEVELS,
};

impl BenchmarkRegistry {
    /// The process-wide registry backed by the built-in benchmark tables.
    pub fn standard() -> &'static BenchmarkRegistry {
        &STANDARD
    }

    /// Looks up an industry profile by key.
    pub fn industry(&self, key: &str) -> Result<&'static IndustryProfile, ScenarioError> {
        self.industries
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| unknown(KeyKind::Industry, key))
    }

    /// Looks up a platform profile by key.
    pub fn platform(&self, key: &str) -> Result<&'static PlatformProfile, ScenarioError> {
        self.platforms
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| unknown(KeyKind::Platform, key))
    }

    /// Looks up a performance level by key.
    pub fn performance_level(&self, key: &str) -> Result<&'static PerformanceLevel, ScenarioError> {
        self.levels
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| unknown(KeyKind::PerformanceLevel, key))
    }

    pub fn industries(&self) -> &'static [IndustryProfile] {
        self.industries
    }

    pub fn platforms(&self) -> &'static [PlatformProfile] {
        self.platforms
    }

    pub fn performance_levels(&self) -> &'static [PerformanceLevel] {
        self.levels
    }

    pub fn industry_keys(&self) -> Vec<&'static str> {
        self.industries.iter().map(|p| p.key).collect()
    }

    pub fn platform_keys(&self) -> Vec<&'static str> {
        self.platforms.iter().map(|p| p.key).collect()
    }

    pub fn performance_level_keys(&self) -> Vec<&'static str> {
        self.levels.iter().map(|p| p.key).collect()
    }

    /// Checks the range invariants of every table.
    ///
    /// Rate, cost and spend ranges must satisfy `0 < lo <= hi`; order-value
    /// ranges may additionally be the `(0, 0)` sentinel.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.industries.is_empty() {
            return Err(ScenarioError::EmptyTable("industries".to_string()));
        }
        if self.platforms.is_empty() {
            return Err(ScenarioError::EmptyTable("platforms".to_string()));
        }
        if self.levels.is_empty() {
            return Err(ScenarioError::EmptyTable("performance_levels".to_string()));
        }

        for industry in self.industries {
            let ranges = [
                ("ctr", industry.ctr),
                ("cvr", industry.cvr),
                ("cpc_meta", industry.cpc.meta),
                ("cpc_google", industry.cpc.google),
                (
                    "weekly_spend",
                    BenchmarkRange::new(
                        industry.weekly_spend.lo as f64,
                        industry.weekly_spend.hi as f64,
                    ),
                ),
            ];
            for (field, range) in ranges {
                check_positive(industry.key, field, range)?;
            }
            if !industry.order_value.is_zero() {
                check_positive(industry.key, "order_value", industry.order_value)?;
            }
            if industry.objectives.is_empty() || industry.context_templates.is_empty() {
                return Err(ScenarioError::EmptyTable(format!(
                    "{}: objectives/context_templates",
                    industry.key
                )));
            }
        }

        for level in self.levels {
            for (field, range) in [
                ("ctr_mult", level.ctr_mult),
                ("cvr_mult", level.cvr_mult),
                ("cpc_mult", level.cpc_mult),
            ] {
                check_positive(level.key, field, range)?;
            }
        }

        Ok(())
    }
}

fn unknown(kind: KeyKind, key: &str) -> ScenarioError {
    ScenarioError::UnknownKey {
        kind,
        key: key.to_string(),
    }
}

fn check_positive(owner: &str, field: &str, range: BenchmarkRange) -> Result<(), ScenarioError> {
    if range.lo > 0.0 && range.lo <= range.hi {
        Ok(())
    } else {
        Err(ScenarioError::InvalidRange {
            owner: owner.to_string(),
            field: field.to_string(),
            lo: range.lo,
            hi: range.hi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_valid() {
        BenchmarkRegistry::standard()
            .validate()
            .expect("built-in tables should satisfy range invariants");
    }

    #[test]
    fn test_key_enumeration_is_stable_and_complete() {
        let registry = BenchmarkRegistry::standard();
        assert_eq!(registry.industry_keys().len(), 10);
        assert_eq!(
            registry.platform_keys(),
            vec!["meta", "google_search", "google_shopping"]
        );
        assert_eq!(
            registry.performance_level_keys(),
            vec!["excellent", "good", "declining", "poor", "mixed"]
        );
        assert_eq!(registry.industry_keys()[0], "ecommerce_fashion");
        assert_eq!(registry.industry_keys(), registry.industry_keys());
    }

    #[test]
    fn test_every_enumerated_key_resolves() {
        let registry = BenchmarkRegistry::standard();
        for key in registry.industry_keys() {
            assert_eq!(registry.industry(key).map(|p| p.key), Ok(key));
        }
        for key in registry.platform_keys() {
            assert_eq!(registry.platform(key).map(|p| p.key), Ok(key));
        }
        for key in registry.performance_level_keys() {
            assert_eq!(registry.performance_level(key).map(|p| p.key), Ok(key));
        }
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let registry = BenchmarkRegistry::standard();
        assert_eq!(
            registry.industry("crypto_casino").unwrap_err(),
            ScenarioError::UnknownKey {
                kind: KeyKind::Industry,
                key: "crypto_casino".to_string()
            }
        );
        assert!(matches!(
            registry.platform("tiktok"),
            Err(ScenarioError::UnknownKey {
                kind: KeyKind::Platform,
                ..
            })
        ));
        assert!(matches!(
            registry.performance_level("stellar"),
            Err(ScenarioError::UnknownKey {
                kind: KeyKind::PerformanceLevel,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        static BROKEN: [PerformanceLevel; 1] = [PerformanceLevel {
            key: "broken",
            description: "inverted",
            outlook: Outlook::Mixed,
            ctr_mult: BenchmarkRange::new(1.2, 0.8),
            cvr_mult: BenchmarkRange::new(1.0, 1.0),
            cpc_mult: BenchmarkRange::new(1.0, 1.0),
        }];
        let registry = BenchmarkRegistry {
            industries: INDUSTRIES,
            platforms: PLATFORMS,
            levels: &BROKEN,
        };
        assert!(matches!(
            registry.validate(),
            Err(ScenarioError::InvalidRange { ref field, .. }) if field == "ctr_mult"
        ));
    }

    #[test]
    fn test_range_helpers() {
        let range = BenchmarkRange::new(1.0, 3.0);
        assert!(range.contains(1.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(3.01));
        assert_eq!(range.midpoint(), 2.0);
        assert!(BenchmarkRange::zero().is_zero());
        assert!(!range.is_zero());
    }
}
