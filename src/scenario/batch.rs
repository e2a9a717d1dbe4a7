//! Batch scenario generation.
//!
//! Balanced mode assigns the i-th scenario `keys[i % len]` on each axis
//! independently: three round-robins, not a stratified cross-product. Every
//! individual key appears near-equally often but not every combination is
//! guaranteed to appear.

use super::composer::compose_profiles;
use super::draws::Draws;
use super::Scenario;
use crate::benchmarks::{BenchmarkRegistry, IndustryProfile, PerformanceLevel, PlatformProfile};

/// Produces batches of scenarios from a registry and a draw source.
pub struct ScenarioGenerator<D: Draws> {
    registry: &'static BenchmarkRegistry,
    draws: D,
}

impl<D: Draws> ScenarioGenerator<D> {
    pub fn new(registry: &'static BenchmarkRegistry, draws: D) -> Self {
        Self { registry, draws }
    }

    /// A generator over the built-in benchmark tables.
    pub fn standard(draws: D) -> Self {
        Self::new(BenchmarkRegistry::standard(), draws)
    }

    /// Generates `count` scenarios.
    pub fn generate(&mut self, count: usize, balanced: bool) -> Vec<Scenario> {
        let scenarios: Vec<Scenario> = self.stream(count, balanced).collect();
        tracing::debug!(count = scenarios.len(), balanced, "Generated scenario batch");
        scenarios
    }

    /// Lazily generates `count` scenarios, one composition per item pulled.
    ///
    /// Yields nothing if any registry table is empty.
    pub fn stream(&mut self, count: usize, balanced: bool) -> impl Iterator<Item = Scenario> + '_ {
        let registry = self.registry;
        let count = if has_all_tables(registry) { count } else { 0 };
        (0..count).map(move |i| {
            let (industry, platform, level) = if balanced {
                round_robin(registry, i)
            } else {
                random_selection(registry, &mut self.draws)
            };
            compose_profiles(industry, platform, level, &mut self.draws)
        })
    }
}

fn has_all_tables(registry: &BenchmarkRegistry) -> bool {
    let ok = !registry.industries().is_empty()
        && !registry.platforms().is_empty()
        && !registry.performance_levels().is_empty();
    if !ok {
        tracing::warn!("Benchmark registry has an empty table, generating no scenarios");
    }
    ok
}

type Selection = (
    &'static IndustryProfile,
    &'static PlatformProfile,
    &'static PerformanceLevel,
);

fn round_robin(registry: &BenchmarkRegistry, i: usize) -> Selection {
    let industries = registry.industries();
    let platforms = registry.platforms();
    let levels = registry.performance_levels();
    (
        &industries[i % industries.len()],
        &platforms[i % platforms.len()],
        &levels[i % levels.len()],
    )
}

fn random_selection<D: Draws + ?Sized>(registry: &BenchmarkRegistry, draws: &mut D) -> Selection {
    let industries = registry.industries();
    let platforms = registry.platforms();
    let levels = registry.performance_levels();
    let industry = &industries[draws.index(industries.len())];
    let platform = &platforms[draws.index(platforms.len())];
    let level = &levels[draws.index(levels.len())];
    (industry, platform, level)
}
