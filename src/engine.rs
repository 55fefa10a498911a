//! Payoff comparison engine: normalize, simulate both strategies, compare

use crate::amortization::{
    simulate_sweep, simulate_traditional, SweepLimits, SweepPolicy, SweepRun, TraditionalRun,
};
use crate::compare::{compare, ComparisonResult};
use crate::error::EngineError;
use crate::scenario::{normalize, RawScenario, ScenarioInput};
use anyhow::Context;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Configuration for an engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How the sweep strategy allocates surplus cash and draws on the line
    pub sweep_policy: SweepPolicy,

    /// Longest accepted remaining term
    pub max_term_months: u32,

    /// Sweep ceiling as a multiple of the remaining term
    pub horizon_multiplier: u32,

    /// Absolute sweep ceiling regardless of term
    pub absolute_month_cap: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sweep_policy: SweepPolicy::default(),
            max_term_months: 600,
            horizon_multiplier: 2,
            absolute_month_cap: 1200,
        }
    }
}

impl EngineConfig {
    /// Load a config from JSON; absent keys take their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Iteration ceiling for a sweep run over `term_months`
    pub fn sweep_ceiling(&self, term_months: u32) -> u32 {
        term_months
            .saturating_mul(self.horizon_multiplier.max(1))
            .min(self.absolute_month_cap)
            .max(term_months)
    }
}

/// Both schedules of a scenario and their comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffComparison {
    pub input: ScenarioInput,
    pub traditional: TraditionalRun,
    pub sweep: SweepRun,
    pub comparison: ComparisonResult,
}

/// Main payoff engine
#[derive(Debug, Clone, Default)]
pub struct PayoffEngine {
    config: EngineConfig,
}

impl PayoffEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Validate and normalize a raw scenario
    pub fn normalize(&self, raw: &RawScenario) -> Result<ScenarioInput, EngineError> {
        normalize(raw, self.config.max_term_months)
    }

    /// Normalize `raw`, run both strategies and compare them
    pub fn run(&self, raw: &RawScenario) -> Result<PayoffComparison, EngineError> {
        let input = self.normalize(raw)?;
        self.run_input(&input)
    }

    /// Run both strategies on an already-normalized scenario
    pub fn run_input(&self, input: &ScenarioInput) -> Result<PayoffComparison, EngineError> {
        let limits = SweepLimits {
            policy: self.config.sweep_policy,
            ceiling: self.config.sweep_ceiling(input.remaining_term_months),
        };

        let traditional = simulate_traditional(input);
        let sweep = simulate_sweep(input, limits)?;
        let comparison = compare(&traditional.result, &sweep.result, input);

        info!(
            "{}: traditional {} months / {} interest, sweep {} months / {} interest, saved {} ({}%)",
            input.label(),
            traditional.result.payoff_months,
            traditional.result.total_interest_paid,
            sweep.result.payoff_months,
            sweep.result.total_interest_paid,
            comparison.interest_saved,
            comparison.percent_interest_saved
        );

        Ok(PayoffComparison {
            input: input.clone(),
            traditional,
            sweep,
            comparison,
        })
    }

    /// Run many scenarios in parallel; results keep the input order
    pub fn run_batch(&self, scenarios: &[RawScenario]) -> Vec<Result<PayoffComparison, EngineError>> {
        debug!("running batch of {} scenarios", scenarios.len());
        scenarios.par_iter().map(|raw| self.run(raw)).collect()
    }
}
