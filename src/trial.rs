use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{self, DistStats};
use crate::config::{RunConfig, StandConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::simulation::Simulation;

/// Profits of N independent replications of one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    /// Per-replication profit, indexed by replication number.
    pub profits: Vec<f64>,
    pub stats: DistStats,
}

impl TrialSummary {
    pub fn mean_profit(&self) -> f64 {
        self.stats.mean
    }
}

/// Random stream for replication `index`: the base seed picks the key, the
/// replication picks the ChaCha stream. Streams never overlap, and the
/// mapping does not depend on which thread runs the replication.
pub fn replication_rng(seed: u64, index: u64) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(index);
    rng
}

/// Run replication `index` of `config` to the horizon and return its profit.
pub fn run_replication(config: &StandConfig, run: &RunConfig, index: u64) -> ConfigResult<f64> {
    let mut sim = Simulation::new(config, run, replication_rng(run.seed, index))?;
    Ok(sim.run().profit)
}

/// Profits for `run.trials` replications, in replication order. Validated
/// once up front, so no replication can fail afterwards.
pub fn run_trials(config: &StandConfig, run: &RunConfig) -> ConfigResult<Vec<f64>> {
    config.validate_for(run)?;
    (0..run.trials as u64)
        .into_par_iter()
        .map(|i| run_replication(config, run, i))
        .collect()
}

pub fn run_trial_summary(config: &StandConfig, run: &RunConfig) -> ConfigResult<TrialSummary> {
    let profits = run_trials(config, run)?;
    let stats = analysis::summarise(&profits).ok_or(ConfigError::ZeroTrials)?;
    log::debug!(
        "trials: period={} quantity={} n={} mean={:.2} sd={:.2}",
        config.replenishment_period,
        config.replenishment_quantity,
        stats.n,
        stats.mean,
        stats.std_dev
    );
    Ok(TrialSummary { profits, stats })
}

/// Mean profit over `run.trials` replications.
pub fn mean_profit(config: &StandConfig, run: &RunConfig) -> ConfigResult<f64> {
    let profits = run_trials(config, run)?;
    analysis::mean(&profits).ok_or(ConfigError::ZeroTrials)
}
