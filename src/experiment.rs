// src/experiment.rs

//! Repeated runs of the market for statistical comparison of the two strategies.
//! Every trial gets its own random source seeded with `seed + trial_index`, and both
//! strategies see the same seeds so their numbers are directly comparable.

use crate::agents::config::{DEFAULT_HORIZON, DEFAULT_SEED, DEFAULT_TRIALS};
use crate::error::{MarketError, Result};
use crate::market::Market;
use crate::shared_types::Strategy;
use crate::simulators::market_trait::Marketable;
use crate::types::MarketParams;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub params: MarketParams,
    /// Steps per run.
    pub horizon: u64,
    pub trials: usize,
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            params: MarketParams::default(),
            horizon: DEFAULT_HORIZON,
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: ExperimentConfig = serde_json::from_str(&raw)?;
        config.params.validate()?;
        Ok(config)
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.params.strategy = strategy;
        self
    }
}

/// The two numbers a single run produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub utility: f64,
    pub loss: f64,
}

/// Mean and sample standard deviation over a batch of trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub strategy: Strategy,
    pub trials: usize,
    pub mean_loss: f64,
    pub std_loss: f64,
    pub mean_utility: f64,
    pub std_utility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub greedy: Summary,
    pub patient: Summary,
}

/// Which market parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepAxis {
    Lambda,
    M,
    D,
    Delta,
}

impl SweepAxis {
    /// Returns `params` with this axis set to `value`. Integer axes are rounded.
    pub fn apply(self, mut params: MarketParams, value: f64) -> MarketParams {
        match self {
            SweepAxis::Lambda => params.lambda = value,
            SweepAxis::M => params.m = value.round().max(0.0) as u64,
            SweepAxis::D => params.d = value.round().max(0.0) as u64,
            SweepAxis::Delta => params.delta = value,
        }
        params
    }
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepAxis::Lambda => "lambda",
            SweepAxis::M => "m",
            SweepAxis::D => "d",
            SweepAxis::Delta => "delta",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SweepAxis {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lambda" => Ok(SweepAxis::Lambda),
            "m" => Ok(SweepAxis::M),
            "d" => Ok(SweepAxis::D),
            "delta" => Ok(SweepAxis::Delta),
            other => Err(MarketError::InvalidParameter {
                name: "axis",
                reason: format!("unknown sweep axis {:?}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub axis: SweepAxis,
    pub value: f64,
    pub greedy: Summary,
    pub patient: Summary,
}

/// Steps `market` for `horizon` steps and reads off its utility and loss.
pub fn run_trial<M: Marketable>(market: &mut M, horizon: u64) -> TrialOutcome {
    for _ in 0..horizon {
        market.step();
    }
    TrialOutcome {
        utility: market.utility(),
        loss: market.loss(),
    }
}

/// Runs `config.trials` independent markets with the configured strategy.
pub fn run_trials(config: &ExperimentConfig) -> Result<Summary> {
    let mut outcomes = Vec::with_capacity(config.trials);
    for trial in 0..config.trials {
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(trial as u64));
        let mut market = Market::with_rng(config.params, rng)?;
        let outcome = run_trial(&mut market, config.horizon);
        debug!(
            "{} trial {}: utility {:.3}, loss {:.4}",
            config.params.strategy, trial, outcome.utility, outcome.loss
        );
        outcomes.push(outcome);
    }
    Ok(summarize(config.params.strategy, &outcomes))
}

/// Runs the same batch of seeds under both strategies.
pub fn compare_strategies(config: &ExperimentConfig) -> Result<Comparison> {
    Ok(Comparison {
        greedy: run_trials(&config.with_strategy(Strategy::Greedy))?,
        patient: run_trials(&config.with_strategy(Strategy::Patient))?,
    })
}

/// Compares both strategies at each `value` of `axis`, all other parameters held fixed.
pub fn sweep(config: &ExperimentConfig, axis: SweepAxis, values: &[f64]) -> Result<Vec<SweepPoint>> {
    if values.is_empty() {
        return Err(MarketError::InvalidParameter {
            name: "values",
            reason: format!("a sweep over {} needs at least one value", axis),
        });
    }
    let mut points = Vec::with_capacity(values.len());
    for &value in values {
        let point_config = ExperimentConfig {
            params: axis.apply(config.params, value),
            ..*config
        };
        let Comparison { greedy, patient } = compare_strategies(&point_config)?;
        info!(
            "{} = {}: greedy loss {:.4}, patient loss {:.4}",
            axis, value, greedy.mean_loss, patient.mean_loss
        );
        points.push(SweepPoint {
            axis,
            value,
            greedy,
            patient,
        });
    }
    Ok(points)
}

fn summarize(strategy: Strategy, outcomes: &[TrialOutcome]) -> Summary {
    let losses: Vec<f64> = outcomes.iter().map(|o| o.loss).collect();
    let utilities: Vec<f64> = outcomes.iter().map(|o| o.utility).collect();
    Summary {
        strategy,
        trials: outcomes.len(),
        mean_loss: mean(&losses),
        std_loss: std_dev(&losses),
        mean_utility: mean(&utilities),
        std_utility: std_dev(&utilities),
    }
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() { 0.0 } else { data.iter().mean() }
}

// Sample standard deviation; zero when there are fewer than two samples.
fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 { 0.0 } else { data.iter().std_dev() }
}

// -----------------------------------------------------------------------------
//  Unit Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            params: MarketParams::new(4.0, 10, 5, 0.0, true),
            horizon: 30,
            trials: 5,
            seed: 7,
        }
    }

    #[test]
    fn test_run_trial_steps_the_full_horizon() {
        let mut market = Market::with_rng(MarketParams::default(), StdRng::seed_from_u64(1)).unwrap();

        let outcome = run_trial(&mut market, 25);

        assert_eq!(market.steps(), 25);
        assert_eq!(outcome.utility, market.utility());
        assert_eq!(outcome.loss, market.loss());
    }

    #[test]
    fn test_run_trials_is_reproducible() {
        let config = small_config();

        let first = run_trials(&config).unwrap();
        let second = run_trials(&config).unwrap();

        assert_eq!(first, second, "Same seed must give the same summary.");
        assert_eq!(first.trials, 5);
        assert!((0.0..=1.0).contains(&first.mean_loss));
        assert!(first.std_loss >= 0.0);
    }

    #[test]
    fn test_single_trial_has_zero_spread() {
        let config = ExperimentConfig { trials: 1, ..small_config() };

        let summary = run_trials(&config).unwrap();

        assert_eq!(summary.std_loss, 0.0);
        assert_eq!(summary.std_utility, 0.0);
    }

    #[test]
    fn test_compare_strategies_labels_both_sides() {
        let comparison = compare_strategies(&small_config()).unwrap();

        assert_eq!(comparison.greedy.strategy, Strategy::Greedy);
        assert_eq!(comparison.patient.strategy, Strategy::Patient);
        for summary in [comparison.greedy, comparison.patient] {
            assert!((0.0..=1.0).contains(&summary.mean_loss));
            // With delta = 0 every match is worth exactly 2.
            assert!(summary.mean_utility >= 0.0);
        }
    }

    #[test]
    fn test_sweep_produces_one_point_per_value() {
        let config = small_config();
        let values = [1.0, 3.0, 5.0];

        let points = sweep(&config, SweepAxis::D, &values).unwrap();

        assert_eq!(points.len(), 3);
        for (point, value) in points.iter().zip(values) {
            assert_eq!(point.axis, SweepAxis::D);
            assert_eq!(point.value, value);
        }
    }

    #[test]
    fn test_sweep_with_no_compatibility_loses_everyone() {
        let config = ExperimentConfig { horizon: 40, ..small_config() };

        let points = sweep(&config, SweepAxis::D, &[0.0]).unwrap();

        assert_eq!(points[0].greedy.mean_loss, 1.0);
        assert_eq!(points[0].patient.mean_loss, 1.0);
        assert_eq!(points[0].greedy.mean_utility, 0.0);
    }

    #[test]
    fn test_sweep_without_values_is_an_error() {
        let result = sweep(&small_config(), SweepAxis::Lambda, &[]);
        assert!(matches!(result, Err(MarketError::InvalidParameter { name: "values", .. })));
    }

    #[test]
    fn test_sweep_rejects_invalid_points() {
        let result = sweep(&small_config(), SweepAxis::D, &[50.0]);
        assert!(matches!(result, Err(MarketError::InvalidParameter { name: "d", .. })));
    }

    #[test]
    fn test_axis_apply_and_parse() {
        let base = MarketParams::default();
        assert_eq!(SweepAxis::M.apply(base, 12.4).m, 12);
        assert_eq!(SweepAxis::Lambda.apply(base, 2.5).lambda, 2.5);
        assert_eq!(SweepAxis::Delta.apply(base, 0.3).delta, 0.3);
        assert_eq!("Lambda".parse::<SweepAxis>().unwrap(), SweepAxis::Lambda);
        assert!("x".parse::<SweepAxis>().is_err());
    }

    #[test]
    fn test_config_from_json_file() {
        let path = std::env::temp_dir().join("matching_market_experiment_config.json");
        let config = small_config();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = ExperimentConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }
}
