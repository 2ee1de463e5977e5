// src/simulators/market_trait.rs

use crate::market::StepSummary;

/// Anything that can be driven step by step and scored at the end of a run.
/// The experiment driver only talks to markets through this trait.
pub trait Marketable {
    /// Advances the simulation by one time step.
    fn step(&mut self) -> StepSummary;

    /// Utility accumulated so far.
    fn utility(&self) -> f64;

    /// Fraction of all agents seen so far that are unmatched, in `[0, 1]`.
    fn loss(&self) -> f64;

    /// Resets the simulation to an empty market with the same parameters.
    fn reset(&mut self);
}
