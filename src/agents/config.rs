// src/agents/config.rs

//! A centralized place for the default market and experiment parameters.

// --- Market ---
// Mean agent lifespan (Poisson). Larger values mean more patient agents.
pub const DEFAULT_LAMBDA: f64 = 4.0;
// Mean arrivals per step (Poisson). Also the denominator of the edge draw.
pub const DEFAULT_M: u64 = 10;
// Compatibility numerator: an edge forms when a draw in [0, m] lands below d.
pub const DEFAULT_D: u64 = 5;
// Per-step discount on a matched agent's utility.
pub const DEFAULT_DELTA: f64 = 0.0;

// --- Lifespans ---
// Poisson(lambda) can yield 0; agents always live at least this long.
pub const MIN_LIFESPAN: u64 = 1;

// --- Experiment driver ---
pub const DEFAULT_HORIZON: u64 = 200;
pub const DEFAULT_TRIALS: usize = 50;
// Each trial's random source is seeded with `base_seed + trial_index`.
pub const DEFAULT_SEED: u64 = 42;
