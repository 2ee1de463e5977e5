// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod agents;
pub mod error;
pub mod experiment;
pub mod graph;
pub mod market;
pub mod shared_types;
pub mod simulators;
pub mod types;

// === 2. Re-export the public-facing components to create a clean API ===

// --- From `agents` ---
pub use agents::agent::Agent;

// --- From `graph` ---
pub use graph::{AgentId, CompatibilityGraph};

// --- From our `market` engine ---
pub use market::{Market, StepSummary};

// --- From `simulators` ---
pub use simulators::market_trait::Marketable;

// --- From `experiment` ---
pub use experiment::{Comparison, ExperimentConfig, Summary, SweepAxis, SweepPoint, TrialOutcome};

// --- From `types` / `shared_types` / `error` ---
pub use error::{MarketError, Result};
pub use shared_types::{Strategy, StrategyChange};
pub use types::MarketParams;
