// src/market.rs

use crate::agents::agent::Agent;
use crate::agents::config::MIN_LIFESPAN;
use crate::error::{MarketError, Result};
use crate::graph::{AgentId, CompatibilityGraph};
use crate::shared_types::{Strategy, StrategyChange};
use crate::simulators::market_trait::Marketable;
use crate::types::MarketParams;
use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use serde::Serialize;

/// What happened during one call to [`Market::time_step`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub arrivals: u64,
    /// Matched pairs, not agents.
    pub matches: u64,
    pub expirations: u64,
    /// Graph-consistency violations caught and skipped. Always 0 in a healthy run.
    pub violations: u64,
}

/// A dynamic matching market. It owns the waiting agents and their compatibility
/// graph, and runs arrivals, matching and expiry one step at a time.
///
/// The random source is owned by the market. Seed it from outside with
/// [`Market::with_rng`] to make a run reproducible.
pub struct Market<R: Rng = StdRng> {
    params: MarketParams,
    graph: CompatibilityGraph,
    rng: R,
    arrival_dist: Poisson<f64>,
    lifespan_dist: Poisson<f64>,

    utility_total: f64,
    unmatched_count: u64,
    total_seen_count: u64,
    expired_count: u64,
    matched_count: u64,
    consistency_violations: u64,
    steps: u64,
}

impl Market<StdRng> {
    /// Builds a market seeded from OS entropy.
    pub fn new(params: MarketParams) -> Result<Self> {
        Self::with_rng(params, StdRng::from_entropy())
    }
}

impl<R: Rng> Market<R> {
    pub fn with_rng(params: MarketParams, rng: R) -> Result<Self> {
        params.validate()?;
        let arrival_dist = Poisson::new(params.m as f64).map_err(|e| MarketError::InvalidParameter {
            name: "m",
            reason: e.to_string(),
        })?;
        let lifespan_dist = Poisson::new(params.lambda).map_err(|e| MarketError::InvalidParameter {
            name: "lambda",
            reason: e.to_string(),
        })?;

        Ok(Self {
            params,
            graph: CompatibilityGraph::new(),
            rng,
            arrival_dist,
            lifespan_dist,
            utility_total: 0.0,
            unmatched_count: 0,
            total_seen_count: 0,
            expired_count: 0,
            matched_count: 0,
            consistency_violations: 0,
            steps: 0,
        })
    }

    // === Compatibility graph maintenance ===

    /// Inserts `agent` and connects it to each waiting agent when a uniform draw
    /// in `[0, m]` falls below `d`, i.e. with probability `d / (m + 1)`.
    pub fn add_agent(&mut self, agent: Agent) -> AgentId {
        let (m, d) = (self.params.m, self.params.d);
        let rng = &mut self.rng;
        let id = self.graph.insert(agent, |_| rng.gen_range(0..=m) < d);

        self.total_seen_count += 1;
        self.unmatched_count += 1;
        id
    }

    /// Detaches the agent and all its edges from the market.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<Agent> {
        match self.graph.remove(id) {
            Some(agent) => Ok(agent),
            None => {
                error!("remove_agent: agent {} has no node in the compatibility graph", id);
                Err(MarketError::AgentNotFound(id))
            }
        }
    }

    /// Matches `id` with its earliest-inserted compatible neighbor, if it has one.
    /// Returns the partner on success and `None` when there is nobody to match with.
    pub fn try_match(&mut self, id: AgentId) -> Result<Option<AgentId>> {
        let partner = match self.graph.neighbors(id) {
            Some(neighbors) => neighbors.first().copied(),
            None => {
                error!("try_match: agent {} has no node in the compatibility graph", id);
                return Err(MarketError::AgentNotFound(id));
            }
        };
        let Some(partner) = partner else {
            return Ok(None);
        };
        if !self.graph.contains(partner) {
            error!("try_match: neighbor {} of agent {} has no node", partner, id);
            return Err(MarketError::AgentNotFound(partner));
        }

        // Both nodes are known to exist, so both removals succeed.
        for matched_id in [id, partner] {
            let mut agent = self.remove_agent(matched_id)?;
            agent.match_agent();
            self.utility_total += agent.utility();
        }
        self.unmatched_count -= 2;
        self.matched_count += 2;

        debug!("matched {} with {} (utility total {:.4})", id, partner, self.utility_total);
        Ok(Some(partner))
    }

    // === Time-step protocol ===

    /// Runs one step: arrivals (with immediate matching when greedy), ageing of every
    /// waiting agent (with a last-chance match for critical agents when patient),
    /// then removal of the critical agents that are still unmatched.
    pub fn time_step(&mut self) -> StepSummary {
        let mut summary = StepSummary::default();
        let greedy = self.params.strategy.is_greedy();

        // 1. Arrivals.
        let arrivals = self.arrival_dist.sample(&mut self.rng) as u64;
        for _ in 0..arrivals {
            let lifespan = (self.lifespan_dist.sample(&mut self.rng) as u64).max(MIN_LIFESPAN);
            let id = self.add_agent(Agent::new(lifespan, self.params.delta));
            summary.arrivals += 1;

            if greedy {
                match self.try_match(id) {
                    Ok(Some(_)) => summary.matches += 1,
                    Ok(None) => {}
                    Err(e) => {
                        warn!("arrival match for {} aborted: {}", id, e);
                        summary.violations += 1;
                    }
                }
            }
        }

        // 2. Ageing and last-chance matching.
        let mut critical = Vec::new();
        for (id, agent) in self.graph.agents_mut() {
            if agent.advance_time() {
                critical.push(id);
            }
        }

        let mut to_remove = Vec::with_capacity(critical.len());
        for id in critical {
            if !greedy {
                // Already taken as the partner of an earlier critical agent.
                if !self.graph.contains(id) {
                    continue;
                }
                match self.try_match(id) {
                    Ok(Some(_)) => {
                        summary.matches += 1;
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("last-chance match for {} aborted: {}", id, e);
                        summary.violations += 1;
                        continue;
                    }
                }
            }
            to_remove.push(id);
        }

        // 3. Cleanup.
        for id in to_remove {
            if self.remove_agent(id).is_ok() {
                self.expired_count += 1;
                summary.expirations += 1;
                debug!("agent {} expired unmatched", id);
            } else {
                summary.violations += 1;
            }
        }

        self.consistency_violations += summary.violations;
        self.steps += 1;
        trace!(
            "step {}: {} arrivals, {} matches, {} expirations, {} waiting",
            self.steps,
            summary.arrivals,
            summary.matches,
            summary.expirations,
            self.graph.len()
        );
        summary
    }

    // === Results ===

    pub fn utility(&self) -> f64 {
        self.utility_total
    }

    /// `unmatched / total_seen`, or `0` before anyone has arrived.
    pub fn loss(&self) -> f64 {
        if self.total_seen_count == 0 {
            0.0
        } else {
            self.unmatched_count as f64 / self.total_seen_count as f64
        }
    }

    /// Fraction of all agents seen that have already expired unmatched.
    /// Unlike [`Market::loss`] this leaves out agents still waiting.
    pub fn expired_fraction(&self) -> f64 {
        if self.total_seen_count == 0 {
            0.0
        } else {
            self.expired_count as f64 / self.total_seen_count as f64
        }
    }

    // === Strategy ===

    pub fn strategy(&self) -> Strategy {
        self.params.strategy
    }

    pub fn change_strategy(&mut self, change: StrategyChange) -> Strategy {
        self.params.strategy = change.apply(self.params.strategy);
        debug!("strategy is now {}", self.params.strategy);
        self.params.strategy
    }

    // === Getters ===

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn graph(&self) -> &CompatibilityGraph {
        &self.graph
    }

    /// Agents that arrived and have not been matched: those still waiting plus those that expired.
    pub fn unmatched_count(&self) -> u64 {
        self.unmatched_count
    }

    pub fn total_seen_count(&self) -> u64 {
        self.total_seen_count
    }

    pub fn expired_count(&self) -> u64 {
        self.expired_count
    }

    pub fn matched_count(&self) -> u64 {
        self.matched_count
    }

    pub fn live_count(&self) -> u64 {
        self.graph.len() as u64
    }

    /// Violations `time_step` has caught and skipped since the last reset.
    pub fn consistency_violations(&self) -> u64 {
        self.consistency_violations
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl<R: Rng> Marketable for Market<R> {
    fn step(&mut self) -> StepSummary {
        self.time_step()
    }

    fn utility(&self) -> f64 {
        Market::utility(self)
    }

    fn loss(&self) -> f64 {
        Market::loss(self)
    }

    /// Empties the market and zeroes its counters. The random source keeps its state.
    fn reset(&mut self) {
        self.graph.clear();
        self.utility_total = 0.0;
        self.unmatched_count = 0;
        self.total_seen_count = 0;
        self.expired_count = 0;
        self.matched_count = 0;
        self.consistency_violations = 0;
        self.steps = 0;
    }
}
