// src/agents/agent.rs

/// One market participant. Its patience (`lifespan`) is fixed at arrival, and the
/// payoff of a match decays with the time spent waiting for it.
#[derive(Debug, Clone)]
pub struct Agent {
    lifespan: u64,
    discount_rate: f64,
    elapsed_time: u64,
    matched: bool,
}

impl Agent {
    pub fn new(lifespan: u64, discount_rate: f64) -> Self {
        Self {
            lifespan,
            discount_rate,
            elapsed_time: 0,
            matched: false,
        }
    }

    /// Ages the agent by one step. Returns `true` once the agent has reached its lifespan.
    pub fn advance_time(&mut self) -> bool {
        self.elapsed_time += 1;
        self.elapsed_time >= self.lifespan
    }

    /// `exp(-discount_rate * elapsed_time)` for a matched agent, `0` otherwise.
    pub fn utility(&self) -> f64 {
        if self.matched {
            (-self.discount_rate * self.elapsed_time as f64).exp()
        } else {
            0.0
        }
    }

    /// Marks the agent as matched. There is no way back.
    pub fn match_agent(&mut self) {
        self.matched = true;
    }

    pub fn lifespan(&self) -> u64 {
        self.lifespan
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn elapsed_time(&self) -> u64 {
        self.elapsed_time
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }
}
