// src/shared_types.rs

use crate::error::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When the market attempts to match an agent.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Match on arrival. Agents left unmatched simply expire.
    Greedy,
    /// Wait until an agent is critical and give it one last attempt.
    Patient,
}

impl Strategy {
    pub fn toggled(self) -> Self {
        match self {
            Strategy::Greedy => Strategy::Patient,
            Strategy::Patient => Strategy::Greedy,
        }
    }

    pub fn is_greedy(self) -> bool {
        self == Strategy::Greedy
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::Patient => write!(f, "patient"),
        }
    }
}

/// A request to change a market's strategy.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum StrategyChange {
    Greedy,
    Patient,
    Toggle,
}

impl StrategyChange {
    pub fn apply(self, current: Strategy) -> Strategy {
        match self {
            StrategyChange::Greedy => Strategy::Greedy,
            StrategyChange::Patient => Strategy::Patient,
            StrategyChange::Toggle => current.toggled(),
        }
    }
}

impl FromStr for StrategyChange {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(StrategyChange::Greedy),
            "patient" => Ok(StrategyChange::Patient),
            "toggle" => Ok(StrategyChange::Toggle),
            _ => Err(MarketError::UnknownStrategy(s.to_string())),
        }
    }
}
