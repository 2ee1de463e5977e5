// src/error.rs

use crate::graph::AgentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    /// An operation referenced an agent that has no node in the compatibility graph.
    /// Only a caller defect can produce this.
    #[error("Graph consistency violation: agent {0} is not in the compatibility graph")]
    AgentNotFound(AgentId),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown strategy: {0:?} (expected \"greedy\", \"patient\" or \"toggle\")")]
    UnknownStrategy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MarketError>;
