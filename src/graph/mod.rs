// src/graph/mod.rs

pub mod compatibility;

pub use compatibility::{AgentId, CompatibilityGraph};
