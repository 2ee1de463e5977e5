// src/agents/mod.rs

pub mod agent;
pub mod config;
