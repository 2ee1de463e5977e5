// src/simulators/mod.rs

pub mod market_trait;
