// src/types/mod.rs

pub mod params;

pub use params::MarketParams;
