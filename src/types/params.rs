// src/types/params.rs

use crate::agents::config::{DEFAULT_D, DEFAULT_DELTA, DEFAULT_LAMBDA, DEFAULT_M};
use crate::error::{MarketError, Result};
use crate::shared_types::Strategy;
use serde::{Deserialize, Serialize};

/// The five numbers that fully configure one market run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Mean of the Poisson lifespan distribution.
    pub lambda: f64,
    /// Mean arrivals per step, and the upper bound of the compatibility draw.
    pub m: u64,
    /// Compatibility threshold: an edge forms when a draw in `[0, m]` is below `d`.
    pub d: u64,
    /// Discount rate given to every agent.
    pub delta: f64,
    pub strategy: Strategy,
}

impl MarketParams {
    pub fn new(lambda: f64, m: u64, d: u64, delta: f64, greedy: bool) -> Self {
        Self {
            lambda,
            m,
            d,
            delta,
            strategy: if greedy { Strategy::Greedy } else { Strategy::Patient },
        }
    }

    /// Rejects parameter sets the model is not defined for.
    pub fn validate(&self) -> Result<()> {
        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(invalid("lambda", format!("must be finite and > 0, got {}", self.lambda)));
        }
        if self.m == 0 {
            return Err(invalid("m", "must be at least 1".to_string()));
        }
        if self.d > self.m {
            return Err(invalid("d", format!("must not exceed m ({}), got {}", self.m, self.d)));
        }
        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(invalid("delta", format!("must be finite and >= 0, got {}", self.delta)));
        }
        Ok(())
    }

    /// Probability that two agents are compatible under the `[0, m]` draw: `d / (m + 1)`.
    pub fn edge_probability(&self) -> f64 {
        self.d as f64 / (self.m as f64 + 1.0)
    }
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            m: DEFAULT_M,
            d: DEFAULT_D,
            delta: DEFAULT_DELTA,
            strategy: Strategy::Greedy,
        }
    }
}

fn invalid(name: &'static str, reason: String) -> MarketError {
    MarketError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(MarketParams::default().validate().is_ok());
    }

    #[test]
    fn greedy_flag_maps_to_strategy() {
        assert_eq!(MarketParams::new(4.0, 10, 5, 0.0, true).strategy, Strategy::Greedy);
        assert_eq!(MarketParams::new(4.0, 10, 5, 0.0, false).strategy, Strategy::Patient);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            ("lambda", MarketParams::new(0.0, 10, 5, 0.0, true)),
            ("lambda", MarketParams::new(f64::NAN, 10, 5, 0.0, true)),
            ("m", MarketParams::new(4.0, 0, 0, 0.0, true)),
            ("d", MarketParams::new(4.0, 10, 11, 0.0, true)),
            ("delta", MarketParams::new(4.0, 10, 5, -0.1, true)),
        ];
        for (field, params) in cases {
            match params.validate() {
                Err(MarketError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("Expected InvalidParameter for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn d_equal_to_m_and_zero_d_are_allowed() {
        assert!(MarketParams::new(4.0, 10, 10, 0.0, true).validate().is_ok());
        assert!(MarketParams::new(4.0, 10, 0, 0.0, true).validate().is_ok());
    }

    #[test]
    fn edge_probability_uses_inclusive_draw() {
        let params = MarketParams::new(4.0, 10, 5, 0.0, true);
        assert!((params.edge_probability() - 5.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn round_trips_through_json() {
        let json = r#"{"lambda":2.5,"m":8,"d":3,"delta":0.1,"strategy":"patient"}"#;
        let params: MarketParams = serde_json::from_str(json).unwrap();
        assert_eq!(params, MarketParams::new(2.5, 8, 3, 0.1, false));
    }
}
