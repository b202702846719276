//! Connection-weight distributions for generated edges.

use serde::{Deserialize, Serialize};

/// Selector value of the uniform distribution.
pub const UNIFORM_SELECTOR: i64 = 0;

/// How generators pick the weight of a new edge.
///
/// Only the uniform distribution carries signal. Any other selector still
/// produces edges, but with weight `0.0`: they are present in the graph and
/// inert in the potential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionDistribution {
    /// Every edge gets weight `1.0`.
    #[default]
    Uniform,
    /// Unimplemented selector; every edge gets weight `0.0`.
    Inert(i64),
}

impl ConnectionDistribution {
    /// Map the integer selector from a parameter bag.
    pub fn from_selector(selector: i64) -> Self {
        if selector == UNIFORM_SELECTOR {
            ConnectionDistribution::Uniform
        } else {
            ConnectionDistribution::Inert(selector)
        }
    }

    /// Integer selector this distribution was built from.
    pub fn selector(&self) -> i64 {
        match self {
            ConnectionDistribution::Uniform => UNIFORM_SELECTOR,
            ConnectionDistribution::Inert(s) => *s,
        }
    }

    /// Weight of the next generated edge.
    pub fn sample(&self) -> f64 {
        match self {
            ConnectionDistribution::Uniform => 1.0,
            ConnectionDistribution::Inert(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_weight() {
        let dist = ConnectionDistribution::from_selector(0);
        assert_eq!(dist, ConnectionDistribution::Uniform);
        assert_eq!(dist.sample(), 1.0);
    }

    #[test]
    fn test_other_selectors_are_inert() {
        for s in [1, 2, -1, 7] {
            let dist = ConnectionDistribution::from_selector(s);
            assert_eq!(dist.sample(), 0.0);
            assert_eq!(dist.selector(), s);
        }
    }
}
