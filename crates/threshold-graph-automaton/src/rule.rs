//! Threshold update rules.
//!
//! A sweep first classifies every node by the sign of its onsite potential
//! (see [`Signal`]); a rule then decides the node's next value from that
//! classification. Rules only ever see decided nodes: indeterminate nodes keep
//! their previous value without consulting the rule.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};
use crate::rng::uniform;

/// Potentials with magnitude below this are treated as no signal.
pub const POTENTIAL_EPS: f64 = 1e-6;

/// Classification of a node's onsite potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Potential below `-POTENTIAL_EPS`.
    Negative,
    /// `|potential| < POTENTIAL_EPS`: the node keeps its value.
    Indeterminate,
    /// Potential above `POTENTIAL_EPS`.
    Positive,
}

impl Signal {
    /// Classify a raw potential.
    pub fn classify(potential: f64) -> Self {
        if potential.abs() < POTENTIAL_EPS {
            Signal::Indeterminate
        } else if potential.is_sign_negative() {
            Signal::Negative
        } else {
            Signal::Positive
        }
    }

    /// Numeric form: `-1`, `0` or `+1`.
    pub fn value(self) -> i32 {
        match self {
            Signal::Negative => -1,
            Signal::Indeterminate => 0,
            Signal::Positive => 1,
        }
    }

    /// Whether the potential carried a usable sign.
    pub fn is_decided(self) -> bool {
        self != Signal::Indeterminate
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// Decides the next value of a node whose potential had a definite sign.
pub trait UpdateRule: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Next value for a node classified as `signal` (`±1`).
    ///
    /// Only called with `signal.is_decided()`.
    fn resolve(&self, signal: Signal, rng: &mut dyn RngCore) -> i32;
}

/// Zero-temperature rule: follow the sign of the potential.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroTemperature;

impl UpdateRule for ZeroTemperature {
    fn id(&self) -> &'static str {
        "zero_temperature"
    }

    fn description(&self) -> &str {
        "Align every decided node with the sign of its potential"
    }

    fn resolve(&self, signal: Signal, _rng: &mut dyn RngCore) -> i32 {
        signal.value()
    }
}

/// Noisy rule: with probability `eta` take the value opposite to the potential.
///
/// `eta = 0` reduces to [`ZeroTemperature`]; `eta = 1` always inverts the
/// threshold decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoisyThreshold {
    eta: f64,
}

impl NoisyThreshold {
    /// Create the rule, rejecting `eta` outside `[0, 1]` (NaN included).
    pub fn new(eta: f64) -> SimulationResult<Self> {
        if !(0.0..=1.0).contains(&eta) {
            return Err(SimulationError::InvalidNoise { eta });
        }
        Ok(Self { eta })
    }

    /// Flip probability.
    pub fn eta(&self) -> f64 {
        self.eta
    }
}

impl UpdateRule for NoisyThreshold {
    fn id(&self) -> &'static str {
        "noisy_threshold"
    }

    fn description(&self) -> &str {
        "Align with the potential, anti-align with probability eta"
    }

    fn resolve(&self, signal: Signal, rng: &mut dyn RngCore) -> i32 {
        let sign = if uniform(rng) < self.eta { -1 } else { 1 };
        sign * signal.value()
    }
}
