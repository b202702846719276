//! Simulator lifecycle: the capability interface an external driver uses,
//! and a factory that builds a simulator by topology name.
//!
//! ```text
//! build_simulator(kind, params, rng)
//!     -> equilibrate(n)
//!     -> repeat { advance(n); sample() }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SimulationError, SimulationResult};
use crate::network::BooleanNetwork;
use crate::params::ParamBag;
use crate::rng::SimRng;
use crate::sample::Samples;
use crate::topology::{LatticeSimulator, NonlocalSimulator, RandomKSimulator};

/// A network simulation that can be stepped and measured.
pub trait Simulator: Send {
    /// Topology name, as accepted by [`SimulatorKind::from_str`].
    fn name(&self) -> &'static str;

    /// Run `steps` simulation steps.
    fn advance(&mut self, steps: u32) -> SimulationResult<()>;

    /// Run `steps` equilibration steps. Identical to ordinary steps unless a
    /// topology needs otherwise.
    fn equilibrate(&mut self, steps: u32) -> SimulationResult<()> {
        self.advance(steps)
    }

    /// Measure the current state.
    fn sample(&self) -> Samples;

    /// The underlying network.
    fn network(&self) -> &BooleanNetwork;

    /// Steps run since construction.
    fn steps_taken(&self) -> u64;
}

/// Topologies known to [`build_simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorKind {
    /// Static 1D/2D lattice with per-node inclusion probability.
    Lattice,
    /// Static random digraph with fixed in-degree.
    RandomK,
    /// Power-law digraph rewired every step.
    Nonlocal,
}

impl SimulatorKind {
    /// Every kind, in declaration order.
    pub const ALL: [SimulatorKind; 3] = [
        SimulatorKind::Lattice,
        SimulatorKind::RandomK,
        SimulatorKind::Nonlocal,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulatorKind::Lattice => "lattice",
            SimulatorKind::RandomK => "random_k",
            SimulatorKind::Nonlocal => "nonlocal",
        }
    }
}

impl fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulatorKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "lattice" => Ok(SimulatorKind::Lattice),
            "random_k" | "randomk" | "noisy" => Ok(SimulatorKind::RandomK),
            "nonlocal" => Ok(SimulatorKind::Nonlocal),
            _ => Err(SimulationError::UnknownSimulator {
                name: s.to_string(),
            }),
        }
    }
}

/// Build a simulator of the given kind from a parameter bag.
///
/// The simulator takes ownership of `rng`; it is the only randomness source
/// for the whole run.
pub fn build_simulator(
    kind: SimulatorKind,
    params: &ParamBag,
    rng: SimRng,
) -> SimulationResult<Box<dyn Simulator>> {
    let sim: Box<dyn Simulator> = match kind {
        SimulatorKind::Lattice => Box::new(LatticeSimulator::new(params, rng)?),
        SimulatorKind::RandomK => Box::new(RandomKSimulator::new(params, rng)?),
        SimulatorKind::Nonlocal => Box::new(NonlocalSimulator::new(params, rng)?),
    };
    info!(
        kind = %kind,
        nodes = sim.network().system_size(),
        edges = sim.network().connections.edge_count(),
        "simulator_built"
    );
    Ok(sim)
}
