//! Boolean threshold network automaton over weighted directed graphs.
//!
//! Nodes carry a value in {-1, +1} and update synchronously to the sign of
//! the weighted sum of their inputs, optionally perturbed by noise. The crate
//! studies how collective order (the mean node value) emerges on three
//! connectivity topologies.
//!
//! ## Core Concepts
//!
//! - **ConnectionGraph**: weighted inputs per node plus node values
//!   (from `threshold-graph-core`)
//! - **BooleanNetwork**: the synchronous threshold sweep and the order parameter
//! - **UpdateRule**: decides a node's next value from the sign of its potential
//! - **Topology**: builds (and for the nonlocal case, keeps rewiring) the edges
//! - **Simulator**: the lifecycle an external driver uses
//!   (`advance`, `equilibrate`, `sample`)
//!
//! ## The Update Rule
//!
//! ```text
//! pot[i]    = sum over inputs (j, w) of w * value[j]     (pre-sweep values)
//! signal[i] = 0            if |pot[i]| < 1e-6
//!           = sign(pot[i]) otherwise
//! value[i]  = signal[i]    (zero temperature)
//!           = -signal[i] with probability eta, else signal[i]   (noisy)
//! ```
//!
//! Nodes with `signal = 0` keep their value.
//!
//! ## Topologies
//!
//! - `lattice`: static 1D ring or 2D torus, each node takes all its lattice
//!   neighbors as inputs with probability `p`
//! - `random_k`: static digraph, each node draws exactly `k` distinct sources
//! - `nonlocal`: ring with power-law link probability, redrawn every step
//!
//! All randomness flows through one owned generator per simulator, so a seed
//! fixes the whole trajectory.

mod error;
mod network;
pub mod params;
mod rng;
mod rule;
pub mod sample;
mod simulator;
pub mod topology;
mod weights;

pub use error::{SimulationError, SimulationResult};
pub use network::{BooleanNetwork, SweepStats};
pub use params::ParamBag;
pub use rng::{seeded_rng, uniform, SimRng};
pub use rule::{NoisyThreshold, Signal, UpdateRule, ZeroTemperature, POTENTIAL_EPS};
pub use sample::{OrderForm, SampleValue, Samples};
pub use simulator::{build_simulator, Simulator, SimulatorKind};
pub use weights::ConnectionDistribution;

// Topologies
pub use topology::{
    LatticeConfig, LatticeDim, LatticeGeometry, LatticeSimulator, NonlocalConfig,
    NonlocalSimulator, PowerLawLinks, RandomKConfig, RandomKSimulator, RewireStats,
};

// Connection store
pub use threshold_graph_core::{ConnectionGraph, Edge, NodeIdx};
