//! Topology generators and the simulators built on them.

mod lattice;
mod nonlocal;
mod random_k;

pub use lattice::{
    generate_lattice, LatticeConfig, LatticeDim, LatticeGeometry, LatticeSimulator,
};
pub use nonlocal::{
    rewire, NonlocalConfig, NonlocalSimulator, PowerLawLinks, RewireStats, DEFAULT_ALPHA,
};
pub use random_k::{generate_random_k, n_choose_k, RandomKConfig, RandomKSimulator};

use crate::error::{SimulationError, SimulationResult};
use crate::params::ParamBag;
use crate::weights::{ConnectionDistribution, UNIFORM_SELECTOR};

// Options shared by every topology.

fn read_system_size(params: &ParamBag) -> SimulationResult<usize> {
    let system_size = params.get_i64("system_size")?;
    if system_size < 1 {
        return Err(SimulationError::InvalidSystemSize { system_size });
    }
    Ok(system_size as usize)
}

fn read_eta(params: &ParamBag) -> SimulationResult<f64> {
    let eta = params.get_f64("eta")?;
    if !(0.0..=1.0).contains(&eta) {
        return Err(SimulationError::InvalidNoise { eta });
    }
    Ok(eta)
}

fn read_distribution(params: &ParamBag) -> SimulationResult<ConnectionDistribution> {
    params
        .get_i64_or("connection_distribution", UNIFORM_SELECTOR)
        .map(ConnectionDistribution::from_selector)
}
