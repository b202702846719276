//! Error types for simulator construction and stepping.

use thiserror::Error;

/// Result type alias for simulator operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors that abort a simulation run.
///
/// None of these are recoverable inside the core; retrying with different
/// parameters is up to whoever drives the simulator.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A required option is absent from the parameter bag.
    #[error("missing parameter: {name}")]
    MissingParameter { name: String },

    /// An option is present but has the wrong type or an unusable value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    /// Noise probability outside [0, 1].
    #[error("invalid noise probability eta = {eta} (must lie in [0, 1])")]
    InvalidNoise { eta: f64 },

    /// Lattice dimensionality other than 1 or 2.
    #[error("invalid lattice dimension {dim} (must be 1 or 2)")]
    InvalidDimension { dim: i64 },

    /// Random-k in-degree larger than the node count.
    #[error("invalid in-degree k = {k} for system_size = {system_size}")]
    InvalidInDegree { k: usize, system_size: usize },

    /// Node count (or lattice side) of zero.
    #[error("invalid system_size {system_size} (must be >= 1)")]
    InvalidSystemSize { system_size: i64 },

    /// Nonlocal rewiring produced a probability outside [0, 1].
    #[error("error calculating link probability: i = {i}, j = {j}, p = {p}")]
    LinkProbabilityOutOfRange { i: usize, j: usize, p: f64 },

    /// Factory asked for a topology it does not know.
    #[error("unknown simulator: {name}")]
    UnknownSimulator { name: String },
}
