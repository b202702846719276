//! Static 1D ring / 2D torus lattice topology.
//!
//! Nodes sit on a ring of `L` sites (1D) or an `L x L` grid (2D) with modular
//! wraparound. With open boundaries the endpoints (1D) or the first and last
//! rows (2D) receive no inputs; they still act as sources for their neighbors.
//! Every other node, with probability `p`, takes all of its 2 or 4 lattice
//! neighbors as inputs. Edges are generated once and never revisited.

use rand::Rng;
use serde::{Deserialize, Serialize};
use threshold_graph_core::NodeIdx;
use tracing::{debug, info};

use crate::error::{SimulationError, SimulationResult};
use crate::network::BooleanNetwork;
use crate::params::ParamBag;
use crate::rng::{uniform, SimRng};
use crate::rule::NoisyThreshold;
use crate::sample::{take_samples, OrderForm, Samples};
use crate::simulator::Simulator;
use crate::weights::ConnectionDistribution;

use super::{read_distribution, read_eta, read_system_size};

/// Lattice dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeDim {
    /// Ring of `L` nodes, 2 neighbors each.
    One,
    /// `L x L` grid, 4 neighbors each.
    Two,
}

impl TryFrom<i64> for LatticeDim {
    type Error = SimulationError;

    fn try_from(dim: i64) -> Result<Self, Self::Error> {
        match dim {
            1 => Ok(LatticeDim::One),
            2 => Ok(LatticeDim::Two),
            _ => Err(SimulationError::InvalidDimension { dim }),
        }
    }
}

/// Index <-> coordinate bijection of a periodic lattice with side `L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeGeometry {
    side: usize,
    dim: LatticeDim,
}

impl LatticeGeometry {
    pub fn new(side: usize, dim: LatticeDim) -> Self {
        Self { side, dim }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn dim(&self) -> LatticeDim {
        self.dim
    }

    /// `L` in 1D, `L * L` in 2D.
    pub fn node_count(&self) -> usize {
        match self.dim {
            LatticeDim::One => self.side,
            LatticeDim::Two => self.side * self.side,
        }
    }

    fn wrap(&self, c: i64) -> usize {
        c.rem_euclid(self.side as i64) as usize
    }

    /// `(x, y)` of node `i`; `y` is always 0 in 1D.
    pub fn to_coordinates(&self, i: NodeIdx) -> (i64, i64) {
        match self.dim {
            LatticeDim::One => (i as i64, 0),
            LatticeDim::Two => ((i % self.side) as i64, (i / self.side) as i64),
        }
    }

    /// Node at `(x, y)`, wrapping both coordinates. `y` is ignored in 1D.
    pub fn to_index(&self, x: i64, y: i64) -> NodeIdx {
        match self.dim {
            LatticeDim::One => self.wrap(x),
            LatticeDim::Two => self.wrap(x) + self.wrap(y) * self.side,
        }
    }

    /// Lattice neighbors of `i`: `+x, -x` in 1D, `+x, -x, +y, -y` in 2D.
    ///
    /// Side lengths below 3 make neighbors coincide (and, for `L = 1`,
    /// equal `i` itself); they are returned as computed.
    pub fn neighbors(&self, i: NodeIdx) -> Vec<NodeIdx> {
        let (x, y) = self.to_coordinates(i);
        match self.dim {
            LatticeDim::One => vec![self.to_index(x + 1, y), self.to_index(x - 1, y)],
            LatticeDim::Two => vec![
                self.to_index(x + 1, y),
                self.to_index(x - 1, y),
                self.to_index(x, y + 1),
                self.to_index(x, y - 1),
            ],
        }
    }

    /// Whether node `i` is a boundary node that receives no inputs.
    pub fn is_excluded(&self, i: NodeIdx, obc: bool) -> bool {
        if !obc {
            return false;
        }
        let last = self.side as i64 - 1;
        match self.dim {
            LatticeDim::One => i == 0 || i as i64 == last,
            LatticeDim::Two => {
                let (_, y) = self.to_coordinates(i);
                y == 0 || y == last
            }
        }
    }
}

/// Options of the lattice topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Side length `L`.
    pub system_size: usize,
    pub eta: f64,
    /// Per-node inclusion probability.
    pub p: f64,
    pub dim: LatticeDim,
    /// Open boundary conditions.
    pub obc: bool,
    pub connection_distribution: ConnectionDistribution,
    pub sample_configurations: bool,
}

impl LatticeConfig {
    pub fn from_params(params: &ParamBag) -> SimulationResult<Self> {
        Ok(Self {
            system_size: read_system_size(params)?,
            eta: read_eta(params)?,
            p: params.get_f64("p")?,
            dim: LatticeDim::try_from(params.get_i64_or("dim", 2)?)?,
            obc: params.get_bool_or("obc", false)?,
            connection_distribution: read_distribution(params)?,
            sample_configurations: params.get_bool_or("sample_configurations", false)?,
        })
    }
}

/// Draw the lattice edges into `network`.
///
/// One uniform draw per non-excluded node, in index order.
pub fn generate_lattice<R: Rng + ?Sized>(
    network: &mut BooleanNetwork,
    geometry: &LatticeGeometry,
    p: f64,
    obc: bool,
    distribution: ConnectionDistribution,
    rng: &mut R,
) {
    for i in 0..geometry.node_count() {
        if geometry.is_excluded(i, obc) {
            continue;
        }
        let inputs = geometry.neighbors(i);
        if uniform(rng) < p {
            for j in inputs {
                network
                    .connections
                    .add_directed_edge(j, i, distribution.sample());
            }
        }
    }
}

/// Noisy threshold dynamics on a static lattice.
#[derive(Debug)]
pub struct LatticeSimulator {
    config: LatticeConfig,
    geometry: LatticeGeometry,
    rule: NoisyThreshold,
    network: BooleanNetwork,
    rng: SimRng,
    steps: u64,
}

impl LatticeSimulator {
    pub fn new(params: &ParamBag, rng: SimRng) -> SimulationResult<Self> {
        Self::with_config(LatticeConfig::from_params(params)?, rng)
    }

    pub fn with_config(config: LatticeConfig, mut rng: SimRng) -> SimulationResult<Self> {
        let rule = NoisyThreshold::new(config.eta)?;
        let geometry = LatticeGeometry::new(config.system_size, config.dim);

        let mut network = BooleanNetwork::new(geometry.node_count());
        generate_lattice(
            &mut network,
            &geometry,
            config.p,
            config.obc,
            config.connection_distribution,
            &mut rng,
        );
        network.randomize(&mut rng);

        info!(
            side = config.system_size,
            dim = ?config.dim,
            obc = config.obc,
            edges = network.connections.edge_count(),
            "lattice_generated"
        );

        Ok(Self {
            config,
            geometry,
            rule,
            network,
            rng,
            steps: 0,
        })
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn geometry(&self) -> &LatticeGeometry {
        &self.geometry
    }
}

impl Simulator for LatticeSimulator {
    fn name(&self) -> &'static str {
        "lattice"
    }

    fn advance(&mut self, steps: u32) -> SimulationResult<()> {
        let mut flipped = 0;
        for _ in 0..steps {
            flipped += self.network.apply_rule(&self.rule, &mut self.rng).flipped;
        }
        self.steps += u64::from(steps);
        debug!(
            steps,
            flipped,
            order = self.network.order(),
            "advance_complete"
        );
        Ok(())
    }

    fn sample(&self) -> Samples {
        take_samples(
            &self.network,
            OrderForm::SignedAndAbsolute,
            self.config.sample_configurations,
        )
    }

    fn network(&self) -> &BooleanNetwork {
        &self.network
    }

    fn steps_taken(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rng::seeded_rng;

    fn params(side: i64) -> ParamBag {
        ParamBag::new()
            .with("system_size", side)
            .with("eta", 0.0)
            .with("p", 1.0)
    }

    #[test]
    fn test_torus_neighbors_wrap() {
        let g = LatticeGeometry::new(4, LatticeDim::Two);
        let origin = g.to_index(0, 0);
        let got: HashSet<_> = g.neighbors(origin).into_iter().collect();
        let want: HashSet<_> = [(3, 0), (1, 0), (0, 3), (0, 1)]
            .into_iter()
            .map(|(x, y)| g.to_index(x, y))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_coordinates_bijection() {
        let g = LatticeGeometry::new(5, LatticeDim::Two);
        for i in 0..g.node_count() {
            let (x, y) = g.to_coordinates(i);
            assert_eq!(g.to_index(x, y), i);
        }
        assert_eq!(g.to_index(-1, -1), 24);
    }

    #[test]
    fn test_ring_neighbors() {
        let g = LatticeGeometry::new(5, LatticeDim::One);
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.neighbors(0), vec![1, 4]);
        assert_eq!(g.neighbors(4), vec![0, 3]);
    }

    #[test]
    fn test_open_boundary_exclusion() {
        let ring = LatticeGeometry::new(5, LatticeDim::One);
        assert!(ring.is_excluded(0, true));
        assert!(ring.is_excluded(4, true));
        assert!(!ring.is_excluded(2, true));
        assert!(!ring.is_excluded(0, false));

        let grid = LatticeGeometry::new(4, LatticeDim::Two);
        assert!(grid.is_excluded(grid.to_index(2, 0), true));
        assert!(grid.is_excluded(grid.to_index(1, 3), true));
        assert!(!grid.is_excluded(grid.to_index(0, 1), true));
    }

    #[test]
    fn test_full_inclusion_gives_four_inputs() {
        let sim = LatticeSimulator::new(&params(4), seeded_rng(1)).unwrap();
        let net = sim.network();
        assert_eq!(net.system_size(), 16);
        for i in 0..16 {
            assert_eq!(net.connections.in_degree(i), 4);
            for j in sim.geometry().neighbors(i) {
                assert!(net.connections.contains_edge(j, i));
            }
        }
    }

    #[test]
    fn test_obc_rows_have_no_inputs() {
        let sim = LatticeSimulator::new(&params(4).with("obc", true), seeded_rng(1)).unwrap();
        let g = *sim.geometry();
        for i in 0..g.node_count() {
            let (_, y) = g.to_coordinates(i);
            let expected = if y == 0 || y == 3 { 0 } else { 4 };
            assert_eq!(sim.network().connections.in_degree(i), expected);
        }
    }

    #[test]
    fn test_one_dimensional_ring() {
        let sim = LatticeSimulator::new(&params(6).with("dim", 1), seeded_rng(2)).unwrap();
        assert_eq!(sim.network().system_size(), 6);
        assert_eq!(sim.network().connections.edge_count(), 12);
    }

    #[test]
    fn test_zero_probability_gives_no_edges() {
        let sim = LatticeSimulator::new(&params(5).with("p", 0.0), seeded_rng(3)).unwrap();
        assert_eq!(sim.network().connections.edge_count(), 0);
    }

    #[test]
    fn test_inert_distribution_keeps_edges_at_zero_weight() {
        let bag = params(3).with("connection_distribution", 1);
        let sim = LatticeSimulator::new(&bag, seeded_rng(4)).unwrap();
        let net = sim.network();
        assert_eq!(net.connections.edge_count(), 36);
        assert!(net.connections.edges().all(|(_, e)| e.weight == 0.0));
    }

    #[test]
    fn test_invalid_dimension() {
        let err = LatticeSimulator::new(&params(4).with("dim", 3), seeded_rng(0)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidDimension { dim: 3 }));
    }

    #[test]
    fn test_invalid_eta() {
        let err = LatticeSimulator::new(&params(4).with("eta", 1.2), seeded_rng(0)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidNoise { .. }));
    }

    #[test]
    fn test_samples_report_both_forms() {
        let mut sim = LatticeSimulator::new(&params(4), seeded_rng(5)).unwrap();
        sim.advance(3).unwrap();
        let samples = sim.sample();
        let order = samples.scalar("order").unwrap();
        assert_eq!(samples.scalar("order_abs"), Some(order.abs()));
        assert!(!samples.contains("spins"));
    }
}
