//! Distance-dependent power-law digraph, rewired after every update.
//!
//! Nodes sit on a ring of `N` sites. An edge between `i != j` exists with
//! probability
//!
//! ```text
//! p(i, j) = d^alpha / Z
//! d       = min(|i - j|, N - |i - j|) / N
//! Z       = ((N / 2)^(alpha + 1) - 1) / (1 + alpha)
//! ```
//!
//! Each step redraws every ordered pair and reconciles the graph against the
//! draw: missing edges are added, unwanted ones removed, the rest untouched.
//! A probability outside `[0, 1]` means the exponent and size are
//! inconsistent and aborts the run.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{SimulationError, SimulationResult};
use crate::network::BooleanNetwork;
use crate::params::ParamBag;
use crate::rng::{uniform, SimRng};
use crate::rule::NoisyThreshold;
use crate::sample::{take_samples, OrderForm, Samples};
use crate::simulator::Simulator;

use super::{read_eta, read_system_size};

/// Weight of every rewired edge.
const LINK_WEIGHT: f64 = 1.0;

/// Default power-law exponent.
pub const DEFAULT_ALPHA: f64 = 2.0;

/// Link probability law for a ring of `system_size` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawLinks {
    system_size: usize,
    alpha: f64,
    norm: f64,
}

impl PowerLawLinks {
    pub fn new(system_size: usize, alpha: f64) -> Self {
        let norm = ((system_size as f64 / 2.0).powf(alpha + 1.0) - 1.0) / (1.0 + alpha);
        Self {
            system_size,
            alpha,
            norm,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The normalizer `Z`.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Circular distance between `i` and `j` as a fraction of the ring.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let n = self.system_size as f64;
        let dist1 = (i as f64 - j as f64).abs();
        let dist2 = n - dist1;
        dist1.min(dist2) / n
    }

    /// Probability of the edge `i -> j`.
    ///
    /// Fails when the value is not a probability (NaN included).
    pub fn probability(&self, i: usize, j: usize) -> SimulationResult<f64> {
        let p = self.distance(i, j).powf(self.alpha) / self.norm;
        if !(0.0..=1.0).contains(&p) {
            return Err(SimulationError::LinkProbabilityOutOfRange { i, j, p });
        }
        Ok(p)
    }
}

/// Edge changes made by one rewiring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewireStats {
    pub added: usize,
    pub removed: usize,
}

/// Reconcile `network` with a fresh draw of every ordered pair.
///
/// Pairs are visited row by row (`i` outer, `j` inner), one uniform draw each.
pub fn rewire<R: Rng + ?Sized>(
    network: &mut BooleanNetwork,
    links: &PowerLawLinks,
    rng: &mut R,
) -> SimulationResult<RewireStats> {
    let n = network.system_size();
    let mut stats = RewireStats::default();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }

            let p = links.probability(i, j)?;
            let edge_should_exist = uniform(rng) < p;
            let connections = &mut network.connections;

            match (connections.contains_edge(i, j), edge_should_exist) {
                (true, false) => {
                    connections.remove_edge(i, j);
                    stats.removed += 1;
                }
                (false, true) => {
                    connections.add_directed_edge(i, j, LINK_WEIGHT);
                    stats.added += 1;
                }
                _ => {}
            }
        }
    }

    trace!(added = stats.added, removed = stats.removed, "rewire_complete");
    Ok(stats)
}

/// Options of the nonlocal topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonlocalConfig {
    pub system_size: usize,
    pub eta: f64,
    /// Power-law exponent.
    pub alpha: f64,
    pub sample_configurations: bool,
}

impl NonlocalConfig {
    pub fn from_params(params: &ParamBag) -> SimulationResult<Self> {
        Ok(Self {
            system_size: read_system_size(params)?,
            eta: read_eta(params)?,
            alpha: params.get_f64_or("alpha", DEFAULT_ALPHA)?,
            sample_configurations: params.get_bool_or("sample_configurations", false)?,
        })
    }
}

/// Noisy threshold dynamics on a power-law digraph rewired every step.
#[derive(Debug)]
pub struct NonlocalSimulator {
    config: NonlocalConfig,
    links: PowerLawLinks,
    rule: NoisyThreshold,
    network: BooleanNetwork,
    rng: SimRng,
    steps: u64,
}

impl NonlocalSimulator {
    pub fn new(params: &ParamBag, rng: SimRng) -> SimulationResult<Self> {
        Self::with_config(NonlocalConfig::from_params(params)?, rng)
    }

    pub fn with_config(config: NonlocalConfig, mut rng: SimRng) -> SimulationResult<Self> {
        let rule = NoisyThreshold::new(config.eta)?;
        let links = PowerLawLinks::new(config.system_size, config.alpha);

        let mut network = BooleanNetwork::new(config.system_size);
        rewire(&mut network, &links, &mut rng)?;
        network.randomize(&mut rng);

        info!(
            nodes = config.system_size,
            alpha = config.alpha,
            norm = links.norm(),
            edges = network.connections.edge_count(),
            "nonlocal_generated"
        );

        Ok(Self {
            config,
            links,
            rule,
            network,
            rng,
            steps: 0,
        })
    }

    pub fn config(&self) -> &NonlocalConfig {
        &self.config
    }

    pub fn links(&self) -> &PowerLawLinks {
        &self.links
    }
}

impl Simulator for NonlocalSimulator {
    fn name(&self) -> &'static str {
        "nonlocal"
    }

    fn advance(&mut self, steps: u32) -> SimulationResult<()> {
        let mut flipped = 0;
        let mut churn = RewireStats::default();
        for _ in 0..steps {
            flipped += self.network.apply_rule(&self.rule, &mut self.rng).flipped;
            let stats = rewire(&mut self.network, &self.links, &mut self.rng)?;
            churn.added += stats.added;
            churn.removed += stats.removed;
            self.steps += 1;
        }
        debug!(
            steps,
            flipped,
            added = churn.added,
            removed = churn.removed,
            order = self.network.order_abs(),
            "advance_complete"
        );
        Ok(())
    }

    /// Reports `order_abs` (no signed `order` key) plus optional `spins`.
    fn sample(&self) -> Samples {
        take_samples(
            &self.network,
            OrderForm::AbsoluteOnly,
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
