//! Static random digraph with fixed in-degree `k`.
//!
//! Every target independently draws `k` distinct sources uniformly from all
//! `N` nodes. The candidate list is rebuilt and reshuffled for each target, so
//! draws for different targets are uncorrelated. A node may draw itself.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use threshold_graph_core::NodeIdx;
use tracing::{debug, info};

use crate::error::{SimulationError, SimulationResult};
use crate::network::BooleanNetwork;
use crate::params::ParamBag;
use crate::rng::SimRng;
use crate::rule::NoisyThreshold;
use crate::sample::{take_samples, OrderForm, Samples};
use crate::simulator::Simulator;
use crate::weights::ConnectionDistribution;

use super::{read_distribution, read_eta, read_system_size};

/// `k` distinct indices drawn uniformly without replacement from `0..n`.
///
/// # Panics
///
/// Panics if `k > n`.
pub fn n_choose_k<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<NodeIdx> {
    assert!(k <= n, "cannot choose {k} of {n}");
    let mut sites: Vec<NodeIdx> = (0..n).collect();
    let (chosen, _) = sites.partial_shuffle(rng, k);
    chosen.to_vec()
}

/// Give every node of `network` exactly `k` inputs.
pub fn generate_random_k<R: Rng + ?Sized>(
    network: &mut BooleanNetwork,
    k: usize,
    distribution: ConnectionDistribution,
    rng: &mut R,
) {
    let n = network.system_size();
    for i in 0..n {
        for j in n_choose_k(n, k, rng) {
            network
                .connections
                .add_directed_edge(j, i, distribution.sample());
        }
    }
}

/// Options of the random-k topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomKConfig {
    pub system_size: usize,
    /// Exact in-degree of every node.
    pub k: usize,
    pub eta: f64,
    pub connection_distribution: ConnectionDistribution,
    pub sample_configurations: bool,
}

impl RandomKConfig {
    pub fn from_params(params: &ParamBag) -> SimulationResult<Self> {
        let system_size = read_system_size(params)?;
        Ok(Self {
            system_size,
            k: params.get_usize("k")?,
            eta: read_eta(params)?,
            connection_distribution: read_distribution(params)?,
            sample_configurations: params.get_bool_or("sample_configurations", false)?,
        })
    }
}

/// Noisy threshold dynamics on a static random-k digraph.
#[derive(Debug)]
pub struct RandomKSimulator {
    config: RandomKConfig,
    rule: NoisyThreshold,
    network: BooleanNetwork,
    rng: SimRng,
    steps: u64,
}

impl RandomKSimulator {
    pub fn new(params: &ParamBag, rng: SimRng) -> SimulationResult<Self> {
        Self::with_config(RandomKConfig::from_params(params)?, rng)
    }

    pub fn with_config(config: RandomKConfig, mut rng: SimRng) -> SimulationResult<Self> {
        if config.k > config.system_size {
            return Err(SimulationError::InvalidInDegree {
                k: config.k,
                system_size: config.system_size,
            });
        }
        let rule = NoisyThreshold::new(config.eta)?;

        let mut network = BooleanNetwork::new(config.system_size);
        generate_random_k(
            &mut network,
            config.k,
            config.connection_distribution,
            &mut rng,
        );
        network.randomize(&mut rng);

        info!(
            nodes = config.system_size,
            k = config.k,
            edges = network.connections.edge_count(),
            "random_k_generated"
        );

        Ok(Self {
            config,
            rule,
            network,
            rng,
            steps: 0,
        })
    }

    pub fn config(&self) -> &RandomKConfig {
        &self.config
    }
}

impl Simulator for RandomKSimulator {
    fn name(&self) -> &'static str {
        "random_k"
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
