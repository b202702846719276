//! Boolean threshold network: node values in {-1, +1} updated synchronously
//! from the signs of their weighted inputs.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use threshold_graph_core::ConnectionGraph;
use tracing::trace;

use crate::error::SimulationResult;
use crate::rng::uniform;
use crate::rule::{NoisyThreshold, Signal, UpdateRule};

/// Outcome of one synchronous sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    /// Nodes whose value changed.
    pub flipped: usize,
    /// Nodes whose potential was too weak to decide; they kept their value.
    pub indeterminate: usize,
}

/// Connection store plus the threshold update rule operating on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanNetwork {
    /// Weighted inputs and node values.
    pub connections: ConnectionGraph,
}

impl BooleanNetwork {
    /// Network of `system_size` nodes with no connections.
    pub fn new(system_size: usize) -> Self {
        Self {
            connections: ConnectionGraph::new(system_size),
        }
    }

    /// Wrap an existing connection store.
    pub fn from_connections(connections: ConnectionGraph) -> Self {
        Self { connections }
    }

    /// Number of nodes.
    pub fn system_size(&self) -> usize {
        self.connections.num_vertices()
    }

    /// Set every node to `+1` or `-1` with probability one half each.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.system_size() {
            let value = if uniform(rng) < 0.5 { 1 } else { -1 };
            self.connections.set_value(i, value);
        }
    }

    /// Raw potentials `sum(w * value[j])` over each node's inputs.
    pub fn potentials(&self) -> Vec<f64> {
        (0..self.system_size())
            .map(|i| {
                self.connections
                    .incoming(i)
                    .iter()
                    .map(|e| e.weight * f64::from(self.connections.get_value(e.source)))
                    .sum()
            })
            .collect()
    }

    /// Classify every node by the sign of its potential.
    ///
    /// Computed entirely from the current values, so it is the pre-sweep
    /// snapshot every update in a sweep is based on.
    pub fn onsite_potential(&self) -> Vec<Signal> {
        self.potentials().into_iter().map(Signal::classify).collect()
    }

    /// Run one synchronous sweep with `rule`.
    ///
    /// The rule is consulted once per decided node, in index order;
    /// indeterminate nodes keep their value.
    pub fn apply_rule(&mut self, rule: &dyn UpdateRule, rng: &mut dyn RngCore) -> SweepStats {
        let stats = self.sweep(|signal| rule.resolve(signal, rng));
        trace!(
            rule = rule.id(),
            flipped = stats.flipped,
            indeterminate = stats.indeterminate,
            "sweep_complete"
        );
        stats
    }

    /// Deterministic (zero-temperature) sweep.
    pub fn update(&mut self) -> SweepStats {
        self.sweep(Signal::value)
    }

    /// Noisy sweep: each decided node anti-aligns with probability `eta`.
    pub fn update_noisy<R: RngCore>(
        &mut self,
        eta: f64,
        rng: &mut R,
    ) -> SimulationResult<SweepStats> {
        let rule = NoisyThreshold::new(eta)?;
        Ok(self.apply_rule(&rule, rng))
    }

    fn sweep(&mut self, mut resolve: impl FnMut(Signal) -> i32) -> SweepStats {
        let signals = self.onsite_potential();
        let mut stats = SweepStats::default();

        for (i, signal) in signals.into_iter().enumerate() {
            if !signal.is_decided() {
                stats.indeterminate += 1;
                continue;
            }
            let next = resolve(signal);
            if next != self.connections.get_value(i) {
                stats.flipped += 1;
            }
            self.connections.set_value(i, next);
        }

        stats
    }

    /// Mean node value, in `[-1, 1]`. Zero for an empty network.
    pub fn order(&self) -> f64 {
        let n = self.system_size();
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.connections.values().iter().map(|&v| f64::from(v)).sum();
        sum / n as f64
    }

    /// Absolute mean node value, in `[0, 1]`.
    pub fn order_abs(&self) -> f64 {
        self.order().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use crate::rule::ZeroTemperature;

    fn pair(a: i32, b: i32) -> BooleanNetwork {
        let mut net = BooleanNetwork::new(2);
        net.connections.add_directed_edge(0, 1, 1.0);
        net.connections.add_directed_edge(1, 0, 1.0);
        net.connections.set_value(0, a);
        net.connections.set_value(1, b);
        net
    }

    #[test]
    fn test_update_is_synchronous() {
        let mut net = pair(1, -1);
        let stats = net.update();
        assert_eq!(net.connections.values(), &[-1, 1]);
        assert_eq!(stats.flipped, 2);
    }

    #[test]
    fn test_zero_potential_keeps_value() {
        // Node 2 receives +1 and -1: exact zero potential.
        let mut net = BooleanNetwork::new(3);
        net.connections.add_directed_edge(0, 2, 1.0);
        net.connections.add_directed_edge(1, 2, 1.0);
        net.connections.set_value(0, 1);
        net.connections.set_value(1, -1);
        net.connections.set_value(2, -1);

        let stats = net.update();
        assert_eq!(net.connections.get_value(2), -1);
        // Nodes 0 and 1 have no inputs at all.
        assert_eq!(stats.indeterminate, 3);
        assert_eq!(stats.flipped, 0);
    }

    #[test]
    fn test_inert_edges_do_not_drive() {
        let mut net = BooleanNetwork::new(2);
        net.connections.add_directed_edge(0, 1, 0.0);
        net.connections.set_value(0, 1);
        net.connections.set_value(1, -1);
        net.update();
        assert_eq!(net.connections.get_value(1), -1);
    }

    #[test]
    fn test_onsite_potential_classification() {
        let mut net = BooleanNetwork::new(4);
        for j in 1..4 {
            net.connections.add_directed_edge(j, 0, 1.0);
        }
        net.connections.set_value(1, 1);
        net.connections.set_value(2, -1);
        net.connections.set_value(3, -1);
        assert_eq!(net.potentials()[0], -1.0);
        assert_eq!(net.onsite_potential()[0], Signal::Negative);
    }

    #[test]
    fn test_apply_rule_zero_temperature() {
        let mut rng = seeded_rng(2);
        let mut net = pair(1, -1);
        net.apply_rule(&ZeroTemperature, &mut rng);
        assert_eq!(net.connections.values(), &[-1, 1]);
    }

    #[test]
    fn test_noisy_with_zero_eta_matches_deterministic() {
        let mut rng = seeded_rng(11);
        let mut a = pair(1, -1);
        let mut b = pair(1, -1);
        a.update();
        b.update_noisy(0.0, &mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noisy_with_unit_eta_inverts() {
        let mut rng = seeded_rng(11);
        let mut net = pair(1, -1);
        net.update_noisy(1.0, &mut rng).unwrap();
        // Threshold says (-1, +1); eta = 1 inverts both.
        assert_eq!(net.connections.values(), &[1, -1]);
    }

    #[test]
    fn test_noisy_draws_only_for_decided_nodes() {
        // Only node 0 has an input; nodes 1 and 2 stay indeterminate.
        let mut net = BooleanNetwork::new(3);
        net.connections.add_directed_edge(1, 0, 1.0);
        net.connections.set_value(1, 1);

        let mut rng = seeded_rng(42);
        let stats = net.update_noisy(0.5, &mut rng).unwrap();
        assert_eq!(stats.indeterminate, 2);

        let mut fresh = seeded_rng(42);
        let _ = uniform(&mut fresh);
        assert_eq!(uniform(&mut rng), uniform(&mut fresh));
    }

    #[test]
    fn test_noisy_rejects_bad_eta() {
        let mut rng = seeded_rng(0);
        let mut net = pair(1, 1);
        assert!(net.update_noisy(2.0, &mut rng).is_err());
    }

    #[test]
    fn test_randomize_produces_spins() {
        let mut rng = seeded_rng(5);
        let mut net = BooleanNetwork::new(200);
        net.randomize(&mut rng);
        assert!(net.connections.values().iter().all(|&v| v == 1 || v == -1));
        let ups = net.connections.values().iter().filter(|&&v| v == 1).count();
        assert!(ups > 50 && ups < 150);
    }

    #[test]
    fn test_order() {
        let mut net = BooleanNetwork::new(4);
        for i in 0..4 {
            net.connections.set_value(i, 1);
        }
        assert_eq!(net.order(), 1.0);
        net.connections.set_value(0, -1);
        net.connections.set_value(1, -1);
        net.connections.set_value(2, -1);
        assert_eq!(net.order(), -0.5);
        assert_eq!(net.order_abs(), 0.5);
        assert_eq!(BooleanNetwork::new(0).order(), 0.0);
    }
}
