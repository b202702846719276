//! Core connection store shared across the threshold-graph workspace.
//!
//! A [`ConnectionGraph`] owns `N` nodes, each carrying a scalar state value,
//! and for every target node the unordered list of its incoming weighted
//! edges (`edges[i]` = inputs to `i`). Generators build and rewire it; the
//! automaton reads it to compute per-node potentials.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};

/// Index of a node, always in `[0, N)`.
pub type NodeIdx = usize;

/// One incoming edge of a target node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Node the signal comes from.
    pub source: NodeIdx,
    /// Connection strength applied to the source value.
    pub weight: f64,
}

/// Weighted directed graph over `N` nodes plus the flat array of node values.
///
/// Edges are stored per target, so the existence test and single-edge
/// removal cost `O(in_degree(target))`. Duplicate edges are not rejected:
/// adding the same `(source, target)` pair twice stores two edges and both
/// contribute to the target's potential.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGraph {
    num_vertices: usize,
    edges: Vec<Vec<Edge>>,
    vals: Vec<i32>,
}

impl ConnectionGraph {
    /// Create a graph with `num_vertices` nodes, no edges, all values `0`.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            edges: vec![Vec::new(); num_vertices],
            vals: vec![0; num_vertices],
        }
    }

    /// Number of nodes.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// Total number of stored directed edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Current value of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_vertices()`.
    pub fn get_value(&self, i: NodeIdx) -> i32 {
        self.vals[i]
    }

    /// Overwrite the value of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_vertices()`.
    pub fn set_value(&mut self, i: NodeIdx, value: i32) {
        self.vals[i] = value;
    }

    /// All node values in index order.
    pub fn values(&self) -> &[i32] {
        &self.vals
    }

    /// Insert one incoming edge `source -> target`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn add_directed_edge(&mut self, source: NodeIdx, target: NodeIdx, weight: f64) {
        assert!(
            source < self.num_vertices,
            "source {source} out of range for {} nodes",
            self.num_vertices
        );
        self.edges[target].push(Edge { source, weight });
    }

    /// Whether at least one edge `source -> target` exists.
    pub fn contains_edge(&self, source: NodeIdx, target: NodeIdx) -> bool {
        self.edges[target].iter().any(|e| e.source == source)
    }

    /// Remove the first edge `source -> target`, returning its weight.
    ///
    /// Returns `None` when no such edge exists; callers that rely on an
    /// edge being present should probe with [`contains_edge`](Self::contains_edge).
    pub fn remove_edge(&mut self, source: NodeIdx, target: NodeIdx) -> Option<f64> {
        let inputs = &mut self.edges[target];
        let pos = inputs.iter().position(|e| e.source == source)?;
        Some(inputs.swap_remove(pos).weight)
    }

    /// Incoming edges of `target`, in no guaranteed order.
    pub fn incoming(&self, target: NodeIdx) -> &[Edge] {
        &self.edges[target]
    }

    /// Number of incoming edges of `target`.
    pub fn in_degree(&self, target: NodeIdx) -> usize {
        self.edges[target].len()
    }

    /// Iterate over every stored edge as `(target, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIdx, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(target, inputs)| inputs.iter().map(move |e| (target, e)))
    }

    /// Convert to petgraph `StableDiGraph` for visualization/analysis.
    ///
    /// Node weights are the node values, edge weights the connection weights.
    /// The returned vector maps a node index to its petgraph `NodeIndex`.
    pub fn to_petgraph(&self) -> (StableDiGraph<i32, f64>, Vec<NodeIndex>) {
        let mut graph = StableDiGraph::with_capacity(self.num_vertices, self.edge_count());
        let index: Vec<NodeIndex> = self.vals.iter().map(|&v| graph.add_node(v)).collect();

        for (target, edge) in self.edges() {
            graph.add_edge(index[edge.source], index[target], edge.weight);
        }

        (graph, index)
    }
}
