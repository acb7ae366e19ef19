use std::collections::BTreeMap;

use crate::domain::topology::{NodeId, Topology};

/// Weighted, undirected adjacency structure the path finder searches on.
///
/// Neighbours are kept ordered by node id so that every search explores them in the same
/// order and produces the same paths for the same input.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, u64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_topology(topology: &Topology) -> Self {
        let mut graph = Graph::new();

        for node in topology.nodes() {
            graph.add_node(node.id);
        }

        for link in topology.links() {
            graph.add_edge(link.a, link.b, link.weight);
        }

        graph
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    /// Inserts (or re-weights) the undirected edge `a <-> b`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: u64) {
        self.adjacency.entry(a).or_default().insert(b, weight);
        self.adjacency.entry(b).or_default().insert(a, weight);
    }

    /// Removes the undirected edge `a <-> b` and returns its weight, if it existed.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<u64> {
        let weight = self.adjacency.get_mut(&a).and_then(|neighbours| neighbours.remove(&b));
        if let Some(neighbours) = self.adjacency.get_mut(&b) {
            neighbours.remove(&a);
        }
        weight
    }

    /// Removes every edge incident to `node`. The node itself stays in the graph.
    ///
    /// # Returns
    /// The number of removed edges.
    pub fn isolate_node(&mut self, node: NodeId) -> usize {
        let neighbours: Vec<NodeId> = self.neighbours(node).map(|(neighbour, _)| neighbour).collect();

        for neighbour in &neighbours {
            self.remove_edge(node, *neighbour);
        }

        neighbours.len()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|neighbours| neighbours.len()).sum::<usize>() / 2
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<u64> {
        self.adjacency.get(&a).and_then(|neighbours| neighbours.get(&b)).copied()
    }

    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.adjacency.get(&node).into_iter().flat_map(|neighbours| neighbours.iter().map(|(id, weight)| (*id, *weight)))
    }

    /// Sum of the edge weights along `nodes`, or `None` if two consecutive nodes are not adjacent.
    pub fn path_weight(&self, nodes: &[NodeId]) -> Option<u64> {
        nodes.windows(2).map(|hop| self.edge_weight(hop[0], hop[1])).sum()
    }
}
