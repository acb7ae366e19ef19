use std::fmt;

use crate::domain::topology::NodeId;

/// Represents a specific route through the grid, consisting of the sequence of nodes that
/// must be traversed in order, source and destination included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeId>,

    /// Sum of the weights of the traversed links.
    pub weight: u64,
}

impl Path {
    pub fn new(nodes: Vec<NodeId>, weight: u64) -> Self {
        Self { nodes, weight }
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Two paths conflict if they share at least one node.
    pub fn shares_node_with(&self, other: &Path) -> bool {
        self.nodes.iter().any(|node| other.contains(*node))
    }

    /// Number of nodes both paths pass through, excluding the shared endpoints.
    pub fn shared_intermediate_nodes(&self, other: &Path) -> usize {
        let inner = match self.nodes.len() {
            0..=2 => &[][..],
            len => &self.nodes[1..len - 1],
        };

        inner.iter().filter(|node| other.contains(**node)).count()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hops: Vec<String> = self.nodes.iter().map(|node| node.to_string()).collect();
        write!(f, "{}", hops.join(" -> "))
    }
}
