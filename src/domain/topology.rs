use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a grid node. Wraps the 1-based, row-major index of the node and is
/// displayed as `V<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Zero-based position of the node in the row-major node list.
    pub fn index(&self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Position class of a node inside the grid. Determines the number of resource slots
/// (memories) a node is equipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPosition {
    Corner,
    Edge,
    Interior,
}

impl GridPosition {
    pub fn classify(row: u32, col: u32, size: u32) -> Self {
        let last = size.saturating_sub(1);
        let row_on_border = row == 0 || row == last;
        let col_on_border = col == 0 || col == last;

        if row_on_border && col_on_border {
            GridPosition::Corner
        } else if row_on_border || col_on_border {
            GridPosition::Edge
        } else {
            GridPosition::Interior
        }
    }

    pub fn capacity(&self) -> u32 {
        match self {
            GridPosition::Corner => 4,
            GridPosition::Edge => 6,
            GridPosition::Interior => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub row: u32,
    pub col: u32,
    pub position: GridPosition,

    /// Number of resource slots, fixed at creation by the position class.
    pub capacity: u32,
}

/// Undirected link between two grid-adjacent nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: u64,
}

/// Square lattice of `size * size` nodes with horizontal and vertical links only.
#[derive(Debug, Clone)]
pub struct Topology {
    size: u32,
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Topology {
    /// Builds the grid for `node_count` nodes.
    ///
    /// # Returns
    /// `Error::InvalidTopologySize` if `node_count` is zero or not a perfect square.
    pub fn grid(node_count: usize) -> Result<Self> {
        let side = node_count.isqrt();
        if node_count == 0 || side * side != node_count {
            return Err(Error::InvalidTopologySize(node_count));
        }

        let size = u32::try_from(side).map_err(|_| Error::InvalidTopologySize(node_count))?;

        let mut nodes = Vec::with_capacity(node_count);
        for row in 0..size {
            for col in 0..size {
                let position = GridPosition::classify(row, col, size);
                nodes.push(Node { id: NodeId(row * size + col + 1), row, col, position, capacity: position.capacity() });
            }
        }

        let mut links = Vec::new();
        for node in &nodes {
            if node.col + 1 < size {
                links.push(Link { a: node.id, b: NodeId(node.id.0 + 1), weight: 1 });
            }
            if node.row + 1 < size {
                links.push(Link { a: node.id, b: NodeId(node.id.0 + size), weight: 1 });
            }
        }

        log::debug!("Built {}x{} grid topology: {} nodes, {} links", size, size, nodes.len(), links.len());

        Ok(Topology { size, nodes, links })
    }

    /// Length of one side of the grid.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|node| node.id == id)
    }

    /// L1 distance between the grid coordinates of two nodes.
    pub fn manhattan_distance(&self, a: NodeId, b: NodeId) -> Result<u32> {
        let node_a = self.node(a).ok_or(Error::UnknownNode(a))?;
        let node_b = self.node(b).ok_or(Error::UnknownNode(b))?;

        Ok(node_a.row.abs_diff(node_b.row) + node_a.col.abs_diff(node_b.col))
    }

    /// Largest Manhattan distance in the grid, i.e. between two opposite corners.
    pub fn longest_shortest_path(&self) -> u32 {
        2 * self.size.saturating_sub(1)
    }

    /// Sum of the resource slots of all nodes.
    pub fn total_capacity(&self) -> u64 {
        self.nodes.iter().map(|node| node.capacity as u64).sum()
    }
}
