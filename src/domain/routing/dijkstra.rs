use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::domain::routing::graph::Graph;
use crate::domain::routing::path::Path;
use crate::domain::topology::NodeId;
use crate::error::{Error, Result};

/// Edges and nodes a single search must not traverse.
///
/// Acts as a read-only view over the shared graph: the spur searches of Yen's algorithm block
/// edges here instead of removing them from the graph, so the graph never has to be restored.
#[derive(Debug, Default, Clone)]
pub struct SearchExclusions {
    edges: HashSet<(NodeId, NodeId)>,
    nodes: HashSet<NodeId>,
}

impl SearchExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_edge(&mut self, a: NodeId, b: NodeId) {
        self.edges.insert((a, b));
        self.edges.insert((b, a));
    }

    pub fn exclude_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    fn blocks(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes.contains(&to) || self.edges.contains(&(from, to))
    }
}

/// Computes the minimum-weight path from `source` to `target`.
///
/// # Returns
/// * `Error::UnknownNode` if one of the endpoints is not part of the graph.
/// * `Error::NoPath` if `target` is unreachable from `source`.
pub fn shortest_path(graph: &Graph, source: NodeId, target: NodeId) -> Result<Path> {
    for node in [source, target] {
        if !graph.contains_node(node) {
            return Err(Error::UnknownNode(node));
        }
    }

    shortest_path_excluding(graph, source, target, &SearchExclusions::new()).ok_or(Error::NoPath { from: source, to: target })
}

/// Dijkstra search that ignores everything blocked by `exclusions`.
///
/// Returns `None` if `target` cannot be reached.
pub fn shortest_path_excluding(graph: &Graph, source: NodeId, target: NodeId, exclusions: &SearchExclusions) -> Option<Path> {
    let mut distances: HashMap<NodeId, u64> = HashMap::new();
    let mut predecessors: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(source, 0);
    queue.push(Reverse((0u64, source)));

    while let Some(Reverse((distance, node))) = queue.pop() {
        if node == target {
            break;
        }

        // Stale queue entry, a shorter distance was settled already.
        if distances.get(&node).is_some_and(|best| distance > *best) {
            continue;
        }

        for (neighbour, weight) in graph.neighbours(node) {
            if exclusions.blocks(node, neighbour) {
                continue;
            }

            let candidate = distance + weight;
            if distances.get(&neighbour).is_none_or(|current| candidate < *current) {
                distances.insert(neighbour, candidate);
                predecessors.insert(neighbour, node);
                queue.push(Reverse((candidate, neighbour)));
            }
        }
    }

    let weight = *distances.get(&target)?;

    let mut nodes = vec![target];
    let mut current = target;
    while current != source {
        current = *predecessors.get(&current)?;
        nodes.push(current);
    }
    nodes.reverse();

    Some(Path::new(nodes, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> Graph {
        // V1 - V2 - V3 and a costly shortcut V1 - V3
        let mut graph = Graph::new();
        graph.add_edge(NodeId(1), NodeId(2), 1);
        graph.add_edge(NodeId(2), NodeId(3), 1);
        graph.add_edge(NodeId(1), NodeId(3), 5);
        graph
    }

    #[test]
    fn prefers_lower_total_weight_over_fewer_hops() {
        let path = shortest_path(&line_graph(), NodeId(1), NodeId(3)).unwrap();
        assert_eq!(path.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(path.weight, 2);
    }

    #[test]
    fn excluded_edge_forces_detour() {
        let mut exclusions = SearchExclusions::new();
        exclusions.exclude_edge(NodeId(2), NodeId(1));

        let path = shortest_path_excluding(&line_graph(), NodeId(1), NodeId(3), &exclusions).unwrap();
        assert_eq!(path.nodes, vec![NodeId(1), NodeId(3)]);
        assert_eq!(path.weight, 5);
    }

    #[test]
    fn source_equals_target_is_trivial_path() {
        let path = shortest_path(&line_graph(), NodeId(2), NodeId(2)).unwrap();
        assert_eq!(path.nodes, vec![NodeId(2)]);
        assert_eq!(path.weight, 0);
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let result = shortest_path(&line_graph(), NodeId(1), NodeId(9));
        assert!(matches!(result, Err(Error::UnknownNode(NodeId(9)))));
    }
}
