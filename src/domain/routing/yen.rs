use crate::domain::routing::dijkstra::{SearchExclusions, shortest_path_excluding};
use crate::domain::routing::graph::Graph;
use crate::domain::routing::path::Path;
use crate::domain::topology::NodeId;

/// The number of loopless shortest paths calculated per request unless configured otherwise.
pub const K_NUMBER_OF_PATHS: usize = 10;

/// Calculates up to `k` loopless shortest paths from `source` to `target` using Yen's algorithm.
///
/// Every spur search runs against an exclusion view of `graph`: the edges leaving the shared
/// root prefix of the accepted paths and the root nodes in front of the spur node are blocked
/// for that single search only. The graph itself is never modified.
///
/// # Returns
/// The paths ordered by non-decreasing weight. The result is empty if `source == target`,
/// if an endpoint is unknown or if the endpoints are disconnected, and holds fewer than `k`
/// paths if the graph does not support more.
pub fn k_shortest_paths(graph: &Graph, source: NodeId, target: NodeId, k: usize) -> Vec<Path> {
    if k == 0 || source == target || !graph.contains_node(source) || !graph.contains_node(target) {
        return Vec::new();
    }

    let Some(shortest) = shortest_path_excluding(graph, source, target, &SearchExclusions::new()) else {
        log::debug!("NoPathFound: {} => {}", source, target);
        return Vec::new();
    };

    let mut accepted: Vec<Path> = vec![shortest];
    let mut candidates: Vec<Path> = Vec::new();

    while accepted.len() < k {
        let previous = accepted[accepted.len() - 1].nodes.clone();

        for spur_index in 0..previous.len() - 1 {
            let spur_node = previous[spur_index];
            let root = &previous[..=spur_index];

            let mut exclusions = SearchExclusions::new();
            for path in &accepted {
                if path.nodes.len() > spur_index + 1 && path.nodes[..=spur_index] == *root {
                    exclusions.exclude_edge(path.nodes[spur_index], path.nodes[spur_index + 1]);
                }
            }
            for node in &root[..spur_index] {
                exclusions.exclude_node(*node);
            }

            let Some(spur_path) = shortest_path_excluding(graph, spur_node, target, &exclusions) else {
                continue;
            };

            let Some(root_weight) = graph.path_weight(root) else {
                continue;
            };

            let mut nodes = root[..spur_index].to_vec();
            nodes.extend(spur_path.nodes);
            let candidate = Path::new(nodes, root_weight + spur_path.weight);

            if !candidates.contains(&candidate) && !accepted.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        // min_by_key keeps the earliest candidate among equal weights.
        let Some(best) = candidates.iter().enumerate().min_by_key(|(_, path)| path.weight).map(|(index, _)| index) else {
            break;
        };

        accepted.push(candidates.remove(best));
    }

    log::debug!("Paths found {} => {}: {} solution(s)", source, target, accepted.len());

    accepted
}
