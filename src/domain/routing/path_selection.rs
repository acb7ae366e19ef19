use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::request::Request;
use crate::domain::routing::graph::Graph;
use crate::domain::routing::path::Path;
use crate::domain::routing::yen::k_shortest_paths;
use crate::domain::utils::id::RequestId;

/// Chooses the backup path of a request from its K shortest candidates.
///
/// `candidates[0]` is always the primary path and must never be returned.
pub trait BackupSelector {
    fn select_backup<'a>(&self, candidates: &'a [Path]) -> Option<&'a Path>;
}

/// The available backup selection heuristics. None of them guarantees a disjoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BackupStrategy {
    /// The second shortest candidate.
    Shortest,

    /// The last (highest weight) candidate found.
    #[default]
    Longest,

    /// The candidate sharing the fewest intermediate nodes with the primary path.
    /// Earlier (lighter) candidates win ties.
    MostDisjoint,
}

impl BackupSelector for BackupStrategy {
    fn select_backup<'a>(&self, candidates: &'a [Path]) -> Option<&'a Path> {
        let (primary, alternatives) = candidates.split_first()?;

        match self {
            BackupStrategy::Shortest => alternatives.first(),
            BackupStrategy::Longest => alternatives.last(),
            BackupStrategy::MostDisjoint => alternatives.iter().min_by_key(|path| path.shared_intermediate_nodes(primary)),
        }
    }
}

/// The primary and backup path assigned to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestRoutes {
    pub primary: Option<Path>,
    pub backup: Option<Path>,
}

static UNROUTABLE: RequestRoutes = RequestRoutes { primary: None, backup: None };

impl RequestRoutes {
    pub fn new(primary: Path, backup: Option<Path>) -> Self {
        Self { primary: Some(primary), backup }
    }

    pub fn unroutable() -> Self {
        Self::default()
    }

    pub fn is_routable(&self) -> bool {
        self.primary.is_some()
    }

    /// All assigned paths, primary first.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.primary.iter().chain(self.backup.iter())
    }

    /// Number of nodes on the primary path, `0` if unroutable.
    pub fn primary_len(&self) -> usize {
        self.primary.as_ref().map_or(0, Path::len)
    }

    /// Two requests conflict if any of their paths share a node.
    pub fn conflicts_with(&self, other: &RequestRoutes) -> bool {
        self.paths().any(|own| other.paths().any(|foreign| own.shares_node_with(foreign)))
    }
}

/// Maps every request of a round to its selected paths.
#[derive(Debug, Clone, Default)]
pub struct PathAssignment {
    routes: HashMap<RequestId, RequestRoutes>,
}

impl PathAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the K shortest paths for every request and selects primary and backup paths.
    pub fn compute(graph: &Graph, requests: &[Request], k: usize, selector: &impl BackupSelector) -> Self {
        let mut assignment = PathAssignment::new();

        for request in requests {
            let candidates = k_shortest_paths(graph, request.source, request.destination, k);

            let routes = match candidates.first() {
                Some(primary) => RequestRoutes::new(primary.clone(), selector.select_backup(&candidates).cloned()),
                None => {
                    log::warn!("NoPathFound: {} ({} => {}) is unroutable", request.id, request.source, request.destination);
                    RequestRoutes::unroutable()
                }
            };

            if let Some(primary) = &routes.primary {
                log::debug!(
                    "{}: primary {} | backup {}",
                    request.id,
                    primary,
                    routes.backup.as_ref().map_or_else(|| "none".to_string(), |backup| backup.to_string())
                );
            }

            assignment.insert(request.id.clone(), routes);
        }

        assignment
    }

    pub fn insert(&mut self, request_id: RequestId, routes: RequestRoutes) {
        self.routes.insert(request_id, routes);
    }

    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.routes.contains_key(request_id)
    }

    /// Returns the routes of `request_id`.
    ///
    /// Every scheduled request must have an entry. A missing entry is a programming error:
    /// debug builds panic, release builds treat the request as having no paths so it neither
    /// conflicts nor fails.
    pub fn routes(&self, request_id: &RequestId) -> &RequestRoutes {
        match self.routes.get(request_id) {
            Some(routes) => routes,
            None => {
                log::error!("Missing path assignment for {}. Treating it as unroutable.", request_id);
                debug_assert!(false, "missing path assignment for {}", request_id);
                &UNROUTABLE
            }
        }
    }

    pub fn is_routable(&self, request_id: &RequestId) -> bool {
        self.routes.get(request_id).is_some_and(RequestRoutes::is_routable)
    }

    pub fn conflict(&self, a: &RequestId, b: &RequestId) -> bool {
        self.routes(a).conflicts_with(self.routes(b))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topology::NodeId;

    fn path(ids: &[u32]) -> Path {
        Path::new(ids.iter().map(|id| NodeId(*id)).collect(), ids.len() as u64 - 1)
    }

    #[test]
    fn strategies_pick_different_candidates() {
        let candidates = vec![path(&[1, 2, 3]), path(&[1, 4, 3]), path(&[1, 2, 5, 6, 3])];

        assert_eq!(BackupStrategy::Shortest.select_backup(&candidates), Some(&candidates[1]));
        assert_eq!(BackupStrategy::Longest.select_backup(&candidates), Some(&candidates[2]));
        assert_eq!(BackupStrategy::MostDisjoint.select_backup(&candidates), Some(&candidates[1]));
    }

    #[test]
    fn single_candidate_has_no_backup() {
        let candidates = vec![path(&[1, 2])];

        for strategy in [BackupStrategy::Shortest, BackupStrategy::Longest, BackupStrategy::MostDisjoint] {
            assert_eq!(strategy.select_backup(&candidates), None);
        }
        assert_eq!(BackupStrategy::Longest.select_backup(&[]), None);
    }

    #[test]
    fn backup_paths_take_part_in_conflicts() {
        let a = RequestRoutes::new(path(&[1, 2]), Some(path(&[1, 3, 4, 2])));
        let b = RequestRoutes::new(path(&[5, 4]), None);
        let c = RequestRoutes::new(path(&[6, 7]), None);

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
        assert!(!RequestRoutes::unroutable().conflicts_with(&a));
    }
}
