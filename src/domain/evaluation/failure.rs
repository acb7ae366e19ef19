use rand::Rng;
use rand::seq::index;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::routing::path_selection::{PathAssignment, RequestRoutes};
use crate::domain::schedule::schedule::{Schedule, Timeslot};
use crate::domain::topology::NodeId;
use crate::domain::utils::id::RequestId;

/// Synthetic node failures: timeslot -> nodes that are down during that timeslot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureMap {
    failures: BTreeMap<Timeslot, BTreeSet<NodeId>>,
}

impl FailureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws failures for `num_timeslots` timeslots over a grid of `num_nodes` nodes.
    ///
    /// `max(1, floor(num_timeslots * fraction))` distinct timeslots fail, each with
    /// `max(1, floor(num_nodes * fraction))` distinct nodes. `fraction` is clamped to `[0, 1]`
    /// (a NaN counts as `0`); the counts never exceed the available timeslots or nodes.
    pub fn generate<R: Rng + ?Sized>(num_timeslots: Timeslot, num_nodes: usize, fraction: f64, rng: &mut R) -> Self {
        let mut failure_map = FailureMap::new();
        if num_timeslots == 0 || num_nodes == 0 {
            return failure_map;
        }

        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };

        let failed_timeslot_count = selection_size(num_timeslots as usize, fraction);
        let failed_node_count = selection_size(num_nodes, fraction);

        for slot_index in index::sample(&mut *rng, num_timeslots as usize, failed_timeslot_count).into_iter() {
            let nodes = index::sample(&mut *rng, num_nodes, failed_node_count).into_iter().map(|node_index| NodeId(node_index as u32 + 1)).collect();
            failure_map.failures.insert(slot_index as Timeslot + 1, nodes);
        }

        log::debug!("Generated failures for {} of {} timeslot(s), {} node(s) each", failed_timeslot_count, num_timeslots, failed_node_count);

        failure_map
    }

    pub fn insert(&mut self, timeslot: Timeslot, nodes: impl IntoIterator<Item = NodeId>) {
        self.failures.entry(timeslot).or_default().extend(nodes);
    }

    pub fn failed_nodes(&self, timeslot: Timeslot) -> Option<&BTreeSet<NodeId>> {
        self.failures.get(&timeslot)
    }

    pub fn failed_timeslots(&self) -> impl Iterator<Item = Timeslot> + '_ {
        self.failures.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// A request fails if every assigned path (primary and, if present, backup) runs through a
    /// failed node. Unroutable requests never fail.
    pub fn is_request_failed(&self, routes: &RequestRoutes, timeslot: Timeslot) -> bool {
        let Some(failed_nodes) = self.failed_nodes(timeslot) else {
            return false;
        };

        routes.is_routable() && routes.paths().all(|path| path.nodes.iter().any(|node| failed_nodes.contains(node)))
    }

    /// Collects the requests of `schedule` that fail at their timeslot, in schedule order.
    pub fn failed_requests(&self, schedule: &Schedule, routes: &PathAssignment) -> Vec<RequestId> {
        schedule
            .entries()
            .iter()
            .filter(|entry| self.is_request_failed(routes.routes(&entry.request_id), entry.timeslot))
            .map(|entry| entry.request_id.clone())
            .collect()
    }
}

fn selection_size(available: usize, fraction: f64) -> usize {
    ((available as f64 * fraction).floor() as usize).clamp(1, available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_clamped_to_at_least_one() {
        assert_eq!(selection_size(10, 0.0), 1);
        assert_eq!(selection_size(10, 0.05), 1);
        assert_eq!(selection_size(10, 0.25), 2);
        assert_eq!(selection_size(10, 1.0), 10);
    }
}
