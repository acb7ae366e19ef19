use rand::Rng;
use rand::seq::index;

use crate::domain::request::{Request, Round};
use crate::domain::topology::Topology;
use crate::domain::utils::id::RequestId;
use crate::error::{Error, Result};

/// Draws random source/destination pairs over the nodes of a topology.
///
/// All randomness comes from the generator handed to each call, so a seeded generator
/// reproduces the same rounds.
#[derive(Debug, Clone, Copy)]
pub struct RequestGenerator<'a> {
    topology: &'a Topology,
}

impl<'a> RequestGenerator<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Generates `num_requests` requests for round `round_number` (1-based).
    ///
    /// Each request samples two distinct nodes uniformly without replacement; pairs may repeat
    /// across requests.
    pub fn generate_round<R: Rng + ?Sized>(&self, round_number: usize, num_requests: usize, rng: &mut R) -> Result<Round> {
        let nodes = self.topology.nodes();
        if nodes.len() < 2 {
            return Err(Error::InsufficientNodes(nodes.len()));
        }

        let requests = (1..=num_requests)
            .map(|index| {
                let pair = index::sample(&mut *rng, nodes.len(), 2);
                Request::new(RequestId::for_round(round_number, index), nodes[pair.index(0)].id, nodes[pair.index(1)].id)
            })
            .collect();

        Ok(Round { number: round_number, requests })
    }

    /// Generates `num_rounds` independent rounds numbered from 1.
    pub fn generate_rounds<R: Rng + ?Sized>(&self, num_requests: usize, num_rounds: usize, rng: &mut R) -> Result<Vec<Round>> {
        (1..=num_rounds).map(|round_number| self.generate_round(round_number, num_requests, &mut *rng)).collect()
    }
}
