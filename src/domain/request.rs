pub mod request_generator;

use crate::domain::topology::NodeId;
use crate::domain::utils::id::RequestId;

/// A communication request between two grid nodes, created once per round and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub source: NodeId,
    pub destination: NodeId,
}

impl Request {
    pub fn new(id: RequestId, source: NodeId, destination: NodeId) -> Self {
        Self { id, source, destination }
    }
}

/// All requests generated for one round, in generation (arrival) order.
#[derive(Debug, Clone)]
pub struct Round {
    pub number: usize,
    pub requests: Vec<Request>,
}

impl Round {
    pub fn request(&self, id: &RequestId) -> Option<&Request> {
        self.requests.iter().find(|request| &request.id == id)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
