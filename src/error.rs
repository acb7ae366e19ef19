use thiserror::Error;

use crate::domain::topology::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse experiment configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write statistics CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid topology size: {0} nodes is not a positive perfect square")]
    InvalidTopologySize(usize),

    #[error("Node {0} is not part of the topology")]
    UnknownNode(NodeId),

    #[error("NoPath: {from} => {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("Cannot draw a request pair from {0} node(s), at least 2 are required")]
    InsufficientNodes(usize),

    #[error("Invalid experiment configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
