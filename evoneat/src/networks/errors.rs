use crate::{Innovation, NodeId};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("expected {expected} input values, got {actual}")]
    InputCountMismatch { expected: usize, actual: usize },
    #[error("enabled connections form a cycle through nodes {nodes:?}")]
    CyclicTopology { nodes: Vec<NodeId> },
    #[error("connection {innovation} references missing node {node}")]
    DanglingEndpoint { innovation: Innovation, node: NodeId },
}
