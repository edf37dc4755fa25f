use crate::{Innovation, NodeId};

use thiserror::Error;

/// Rejected configuration values. Raised before
/// anything is built from the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be greater than zero")]
    EmptyPopulation,
    #[error("genomes need at least one input node")]
    NoInputs,
    #[error("genomes need at least one output node")]
    NoOutputs,
    #[error("`{name}` must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },
    #[error("`{name}` must be finite and non-negative, got {value}")]
    InvalidMagnitude { name: &'static str, value: f32 },
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("survival rate must be in (0, 1], got {0}")]
    InvalidSurvivalRate(f32),
    #[error("worker count must be greater than zero")]
    NoWorkers,
}

impl ConfigError {
    pub(crate) fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability { name, value })
        }
    }

    pub(crate) fn check_magnitude(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidMagnitude { name, value })
        }
    }
}

/// Structural edits that would break a genome's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    #[error("connection with innovation {0} already present in genome")]
    DuplicateConnection(Innovation),
    #[error("a connection from node {from} to node {to} is already present in genome")]
    DuplicateEndpoints { from: NodeId, to: NodeId },
    #[error("connection {innovation} references node {node}, which is not in the genome")]
    MissingEndpoint { innovation: Innovation, node: NodeId },
    #[error("connection {innovation} targets sensor node {node}")]
    SensorTarget { innovation: Innovation, node: NodeId },
    #[error("node {0} already present in genome")]
    DuplicateNode(NodeId),
}

/// Reasons a mutation could not be applied. A failed
/// mutation leaves the genome untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("genome has no enabled connection to split")]
    NoEnabledConnections,
    #[error("genome has no node able to receive a connection")]
    NoViableTarget,
    #[error("a connection from node {from} to node {to} already exists")]
    ConnectionExists { from: NodeId, to: NodeId },
    #[error("a connection from node {from} to node {to} would create a cycle")]
    WouldCycle { from: NodeId, to: NodeId },
}
