//! A Network is the phenotype of a Genome: nodes become
//! dense signal slots, and enabled connection genes become
//! weighted incoming edges of their target node. Disabled
//! genes are ignored.
//!
//! Networks are strictly feed-forward. Nodes are evaluated
//! in a topological order computed once at decode time.
mod connection;
mod errors;

pub use errors::NetworkError;

use crate::genomics::{ActivationType, Genome, NodeRole};
use crate::NodeId;
use connection::Connection;

use ahash::RandomState;

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

/// Signal held by bias nodes.
pub const BIAS_SIGNAL: f32 = 1.0;

/// An executable feed-forward network.
#[derive(Clone, Debug)]
pub struct Network {
    node_ids: Box<[NodeId]>,
    input_indices: Box<[usize]>,
    bias_indices: Box<[usize]>,
    output_indices: Box<[usize]>,
    activation_functions: Box<[ActivationType]>,
    incoming: Box<[Box<[Connection]>]>,
    evaluation_order: Box<[usize]>,
    signals: Box<[f32]>,
}

impl Network {
    /// Decodes the passed genome into a network.
    ///
    /// Inputs and outputs are ordered by node id.
    ///
    /// # Errors
    /// Returns an error if the genome's enabled connections
    /// form a cycle, or reference nodes absent from the genome.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    /// use evoneat::networks::Network;
    ///
    /// let config = GeneticConfig {
    ///     input_count: 3,
    ///     output_count: 2,
    ///     ..GeneticConfig::default()
    /// };
    /// let genome = Genome::new(&config, &mut InnovationRegistry::new(&config));
    ///
    /// let network = Network::new(&genome).unwrap();
    /// assert_eq!(network.input_count(), 3);
    /// assert_eq!(network.output_count(), 2);
    /// ```
    pub fn new(genome: &Genome) -> Result<Network, NetworkError> {
        let mut nodes: Vec<_> = genome.nodes().collect();
        // Sorting by id makes the resulting network
        // deterministic, independently of node iteration order.
        nodes.sort_unstable_by_key(|n| n.id());

        let node_index_from_id: HashMap<_, _, RandomState> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id(), i))
            .collect();
        let indices_with_role = |role: NodeRole| -> Box<[usize]> {
            nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.role() == role)
                .map(|(i, _)| i)
                .collect()
        };
        let input_indices = indices_with_role(NodeRole::Input);
        let bias_indices = indices_with_role(NodeRole::Bias);
        let output_indices = indices_with_role(NodeRole::Output);

        let mut enabled: Vec<_> = genome.connections().filter(|c| c.enabled()).collect();
        enabled.sort_unstable_by_key(|c| c.innovation());
        let mut incoming = vec![vec![]; nodes.len()];
        for gene in enabled {
            let index_of = |node: NodeId| {
                node_index_from_id
                    .get(&node)
                    .copied()
                    .ok_or(NetworkError::DanglingEndpoint {
                        innovation: gene.innovation(),
                        node,
                    })
            };
            let source = index_of(gene.source())?;
            let target = index_of(gene.target())?;
            incoming[target].push(Connection::new(source, gene.weight()));
        }

        let evaluation_order = topological_order(&incoming).map_err(|unsorted| {
            NetworkError::CyclicTopology {
                nodes: unsorted.into_iter().map(|i| nodes[i].id()).collect(),
            }
        })?;

        let mut network = Network {
            node_ids: nodes.iter().map(|n| n.id()).collect(),
            input_indices,
            bias_indices,
            output_indices,
            activation_functions: nodes.iter().map(|n| n.activation()).collect(),
            incoming: incoming.into_iter().map(Vec::into_boxed_slice).collect(),
            evaluation_order: evaluation_order.into(),
            signals: vec![0.0; nodes.len()].into(),
        };
        network.clear_state();
        Ok(network)
    }

    /// Sets the input signals and propagates them through the
    /// network, returning the output signals.
    ///
    /// Nodes without incoming connections keep their held
    /// signal. Every other node emits its activation function
    /// applied to the weighted sum of its sources' signals.
    /// Bias nodes always hold [`BIAS_SIGNAL`].
    ///
    /// # Errors
    /// Returns an error, without modifying the network, if the
    /// number of values differs from the number of input nodes.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{ActivationType, GeneticConfig, Genome, InnovationRegistry};
    /// use evoneat::networks::{Network, NetworkError};
    ///
    /// let config = GeneticConfig {
    ///     input_count: 2,
    ///     output_count: 1,
    ///     output_activation: ActivationType::ReLU,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
    /// genome.add_connection(0, 0, 3, 2.5).unwrap();
    /// genome.add_connection(1, 1, 3, -2.5).unwrap();
    /// genome.add_connection(2, 2, 3, 0.5).unwrap();
    ///
    /// let mut network = Network::new(&genome).unwrap();
    ///
    /// assert_eq!(network.evaluate(&[1.0, 0.5]).unwrap(), vec![2.5 - 1.25 + 0.5]);
    /// assert_eq!(
    ///     network.evaluate(&[1.0]),
    ///     Err(NetworkError::InputCountMismatch { expected: 2, actual: 1 })
    /// );
    /// ```
    pub fn evaluate(&mut self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.input_indices.len() {
            return Err(NetworkError::InputCountMismatch {
                expected: self.input_indices.len(),
                actual: inputs.len(),
            });
        }
        for (index, value) in self.input_indices.iter().zip(inputs) {
            self.signals[*index] = *value;
        }
        for &node in self.evaluation_order.iter() {
            let incoming = &self.incoming[node];
            if incoming.is_empty() {
                continue;
            }
            let sum: f32 = incoming
                .iter()
                .map(|c| self.signals[c.source] * c.weight)
                .sum();
            self.signals[node] = self.activation_functions[node].apply(sum);
        }
        Ok(self.outputs())
    }

    /// Returns the current output signals.
    pub fn outputs(&self) -> Vec<f32> {
        self.output_indices.iter().map(|i| self.signals[*i]).collect()
    }

    /// Clears all held signals, except those of bias nodes.
    pub fn clear_state(&mut self) {
        self.signals.iter_mut().for_each(|s| *s = 0.0);
        for index in self.bias_indices.iter() {
            self.signals[*index] = BIAS_SIGNAL;
        }
    }

    pub fn input_count(&self) -> usize {
        self.input_indices.len()
    }

    pub fn output_count(&self) -> usize {
        self.output_indices.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Returns the ids of the nodes in evaluation order.
    pub fn evaluation_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.evaluation_order.iter().map(move |i| self.node_ids[*i])
    }
}

impl TryFrom<&Genome> for Network {
    type Error = NetworkError;

    fn try_from(genome: &Genome) -> Result<Self, Self::Error> {
        Network::new(genome)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Debug).fmt(f)
    }
}

/// Kahn's algorithm over incoming edge lists. Ready nodes are
/// taken lowest index first. On failure, returns the indices of
/// the nodes that could not be ordered.
fn topological_order(incoming: &[Vec<Connection>]) -> Result<Vec<usize>, Vec<usize>> {
    let mut outgoing = vec![vec![]; incoming.len()];
    let mut pending_inputs: Vec<usize> = incoming.iter().map(Vec::len).collect();
    for (target, connections) in incoming.iter().enumerate() {
        for c in connections {
            outgoing[c.source].push(target);
        }
    }

    let mut ready: BinaryHeap<_> = pending_inputs
        .iter()
        .enumerate()
        .filter(|(_, pending)| **pending == 0)
        .map(|(i, _)| Reverse(i))
        .collect();
    let mut order = Vec::with_capacity(incoming.len());
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &target in &outgoing[node] {
            pending_inputs[target] -= 1;
            if pending_inputs[target] == 0 {
                ready.push(Reverse(target));
            }
        }
    }

    if order.len() == incoming.len() {
        Ok(order)
    } else {
        Err(pending_inputs
            .iter()
            .enumerate()
            .filter(|(_, pending)| **pending > 0)
            .map(|(i, _)| i)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneticConfig, InnovationRegistry};

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    fn config() -> GeneticConfig {
        GeneticConfig {
            input_count: 2,
            output_count: 1,
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn evaluates_hidden_layer() {
        let config = config();
        let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
        genome.add_node(4, ActivationType::Identity).unwrap();
        genome.add_connection(0, 0, 4, 2.0).unwrap();
        genome.add_connection(1, 1, 4, -1.0).unwrap();
        genome.add_connection(2, 4, 3, 0.5).unwrap();
        genome.add_connection(3, 2, 3, 1.0).unwrap();

        let mut network = Network::new(&genome).unwrap();
        let output = network.evaluate(&[1.0, 3.0]).unwrap();

        let hidden = 2.0 * 1.0 - 1.0 * 3.0;
        assert_eq!(output, vec![sigmoid(0.5 * hidden + BIAS_SIGNAL)]);
        let order: Vec<_> = network.evaluation_order().collect();
        let position = |id| order.iter().position(|n| *n == id).unwrap();
        assert!(position(4) < position(3));
    }

    #[test]
    fn decode_is_deterministic() {
        let config = GeneticConfig {
            initial_weight_std_dev: 1.0,
            ..config()
        };
        let mut registry = InnovationRegistry::new(&config);
        let mut genome = Genome::new(&config, &mut registry);
        genome.mutate_add_node(&mut registry, &config).unwrap();
        genome.mutate_add_node(&mut registry, &config).unwrap();

        let inputs = [0.3, -0.7];
        let first = Network::new(&genome).unwrap().evaluate(&inputs).unwrap();
        let mut network = Network::new(&genome).unwrap();
        for _ in 0..3 {
            assert_eq!(network.evaluate(&inputs).unwrap(), first);
        }
    }

    #[test]
    fn disabled_connections_are_ignored() {
        let config = config();
        let mut registry = InnovationRegistry::new(&config);
        let mut genome = Genome::unconnected(&config, &mut registry);
        genome.add_connection(0, 0, 3, 1.0).unwrap();
        genome.mutate_add_node(&mut registry, &config).unwrap();

        let mut network = Network::new(&genome).unwrap();
        // 0 -> 4 (1.0) -> 3 (1.0), through two sigmoids.
        assert_eq!(
            network.evaluate(&[2.0, 0.0]).unwrap(),
            vec![sigmoid(sigmoid(2.0))]
        );
    }

    #[test]
    fn unconnected_outputs_hold_signal() {
        let config = config();
        let genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
        let mut network = Network::new(&genome).unwrap();
        assert_eq!(network.evaluate(&[1.0, 1.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn input_mismatch_leaves_state_untouched() {
        let config = config();
        let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
        genome.add_connection(0, 0, 3, 1.0).unwrap();
        let mut network = Network::new(&genome).unwrap();
        let before = network.evaluate(&[0.5, 0.5]).unwrap();

        assert_eq!(
            network.evaluate(&[9.0, 9.0, 9.0]),
            Err(NetworkError::InputCountMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(network.outputs(), before);
        assert_eq!(network.signals[0], 0.5);
    }

    #[test]
    fn rejects_cycles() {
        let config = config();
        let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
        genome.add_node(4, ActivationType::Sigmoid).unwrap();
        genome.add_node(5, ActivationType::Sigmoid).unwrap();
        genome.add_connection(0, 0, 4, 1.0).unwrap();
        genome.add_connection(1, 4, 5, 1.0).unwrap();
        genome.add_connection(2, 5, 4, 1.0).unwrap();
        genome.add_connection(3, 5, 3, 1.0).unwrap();

        assert_eq!(
            Network::new(&genome).map(|n| n.node_count()),
            Err(NetworkError::CyclicTopology {
                nodes: vec![3, 4, 5]
            })
        );
    }

    #[test]
    fn clear_state_keeps_bias() {
        let config = config();
        let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
        genome.add_connection(0, 2, 3, 1.0).unwrap();
        let mut network = Network::new(&genome).unwrap();
        let first = network.evaluate(&[0.0, 0.0]).unwrap();
        network.clear_state();
        assert_eq!(network.outputs(), vec![0.0]);
        assert_eq!(network.evaluate(&[0.0, 0.0]).unwrap(), first);
    }
}
