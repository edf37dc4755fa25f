use crate::genomics::{ConnectionGene, GeneticConfig};
use crate::{GenomeId, Innovation, NodeId, SpeciesId};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};

/// An `InnovationRegistry` keeps track of connection and node
/// innovations in a run, in order to make sure identical
/// mutations are assigned the same identifiers. It also hands
/// out genome and species identifiers.
///
/// For connection innovations the source and target nodes are
/// used to identify identical mutations.
///
/// For node innovations the split connection is used to identify
/// identical mutations, and the identifiers of the corresponding
/// incoming connection, new node, and outgoing connection are
/// recorded, in that order.
///
/// Initial node ids are assigned inputs first (`0..input_count`),
/// then the bias node (`input_count`), then outputs. Initial
/// connections are numbered output by output, each output
/// receiving one connection from every input and then the bias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnovationRegistry {
    next_connection_innovation: Innovation,
    next_node_id: NodeId,
    next_genome_id: usize,
    next_species_id: usize,
    connection_innovations: HashMap<(NodeId, NodeId), Innovation, RandomState>,
    split_innovations: HashMap<Innovation, (Innovation, NodeId, Innovation), RandomState>,
}

impl InnovationRegistry {
    /// Creates a new registry for genomes with the specified
    /// configuration, with the initial connections and nodes
    /// already registered.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, InnovationRegistry};
    ///
    /// let config = GeneticConfig {
    ///     input_count: 2,
    ///     output_count: 1,
    ///     ..GeneticConfig::zero()
    /// };
    /// let registry = InnovationRegistry::new(&config);
    ///
    /// // Two inputs and the bias, each connected to the output.
    /// assert_eq!(registry.connection_count(), 3);
    /// assert_eq!(registry.node_count(), 4);
    /// assert_eq!(registry.registered_connection(2, 3), Some(2));
    /// ```
    pub fn new(config: &GeneticConfig) -> InnovationRegistry {
        let sensor_count = config.input_count + 1;
        let connection_innovations: HashMap<_, _, RandomState> = (0..config.output_count)
            // Each output, in order...
            .flat_map(|o| (0..sensor_count).map(move |s| (s, o)))
            // ...receives a connection from every sensor,
            // numbered consecutively.
            .map(|(s, o)| ((s, sensor_count + o), o * sensor_count + s))
            .collect();
        InnovationRegistry {
            next_connection_innovation: sensor_count * config.output_count,
            next_node_id: sensor_count + config.output_count,
            next_genome_id: 0,
            next_species_id: 0,
            connection_innovations,
            split_innovations: HashMap::default(),
        }
    }

    /// Returns the innovation of the connection between the given
    /// nodes, registering it as a new innovation if necessary.
    pub(crate) fn connection_innovation(&mut self, source: NodeId, target: NodeId) -> Innovation {
        match self.connection_innovations.entry((source, target)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let innovation = self.next_connection_innovation;
                self.next_connection_innovation += 1;
                *entry.insert(innovation)
            }
        }
    }

    /// Returns the identifiers previously assigned to the split
    /// of `split`, in the format `(incoming connection, new node,
    /// outgoing connection)`.
    pub fn registered_split(&self, split: Innovation) -> Option<(Innovation, NodeId, Innovation)> {
        self.split_innovations.get(&split).copied()
    }

    /// Returns the innovation previously assigned to the
    /// connection between `source` and `target`.
    pub fn registered_connection(&self, source: NodeId, target: NodeId) -> Option<Innovation> {
        self.connection_innovations.get(&(source, target)).copied()
    }

    /// Returns the identifiers for splitting the passed connection,
    /// in the format `(incoming connection, new node, outgoing
    /// connection)`.
    ///
    /// If the split is already registered the same identifiers
    /// are returned, unless `duplicate` is `true`. In that case
    /// a new node is allocated and its identifiers replace the
    /// previous record. This is used when the mutating genome
    /// already contains the identifiers of the registered split,
    /// which would otherwise produce duplicate nodes and
    /// connections within the same genome.
    pub(crate) fn split_innovation(
        &mut self,
        split: &ConnectionGene,
        duplicate: bool,
    ) -> (Innovation, NodeId, Innovation) {
        if let (Some(record), false) = (self.registered_split(split.innovation()), duplicate) {
            return record;
        }
        let new_node = self.next_node_id;
        self.next_node_id += 1;
        let incoming = self.connection_innovation(split.source(), new_node);
        let outgoing = self.connection_innovation(new_node, split.target());
        let record = (incoming, new_node, outgoing);
        self.split_innovations.insert(split.innovation(), record);
        record
    }

    /// Returns a fresh genome identifier.
    pub(crate) fn next_genome_id(&mut self) -> GenomeId {
        let id = GenomeId(self.next_genome_id);
        self.next_genome_id += 1;
        id
    }

    /// Returns a fresh species identifier.
    pub(crate) fn next_species_id(&mut self) -> SpeciesId {
        let id = SpeciesId(self.next_species_id);
        self.next_species_id += 1;
        id
    }

    /// Returns the number of connection innovations generated.
    pub fn connection_count(&self) -> usize {
        self.next_connection_innovation
    }

    /// Returns the number of node ids generated.
    pub fn node_count(&self) -> usize {
        self.next_node_id
    }

    /// Returns the number of genome ids handed out.
    pub fn genome_count(&self) -> usize {
        self.next_genome_id
    }

    /// Returns the number of species ids handed out.
    pub fn species_count(&self) -> usize {
        self.next_species_id
    }

    /// Returns an iterator over the complete record of
    /// connection innovations, in the format
    /// `((source, target), innovation)`.
    /// No ordering is guaranteed.
    pub fn connection_history(&self) -> impl Iterator<Item = (&(NodeId, NodeId), &Innovation)> {
        self.connection_innovations.iter()
    }

    /// Returns an iterator over the complete record of
    /// node innovations, in the format
    /// `(split connection, (incoming connection, new node, outgoing connection))`.
    /// No ordering is guaranteed.
    pub fn split_history(
        &self,
    ) -> impl Iterator<Item = (&Innovation, &(Innovation, NodeId, Innovation))> {
        self.split_innovations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: inputs,
            output_count: outputs,
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn initial_numbering_is_output_major() {
        let registry = InnovationRegistry::new(&config(2, 2));
        // Nodes: inputs 0, 1; bias 2; outputs 3, 4.
        assert_eq!(registry.node_count(), 5);
        assert_eq!(registry.connection_count(), 6);
        assert_eq!(registry.registered_connection(0, 3), Some(0));
        assert_eq!(registry.registered_connection(1, 3), Some(1));
        assert_eq!(registry.registered_connection(2, 3), Some(2));
        assert_eq!(registry.registered_connection(0, 4), Some(3));
        assert_eq!(registry.registered_connection(2, 4), Some(5));
    }

    #[test]
    fn identical_connections_share_innovation() {
        let mut registry = InnovationRegistry::new(&config(2, 1));
        let first = registry.connection_innovation(3, 0);
        let second = registry.connection_innovation(3, 0);
        let other = registry.connection_innovation(1, 0);
        assert_eq!(first, second);
        assert_eq!(first, 3);
        assert_eq!(other, 4);
    }

    #[test]
    fn identical_splits_share_ids() {
        let mut registry = InnovationRegistry::new(&config(2, 1));
        let split = ConnectionGene::new(0, 0, 3, 0.5);
        let first = registry.split_innovation(&split, false);
        let second = registry.split_innovation(&split, false);
        assert_eq!(first, (3, 4, 4));
        assert_eq!(first, second);
        assert_eq!(registry.registered_split(0), Some(first));
    }

    #[test]
    fn duplicate_split_allocates_new_ids() {
        let mut registry = InnovationRegistry::new(&config(2, 1));
        let split = ConnectionGene::new(0, 0, 3, 0.5);
        let first = registry.split_innovation(&split, false);
        let second = registry.split_innovation(&split, true);
        assert_ne!(first.1, second.1);
        assert_ne!(first.0, second.0);
        assert_ne!(first.2, second.2);
        assert_eq!(registry.registered_split(0), Some(second));
    }

    #[test]
    fn hands_out_increasing_ids() {
        let mut registry = InnovationRegistry::new(&config(1, 1));
        assert_eq!(registry.next_genome_id(), GenomeId(0));
        assert_eq!(registry.next_genome_id(), GenomeId(1));
        assert_eq!(registry.next_species_id(), SpeciesId(0));
        assert_eq!(registry.genome_count(), 2);
        assert_eq!(registry.species_count(), 1);
    }
}
