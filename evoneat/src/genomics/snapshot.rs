use super::{ActivationType, ConnectionGene, Genome, GenomeError, NodeGene, NodeRole};
use crate::{GenomeId, Innovation, NodeId};

use serde::{Deserialize, Serialize};

/// A serializable, ordered record of a genome, for
/// inspection and export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomeSnapshot {
    pub id: GenomeId,
    pub node_genes: Vec<NodeSnapshot>,
    pub connection_genes: Vec<ConnectionSnapshot>,
    pub fitness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub role: NodeRole,
    pub activation: ActivationType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub innovation: Innovation,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
    pub enabled: bool,
}

impl Genome {
    /// Returns a snapshot of the genome, with nodes sorted
    /// by id and connections sorted by innovation.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let genome = Genome::new(&config, &mut InnovationRegistry::new(&config));
    ///
    /// let json = serde_json::to_value(genome.snapshot()).unwrap();
    /// assert_eq!(json["nodeGenes"][2]["role"], "bias");
    /// assert_eq!(json["connectionGenes"][0]["innovation"], 0);
    /// ```
    pub fn snapshot(&self) -> GenomeSnapshot {
        let mut node_genes: Vec<_> = self
            .nodes
            .values()
            .map(|n| NodeSnapshot {
                id: n.id(),
                role: n.role(),
                activation: n.activation(),
            })
            .collect();
        node_genes.sort_unstable_by_key(|n| n.id);
        let mut connection_genes: Vec<_> = self
            .connections
            .values()
            .map(|c| ConnectionSnapshot {
                innovation: c.innovation(),
                source: c.source(),
                target: c.target(),
                weight: c.weight(),
                enabled: c.enabled(),
            })
            .collect();
        connection_genes.sort_unstable_by_key(|c| c.innovation);
        GenomeSnapshot {
            id: self.id,
            node_genes,
            connection_genes,
            fitness: self.fitness,
        }
    }

    /// Rebuilds a genome from a snapshot. The genome has no
    /// species and is not marked as evaluated.
    ///
    /// # Errors
    /// Returns an error if the snapshot breaks any genome
    /// invariant: duplicate nodes or connections, connections
    /// to missing nodes, or connections into sensor nodes.
    pub fn from_snapshot(snapshot: &GenomeSnapshot) -> Result<Genome, GenomeError> {
        let mut genome = Genome::empty(snapshot.id);
        for node in &snapshot.node_genes {
            if genome.nodes.contains_key(&node.id) {
                return Err(GenomeError::DuplicateNode(node.id));
            }
            genome
                .nodes
                .insert(node.id, NodeGene::new(node.id, node.role, node.activation));
        }
        for c in &snapshot.connection_genes {
            genome.check_connection_viability(c.innovation, c.source, c.target)?;
            let mut gene = ConnectionGene::new(c.innovation, c.source, c.target, c.weight);
            if !c.enabled {
                gene.disable();
            }
            genome.insert_connection(gene);
        }
        genome.reset_fitness(snapshot.fitness);
        Ok(genome)
    }
}
