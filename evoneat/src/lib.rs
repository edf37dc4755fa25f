//! An implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! Genomes encode feed-forward networks as node and connection genes,
//! tagged with historical markings so that structurally identical
//! mutations share identifiers across the whole run. Populations are
//! split into species by compatibility distance, fitness is shared
//! within each species, and genomes are evaluated in parallel on a
//! bounded worker pool.
//!
//! # Example usage: Evolution of an XOR approximator
//! ```
//! use evoneat::genomics::GeneticConfig;
//! use evoneat::networks::Network;
//! use evoneat::populations::{Population, PopulationConfig};
//!
//! fn evaluate_xor(network: &mut Network) -> f32 {
//!     let cases = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!
//!     let error: f32 = cases
//!         .iter()
//!         .map(|(input, expected)| match network.evaluate(input) {
//!             Ok(output) => (output[0] - expected).abs(),
//!             Err(_) => 1.0,
//!         })
//!         .sum();
//!
//!     (4.0 - error).powf(2.0)
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: 2,
//!     output_count: 1,
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: 50,
//!     generations: 5,
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::new(population_config, genetic_config).unwrap();
//! let champion = population.run(evaluate_xor).unwrap();
//!
//! println!("{}", serde_json::to_string(&champion.snapshot()).unwrap());
//! ```

pub mod genomics;
pub mod networks;
pub mod populations;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Historical marking of a connection gene.
pub type Innovation = usize;

/// Identifier of a node gene.
pub type NodeId = usize;

/// Run-unique genome identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenomeId(pub usize);

/// Run-unique species identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub usize);

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

pub use genomics::{GeneticConfig, Genome, InnovationRegistry};
pub use networks::Network;
pub use populations::{FitnessGoal, Population, PopulationConfig};
