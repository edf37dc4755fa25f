use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeId};

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Connection genes are the principal components of genomes.
/// They are created between two nodes, and become
/// weighted edges in the genome's phenotype.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConnectionGene {
    innovation: Innovation,
    source: NodeId,
    target: NodeId,
    weight: f32,
    enabled: bool,
}

impl ConnectionGene {
    /// Returns a new _enabled_ connection with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::ConnectionGene;
    ///
    /// let gene = ConnectionGene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// assert_eq!(gene.endpoints(), (3, 9));
    /// assert!(gene.enabled());
    /// ```
    pub fn new(innovation: Innovation, source: NodeId, target: NodeId, weight: f32) -> ConnectionGene {
        ConnectionGene {
            innovation,
            source,
            target,
            weight,
            enabled: true,
        }
    }

    /// Draws a weight from a zero-mean normal distribution
    /// with standard deviation [`initial_weight_std_dev`].
    ///
    /// [`initial_weight_std_dev`]: GeneticConfig::initial_weight_std_dev
    pub(super) fn random_weight(config: &GeneticConfig) -> f32 {
        let sample: f32 = rand::thread_rng().sample(StandardNormal);
        sample * config.initial_weight_std_dev
    }

    /// Adds zero-mean Gaussian noise with standard deviation
    /// [`weight_perturbation_std_dev`] to the weight.
    ///
    /// [`weight_perturbation_std_dev`]: GeneticConfig::weight_perturbation_std_dev
    pub(super) fn perturb_weight<R: Rng>(&mut self, rng: &mut R, config: &GeneticConfig) {
        let noise: f32 = rng.sample(StandardNormal);
        self.weight += noise * config.weight_perturbation_std_dev;
    }

    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the connection's endpoints as `(source, target)`.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled connections are never re-enabled.
    pub(super) fn disable(&mut self) {
        self.enabled = false;
    }
}

impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}->{}, {:.4}{}]",
            self.innovation,
            self.source,
            self.target,
            self.weight,
            if self.enabled { "" } else { ", disabled" }
        )
    }
}
