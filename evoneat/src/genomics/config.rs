use super::{ActivationType, ConfigError};

use serde::{Deserialize, Serialize};

/// Selects the parent whose unmatched genes
/// a crossover child inherits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverPolicy {
    /// The parent with more connection genes. Ties
    /// go to the fitter parent.
    LargerParent,
    /// The parent with the better fitness. Ties
    /// go to the larger parent.
    FitterParent,
}

/// Formula used for the compatibility distance
/// between two genomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// `unmatched_gene_factor ⨯ U + common_weight_factor ⨯ W`,
    /// with `U` the number of genes present in only one
    /// genome and `W` the mean weight difference of
    /// matching genes.
    Unmatched,
    /// `(excess_gene_factor ⨯ E + disjoint_gene_factor ⨯ D) / N
    /// + common_weight_factor ⨯ W`, with `N` the connection
    /// count of the larger genome.
    ExcessDisjoint,
}

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`](GeneticConfig::validate),
/// which every population runs on construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of input nodes in a genome, excluding the bias.
    pub input_count: usize,
    /// Number of output nodes in a genome.
    pub output_count: usize,
    /// Activation types chosen at random for new hidden nodes.
    /// If empty, hidden nodes use [`Sigmoid`].
    ///
    /// [`Sigmoid`]: ActivationType::Sigmoid
    pub hidden_activations: Vec<ActivationType>,
    /// Activation type of every output node.
    pub output_activation: ActivationType,
    /// Standard deviation of the zero-mean normal distribution
    /// new connection weights are drawn from.
    pub initial_weight_std_dev: f32,
    /// Chance of each enabled connection's weight
    /// being perturbed during mutation.
    pub weight_perturbation_chance: f32,
    /// Standard deviation of weight perturbations.
    pub weight_perturbation_std_dev: f32,
    /// Chance of a node addition mutation.
    pub node_addition_chance: f32,
    /// Chance of a connection addition mutation.
    pub connection_addition_chance: f32,
    /// Parent selection for unmatched genes during crossover.
    pub crossover_policy: CrossoverPolicy,
    /// Compatibility distance formula.
    pub distance_metric: DistanceMetric,
    /// Weight of unmatched genes in [`DistanceMetric::Unmatched`].
    pub unmatched_gene_factor: f32,
    /// Weight of excess genes in [`DistanceMetric::ExcessDisjoint`].
    pub excess_gene_factor: f32,
    /// Weight of disjoint genes in [`DistanceMetric::ExcessDisjoint`].
    pub disjoint_gene_factor: f32,
    /// Weight of the mean matching-gene weight difference.
    pub common_weight_factor: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" configuration with a single
    /// input and output. All chances and factors are 0.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation, mostly in tests.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     node_addition_chance: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: 1,
            output_count: 1,
            hidden_activations: vec![],
            output_activation: ActivationType::Sigmoid,
            initial_weight_std_dev: 0.0,
            weight_perturbation_chance: 0.0,
            weight_perturbation_std_dev: 0.0,
            node_addition_chance: 0.0,
            connection_addition_chance: 0.0,
            crossover_policy: CrossoverPolicy::LargerParent,
            distance_metric: DistanceMetric::Unmatched,
            unmatched_gene_factor: 0.0,
            excess_gene_factor: 0.0,
            disjoint_gene_factor: 0.0,
            common_weight_factor: 0.0,
        }
    }

    /// Checks every field, returning the first invalid one.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{ConfigError, GeneticConfig};
    ///
    /// let config = GeneticConfig {
    ///     output_count: 0,
    ///     ..GeneticConfig::default()
    /// };
    /// assert_eq!(config.validate(), Err(ConfigError::NoOutputs));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_count == 0 {
            return Err(ConfigError::NoInputs);
        }
        if self.output_count == 0 {
            return Err(ConfigError::NoOutputs);
        }
        ConfigError::check_probability("weight_perturbation_chance", self.weight_perturbation_chance)?;
        ConfigError::check_probability("node_addition_chance", self.node_addition_chance)?;
        ConfigError::check_probability("connection_addition_chance", self.connection_addition_chance)?;
        ConfigError::check_magnitude("initial_weight_std_dev", self.initial_weight_std_dev)?;
        ConfigError::check_magnitude("weight_perturbation_std_dev", self.weight_perturbation_std_dev)?;
        ConfigError::check_magnitude("unmatched_gene_factor", self.unmatched_gene_factor)?;
        ConfigError::check_magnitude("excess_gene_factor", self.excess_gene_factor)?;
        ConfigError::check_magnitude("disjoint_gene_factor", self.disjoint_gene_factor)?;
        ConfigError::check_magnitude("common_weight_factor", self.common_weight_factor)?;
        Ok(())
    }
}

impl Default for GeneticConfig {
    fn default() -> Self {
        GeneticConfig {
            input_count: 2,
            output_count: 1,
            hidden_activations: vec![],
            output_activation: ActivationType::Sigmoid,
            initial_weight_std_dev: 1.0,
            weight_perturbation_chance: 0.8,
            weight_perturbation_std_dev: 0.5,
            node_addition_chance: 0.03,
            connection_addition_chance: 0.05,
            crossover_policy: CrossoverPolicy::LargerParent,
            distance_metric: DistanceMetric::Unmatched,
            unmatched_gene_factor: 1.0,
            excess_gene_factor: 1.0,
            disjoint_gene_factor: 1.0,
            common_weight_factor: 0.4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(GeneticConfig::default().validate(), Ok(()));
        assert_eq!(GeneticConfig::zero().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_chance() {
        let config = GeneticConfig {
            node_addition_chance: 1.5,
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                name: "node_addition_chance",
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_negative_coefficient() {
        let config = GeneticConfig {
            common_weight_factor: -0.4,
            ..GeneticConfig::zero()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMagnitude { name: "common_weight_factor", .. })
        ));
    }

    #[test]
    fn rejects_missing_inputs() {
        let config = GeneticConfig {
            input_count: 0,
            ..GeneticConfig::zero()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoInputs));
    }
}
