//! Compatibility distance between genomes, computed
//! from the alignment of their connection genes by
//! innovation number.

use super::{DistanceMetric, GeneticConfig, Genome};

/// Connection gene alignment of two genomes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Alignment {
    matching: usize,
    disjoint: usize,
    excess: usize,
    weight_difference_sum: f32,
}

impl Alignment {
    fn of(first: &Genome, second: &Genome) -> Alignment {
        let first_max = first.connections.keys().copied().max();
        let second_max = second.connections.keys().copied().max();
        let mut alignment = Alignment::default();

        // Summing in innovation order keeps the result
        // independent of argument order.
        let mut innovations: Vec<_> = first.connections.keys().copied().collect();
        innovations.sort_unstable();
        for innovation in innovations {
            match second.connections.get(&innovation) {
                Some(other) => {
                    alignment.matching += 1;
                    alignment.weight_difference_sum +=
                        (first.connections[&innovation].weight() - other.weight()).abs();
                }
                None => alignment.count_unmatched(innovation, second_max),
            }
        }
        for innovation in second.connections.keys() {
            if !first.connections.contains_key(innovation) {
                alignment.count_unmatched(*innovation, first_max);
            }
        }

        alignment
    }

    /// Genes beyond the other genome's highest innovation are
    /// excess, all other unmatched genes are disjoint.
    fn count_unmatched(&mut self, innovation: usize, other_max: Option<usize>) {
        match other_max {
            Some(max) if innovation < max => self.disjoint += 1,
            _ => self.excess += 1,
        }
    }

    fn unmatched(&self) -> usize {
        self.disjoint + self.excess
    }

    fn mean_weight_difference(&self) -> f32 {
        if self.matching == 0 {
            0.0
        } else {
            self.weight_difference_sum / self.matching as f32
        }
    }
}

/// Calculates the compatibility distance between two genomes,
/// weighting gene differences as specified in `config`.
///
/// The result is symmetric and is zero for genomes with the
/// same connection genes and weights.
///
/// # Examples
/// ```
/// use evoneat::genomics::{compatibility, GeneticConfig, Genome, InnovationRegistry};
///
/// let config = GeneticConfig {
///     unmatched_gene_factor: 1.0,
///     common_weight_factor: 0.4,
///     ..GeneticConfig::default()
/// };
/// let mut registry = InnovationRegistry::new(&config);
/// let genome = Genome::new(&config, &mut registry);
///
/// assert_eq!(compatibility::distance(&genome, &genome, &config), 0.0);
/// ```
pub fn distance(first: &Genome, second: &Genome, config: &GeneticConfig) -> f32 {
    let alignment = Alignment::of(first, second);
    let weight_term = config.common_weight_factor * alignment.mean_weight_difference();
    match config.distance_metric {
        DistanceMetric::Unmatched => {
            config.unmatched_gene_factor * alignment.unmatched() as f32 + weight_term
        }
        DistanceMetric::ExcessDisjoint => {
            let size = first.connections.len().max(second.connections.len()).max(1) as f32;
            (config.excess_gene_factor * alignment.excess as f32
                + config.disjoint_gene_factor * alignment.disjoint as f32)
                / size
                + weight_term
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ActivationType, InnovationRegistry};

    fn config(metric: DistanceMetric) -> GeneticConfig {
        GeneticConfig {
            input_count: 2,
            output_count: 1,
            initial_weight_std_dev: 1.0,
            distance_metric: metric,
            unmatched_gene_factor: 1.0,
            excess_gene_factor: 2.0,
            disjoint_gene_factor: 0.5,
            common_weight_factor: 0.4,
            ..GeneticConfig::zero()
        }
    }

    /// Two genomes over nodes {0, 1, 2} -> {3} plus hidden node 4,
    /// with hand-picked connections.
    fn pair() -> (Genome, Genome) {
        let mut registry = InnovationRegistry::new(&config(DistanceMetric::Unmatched));
        let mut first = Genome::unconnected(&config(DistanceMetric::Unmatched), &mut registry);
        let mut second = Genome::unconnected(&config(DistanceMetric::Unmatched), &mut registry);
        first.add_node(4, ActivationType::Sigmoid).unwrap();
        second.add_node(4, ActivationType::Sigmoid).unwrap();

        // Matching, weight difference 2.0.
        first.add_connection(0, 0, 3, 1.0).unwrap();
        second.add_connection(0, 0, 3, -1.0).unwrap();
        // Disjoint.
        first.add_connection(1, 1, 3, 3.0).unwrap();
        second.add_connection(2, 1, 4, 1.0).unwrap();
        // Matching, weight difference 0.0.
        first.add_connection(3, 2, 3, 1.0).unwrap();
        second.add_connection(3, 2, 3, 1.0).unwrap();
        // Excess.
        first.add_connection(5, 4, 3, 3.0).unwrap();

        (first, second)
    }

    #[test]
    fn alignment_counts() {
        let (first, second) = pair();
        let alignment = Alignment::of(&first, &second);
        assert_eq!(alignment.matching, 2);
        assert_eq!(alignment.disjoint, 2);
        assert_eq!(alignment.excess, 1);
        assert_eq!(alignment.mean_weight_difference(), 1.0);
    }

    #[test]
    fn unmatched_distance() {
        let (first, second) = pair();
        let config = config(DistanceMetric::Unmatched);
        assert_eq!(distance(&first, &second, &config), 1.0 * 3.0 + 0.4 * 1.0);
    }

    #[test]
    fn excess_disjoint_distance() {
        let (first, second) = pair();
        let config = config(DistanceMetric::ExcessDisjoint);
        let expected = (2.0 * 1.0 + 0.5 * 2.0) / 4.0 + 0.4 * 1.0;
        assert!((distance(&first, &second, &config) - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let (first, second) = pair();
        for metric in [DistanceMetric::Unmatched, DistanceMetric::ExcessDisjoint] {
            let config = config(metric);
            assert_eq!(
                distance(&first, &second, &config),
                distance(&second, &first, &config)
            );
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let config = config(DistanceMetric::Unmatched);
        let mut registry = InnovationRegistry::new(&config);
        let genome = Genome::new(&config, &mut registry);
        let copy = genome.clone();
        assert_eq!(distance(&genome, &copy, &config), 0.0);
    }

    #[test]
    fn no_matching_genes_ignores_weights() {
        let config = config(DistanceMetric::Unmatched);
        let mut registry = InnovationRegistry::new(&config);
        let mut first = Genome::unconnected(&config, &mut registry);
        let mut second = Genome::unconnected(&config, &mut registry);
        first.add_connection(0, 0, 3, 5.0).unwrap();
        second.add_connection(1, 1, 3, -5.0).unwrap();
        assert_eq!(distance(&first, &second, &config), 2.0);
    }
}
