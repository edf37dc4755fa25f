use super::Population;
use crate::genomics::{Genome, GenomeSnapshot};
use crate::SpeciesId;

use serde::Serialize;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Snapshots the entire population.
    AllGenomes,
    /// Snapshots species champions.
    SpeciesChampions,
    /// Snapshots only the population champion.
    PopulationChampion,
    /// Snapshots no genomes.
    NoGenomes,
}

/// A record of a population at one generation.
#[derive(Clone, Debug, Serialize)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub species_count: usize,
    pub genome_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {}", self.generation_number)?;
        writeln!(f, "\tspecies_count: {}", self.species_count)?;
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::logging::Stats;
    ///
    /// let stats = Stats::summarize([-2.0, -1.0, 0.5, 1.0, 1.5]).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::summarize(Vec::new()).is_none());
    /// ```
    pub fn summarize(data: impl IntoIterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.into_iter().collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max {:.4}, min {:.4}, mean {:.4}, median {:.4}",
            self.maximum, self.minimum, self.mean, self.median
        )
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug, Serialize)]
pub enum GenerationMemberRecord {
    /// Species IDs, member snapshots and stagnation level.
    Species(Vec<(SpeciesId, Vec<GenomeSnapshot>, usize)>),
    /// Only species IDs, species champions, and stagnation level.
    SpeciesChampions(Vec<(SpeciesId, GenomeSnapshot, usize)>),
    /// Only population champion.
    PopulationChampion(GenomeSnapshot),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `genome_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    /// use evoneat::populations::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    /// let mut population = Population::new(
    ///     PopulationConfig { size: 10, ..PopulationConfig::zero() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    /// population.evaluate_fitness(|_| 1.0).unwrap();
    ///
    /// logger.log(&population, &|g| [g.fitness()], ["fitness"]);
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.genome_stats[0].1.mean, 1.0);
    /// ```
    pub fn log<GSE, const N: usize>(
        &mut self,
        population: &Population,
        genome_stat_extractor: &GSE,
        stat_names: [&str; N],
    ) where
        GSE: Fn(&Genome) -> [f32; N],
    {
        let columns = unzip_n_vecs(population.genomes().iter().map(genome_stat_extractor));
        let genome_stats = stat_names
            .iter()
            .map(|name| name.to_string())
            .zip(columns)
            .filter_map(|(name, data)| Stats::summarize(data).map(|stats| (name, stats)))
            .collect();
        let generation_sample = match self.reporting_level {
            ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                population
                    .species()
                    .iter()
                    .map(|s| {
                        let members = population.members_of(s).map(Genome::snapshot).collect();
                        (s.id(), members, s.time_stagnated())
                    })
                    .collect(),
            ),
            ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                population
                    .species()
                    .iter()
                    .filter_map(|s| {
                        s.champion()
                            .map(|c| (s.id(), c.snapshot(), s.time_stagnated()))
                    })
                    .collect(),
            ),
            ReportingLevel::PopulationChampion => match population.champion() {
                Some(champion) => GenerationMemberRecord::PopulationChampion(champion.snapshot()),
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        };
        let log = Log {
            generation_number: population.generation(),
            generation_sample,
            species_count: population.species().len(),
            genome_stats,
        };
        tracing::debug!(generation = log.generation_number, "{}", log);
        self.logs.push(log);
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

fn unzip_n_vecs<T, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs: Vec<Vec<T>> = (0..N).map(|_| Vec::new()).collect();
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_length_median_averages_middle_pair() {
        let stats = Stats::summarize([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.maximum, 4.0);
        assert_eq!(stats.minimum, 1.0);
    }

    #[test]
    fn single_value() {
        let stats = Stats::summarize([7.0]).unwrap();
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.minimum, stats.maximum);
    }

    #[test]
    fn unzips_columns() {
        let columns = unzip_n_vecs([[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(columns, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }
}
