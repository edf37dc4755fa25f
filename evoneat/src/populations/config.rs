use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/// Smallest fitness used for sharing and offspring
/// allotment when maximizing.
pub(crate) const FITNESS_FLOOR: f32 = 1e-6;

/// Direction of selective pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessGoal {
    /// Higher fitness is better.
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl FitnessGoal {
    /// Compares two fitness values, returning `Greater`
    /// if `a` is better than `b`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::FitnessGoal;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(FitnessGoal::Maximize.compare(2.0, 1.0), Ordering::Greater);
    /// assert_eq!(FitnessGoal::Minimize.compare(2.0, 1.0), Ordering::Less);
    /// ```
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match self {
            FitnessGoal::Maximize => a.total_cmp(&b),
            FitnessGoal::Minimize => b.total_cmp(&a),
        }
    }

    /// Returns whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f32, b: f32) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Divides (maximizing) or multiplies (minimizing) a raw
    /// fitness by the size of the genome's species. When
    /// maximizing, non-positive fitness is first raised to a
    /// small positive floor.
    ///
    /// # Examples
    /// ```
    /// use evoneat::FitnessGoal;
    ///
    /// assert_eq!(FitnessGoal::Maximize.share(6.0, 3), 2.0);
    /// assert_eq!(FitnessGoal::Minimize.share(6.0, 3), 18.0);
    /// assert!(FitnessGoal::Maximize.share(-1.0, 2) > 0.0);
    /// ```
    pub fn share(self, fitness: f32, species_size: usize) -> f32 {
        let size = species_size.max(1) as f32;
        match self {
            FitnessGoal::Maximize => fitness.max(FITNESS_FLOOR) / size,
            FitnessGoal::Minimize => fitness * size,
        }
    }

    /// Maps a shared fitness onto a positive score where
    /// higher is better, for proportional allotment.
    ///
    /// When minimizing, fitness is measured against `best`, the
    /// best shared fitness in the population, so that the score
    /// keeps the order of any finite fitness, negative included.
    pub(crate) fn merit(self, shared_fitness: f32, best: f32) -> f32 {
        match self {
            FitnessGoal::Maximize => shared_fitness.max(FITNESS_FLOOR),
            FitnessGoal::Minimize => 1.0 / (1.0 + (shared_fitness - best).max(0.0)),
        }
    }
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`](PopulationConfig::validate),
/// which every population runs on construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: usize,
    /// Number of generations evolved by [`Population::run`].
    ///
    /// [`Population::run`]: crate::Population::run
    pub generations: usize,
    /// Top % of each species which survives to the next
    /// generation and parents its offspring.
    pub survival_rate: f32,
    /// Compatibility distance threshold, beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Number of generations a species may go without improving
    /// its best fitness before it is removed.
    pub stagnation_limit: usize,
    /// Whether fitness is maximized or minimized.
    pub fitness_goal: FitnessGoal,
    /// Fitness of genomes that have not yet been evaluated.
    pub initial_fitness: f32,
    /// Number of evaluation threads. Defaults to the lesser of
    /// the population size and the available parallelism.
    pub worker_count: Option<usize>,
    /// Number of best genomes remembered across the run.
    pub hall_of_fame_size: usize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" configuration for a population
    /// of a single genome that keeps every member.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    ///
    /// let config = PopulationConfig {
    ///     size: 10,
    ///     ..PopulationConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: 1,
            generations: 0,
            survival_rate: 1.0,
            distance_threshold: 0.0,
            stagnation_limit: 0,
            fitness_goal: FitnessGoal::Maximize,
            initial_fitness: 0.0,
            worker_count: None,
            hall_of_fame_size: 0,
        }
    }

    /// Checks every field, returning the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(self.survival_rate > 0.0 && self.survival_rate <= 1.0) {
            return Err(ConfigError::InvalidSurvivalRate(self.survival_rate));
        }
        ConfigError::check_magnitude("distance_threshold", self.distance_threshold)?;
        if !self.initial_fitness.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "initial_fitness",
                value: self.initial_fitness,
            });
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            size: 150,
            generations: 100,
            survival_rate: 0.2,
            distance_threshold: 3.0,
            stagnation_limit: 15,
            fitness_goal: FitnessGoal::Maximize,
            initial_fitness: 0.0,
            worker_count: None,
            hall_of_fame_size: 5,
        }
    }
}
