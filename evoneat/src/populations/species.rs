use crate::genomics::{GeneticConfig, Genome};
use crate::populations::{FitnessGoal, PopulationConfig};
use crate::SpeciesId;

/// Species are collections of reproductively
/// compatible (within a certain [distance threshold])
/// genomes. Membership is determined by calculating
/// the compatibility distance to a _representative_,
/// a copy of the genome that founded the species.
/// The representative never changes.
///
/// Species stagnate after going [`stagnation_limit`]
/// generations without improving their best fitness,
/// and are thereafter removed from the population.
///
/// [distance threshold]: PopulationConfig::distance_threshold
/// [`stagnation_limit`]: PopulationConfig::stagnation_limit
#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    representative: Genome,
    pub(super) members: Vec<usize>,
    champion: Option<Genome>,
    stagnation: usize,
    founded: usize,
}

impl Species {
    /// Creates a new, memberless species with the specified
    /// ID and a copy of `founder` as representative.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    /// use evoneat::populations::Species;
    /// use evoneat::SpeciesId;
    ///
    /// let config = GeneticConfig::default();
    /// let founder = Genome::new(&config, &mut InnovationRegistry::new(&config));
    /// let species = Species::new(SpeciesId(0), &founder, 0);
    ///
    /// assert_eq!(species.representative(), &founder);
    /// assert_eq!(species.len(), 0);
    /// ```
    pub fn new(id: SpeciesId, founder: &Genome, generation: usize) -> Species {
        Species {
            id,
            representative: founder.clone(),
            members: vec![],
            champion: None,
            stagnation: 0,
            founded: generation,
        }
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    pub fn representative(&self) -> &Genome {
        &self.representative
    }

    /// Returns the generation in which the species was founded.
    pub fn founded(&self) -> usize {
        self.founded
    }

    /// Returns whether `genome` is within `config.distance_threshold`
    /// of the species' representative.
    pub fn accepts(
        &self,
        genome: &Genome,
        genetic_config: &GeneticConfig,
        population_config: &PopulationConfig,
    ) -> bool {
        Genome::genetic_distance(&self.representative, genome, genetic_config)
            <= population_config.distance_threshold
    }

    /// Returns the indices of the species' members
    /// in the population's genome list.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns a copy of the best genome the species
    /// has produced so far.
    pub fn champion(&self) -> Option<&Genome> {
        self.champion.as_ref()
    }

    /// Returns the best fitness the species has reached so far.
    pub fn best_fitness(&self) -> Option<f32> {
        self.champion.as_ref().map(Genome::fitness)
    }

    /// Returns the number of generations the species
    /// has gone without improving its best fitness.
    pub fn time_stagnated(&self) -> usize {
        self.stagnation
    }

    /// Returns whether the species has stagnated for
    /// longer than allowed.
    pub fn is_stagnant(&self, config: &PopulationConfig) -> bool {
        self.stagnation > config.stagnation_limit
    }

    /// Updates the species' champion with its best current
    /// member, keeping track of stagnation.
    pub(super) fn update_stagnation(&mut self, genomes: &[Genome], goal: FitnessGoal) {
        let best = self
            .members
            .iter()
            .map(|i| &genomes[*i])
            .max_by(|a, b| goal.compare(a.fitness(), b.fitness()));
        match (best, self.best_fitness()) {
            (Some(best), Some(record)) if !goal.is_better(best.fitness(), record) => {
                self.stagnation += 1;
            }
            (Some(best), _) => {
                self.champion = Some(best.clone());
                self.stagnation = 0;
            }
            (None, _) => self.stagnation += 1,
        }
    }

    /// Writes each member's fitness, shared among the
    /// species' members, into the genome's adjusted fitness.
    pub(super) fn share_fitness(&self, genomes: &mut [Genome], goal: FitnessGoal) {
        let size = self.members.len();
        for i in &self.members {
            let genome = &mut genomes[*i];
            genome.set_adjusted_fitness(goal.share(genome.fitness(), size));
        }
    }

    /// Returns the species' total shared fitness,
    /// mapped onto a positive, higher-is-better scale.
    /// `best` is the best shared fitness in the population.
    pub(super) fn merit(&self, genomes: &[Genome], goal: FitnessGoal, best: f32) -> f32 {
        self.members
            .iter()
            .map(|i| goal.merit(genomes[*i].adjusted_fitness(), best))
            .sum()
    }

    pub(super) fn count_survivors(&self, config: &PopulationConfig) -> usize {
        (self.members.len() as f32 * config.survival_rate).ceil() as usize
    }
}
