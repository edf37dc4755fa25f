//! A Population is a collection of genomes.
//! These are grouped into species, which can
//! be evolved using a fitness function
//! as the source of selective pressure.
mod config;
mod errors;
mod evaluation;
mod hall_of_fame;
pub mod logging;
mod offspring_factory;
mod species;

pub use config::{FitnessGoal, PopulationConfig};
pub use errors::{EvaluationError, EvolutionError};
pub use hall_of_fame::{HallOfFame, HallOfFameEntry};
pub use species::Species;

use crate::genomics::{ConfigError, GeneticConfig, Genome, InnovationRegistry};
use crate::networks::Network;
use crate::SpeciesId;
use evaluation::Evaluator;
use offspring_factory::OffspringFactory;

use std::num::NonZeroUsize;

/// A population of genomes, their species,
/// and the innovation registry they share.
#[derive(Debug)]
pub struct Population {
    genomes: Vec<Genome>,
    species: Vec<Species>,
    registry: InnovationRegistry,
    hall_of_fame: HallOfFame,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
    evaluator: Option<Evaluator>,
}

impl Population {
    /// Creates a new, speciated population using the passed
    /// configurations. Every genome starts fully connected
    /// and unevaluated, with the configured initial fitness.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    ///
    /// let population = Population::new(
    ///     PopulationConfig { size: 20, ..PopulationConfig::default() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    ///
    /// assert_eq!(population.genomes().len(), 20);
    /// assert_eq!(population.species().iter().map(|s| s.len()).sum::<usize>(), 20);
    ///
    /// let invalid = PopulationConfig { size: 0, ..PopulationConfig::default() };
    /// assert!(Population::new(invalid, GeneticConfig::default()).is_err());
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
    ) -> Result<Population, ConfigError> {
        population_config.validate()?;
        genetic_config.validate()?;
        Ok(Population::build(population_config, genetic_config))
    }

    fn build(population_config: PopulationConfig, genetic_config: GeneticConfig) -> Population {
        let mut registry = InnovationRegistry::new(&genetic_config);
        let genomes = (0..population_config.size)
            .map(|_| {
                let mut genome = Genome::new(&genetic_config, &mut registry);
                genome.reset_fitness(population_config.initial_fitness);
                genome
            })
            .collect();
        let mut population = Population {
            genomes,
            species: vec![],
            registry,
            hall_of_fame: HallOfFame::new(population_config.hall_of_fame_size),
            generation: 0,
            population_config,
            genetic_config,
            evaluator: None,
        };
        population.speciate();
        population
    }

    /// Evaluates the fitness of every genome not yet evaluated,
    /// decoding each into a [`Network`] and passing it to
    /// `fitness_function`. Evaluation runs on a bounded pool
    /// of worker threads and returns once every genome is done.
    /// Returns the number of genomes evaluated.
    ///
    /// # Errors
    /// Returns an error naming the offending genome if the
    /// fitness function panics or returns a non-finite value,
    /// or if a genome cannot be decoded.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig { size: 10, ..PopulationConfig::default() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    ///
    /// let evaluated = population.evaluate_fitness(|network| {
    ///     let output = network.evaluate(&[1.0, 0.0]).unwrap();
    ///     1.0 - (1.0 - output[0]).abs()
    /// }).unwrap();
    ///
    /// assert_eq!(evaluated, 10);
    /// assert!(population.genomes().iter().all(|g| g.is_evaluated()));
    /// ```
    pub fn evaluate_fitness<F>(&mut self, fitness_function: F) -> Result<usize, EvaluationError>
    where
        F: Fn(&mut Network) -> f32 + Sync,
    {
        let evaluator = match self.evaluator.take() {
            Some(evaluator) => evaluator,
            None => Evaluator::new(self.worker_count())?,
        };
        let result = evaluator.evaluate(&mut self.genomes, &fitness_function);
        tracing::debug!(
            generation = self.generation,
            workers = evaluator.worker_count(),
            evaluated = result.as_ref().ok(),
            "evaluated population"
        );
        self.evaluator = Some(evaluator);
        result
    }

    fn worker_count(&self) -> usize {
        self.population_config.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
                .min(self.population_config.size)
        })
    }

    /// Reassigns every genome to a species.
    ///
    /// Genomes join, in order, the first species (by creation
    /// order) whose representative is within the distance
    /// threshold, or found a new species. Species left without
    /// members go extinct.
    pub fn speciate(&mut self) {
        for species in &mut self.species {
            species.members.clear();
        }
        let mut founded = 0;
        for (i, genome) in self.genomes.iter_mut().enumerate() {
            let existing = self
                .species
                .iter_mut()
                .find(|s| s.accepts(genome, &self.genetic_config, &self.population_config));
            match existing {
                Some(species) => {
                    species.members.push(i);
                    genome.set_species(species.id());
                }
                None => {
                    let id = self.registry.next_species_id();
                    let mut species = Species::new(id, genome, self.generation);
                    species.members.push(i);
                    genome.set_species(id);
                    self.species.push(species);
                    founded += 1;
                }
            }
        }
        let before = self.species.len();
        self.species.retain(|s| !s.is_empty());
        tracing::debug!(
            generation = self.generation,
            species = self.species.len(),
            founded,
            extinct = before - self.species.len(),
            "speciated population"
        );
    }

    /// Evolves the population by one generation.
    ///
    /// Species champions and stagnation are updated and
    /// stagnant species removed, their slots going to the
    /// remaining species in proportion to their shared fitness.
    /// Each species then replaces its members with offspring
    /// of its best performers, and the new generation is
    /// speciated.
    ///
    /// # Errors
    /// Returns an error if the population has become degenerate,
    /// i.e. it has no species or some genome's fitness is not
    /// finite. The population is left untouched in that case.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig { size: 30, ..PopulationConfig::default() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    ///
    /// population.evaluate_fitness(|_| 1.0).unwrap();
    /// population.evolve().unwrap();
    ///
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.genomes().len(), 30);
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        if self.species.is_empty() || self.genomes.iter().any(|g| !g.fitness().is_finite()) {
            tracing::warn!(generation = self.generation, "degenerate population");
            return Err(EvolutionError::DegeneratePopulation);
        }

        let goal = self.population_config.fitness_goal;
        self.hall_of_fame.update(&self.genomes, self.generation, goal);
        self.update_species_stagnation();

        let stagnant = self.stagnant_species();
        let freed = self.remove_stagnant_species(&stagnant);
        let extra = self.allot_freed_slots(freed);
        self.reproduce(&extra);
        self.generation += 1;
        self.speciate();
        debug_assert_eq!(self.genomes.len(), self.population_config.size);

        tracing::info!(
            generation = self.generation,
            species = self.species.len(),
            population = self.genomes.len(),
            best_fitness = self.hall_of_fame.best().map(|e| e.genome.fitness),
            "evolved generation"
        );
        Ok(())
    }

    /// Shares fitness within each species and splits `freed`
    /// slots among them in proportion to their merit. Falls
    /// back to splitting by member count if merits overflow.
    fn allot_freed_slots(&mut self, freed: usize) -> Vec<usize> {
        let goal = self.population_config.fitness_goal;
        for species in &self.species {
            species.share_fitness(&mut self.genomes, goal);
        }
        let best = self
            .genomes
            .iter()
            .map(Genome::adjusted_fitness)
            .max_by(|a, b| goal.compare(*a, *b))
            .unwrap_or(0.0);
        let mut merits: Vec<f32> = self
            .species
            .iter()
            .map(|s| s.merit(&self.genomes, goal, best))
            .collect();
        let mut total: f32 = merits.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            tracing::warn!(generation = self.generation, total, "unusable species merit");
            merits = self.species.iter().map(|s| s.len() as f32).collect();
            total = merits.iter().sum();
        }
        round_retain_sum(
            &merits
                .iter()
                .map(|m| m / total * freed as f32)
                .collect::<Vec<_>>(),
        )
    }

    fn update_species_stagnation(&mut self) {
        let goal = self.population_config.fitness_goal;
        for species in &mut self.species {
            species.update_stagnation(&self.genomes, goal);
        }
    }

    /// Returns the IDs of the species to be pruned. If every
    /// species is stagnant, the one with the best champion
    /// is spared.
    fn stagnant_species(&self) -> Vec<SpeciesId> {
        let goal = self.population_config.fitness_goal;
        let mut stagnant: Vec<_> = self
            .species
            .iter()
            .filter(|s| s.is_stagnant(&self.population_config))
            .map(Species::id)
            .collect();
        if stagnant.len() == self.species.len() {
            let spared = self
                .species
                .iter()
                .filter_map(|s| s.best_fitness().map(|f| (s.id(), f)))
                .max_by(|(_, a), (_, b)| goal.compare(*a, *b))
                .map(|(id, _)| id);
            stagnant.retain(|id| Some(*id) != spared);
        }
        stagnant
    }

    /// Removes the named species, returning the
    /// number of slots their members held.
    fn remove_stagnant_species(&mut self, stagnant: &[SpeciesId]) -> usize {
        let mut freed = 0;
        self.species.retain(|s| {
            if stagnant.contains(&s.id()) {
                tracing::debug!(
                    species = %s.id(),
                    members = s.len(),
                    stagnation = s.time_stagnated(),
                    "removing stagnant species"
                );
                freed += s.len();
                false
            } else {
                true
            }
        });
        freed
    }

    /// Replaces every genome with the offspring of its
    /// species. `extra[i]` additional offspring are
    /// produced by the `i`th species.
    fn reproduce(&mut self, extra: &[usize]) {
        debug_assert_eq!(extra.len(), self.species.len());
        let mut previous: Vec<Option<Genome>> = std::mem::take(&mut self.genomes)
            .into_iter()
            .map(Some)
            .collect();
        let mut factory = OffspringFactory::new(
            &mut self.registry,
            &self.genetic_config,
            &self.population_config,
        );
        for (species, extra) in self.species.iter_mut().zip(extra) {
            let members = species
                .members
                .iter()
                .filter_map(|i| previous[*i].take())
                .collect();
            self.genomes.extend(factory.reproduce(species, members, *extra));
            species.members.clear();
        }
    }

    /// Evaluates and evolves the population for the configured
    /// number of generations, then evaluates the final generation
    /// and returns its champion.
    ///
    /// # Errors
    /// Returns the first evaluation or evolution error.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig { size: 20, generations: 3, ..PopulationConfig::default() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    ///
    /// let champion = population.run(|network| network.evaluate(&[0.0, 1.0]).unwrap()[0]).unwrap();
    /// assert!(champion.is_evaluated());
    /// assert_eq!(population.generation(), 3);
    /// ```
    pub fn run<F>(&mut self, fitness_function: F) -> Result<&Genome, EvolutionError>
    where
        F: Fn(&mut Network) -> f32 + Sync,
    {
        for _ in 0..self.population_config.generations {
            self.evaluate_fitness(&fitness_function)?;
            self.evolve()?;
        }
        self.evaluate_fitness(&fitness_function)?;
        let goal = self.population_config.fitness_goal;
        self.hall_of_fame.update(&self.genomes, self.generation, goal);
        self.champion().ok_or(EvolutionError::DegeneratePopulation)
    }

    /// Resets the population to an initial randomized state,
    /// with a fresh innovation registry and hall of fame.
    /// Used primarily in case of population degeneration.
    pub fn reset(&mut self) {
        let evaluator = self.evaluator.take();
        *self = Population::build(self.population_config.clone(), self.genetic_config.clone());
        self.evaluator = evaluator;
    }

    /// Returns the best evaluated genome of the current
    /// generation, if any has been evaluated.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{GeneticConfig, Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig { size: 5, ..PopulationConfig::default() },
    ///     GeneticConfig::default(),
    /// ).unwrap();
    /// assert!(population.champion().is_none());
    ///
    /// population.evaluate_fitness(|network| network.evaluate(&[1.0, 1.0]).unwrap()[0]).unwrap();
    /// let best = population.genomes().iter().map(|g| g.fitness()).fold(f32::MIN, f32::max);
    /// assert_eq!(population.champion().map(|g| g.fitness()), Some(best));
    /// ```
    pub fn champion(&self) -> Option<&Genome> {
        let goal = self.population_config.fitness_goal;
        self.genomes
            .iter()
            .filter(|g| g.is_evaluated())
            .max_by(|a, b| goal.compare(a.fitness(), b.fitness()))
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Returns an iterator over the members of one
    /// of this population's species.
    pub fn members_of<'a>(&'a self, species: &'a Species) -> impl Iterator<Item = &'a Genome> {
        species.members().iter().filter_map(move |i| self.genomes.get(*i))
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn registry(&self) -> &InnovationRegistry {
        &self.registry
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }
}

/// Rounds all values to whole numbers
/// while preserving their order and sum, assuming it is also whole.
/// Rounding is done in the manner that minimizes
/// the average error to the original set of values.
fn round_retain_sum(values: &[f32]) -> Vec<usize> {
    let total_sum = values.iter().sum::<f32>().round() as usize;
    let mut truncated: Vec<(usize, usize, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let u = f.floor();
            (i, u as usize, f - u)
        })
        .collect();
    let truncated_sum: usize = truncated.iter().map(|(_, u, _)| *u).sum();
    let remainder = total_sum.saturating_sub(truncated_sum).min(truncated.len());
    // Decreasing order of error.
    truncated.sort_by(|a, b| b.2.total_cmp(&a.2));
    for (_, u, _) in &mut truncated[..remainder] {
        *u += 1;
    }
    truncated.sort_by_key(|(i, ..)| *i);
    truncated.iter().map(|(_, u, _)| *u).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    fn population(size: usize, distance_threshold: f32, stagnation_limit: usize) -> Population {
        Population::new(
            PopulationConfig {
                size,
                distance_threshold,
                stagnation_limit,
                survival_rate: 0.5,
                ..PopulationConfig::default()
            },
            GeneticConfig {
                node_addition_chance: 0.2,
                connection_addition_chance: 0.3,
                ..GeneticConfig::default()
            },
        )
        .unwrap()
    }

    fn assert_fully_speciated(population: &Population) {
        let mut seen = HashSet::new();
        for species in population.species() {
            assert!(!species.is_empty());
            for i in species.members() {
                assert!(seen.insert(*i), "genome {} in two species", i);
                assert_eq!(population.genomes()[*i].species(), Some(species.id()));
            }
        }
        assert_eq!(seen.len(), population.genomes().len());
    }

    fn output_fitness(network: &mut Network) -> f32 {
        network.evaluate(&[1.0, 0.5]).map(|o| o[0]).unwrap_or(0.0)
    }

    #[test]
    fn round_retain_sum() {
        let v = [5.2, 9.5, 2.8, 1.3, 2.2, 2.7, 6.3, 1.0, 1.0];
        let w = super::round_retain_sum(&v);
        assert_eq!(v.iter().sum::<f32>().round() as usize, w.iter().sum::<usize>());
        assert_eq!(w, [5, 10, 3, 1, 2, 3, 6, 1, 1]);
    }

    #[test]
    fn round_retain_sum_of_nothing() {
        assert!(super::round_retain_sum(&[]).is_empty());
        assert_eq!(super::round_retain_sum(&[0.0, 0.0]), [0, 0]);
    }

    #[test]
    fn new_population_is_speciated() {
        for threshold in [0.0, 0.5, 100.0] {
            let population = population(25, threshold, 15);
            assert_fully_speciated(&population);
            assert!(population.genomes().iter().all(|g| !g.is_evaluated()));
        }
        assert_eq!(population(25, 100.0, 15).species().len(), 1);
        assert_eq!(population(25, 0.0, 15).species().len(), 25);
    }

    #[test]
    fn initial_fitness_is_applied() {
        let population = Population::new(
            PopulationConfig {
                size: 4,
                initial_fitness: 7.5,
                ..PopulationConfig::default()
            },
            GeneticConfig::default(),
        )
        .unwrap();
        assert!(population.genomes().iter().all(|g| g.fitness() == 7.5));
    }

    #[test]
    fn rejects_invalid_genetic_config() {
        let result = Population::new(
            PopulationConfig::default(),
            GeneticConfig {
                output_count: 0,
                ..GeneticConfig::default()
            },
        );
        assert_eq!(result.err(), Some(ConfigError::NoOutputs));
    }

    #[test]
    fn evolution_preserves_size_and_speciation() {
        for goal in [FitnessGoal::Maximize, FitnessGoal::Minimize] {
            let mut population = Population::new(
                PopulationConfig {
                    size: 40,
                    distance_threshold: 1.0,
                    stagnation_limit: 2,
                    fitness_goal: goal,
                    ..PopulationConfig::default()
                },
                GeneticConfig {
                    node_addition_chance: 0.3,
                    connection_addition_chance: 0.3,
                    ..GeneticConfig::default()
                },
            )
            .unwrap();
            for generation in 1..=8 {
                population.evaluate_fitness(output_fitness).unwrap();
                population.evolve().unwrap();
                assert_eq!(population.generation(), generation);
                assert_eq!(population.genomes().len(), 40);
                assert_fully_speciated(&population);
            }
        }
    }

    #[test]
    fn offspring_are_unevaluated_after_evolution() {
        let mut population = population(20, 3.0, 15);
        population.evaluate_fitness(output_fitness).unwrap();
        population.evolve().unwrap();
        let pending = population.genomes().iter().filter(|g| !g.is_evaluated()).count();
        assert!(pending > 0);
        assert_eq!(population.evaluate_fitness(output_fitness).unwrap(), pending);
        assert!(population.genomes().iter().all(Genome::is_evaluated));
    }

    #[test]
    fn evaluation_errors_name_the_genome() {
        let mut population = population(6, 3.0, 15);
        let ids: Vec<_> = population.genomes().iter().map(Genome::id).collect();

        let error = population
            .evaluate_fitness(|_: &mut Network| -> f32 { panic!("fitness failed") })
            .unwrap_err();
        assert!(matches!(error, EvaluationError::FitnessPanicked { .. }));
        assert!(ids.contains(&error.genome().unwrap()));

        let error = population
            .evaluate_fitness(|_: &mut Network| f32::INFINITY)
            .unwrap_err();
        assert!(matches!(error, EvaluationError::NonFiniteFitness { .. }));
        assert!(ids.contains(&error.genome().unwrap()));

        // The population is still usable afterwards.
        assert_eq!(population.evaluate_fitness(|_| 1.0).unwrap(), 6);
    }

    #[test]
    fn stagnant_species_are_pruned() {
        let mut population = population(4, 0.0, 0);
        assert_eq!(population.species().len(), 4);
        for (i, genome) in population.genomes.iter_mut().enumerate() {
            genome.set_fitness(i as f32);
        }
        population.update_species_stagnation();
        population.genomes[0].set_fitness(10.0);
        population.update_species_stagnation();

        let stagnant = population.stagnant_species();
        assert_eq!(stagnant.len(), 3);
        assert_eq!(population.remove_stagnant_species(&stagnant), 3);
        assert_eq!(population.species().len(), 1);
        assert_eq!(population.species()[0].members(), &[0]);
    }

    #[test]
    fn best_species_survives_when_all_stagnate() {
        let mut population = population(4, 0.0, 0);
        for (i, genome) in population.genomes.iter_mut().enumerate() {
            genome.set_fitness(i as f32);
        }
        population.update_species_stagnation();
        population.update_species_stagnation();

        let stagnant = population.stagnant_species();
        assert_eq!(stagnant.len(), 3);
        let best: SpeciesId = population.species()[3].id();
        assert!(!stagnant.contains(&best));
    }

    #[test]
    fn freed_slots_favor_lower_negative_fitness_when_minimizing() {
        let mut population = Population::new(
            PopulationConfig {
                size: 4,
                distance_threshold: 0.0,
                stagnation_limit: 0,
                fitness_goal: FitnessGoal::Minimize,
                ..PopulationConfig::default()
            },
            GeneticConfig::default(),
        )
        .unwrap();
        for (genome, fitness) in population.genomes.iter_mut().zip([-10.0, -1.0, 5.0, 6.0]) {
            genome.set_fitness(fitness);
        }
        population.update_species_stagnation();
        population.genomes[0].set_fitness(-20.0);
        population.genomes[1].set_fitness(-2.0);
        population.update_species_stagnation();

        let stagnant = population.stagnant_species();
        let freed = population.remove_stagnant_species(&stagnant);
        assert_eq!(freed, 2);
        assert_eq!(population.allot_freed_slots(freed), [2, 0]);
    }

    #[test]
    fn degenerate_population_is_left_untouched() {
        let mut population = population(6, 3.0, 15);
        population.evaluate_fitness(output_fitness).unwrap();
        population.genomes[2].set_fitness(f32::NAN);
        let ids: Vec<_> = population.genomes().iter().map(Genome::id).collect();

        assert!(matches!(
            population.evolve(),
            Err(EvolutionError::DegeneratePopulation)
        ));
        assert_eq!(population.generation(), 0);
        assert!(population.hall_of_fame().is_empty());
        assert!(population
            .species()
            .iter()
            .all(|s| s.champion().is_none() && s.time_stagnated() == 0));
        let after: Vec<_> = population.genomes().iter().map(Genome::id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn freed_slots_are_refilled() {
        let mut population = population(4, 0.0, 0);
        for (i, genome) in population.genomes.iter_mut().enumerate() {
            genome.set_fitness(i as f32 + 1.0);
        }
        population.update_species_stagnation();
        population.evolve().unwrap();
        assert_eq!(population.genomes().len(), 4);
        assert_fully_speciated(&population);
    }

    #[test]
    fn run_returns_evaluated_champion() {
        let mut population = Population::new(
            PopulationConfig {
                size: 30,
                generations: 5,
                hall_of_fame_size: 3,
                ..PopulationConfig::default()
            },
            GeneticConfig::default(),
        )
        .unwrap();

        let champion = population.run(output_fitness).unwrap().clone();
        assert!(champion.is_evaluated());
        assert_eq!(population.generation(), 5);
        assert!(population
            .genomes()
            .iter()
            .all(|g| g.fitness() <= champion.fitness()));

        let hall = population.hall_of_fame();
        assert_eq!(hall.len(), 3);
        let best = hall.best().map(|e| e.genome.fitness).unwrap();
        assert!(best >= champion.fitness());
    }

    #[test]
    fn reset_restarts_from_generation_zero() {
        let mut population = population(10, 3.0, 15);
        population.evaluate_fitness(output_fitness).unwrap();
        population.evolve().unwrap();
        population.reset();
        assert_eq!(population.generation(), 0);
        assert!(population.hall_of_fame().is_empty());
        assert_eq!(population.registry().genome_count(), 10);
        assert_fully_speciated(&population);
    }
}
