use super::{PopulationConfig, Species};
use crate::genomics::{GeneticConfig, Genome, InnovationRegistry};

use rand::prelude::SliceRandom;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of replacing a species'
/// members with their offspring according to the
/// specified configs.
pub(super) struct OffspringFactory<'a> {
    registry: &'a mut InnovationRegistry,
    genetic_config: &'a GeneticConfig,
    population_config: &'a PopulationConfig,
}

impl<'a> OffspringFactory<'a> {
    pub(super) fn new(
        registry: &'a mut InnovationRegistry,
        genetic_config: &'a GeneticConfig,
        population_config: &'a PopulationConfig,
    ) -> OffspringFactory<'a> {
        OffspringFactory {
            registry,
            genetic_config,
            population_config,
        }
    }

    /// Replaces the species' members with the next generation.
    ///
    /// The best members survive. If more than two survive and
    /// some are eliminated, each eliminated slot is refilled
    /// with a child of two distinct survivors. Otherwise every
    /// member survives. `extra` additional slots are filled
    /// with mutated copies of survivors. All survivors are
    /// mutated and carried over.
    pub(super) fn reproduce(
        &mut self,
        species: &Species,
        mut members: Vec<Genome>,
        extra: usize,
    ) -> Vec<Genome> {
        debug_assert_eq!(members.len(), species.len());
        let goal = self.population_config.fitness_goal;
        let mut rng = rand::thread_rng();
        let mut offspring = Vec::with_capacity(members.len() + extra);

        // Best first.
        members.sort_by(|a, b| goal.compare(b.fitness(), a.fitness()));
        let survivors = species.count_survivors(self.population_config).min(members.len());
        let eliminated = members.len() - survivors;

        if survivors > 2 && eliminated > 0 {
            members.truncate(survivors);
            for _ in 0..eliminated {
                let parents: Vec<&Genome> = members.choose_multiple(&mut rng, 2).collect();
                let mut child = Genome::crossover(
                    parents[0],
                    parents[1],
                    goal,
                    self.registry,
                    self.genetic_config,
                );
                child.mutate(self.registry, self.genetic_config);
                offspring.push(child);
            }
        }

        for _ in 0..extra {
            if let Some(parent) = members.choose(&mut rng) {
                let mut child = parent.asexual_offspring(self.registry);
                child.mutate(self.registry, self.genetic_config);
                offspring.push(child);
            }
        }

        for child in &mut offspring {
            child.reset_fitness(self.population_config.initial_fitness);
            child.set_species(species.id());
        }

        for mut survivor in members {
            survivor.set_species(species.id());
            survivor.mutate(self.registry, self.genetic_config);
            offspring.push(survivor);
        }

        offspring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::FitnessGoal;
    use crate::SpeciesId;

    fn setup(fitnesses: &[f32]) -> (InnovationRegistry, GeneticConfig, Vec<Genome>, Species) {
        let config = GeneticConfig {
            initial_weight_std_dev: 1.0,
            ..GeneticConfig::zero()
        };
        let mut registry = InnovationRegistry::new(&config);
        let genomes: Vec<_> = fitnesses
            .iter()
            .map(|f| {
                let mut g = Genome::new(&config, &mut registry);
                g.set_fitness(*f);
                g
            })
            .collect();
        let mut species = Species::new(SpeciesId(3), &genomes[0], 0);
        species.members = (0..genomes.len()).collect();
        (registry, config, genomes, species)
    }

    #[test]
    fn keeps_survivors_and_refills_eliminated() {
        let (mut registry, genetic_config, genomes, species) =
            setup(&[1.0, 9.0, 5.0, 7.0, 3.0, 8.0, 2.0, 6.0, 4.0, 0.5]);
        let population_config = PopulationConfig {
            survival_rate: 0.25,
            ..PopulationConfig::zero()
        };
        let best: Vec<_> = [1, 5, 3].iter().map(|i| genomes[*i].id()).collect();

        let offspring = OffspringFactory::new(&mut registry, &genetic_config, &population_config)
            .reproduce(&species, genomes, 0);

        assert_eq!(offspring.len(), 10);
        for id in &best {
            assert_eq!(offspring.iter().filter(|g| g.id() == *id).count(), 1);
        }
        assert_eq!(offspring.iter().filter(|g| !g.is_evaluated()).count(), 7);
        assert!(offspring.iter().all(|g| g.species() == Some(SpeciesId(3))));
    }

    #[test]
    fn small_species_keeps_everyone() {
        let (mut registry, genetic_config, genomes, species) = setup(&[1.0, 2.0, 3.0, 4.0]);
        let population_config = PopulationConfig {
            survival_rate: 0.5,
            ..PopulationConfig::zero()
        };
        let ids: Vec<_> = genomes.iter().map(Genome::id).collect();

        let offspring = OffspringFactory::new(&mut registry, &genetic_config, &population_config)
            .reproduce(&species, genomes, 0);

        let mut offspring_ids: Vec<_> = offspring.iter().map(Genome::id).collect();
        offspring_ids.sort_unstable();
        assert_eq!(offspring_ids, ids);
        assert!(offspring.iter().all(|g| g.species() == Some(SpeciesId(3))));
    }

    #[test]
    fn extra_slots_are_filled() {
        let (mut registry, genetic_config, genomes, species) = setup(&[1.0, 2.0]);
        let population_config = PopulationConfig {
            fitness_goal: FitnessGoal::Minimize,
            ..PopulationConfig::zero()
        };

        let offspring = OffspringFactory::new(&mut registry, &genetic_config, &population_config)
            .reproduce(&species, genomes, 3);

        assert_eq!(offspring.len(), 5);
        assert_eq!(offspring.iter().filter(|g| g.is_evaluated()).count(), 2);
    }
}
