use super::EvaluationError;
use crate::genomics::Genome;
use crate::networks::Network;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use std::panic::{self, AssertUnwindSafe};

/// A bounded pool of workers that decode genomes and
/// score them with a user-supplied fitness function.
#[derive(Debug)]
pub(super) struct Evaluator {
    pool: ThreadPool,
}

impl Evaluator {
    pub(super) fn new(workers: usize) -> Result<Evaluator, EvaluationError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("evoneat-eval-{}", i))
            .build()?;
        Ok(Evaluator { pool })
    }

    pub(super) fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Scores every genome not yet evaluated, returning the
    /// number of genomes scored. Returns once every worker
    /// is done.
    pub(super) fn evaluate<F>(
        &self,
        genomes: &mut [Genome],
        fitness_function: &F,
    ) -> Result<usize, EvaluationError>
    where
        F: Fn(&mut Network) -> f32 + Sync,
    {
        self.pool.install(|| {
            genomes
                .par_iter_mut()
                .filter(|g| !g.is_evaluated())
                .map(|genome| {
                    score(genome, fitness_function).map(|fitness| {
                        genome.set_fitness(fitness);
                        1usize
                    })
                })
                .sum()
        })
    }
}

fn score<F>(genome: &Genome, fitness_function: &F) -> Result<f32, EvaluationError>
where
    F: Fn(&mut Network) -> f32 + Sync,
{
    let mut network = Network::new(genome).map_err(|source| EvaluationError::Decode {
        genome: genome.id(),
        source,
    })?;
    let fitness = panic::catch_unwind(AssertUnwindSafe(|| fitness_function(&mut network)))
        .map_err(|payload| EvaluationError::FitnessPanicked {
            genome: genome.id(),
            message: panic_message(payload.as_ref()),
        })?;
    if fitness.is_finite() {
        Ok(fitness)
    } else {
        Err(EvaluationError::NonFiniteFitness {
            genome: genome.id(),
            fitness,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneticConfig, InnovationRegistry};

    fn genomes(count: usize) -> Vec<Genome> {
        let config = GeneticConfig::default();
        let mut registry = InnovationRegistry::new(&config);
        (0..count)
            .map(|_| Genome::new(&config, &mut registry))
            .collect()
    }

    #[test]
    fn scores_unevaluated_genomes_only() {
        let evaluator = Evaluator::new(2).unwrap();
        let mut genomes = genomes(6);
        genomes[0].set_fitness(-5.0);

        let scored = evaluator
            .evaluate(&mut genomes, &|network: &mut Network| {
                network.evaluate(&[1.0, 0.0]).map(|o| o[0]).unwrap_or(0.0) + 10.0
            })
            .unwrap();

        assert_eq!(scored, 5);
        assert_eq!(genomes[0].fitness(), -5.0);
        assert!(genomes.iter().all(Genome::is_evaluated));
        assert!(genomes[1..].iter().all(|g| g.fitness() >= 10.0));
    }

    #[test]
    fn reports_panicking_genome() {
        let evaluator = Evaluator::new(1).unwrap();
        let mut genomes = genomes(3);
        let failing = genomes[1].id();
        genomes[0].set_fitness(1.0);
        genomes[2].set_fitness(1.0);

        let error = evaluator
            .evaluate(&mut genomes, &|_: &mut Network| -> f32 { panic!("broken fitness") })
            .unwrap_err();

        assert_eq!(error.genome(), Some(failing));
        assert!(matches!(
            error,
            EvaluationError::FitnessPanicked { ref message, .. } if message == "broken fitness"
        ));
    }

    #[test]
    fn rejects_non_finite_fitness() {
        let evaluator = Evaluator::new(1).unwrap();
        let mut genomes = genomes(1);
        let error = evaluator
            .evaluate(&mut genomes, &|_: &mut Network| f32::NAN)
            .unwrap_err();
        assert!(matches!(error, EvaluationError::NonFiniteFitness { .. }));
        assert!(!genomes[0].is_evaluated());
    }
}
