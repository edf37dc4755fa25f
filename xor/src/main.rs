use evoneat::genomics::{ActivationType, GeneticConfig, GenomeSnapshot};
use evoneat::networks::Network;
use evoneat::populations::logging::{EvolutionLogger, ReportingLevel, Stats};
use evoneat::populations::{EvolutionError, Population, PopulationConfig};

use tracing_subscriber::EnvFilter;

use std::error::Error;

const ERROR_MARGIN: f32 = 0.3;
const SOLVED_FITNESS: f32 = 16.0;
const DEFAULT_RUNS: usize = 100;

fn evaluate_xor(network: &mut Network) -> f32 {
    let values = [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ];

    let mut errors = [0.0; 4];
    for (i, (input, output)) in values.iter().enumerate() {
        errors[i] = match network.evaluate(input) {
            Ok(result) => (result[0] - output).abs(),
            Err(_) => 1.0,
        };
        if errors[i] < ERROR_MARGIN {
            errors[i] = 0.0;
        }
    }

    (4.0 - errors.iter().sum::<f32>()).powf(2.0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xor=info,evoneat=warn")),
        )
        .init();

    let genetic_config = GeneticConfig {
        input_count: 2,
        output_count: 1,
        hidden_activations: vec![ActivationType::Sigmoid],
        output_activation: ActivationType::Sigmoid,
        initial_weight_std_dev: 1.0,
        weight_perturbation_chance: 0.8,
        weight_perturbation_std_dev: 0.5,
        node_addition_chance: 0.03,
        connection_addition_chance: 0.05,
        ..GeneticConfig::default()
    };
    let population_config = PopulationConfig {
        size: 150,
        generations: 100,
        survival_rate: 0.2,
        distance_threshold: 3.0,
        stagnation_limit: 15,
        ..PopulationConfig::default()
    };

    let runs = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_RUNS);

    if let Err(e) = stress_test(runs, &genetic_config, &population_config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Evolves `runs` independent populations, reporting how
/// many generations successful runs took.
fn stress_test(
    runs: usize,
    genetic_config: &GeneticConfig,
    population_config: &PopulationConfig,
) -> Result<(), Box<dyn Error>> {
    let mut generations = vec![];
    let mut best: Option<GenomeSnapshot> = None;

    for run in 0..runs {
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        let outcome = solve(genetic_config, population_config, &mut logger)?;
        if let Some(log) = logger.iter().last() {
            tracing::debug!(run, "{}", log);
        }
        match outcome {
            Some((generation, champion)) => {
                tracing::info!(run, generation, nodes = champion.node_genes.len(), "solved");
                generations.push(Some(generation));
                if best
                    .as_ref()
                    .map_or(true, |b| champion.node_genes.len() < b.node_genes.len())
                {
                    best = Some(champion);
                }
            }
            None => {
                tracing::info!(run, "not solved");
                generations.push(None);
            }
        }
    }

    let failures = generations.iter().filter(|g| g.is_none()).count();
    let solved = generations.iter().flatten().map(|g| *g as f32);
    match Stats::summarize(solved) {
        Some(stats) => tracing::info!("successful run generation count: {}", stats),
        None => tracing::info!("no successful runs"),
    }
    tracing::info!(
        "{}% failure rate over {} runs",
        failures as f32 * 100.0 / runs.max(1) as f32,
        runs
    );

    if let Some(champion) = best {
        match serde_json::to_string_pretty(&champion) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("could not serialize champion: {}", e),
        }
    }
    Ok(())
}

/// Evolves a single population until it solves XOR or runs
/// out of generations, returning the generation and champion
/// of a successful run.
fn solve(
    genetic_config: &GeneticConfig,
    population_config: &PopulationConfig,
    logger: &mut EvolutionLogger,
) -> Result<Option<(usize, GenomeSnapshot)>, Box<dyn Error>> {
    let mut population = Population::new(population_config.clone(), genetic_config.clone())?;

    for _ in 0..population_config.generations {
        population.evaluate_fitness(evaluate_xor)?;
        logger.log(
            &population,
            &|g| [g.fitness(), g.connections().filter(|c| c.enabled()).count() as f32],
            ["fitness", "enabled connections"],
        );
        if let Some(champion) = population.champion() {
            if (champion.fitness() - SOLVED_FITNESS).abs() < f32::EPSILON {
                return Ok(Some((population.generation(), champion.snapshot())));
            }
        }
        match population.evolve() {
            Ok(()) => {}
            Err(EvolutionError::DegeneratePopulation) => {
                tracing::warn!(
                    generation = population.generation(),
                    "population degenerated, resetting"
                );
                population.reset();
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(None)
}
