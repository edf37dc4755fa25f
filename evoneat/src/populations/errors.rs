use crate::networks::NetworkError;
use crate::GenomeId;

use thiserror::Error;

/// Failures of population-wide fitness evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("fitness function panicked while evaluating genome {genome}: {message}")]
    FitnessPanicked { genome: GenomeId, message: String },
    #[error("fitness function returned {fitness} for genome {genome}")]
    NonFiniteFitness { genome: GenomeId, fitness: f32 },
    #[error("genome {genome} could not be decoded")]
    Decode {
        genome: GenomeId,
        #[source]
        source: NetworkError,
    },
    #[error("could not start evaluation workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl EvaluationError {
    /// Returns the genome whose evaluation failed, if any.
    pub fn genome(&self) -> Option<GenomeId> {
        match self {
            EvaluationError::FitnessPanicked { genome, .. }
            | EvaluationError::NonFiniteFitness { genome, .. }
            | EvaluationError::Decode { genome, .. } => Some(*genome),
            EvaluationError::WorkerPool(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EvolutionError {
    #[error("attempted evolution on degenerate population")]
    DegeneratePopulation,
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
