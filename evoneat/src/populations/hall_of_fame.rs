use super::FitnessGoal;
use crate::genomics::{Genome, GenomeSnapshot};

use serde::{Deserialize, Serialize};

/// A genome that entered the hall of fame,
/// along with the generation it was recorded in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HallOfFameEntry {
    pub generation: usize,
    pub genome: GenomeSnapshot,
}

/// The best genomes seen over a run, best first.
///
/// Each genome appears at most once. Entries are
/// snapshots, so they outlive the genomes they
/// were taken from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HallOfFame {
    capacity: usize,
    entries: Vec<HallOfFameEntry>,
}

impl HallOfFame {
    pub fn new(capacity: usize) -> HallOfFame {
        HallOfFame {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Offers every evaluated genome for admission.
    /// Returns the number of entries that changed.
    pub(super) fn update(
        &mut self,
        genomes: &[Genome],
        generation: usize,
        goal: FitnessGoal,
    ) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        let mut changed = 0;
        for genome in genomes.iter().filter(|g| g.is_evaluated()) {
            if self.offer(genome, generation, goal) {
                changed += 1;
            }
        }
        changed
    }

    fn offer(&mut self, genome: &Genome, generation: usize, goal: FitnessGoal) -> bool {
        if let Some(i) = self.entries.iter().position(|e| e.genome.id == genome.id()) {
            if !goal.is_better(genome.fitness(), self.entries[i].genome.fitness) {
                return false;
            }
            self.entries.remove(i);
        } else if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(worst) if goal.is_better(genome.fitness(), worst.genome.fitness) => {
                    self.entries.pop();
                }
                _ => return false,
            }
        }
        let position = self
            .entries
            .iter()
            .position(|e| goal.is_better(genome.fitness(), e.genome.fitness))
            .unwrap_or(self.entries.len());
        self.entries.insert(
            position,
            HallOfFameEntry {
                generation,
                genome: genome.snapshot(),
            },
        );
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the best genome recorded so far.
    pub fn best(&self) -> Option<&HallOfFameEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HallOfFameEntry> {
        self.entries.iter()
    }
}
