use crate::error::BenchError;
use rand::Rng;

/// K-way tournament selection: a mating pool of `pool_size` entries, each
/// the best-fitness individual among `tournament_size` uniform draws (with
/// replacement) from the population.
#[derive(Debug, Clone, Copy)]
pub struct KWayTournament {
    pool_size: usize,
    tournament_size: usize,
}

impl KWayTournament {
    pub fn new(pool_size: usize, tournament_size: usize) -> Result<Self, BenchError> {
        if pool_size == 0 {
            return Err(BenchError::InvalidConfiguration(
                "mating pool size must be at least 1".to_string(),
            ));
        }
        if tournament_size == 0 {
            return Err(BenchError::InvalidConfiguration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { pool_size, tournament_size })
    }

    /// Build a mating pool of indices into `fitness` (higher is better).
    /// `fitness` must be nonempty.
    pub fn select(&self, fitness: &[f64], rng: &mut impl Rng) -> Result<Vec<usize>, BenchError> {
        if fitness.is_empty() {
            return Err(BenchError::InvalidConfiguration(
                "cannot run a tournament over an empty population".to_string(),
            ));
        }
        let mut pool = Vec::with_capacity(self.pool_size);
        for _ in 0..self.pool_size {
            let mut best = rng.gen_range(0..fitness.len());
            for _ in 1..self.tournament_size {
                let candidate = rng.gen_range(0..fitness.len());
                if fitness[candidate] > fitness[best] {
                    best = candidate;
                }
            }
            pool.push(best);
        }
        Ok(pool)
    }
}
