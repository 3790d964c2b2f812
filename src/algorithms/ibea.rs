use crate::anytime::{AnytimeRow, Callback};
use crate::archive::Archive;
use crate::bitset::BitString;
use crate::error::BenchError;
use crate::instance::Instance;
use crate::metrics::HypervolumeEngine;
use crate::operators::{BitFlipMutation, Crossover, Indicator, KWayTournament};
use crate::rng::seeded_rng;
use crate::solution::Solution;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct IbeaConfig {
    pub instance_path: std::path::PathBuf,
    pub pop_size: usize,
    pub generations: u64,
    pub maxeval: u64,
    pub seed: Option<u64>,
    pub reference: Option<Vec<f64>>,
    pub indicator: Indicator,
    pub scaling_factor: f64,
    pub adaptive: bool,
    pub crossover: Crossover,
    pub mutation: BitFlipMutation,
    pub tournament_size: usize,
}

impl IbeaConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instance_path: impl Into<std::path::PathBuf>,
        pop_size: usize,
        generations: u64,
        maxeval: u64,
        seed: Option<u64>,
        reference: Option<Vec<f64>>,
        indicator: Indicator,
        scaling_factor: f64,
        adaptive: bool,
        crossover: Crossover,
        mutation: BitFlipMutation,
        tournament_size: usize,
    ) -> Result<Self, BenchError> {
        if pop_size < 2 {
            return Err(BenchError::InvalidConfiguration(
                "population size must be at least 2".to_string(),
            ));
        }
        if scaling_factor <= 0.0 {
            return Err(BenchError::InvalidConfiguration(
                "the fitness scaling factor k must be positive".to_string(),
            ));
        }
        if maxeval == 0 {
            return Err(BenchError::InvalidConfiguration(
                "maxeval must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            instance_path: instance_path.into(),
            pop_size,
            generations,
            maxeval,
            seed,
            reference,
            indicator,
            scaling_factor,
            adaptive,
            crossover,
            mutation,
            tournament_size,
        })
    }
}

/// Componentwise-normalize `objectives` against their own population bounds:
/// `s[m] = (o[m] - ub[m]) / (ub[m] - lb[m])`, leaving a coordinate at `0`
/// when the population is constant on it.
fn scale(objectives: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dim = objectives[0].len();
    let mut lb = vec![f64::INFINITY; dim];
    let mut ub = vec![f64::NEG_INFINITY; dim];
    for o in objectives {
        for m in 0..dim {
            lb[m] = lb[m].min(o[m]);
            ub[m] = ub[m].max(o[m]);
        }
    }
    objectives
        .iter()
        .map(|o| {
            (0..dim)
                .map(|m| {
                    let range = ub[m] - lb[m];
                    if range.abs() < f64::EPSILON {
                        0.0
                    } else {
                        (o[m] - ub[m]) / range
                    }
                })
                .collect()
        })
        .collect()
}

/// Indicator value matrix `I[i][j] = indicator(used[j], used[i])`, the
/// adaptive (or fixed) scaling factor `c`, and the resulting fitness vector
/// `fit(i) = -sum_{j != i} exp(-I[i][j] / (k*c))`, all computed over one
/// snapshot of a population's objectives.
fn fitness_and_indicators(
    objectives: &[Vec<f64>],
    indicator: Indicator,
    reference: &[f64],
    adaptive: bool,
    k: f64,
) -> (Vec<f64>, Vec<Vec<f64>>, f64) {
    let used = if adaptive { scale(objectives) } else { objectives.to_vec() };
    let len = used.len();
    let mut imat = vec![vec![0.0; len]; len];
    for i in 0..len {
        for j in 0..len {
            if i != j {
                imat[i][j] = indicator.value(&used[j], &used[i], reference);
            }
        }
    }
    let c = if adaptive {
        let mut max_abs = 0.0f64;
        for row in &imat {
            for &v in row {
                max_abs = max_abs.max(v.abs());
            }
        }
        if max_abs == 0.0 { 1.0 } else { max_abs }
    } else {
        1.0
    };
    let fit = (0..len)
        .map(|i| -(0..len).filter(|&j| j != i).map(|j| (-imat[i][j] / (k * c)).exp()).sum::<f64>())
        .collect();
    (fit, imat, c)
}

/// Trim `combined` down to `pop_size` by repeatedly dropping the
/// minimum-fitness individual and propagating its removal into the
/// remaining fitness values, reusing the indicator matrix and scaling
/// factor `c` computed once over the full combined population.
fn environmental_select(
    combined: Vec<Solution>,
    indicator: Indicator,
    reference: &[f64],
    adaptive: bool,
    k: f64,
    pop_size: usize,
) -> Vec<Solution> {
    let objectives: Vec<Vec<f64>> = combined.iter().map(|s| s.objective().to_vec()).collect();
    let (mut fit, imat, c) = fitness_and_indicators(&objectives, indicator, reference, adaptive, k);
    let len = combined.len();
    let mut alive = vec![true; len];
    let mut remaining = len;

    while remaining > pop_size {
        let removed = (0..len)
            .filter(|&i| alive[i])
            .min_by(|&a, &b| fit[a].partial_cmp(&fit[b]).unwrap())
            .unwrap();
        alive[removed] = false;
        remaining -= 1;
        for i in 0..len {
            if alive[i] {
                fit[i] += (-imat[i][removed] / (k * c)).exp();
            }
        }
    }

    combined.into_iter().enumerate().filter(|(i, _)| alive[*i]).map(|(_, s)| s).collect()
}

/// The indicator-based evolutionary algorithm: a generational (mu+mu)
/// loop driven by a binary quality indicator rather than Pareto ranking.
/// Mating-pool fitness is assigned once per generation, before any
/// offspring exist; environmental selection then reassigns fitness over
/// the combined parent+offspring population before trimming back down.
pub struct Ibea {
    instance: Instance,
    archive: Archive,
    hv: HypervolumeEngine,
    rng: ChaCha8Rng,
    population: Vec<Solution>,
    config: IbeaConfig,
}

impl Ibea {
    pub fn new(config: IbeaConfig) -> Result<Self, BenchError> {
        let instance = Instance::load(&config.instance_path)?;
        let reference = match &config.reference {
            Some(r) => {
                if r.len() != instance.m() {
                    return Err(BenchError::InvalidConfiguration(format!(
                        "reference point has {} coordinates but the instance has {} objectives",
                        r.len(),
                        instance.m()
                    )));
                }
                r.clone()
            }
            None => vec![0.0; instance.m()],
        };
        let mut rng = seeded_rng(config.seed);
        let n = instance.n();
        let population = (0..config.pop_size)
            .map(|_| {
                let x = BitString::random(n, &mut rng);
                let y = instance.evaluate(&x);
                Solution::new(x, y)
            })
            .collect();
        Ok(Self {
            instance,
            archive: Archive::new(),
            hv: HypervolumeEngine::new(reference),
            rng,
            population,
            config,
        })
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn hypervolume(&self) -> f64 {
        self.hv.value()
    }

    fn offer(&mut self, s: &Solution) {
        if self.archive.insert_if_nondominated(s.clone()) {
            self.hv.insert(s.objective().to_vec());
        }
    }

    pub fn run(mut self, callback: &mut Callback) -> Self {
        let mut eval = 0u64;
        for s in self.population.clone() {
            self.offer(&s);
            eval += 1;
        }
        callback(AnytimeRow::Generational { evaluation: eval, generation: 0, hypervolume: self.hv.value() });

        let selector = KWayTournament::new(self.config.pop_size, self.config.tournament_size)
            .expect("pop_size and tournament_size are validated at construction");

        for generation in 1..=self.config.generations {
            if eval >= self.config.maxeval {
                break;
            }

            let objectives: Vec<Vec<f64>> =
                self.population.iter().map(|s| s.objective().to_vec()).collect();
            let (fitness, _, _) = fitness_and_indicators(
                &objectives,
                self.config.indicator,
                self.hv.reference(),
                self.config.adaptive,
                self.config.scaling_factor,
            );
            let pool = selector
                .select(&fitness, &mut self.rng)
                .expect("fitness is nonempty for a validated pop_size");

            let mut offspring = Vec::with_capacity(self.config.pop_size);
            let mut i = 0;
            while offspring.len() < self.config.pop_size && eval < self.config.maxeval {
                let a = self.population[pool[i % pool.len()]].decision().clone();
                let b = self.population[pool[(i + 1) % pool.len()]].decision().clone();
                let children = self.config.crossover.cross(&a, &b, &mut self.rng);
                for child in [children.child1, children.child2] {
                    if offspring.len() == self.config.pop_size || eval >= self.config.maxeval {
                        break;
                    }
                    let mutated = self.config.mutation.mutate(&child, &mut self.rng);
                    let y = self.instance.evaluate(&mutated);
                    eval += 1;
                    let s = Solution::new(mutated, y);
                    self.offer(&s);
                    offspring.push(s);
                }
                i += 2;
            }

            let mut combined = self.population.clone();
            combined.extend(offspring);
            self.population = environmental_select(
                combined,
                self.config.indicator,
                self.hv.reference(),
                self.config.adaptive,
                self.config.scaling_factor,
                self.config.pop_size,
            );

            callback(AnytimeRow::Generational { evaluation: eval, generation, hypervolume: self.hv.value() });
        }

        log::info!(
            "ibea: finished after {} generations, archive size {}, hypervolume {}",
            self.config.generations,
            self.archive.len(),
            self.hv.value()
        );
        self
    }
}
