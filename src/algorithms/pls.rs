use crate::anytime::{AnytimeRow, Callback};
use crate::archive::Archive;
use crate::bitset::BitString;
use crate::error::BenchError;
use crate::instance::Instance;
use crate::metrics::HypervolumeEngine;
use crate::rng::seeded_rng;
use crate::solution::{dominance, Dominance, Solution};
use rand_chacha::ChaCha8Rng;

/// Which neighbors a frontier member's exploration is allowed to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Accept any neighbor the archive finds nondominated.
    NonDominating,
    /// Accept only neighbors that dominate the explored parent.
    Dominating,
    /// Try `Dominating` first; if no neighbor in the scanned batch
    /// dominates the parent, replay the unaccepted neighbors under
    /// `NonDominating` semantics instead.
    Both,
}

/// How much of a member's neighborhood is scanned before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exploration {
    /// Scan every neighbor before moving to the next frontier member.
    BestImprovement,
    /// Stop scanning as soon as one neighbor is accepted.
    FirstImprovement,
    /// Run `FirstImprovement` until the frontier empties or the budget is
    /// spent; if budget remains, re-seed the frontier from the current
    /// archive and continue with `BestImprovement`.
    Both,
}

#[derive(Debug, Clone)]
pub struct PlsConfig {
    pub instance_path: std::path::PathBuf,
    pub maxeval: u64,
    pub seed: Option<u64>,
    pub reference: Option<Vec<f64>>,
    pub acceptance: Acceptance,
    pub exploration: Exploration,
}

impl PlsConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instance_path: impl Into<std::path::PathBuf>,
        maxeval: u64,
        seed: Option<u64>,
        reference: Option<Vec<f64>>,
        acceptance: Acceptance,
        exploration: Exploration,
    ) -> Result<Self, BenchError> {
        if maxeval == 0 {
            return Err(BenchError::InvalidConfiguration(
                "maxeval must be at least 1".to_string(),
            ));
        }
        Ok(Self { instance_path: instance_path.into(), maxeval, seed, reference, acceptance, exploration })
    }
}

/// Pareto local search: maintains an archive of all nondominated solutions
/// seen, and a frontier of archive members whose full bit-flip neighborhood
/// has not yet been explored.
pub struct Pls {
    instance: Instance,
    archive: Archive,
    frontier: Archive,
    hv: HypervolumeEngine,
    rng: ChaCha8Rng,
    maxeval: u64,
    acceptance: Acceptance,
    exploration: Exploration,
}

impl Pls {
    pub fn new(config: &PlsConfig) -> Result<Self, BenchError> {
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
        Ok(Self {
            instance,
            archive: Archive::new(),
            frontier: Archive::new(),
            hv: HypervolumeEngine::new(reference),
            rng: seeded_rng(config.seed),
            maxeval: config.maxeval,
            acceptance: config.acceptance,
            exploration: config.exploration,
        })
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn hypervolume(&self) -> f64 {
        self.hv.value()
    }

    pub fn run(mut self, callback: &mut Callback) -> Self {
        let n = self.instance.n();
        let x0 = BitString::random(n, &mut self.rng);
        let y0 = self.instance.evaluate(&x0);
        let s0 = Solution::new(x0, y0.clone());
        self.archive.insert_if_nondominated(s0.clone());
        self.frontier.insert_if_nondominated(s0);
        self.hv.insert(y0);
        let mut eval = 0u64;
        callback(AnytimeRow::Plain { evaluation: eval, hypervolume: self.hv.value() });

        match self.exploration {
            Exploration::BestImprovement => self.explore(false, &mut eval, callback),
            Exploration::FirstImprovement => self.explore(true, &mut eval, callback),
            Exploration::Both => {
                self.explore(true, &mut eval, callback);
                if eval < self.maxeval {
                    let seed: Vec<Solution> = self.archive.solutions().to_vec();
                    for s in seed {
                        self.frontier.insert_if_nondominated(s);
                    }
                    self.explore(false, &mut eval, callback);
                }
            }
        }

        log::info!(
            "pls: finished after {} evaluations, archive size {}, hypervolume {}",
            eval,
            self.archive.len(),
            self.hv.value()
        );
        self
    }

    /// Run the main loop (pop a random frontier member, scan its
    /// neighborhood) until the frontier empties or the budget is spent,
    /// using `first_improvement` to decide whether a member's scan stops at
    /// the first accepted neighbor or always runs to completion.
    fn explore(&mut self, first_improvement: bool, eval: &mut u64, callback: &mut Callback) {
        while *eval < self.maxeval && !self.frontier.is_empty() {
            let parent = self.frontier.pop_random(&mut self.rng).unwrap();
            let n = parent.decision().len();
            let mut dominating_accept = false;
            let mut stash: Vec<(BitString, Vec<f64>)> = Vec::new();

            for i in 0..n {
                if *eval >= self.maxeval {
                    return;
                }
                let neighbor_x = parent.decision().flipped(i);
                let neighbor_y = self.instance.evaluate(&neighbor_x);
                *eval += 1;

                let dominates_parent =
                    dominance(&neighbor_y, parent.objective()) == Dominance::Dominates;

                let accepted = match self.acceptance {
                    Acceptance::NonDominating => self
                        .archive
                        .insert_if_nondominated(Solution::new(neighbor_x.clone(), neighbor_y.clone())),
                    Acceptance::Dominating => {
                        dominates_parent
                            && self.archive.insert_if_nondominated(Solution::new(
                                neighbor_x.clone(),
                                neighbor_y.clone(),
                            ))
                    }
                    Acceptance::Both => {
                        let ok = dominates_parent
                            && self.archive.insert_if_nondominated(Solution::new(
                                neighbor_x.clone(),
                                neighbor_y.clone(),
                            ));
                        if ok {
                            dominating_accept = true;
                        } else {
                            stash.push((neighbor_x.clone(), neighbor_y.clone()));
                        }
                        ok
                    }
                };

                if accepted {
                    self.hv.insert(neighbor_y.clone());
                    self.frontier
                        .insert_if_nondominated(Solution::new(neighbor_x, neighbor_y));
                    callback(AnytimeRow::Plain { evaluation: *eval, hypervolume: self.hv.value() });
                    if first_improvement {
                        break;
                    }
                }
            }

            if self.acceptance == Acceptance::Both && !dominating_accept {
                for (x, y) in stash {
                    let accepted = self
                        .archive
                        .insert_if_nondominated(Solution::new(x.clone(), y.clone()));
                    if accepted {
                        self.hv.insert(y.clone());
                        self.frontier.insert_if_nondominated(Solution::new(x, y));
                        callback(AnytimeRow::Plain { evaluation: *eval, hypervolume: self.hv.value() });
                        if first_improvement {
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_instance(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rmnk_bench_pls_test_{}_{}.txt", std::process::id(), nanos()));
        File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
        path
    }

    fn nanos() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
    }

    // M=2, N=2, K=0: the all-zeros bitstring has objective (0,1); flipping
    // bit 0 gives (1,1), which dominates it on every coordinate.
    const TWO_BIT: &str = "\
p rMNK
0.0 2 2 0
p links
0
1
p tables
0.0 1.0
1.0 1.0
0.0 1.0
1.0 1.0
";

    #[test]
    fn dominating_first_improvement_accepts_a_strictly_improving_neighbor() {
        let path = write_instance(TWO_BIT);
        let config = PlsConfig::new(
            &path,
            10,
            Some(3),
            None,
            Acceptance::Dominating,
            Exploration::FirstImprovement,
        )
        .unwrap();
        let mut rows = Vec::new();
        let mut callback = |row: AnytimeRow| rows.push(row);
        let pls = Pls::new(&config).unwrap();
        let finished = pls.run(&mut callback);
        assert!(finished.archive.solutions().iter().any(|s| s.objective() == [1.0, 1.0]));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn runs_within_budget() {
        let path = write_instance(TWO_BIT);
        let config = PlsConfig::new(
            &path,
            5,
            Some(1),
            None,
            Acceptance::NonDominating,
            Exploration::BestImprovement,
        )
        .unwrap();
        let mut rows = Vec::new();
        let mut callback = |row: AnytimeRow| rows.push(row);
        Pls::new(&config).unwrap().run(&mut callback);
        assert!(rows.iter().all(|r| r.evaluation() <= 5));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn both_exploration_does_not_exceed_budget() {
        let path = write_instance(TWO_BIT);
        let config = PlsConfig::new(
            &path,
            20,
            Some(9),
            None,
            Acceptance::Both,
            Exploration::Both,
        )
        .unwrap();
        let mut rows = Vec::new();
        let mut callback = |row: AnytimeRow| rows.push(row);
        Pls::new(&config).unwrap().run(&mut callback);
        assert!(rows.iter().all(|r| r.evaluation() <= 20));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(PlsConfig::new(
            "/dev/null",
            0,
            None,
            None,
            Acceptance::NonDominating,
            Exploration::BestImprovement
        )
        .is_err());
    }
}
