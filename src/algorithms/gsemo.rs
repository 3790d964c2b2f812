use crate::anytime::{AnytimeRow, Callback};
use crate::archive::Archive;
use crate::bitset::BitString;
use crate::error::BenchError;
use crate::instance::Instance;
use crate::metrics::HypervolumeEngine;
use crate::operators::BitFlipMutation;
use crate::rng::seeded_rng;
use crate::solution::Solution;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A single configuration for one GSEMO run.
#[derive(Debug, Clone)]
pub struct GsemoConfig {
    pub instance_path: std::path::PathBuf,
    pub maxeval: u64,
    pub seed: Option<u64>,
    pub reference: Option<Vec<f64>>,
}

impl GsemoConfig {
    pub fn new(
        instance_path: impl Into<std::path::PathBuf>,
        maxeval: u64,
        seed: Option<u64>,
        reference: Option<Vec<f64>>,
    ) -> Result<Self, BenchError> {
        if maxeval == 0 {
            return Err(BenchError::InvalidConfiguration(
                "maxeval must be at least 1".to_string(),
            ));
        }
        Ok(Self { instance_path: instance_path.into(), maxeval, seed, reference })
    }
}

/// The (1+1)-style global simple evolutionary multi-objective optimizer:
/// one parent is drawn uniformly from the archive each iteration, mutated by
/// a single bit-flip pass at rate `1/N`, and the child is offered to the
/// archive; every accepted child emits one anytime row.
pub struct Gsemo {
    instance: Instance,
    archive: Archive,
    hv: HypervolumeEngine,
    rng: ChaCha8Rng,
    maxeval: u64,
}

impl Gsemo {
    pub fn new(config: &GsemoConfig) -> Result<Self, BenchError> {
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
            hv: HypervolumeEngine::new(reference),
            rng: seeded_rng(config.seed),
            maxeval: config.maxeval,
        })
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn hypervolume(&self) -> f64 {
        self.hv.value()
    }

    /// Run to completion, invoking `callback` once per emitted anytime row.
    /// Consumes and returns `self` so the caller can inspect the final
    /// archive and hypervolume afterwards.
    pub fn run(mut self, callback: &mut Callback) -> Self {
        let n = self.instance.n();
        let mutation = BitFlipMutation::new(1.0 / n as f64)
            .expect("1/N is always a valid mutation rate for N >= 1");

        let x0 = BitString::random(n, &mut self.rng);
        let y0 = self.instance.evaluate(&x0);
        self.archive.insert_if_nondominated(Solution::new(x0, y0.clone()));
        self.hv.insert(y0);
        log::info!("gsemo: initialised with hypervolume {}", self.hv.value());
        callback(AnytimeRow::Plain { evaluation: 0, hypervolume: self.hv.value() });

        for eval in 1..=self.maxeval {
            let parent_idx = self.rng.gen_range(0..self.archive.len());
            let parent = self.archive.solutions()[parent_idx].decision().clone();
            let child_x = mutation.mutate(&parent, &mut self.rng);
            let child_y = self.instance.evaluate(&child_x);
            if self.archive.insert_if_nondominated(Solution::new(child_x, child_y.clone())) {
                self.hv.insert(child_y);
                callback(AnytimeRow::Plain { evaluation: eval, hypervolume: self.hv.value() });
            }
        }
        log::info!(
            "gsemo: finished after {} evaluations, archive size {}, hypervolume {}",
            self.maxeval,
            self.archive.len(),
            self.hv.value()
        );
        self
    }
}
