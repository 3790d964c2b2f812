use crate::bitset::BitString;
use crate::error::BenchError;
use rand::Rng;

/// Independent per-bit flip mutation with a fixed probability.
///
/// GSEMO uses `BitFlipMutation::new(1.0 / n as f64)`; IBEA's uniform
/// mutation is this same operator under its configured `p_m`.
#[derive(Debug, Clone, Copy)]
pub struct BitFlipMutation {
    rate: f64,
}

impl BitFlipMutation {
    pub fn new(rate: f64) -> Result<Self, BenchError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(BenchError::InvalidConfiguration(format!(
                "mutation rate must be in [0, 1], got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    /// Return a mutated copy of `parent`, flipping each bit independently
    /// with probability `rate`.
    pub fn mutate(&self, parent: &BitString, rng: &mut impl Rng) -> BitString {
        let mut child = parent.clone();
        for i in 0..child.len() {
            if rng.gen_bool(self.rate) {
                child.flip(i);
            }
        }
        child
    }
}
