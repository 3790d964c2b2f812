use crate::bitset::BitString;
use crate::error::BenchError;
use rand::Rng;

/// The two offspring produced by a crossover.
#[derive(Debug, Clone)]
pub struct CrossoverChildren {
    pub child1: BitString,
    pub child2: BitString,
}

fn swap_bit(a: &mut BitString, b: &mut BitString, i: usize) {
    let tmp = a.get(i);
    a.set(i, b.get(i));
    b.set(i, tmp);
}

/// For each bit index, with probability 1/2 swap between the two children.
/// The whole operation is gated by `p_c`: with probability `1 - p_c` the
/// parents pass through unchanged.
///
/// This honors the stated crossover probability; the source this system
/// was distilled from ignores `p_c` for uniform crossover and always swaps
/// at rate 1/2 (see `spec.md` §9).
#[derive(Debug, Clone, Copy)]
pub struct UniformCrossover {
    p_c: f64,
}

impl UniformCrossover {
    pub fn new(p_c: f64) -> Result<Self, BenchError> {
        if !(0.0..=1.0).contains(&p_c) {
            return Err(BenchError::InvalidConfiguration(format!(
                "crossover probability must be in [0, 1], got {p_c}"
            )));
        }
        Ok(Self { p_c })
    }

    pub fn cross(&self, a: &BitString, b: &BitString, rng: &mut impl Rng) -> CrossoverChildren {
        let mut child1 = a.clone();
        let mut child2 = b.clone();
        if rng.gen_bool(self.p_c) {
            for i in 0..child1.len() {
                if rng.gen_bool(0.5) {
                    swap_bit(&mut child1, &mut child2, i);
                }
            }
        }
        CrossoverChildren { child1, child2 }
    }
}

/// With probability `p_c`, apply `points` sequential swap segments: starting
/// from `p1 = 0`, draw `p2` uniformly in `[p1, len-1]`, swap bits in
/// `[p1, p2)` between the two children, then continue from `p1 <- p2`.
/// Otherwise the parents pass through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct NPointCrossover {
    points: usize,
    p_c: f64,
}

impl NPointCrossover {
    pub fn new(points: usize, p_c: f64) -> Result<Self, BenchError> {
        if !(0.0..=1.0).contains(&p_c) {
            return Err(BenchError::InvalidConfiguration(format!(
                "crossover probability must be in [0, 1], got {p_c}"
            )));
        }
        Ok(Self { points, p_c })
    }

    pub fn cross(&self, a: &BitString, b: &BitString, rng: &mut impl Rng) -> CrossoverChildren {
        let mut child1 = a.clone();
        let mut child2 = b.clone();
        if rng.gen_bool(self.p_c) {
            let len = child1.len();
            let mut p1 = 0usize;
            for _ in 0..self.points {
                if len == 0 || p1 >= len - 1 {
                    break;
                }
                let p2 = rng.gen_range(p1..len);
                for idx in p1..p2 {
                    swap_bit(&mut child1, &mut child2, idx);
                }
                p1 = p2;
            }
        }
        CrossoverChildren { child1, child2 }
    }
}

/// The crossover variants IBEA can be configured with, resolved once at the
/// driver boundary rather than dispatched through virtual calls per child.
#[derive(Debug, Clone, Copy)]
pub enum Crossover {
    Uniform(UniformCrossover),
    NPoint(NPointCrossover),
}

impl Crossover {
    pub fn cross(&self, a: &BitString, b: &BitString, rng: &mut impl Rng) -> CrossoverChildren {
        match self {
            Crossover::Uniform(c) => c.cross(a, b, rng),
            Crossover::NPoint(c) => c.cross(a, b, rng),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_crossover_with_p_c_zero_never_mixes() {
        let op = UniformCrossover::new(0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let a = BitString::zeros(20);
        let mut b = BitString::zeros(20);
        b.flip(3);
        let children = op.cross(&a, &b, &mut rng);
        assert_eq!(children.child1, a);
        assert_eq!(children.child2, b);
    }

    #[test]
    fn uniform_crossover_preserves_total_bit_multiset() {
        let op = UniformCrossover::new(1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = BitString::zeros(10);
        a.set(0, true);
        a.set(1, true);
        let mut b = BitString::zeros(10);
        b.set(5, true);
        let children = op.cross(&a, &b, &mut rng);
        let total_before = a.count_ones() + b.count_ones();
        let total_after = children.child1.count_ones() + children.child2.count_ones();
        assert_eq!(total_before, total_after);
    }

    #[test]
    fn n_point_with_p_c_zero_never_mixes() {
        let op = NPointCrossover::new(3, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let a = BitString::zeros(20);
        let mut b = BitString::zeros(20);
        b.flip(3);
        let children = op.cross(&a, &b, &mut rng);
        assert_eq!(children.child1, a);
        assert_eq!(children.child2, b);
    }

    #[test]
    fn n_point_swaps_a_prefix_segment() {
        let op = NPointCrossover::new(1, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let a = BitString::zeros(8);
        let mut b = BitString::zeros(8);
        for i in 0..8 {
            b.set(i, true);
        }
        let children = op.cross(&a, &b, &mut rng);
        // whatever prefix was swapped, the children must still together
        // contain exactly 8 set bits in total (a had 0, b had 8).
        assert_eq!(children.child1.count_ones() + children.child2.count_ones(), 8);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        assert!(UniformCrossover::new(-0.1).is_err());
        assert!(NPointCrossover::new(2, 1.5).is_err());
    }
}
