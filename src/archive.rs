use crate::solution::{dominance, Dominance, Solution};
use rand::Rng;

/// A collection of solutions that is mutually nondominated in objective
/// space, with no two members sharing an identical decision vector.
///
/// The archive is the sole owner of its solutions. Member order is
/// unspecified and may change between calls (insertion uses swap-removal).
#[derive(Debug, Default)]
pub struct Archive {
    solutions: Vec<Solution>,
}

impl Archive {
    pub fn new() -> Self {
        Self { solutions: Vec::new() }
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Attempt to insert `s`, maintaining nondominance and decision
    /// uniqueness. Returns `true` iff `s` was inserted.
    ///
    /// Walks the archive once: a dominated incumbent is removed by swapping
    /// it with the last element and popping, without advancing past the
    /// vacated slot; an incumbent that dominates `s`, or that is decision-
    /// equal to `s` under an equal objective, rejects `s` outright.
    pub fn insert_if_nondominated(&mut self, s: Solution) -> bool {
        let mut i = 0;
        while i < self.solutions.len() {
            match dominance(s.objective(), self.solutions[i].objective()) {
                Dominance::Equal => {
                    if s.decision_equal(&self.solutions[i]) {
                        return false;
                    }
                    // same objective vector, different decision: keep scanning
                    // for a literal decision-equal match before accepting.
                    if self.solutions[i + 1..]
                        .iter()
                        .any(|m| s.decision_equal(m))
                    {
                        return false;
                    }
                    i += 1;
                }
                Dominance::Dominates => {
                    self.solutions.swap_remove(i);
                }
                Dominance::Dominated => {
                    return false;
                }
                Dominance::Incomparable => {
                    i += 1;
                }
            }
        }
        self.solutions.push(s);
        true
    }

    /// Remove and return a uniformly random member, or `None` if empty.
    pub fn pop_random(&mut self, rng: &mut impl Rng) -> Option<Solution> {
        if self.solutions.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.solutions.len());
        Some(self.solutions.swap_remove(idx))
    }
}
