use super::wfg;
use crate::solution::weakly_dominates;

/// Sentinel returned by [`HypervolumeEngine::remove`] when the requested
/// point is not present.
pub const REMOVE_ABSENT: f64 = -1.0;

/// Maintains the hypervolume of a set of objective vectors under a fixed
/// reference point, updating incrementally as points are inserted or
/// removed.
///
/// The reference point must lie componentwise below every point ever
/// inserted; this is the engine's only precondition and is not re-checked
/// per call.
#[derive(Debug, Clone)]
pub struct HypervolumeEngine {
    reference: Vec<f64>,
    points: Vec<Vec<f64>>,
    value: f64,
}

impl HypervolumeEngine {
    pub fn new(reference: Vec<f64>) -> Self {
        Self {
            reference,
            points: Vec::new(),
            value: 0.0,
        }
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Current hypervolume of the stored set w.r.t. the reference point.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The exclusive hypervolume `p` would add if inserted now. `p` is
    /// assumed not to already be stored.
    pub fn contribution(&self, p: &[f64]) -> f64 {
        wfg::contribution(&self.points, p, &self.reference)
    }

    /// If `contribution(p) != 0`, insert `p`, removing any stored point
    /// that `p` weakly dominates, and add the contribution to `value()`.
    /// Returns the contribution (whether or not `p` was actually added).
    pub fn insert(&mut self, p: Vec<f64>) -> f64 {
        let c = self.contribution(&p);
        if c != 0.0 {
            self.points.retain(|q| !weakly_dominates(&p, q));
            let pos = self.points.partition_point(|q| q[0] < p[0]);
            self.points.insert(pos, p);
            self.value += c;
        }
        c
    }

    /// Remove `p` if present, returning its contribution (now subtracted
    /// from `value()`); otherwise returns [`REMOVE_ABSENT`].
    pub fn remove(&mut self, p: &[f64]) -> f64 {
        let Some(idx) = self.points.iter().position(|q| q.as_slice() == p) else {
            return REMOVE_ABSENT;
        };
        let rest: Vec<Vec<f64>> = self
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, q)| q.clone())
            .collect();
        let c = wfg::contribution(&rest, p, &self.reference);
        self.points.remove(idx);
        self.value -= c;
        c
    }
}
