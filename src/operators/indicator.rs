use crate::metrics::set_hypervolume;
use crate::solution::weakly_dominates;

/// The binary quality indicators IBEA can be configured with.
#[derive(Debug, Clone, Copy)]
pub enum Indicator {
    /// Additive epsilon indicator (maximization):
    /// `max_m (o2[m] - o1[m])`.
    Eps,
    /// Hypervolume-difference indicator.
    Ihd,
}

impl Indicator {
    pub fn value(&self, o1: &[f64], o2: &[f64], reference: &[f64]) -> f64 {
        match self {
            Indicator::Eps => eps(o1, o2),
            Indicator::Ihd => ihd(o1, o2, reference),
        }
    }
}

fn eps(o1: &[f64], o2: &[f64]) -> f64 {
    o2.iter()
        .zip(o1)
        .map(|(b, a)| b - a)
        .fold(f64::NEG_INFINITY, f64::max)
}

fn ihd(o1: &[f64], o2: &[f64], reference: &[f64]) -> f64 {
    let hv1 = set_hypervolume(&[o1.to_vec()], reference);
    if weakly_dominates(o1, o2) {
        let hv2 = set_hypervolume(&[o2.to_vec()], reference);
        hv2 - hv1
    } else {
        let hv_both = set_hypervolume(&[o1.to_vec(), o2.to_vec()], reference);
        hv_both - hv1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn eps_literal_scenario() {
        let o1 = [1.0, 0.0];
        let o2 = [0.0, 1.0];
        assert!(approx_eq!(f64, Indicator::Eps.value(&o1, &o2, &[0.0, 0.0]), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, Indicator::Eps.value(&o2, &o1, &[0.0, 0.0]), 1.0, epsilon = 1e-12));
    }

    #[test]
    fn eps_of_identical_vectors_is_zero() {
        let o = [2.0, 3.0];
        assert!(approx_eq!(f64, Indicator::Eps.value(&o, &o, &[0.0, 0.0]), 0.0, epsilon = 1e-12));
    }

    #[test]
    fn ihd_of_dominating_pair_is_negative_gap_in_hv() {
        let r = [0.0, 0.0];
        let o1 = [3.0, 3.0];
        let o2 = [1.0, 1.0];
        // o1 weakly dominates o2; hv({o2}) - hv({o1}) = 1 - 9 = -8.
        assert!(approx_eq!(f64, Indicator::Ihd.value(&o1, &o2, &r), -8.0, epsilon = 1e-9));
    }

    #[test]
    fn ihd_of_incomparable_pair_uses_union_minus_hv1() {
        let r = [0.0, 0.0];
        let o1 = [3.0, 1.0];
        let o2 = [1.0, 3.0];
        // union hv of {(3,1),(1,3)} against r=(0,0): boxes of area 3 each,
        // overlapping in [0,1]x[0,1] (area 1) -> union = 3 + 3 - 1 = 5.
        // hv({o1}) = 3. value = 5 - 3 = 2.
        assert!(approx_eq!(f64, Indicator::Ihd.value(&o1, &o2, &r), 2.0, epsilon = 1e-9));
    }
}
