//! Barcode Statistics: Betti Curves, Persistence Scores and Moments
//!
//! Reduces a single barcode, sampled on a filtration grid, to a fixed
//! bundle of features:
//!
//! - `betti_num`: Betti curve on the grid
//! - `int_betti`: trapezoidal integral of the Betti curve
//! - `mean_pers`, `med_pers`, `sum_pers`, `max_pers`: lifetime statistics
//! - `ent_pers`: persistent entropy of the normalised lifetimes
//! - `norm_ent_pers`: persistent entropy divided by its maximum ln(M)
//! - algebraic moments: sum and mean of (d−b)^p · (b+d)^q per (p, q)
//!
//! Infinite deaths are clamped to the last grid value for everything except
//! the Betti curve. An empty barcode yields zeros throughout.

use ndarray::{array, Array1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::error::{Result, TdaError};
use crate::information::persistence_entropy;
use crate::topology::{Barcode, BettiCurve};

/// Exponents (p, q) of an algebraic moment (d−b)^p · (b+d)^q
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MomentOrder {
    pub p: u32,
    pub q: u32,
}

impl MomentOrder {
    pub const fn new(p: u32, q: u32) -> Self {
        Self { p, q }
    }
}

impl fmt::Display for MomentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alg_p{}_q{}", self.p, self.q)
    }
}

/// Sum and mean of one algebraic moment over all bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlgebraicMoment {
    pub sum: f64,
    pub mean: f64,
}

/// Feature bundle of one barcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarFeatures {
    pub betti_num: Array1<usize>,
    pub int_betti: f64,
    pub mean_pers: f64,
    pub med_pers: f64,
    pub sum_pers: f64,
    pub max_pers: f64,
    pub ent_pers: f64,
    /// `ent_pers / ln(M)` over the M bars, so 1 means equal lifetimes;
    /// not the `log2(sum_pers)` normalisation. Zero for fewer than two bars.
    pub norm_ent_pers: f64,
    pub moments: BTreeMap<MomentOrder, AlgebraicMoment>,
}

/// Selector for one entry of a [`BarFeatures`] bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKey {
    BettiNum,
    IntBetti,
    MeanPers,
    MedPers,
    SumPers,
    MaxPers,
    EntPers,
    NormEntPers,
    AlgSum(MomentOrder),
    AlgMean(MomentOrder),
}

impl FeatureKey {
    /// Keys that do not depend on the (p, q) configuration
    pub const FIXED: [FeatureKey; 8] = [
        FeatureKey::BettiNum,
        FeatureKey::IntBetti,
        FeatureKey::MeanPers,
        FeatureKey::MedPers,
        FeatureKey::SumPers,
        FeatureKey::MaxPers,
        FeatureKey::EntPers,
        FeatureKey::NormEntPers,
    ];
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::BettiNum => write!(f, "betti_num"),
            FeatureKey::IntBetti => write!(f, "int_betti"),
            FeatureKey::MeanPers => write!(f, "mean_pers"),
            FeatureKey::MedPers => write!(f, "med_pers"),
            FeatureKey::SumPers => write!(f, "sum_pers"),
            FeatureKey::MaxPers => write!(f, "max_pers"),
            FeatureKey::EntPers => write!(f, "ent_pers"),
            FeatureKey::NormEntPers => write!(f, "norm_ent_pers"),
            FeatureKey::AlgSum(order) => write!(f, "{}_sum", order),
            FeatureKey::AlgMean(order) => write!(f, "{}_mean", order),
        }
    }
}

impl BarFeatures {
    /// Value of `key` as a vector (scalars have length 1); `None` for a
    /// moment that was not computed
    pub fn get(&self, key: FeatureKey) -> Option<Array1<f64>> {
        let scalar = |v: f64| Some(array![v]);
        match key {
            FeatureKey::BettiNum => Some(self.betti_num.mapv(|b| b as f64)),
            FeatureKey::IntBetti => scalar(self.int_betti),
            FeatureKey::MeanPers => scalar(self.mean_pers),
            FeatureKey::MedPers => scalar(self.med_pers),
            FeatureKey::SumPers => scalar(self.sum_pers),
            FeatureKey::MaxPers => scalar(self.max_pers),
            FeatureKey::EntPers => scalar(self.ent_pers),
            FeatureKey::NormEntPers => scalar(self.norm_ent_pers),
            FeatureKey::AlgSum(order) => self.moments.get(&order).map(|m| array![m.sum]),
            FeatureKey::AlgMean(order) => self.moments.get(&order).map(|m| array![m.mean]),
        }
    }

    /// Every key present in this bundle
    pub fn keys(&self) -> Vec<FeatureKey> {
        let mut keys = FeatureKey::FIXED.to_vec();
        for &order in self.moments.keys() {
            keys.push(FeatureKey::AlgSum(order));
            keys.push(FeatureKey::AlgMean(order));
        }
        keys
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Reduce one barcode to its feature bundle
///
/// # Arguments
/// * `bars` - birth/death pairs of a single homology dimension (may be empty)
/// * `vec_rhos` - ascending filtration grid for the Betti curve
/// * `pq_pairs` - exponents of the algebraic moments
pub fn process_barcodes(
    bars: &Barcode,
    vec_rhos: &[f64],
    pq_pairs: &[MomentOrder],
) -> Result<BarFeatures> {
    let rho_max = *vec_rhos.last().ok_or_else(|| {
        TdaError::InvalidArgument("filtration grid `vec_rhos` is empty".to_string())
    })?;

    let curve = BettiCurve::compute(bars, vec_rhos);
    let int_betti = curve.integrated();

    // Essential bars live until the end of the grid
    let (births, deaths): (Vec<f64>, Vec<f64>) = if bars.is_empty() {
        (vec![0.0], vec![0.0])
    } else {
        bars.iter()
            .map(|bar| {
                let death = if bar.death.is_infinite() { rho_max } else { bar.death };
                (bar.birth, death)
            })
            .unzip()
    };

    let lifetimes: Vec<f64> = births
        .iter()
        .zip(&deaths)
        .map(|(b, d)| (d - b).abs())
        .collect();
    let n = lifetimes.len() as f64;

    let sum_pers: f64 = lifetimes.iter().sum();
    let mean_pers = sum_pers / n;
    let med_pers = median(&lifetimes);
    let max_pers = lifetimes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (ent_pers, norm_ent_pers) = if bars.is_empty() {
        (0.0, 0.0)
    } else {
        if sum_pers == 0.0 {
            warn!(n_bars = bars.len(), "barcode has zero total persistence");
        }
        let ent = persistence_entropy(&lifetimes);
        let norm = if lifetimes.len() > 1 { ent / n.ln() } else { 0.0 };
        (ent, norm)
    };

    let moments = pq_pairs
        .iter()
        .map(|&order| {
            let terms: Vec<f64> = lifetimes
                .iter()
                .zip(births.iter().zip(&deaths))
                .map(|(l, (b, d))| l.powi(order.p as i32) * (b + d).powi(order.q as i32))
                .collect();
            let sum: f64 = terms.iter().sum();
            (order, AlgebraicMoment { sum, mean: sum / n })
        })
        .collect();

    Ok(BarFeatures {
        betti_num: curve.values,
        int_betti,
        mean_pers,
        med_pers,
        sum_pers,
        max_pers,
        ent_pers,
        norm_ent_pers,
        moments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_pq_pairs;
    use approx::assert_abs_diff_eq;

    fn features(pairs: &[(f64, f64)], grid: &[f64]) -> BarFeatures {
        process_barcodes(&Barcode::from_pairs(pairs), grid, &default_pq_pairs()).unwrap()
    }

    #[test]
    fn test_empty_barcode() {
        let f = features(&[], &[0.0, 0.25, 0.5, 1.0]);
        assert_eq!(f.betti_num, Array1::<usize>::zeros(4));
        assert_eq!(f.int_betti, 0.0);
        assert_eq!(f.mean_pers, 0.0);
        assert_eq!(f.med_pers, 0.0);
        assert_eq!(f.sum_pers, 0.0);
        assert_eq!(f.max_pers, 0.0);
        assert_eq!(f.ent_pers, 0.0);
        assert_eq!(f.norm_ent_pers, 0.0);
        assert_eq!(f.moments.len(), 5);
        assert!(f.moments.values().all(|m| m.sum == 0.0 && m.mean == 0.0));
    }

    #[test]
    fn test_single_bar() {
        let f = features(&[(0.0, 1.0)], &[0.0, 0.5, 1.0, 1.5]);
        assert_eq!(f.betti_num, ndarray::array![1, 1, 1, 0]);
        assert_eq!(f.mean_pers, 1.0);
        assert_eq!(f.sum_pers, 1.0);
        assert_eq!(f.max_pers, 1.0);
        assert_eq!(f.med_pers, 1.0);
        assert_eq!(f.ent_pers, 0.0);
        // trapezoid over [1,1,1,0]: 0.5 + 0.5 + 0.25
        assert_abs_diff_eq!(f.int_betti, 1.25, epsilon = 1e-12);
        // (d-b)^p (b+d)^q = 1 for every (p, q)
        assert!(f.moments.values().all(|m| m.sum == 1.0 && m.mean == 1.0));
    }

    #[test]
    fn test_infinite_death_clamped() {
        let grid = [0.0, 0.5, 1.0, 2.0];
        let f = features(&[(0.5, f64::INFINITY)], &grid);
        // Alive from its birth to the end of the grid
        assert_eq!(f.betti_num, ndarray::array![0, 1, 1, 1]);
        // Lifetime measured up to the last grid value
        assert_abs_diff_eq!(f.max_pers, 1.5);
        let m11 = f.moments[&MomentOrder::new(1, 1)];
        assert_abs_diff_eq!(m11.sum, 1.5 * 2.5);
    }

    #[test]
    fn test_statistics_and_moments() {
        let f = features(&[(0.0, 1.0), (0.5, 1.0), (0.2, 0.4), (0.0, 3.0)], &[0.0, 1.0]);
        // lifetimes 1.0, 0.5, 0.2, 3.0
        assert_abs_diff_eq!(f.sum_pers, 4.7, epsilon = 1e-12);
        assert_abs_diff_eq!(f.mean_pers, 4.7 / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.med_pers, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(f.max_pers, 3.0);

        let expected_ent: f64 = [1.0_f64, 0.5, 0.2, 3.0]
            .iter()
            .map(|l| {
                let p = l / 4.7;
                -p * p.ln()
            })
            .sum();
        assert_abs_diff_eq!(f.ent_pers, expected_ent, epsilon = 1e-12);
        assert_abs_diff_eq!(f.norm_ent_pers, expected_ent / 4.0_f64.ln(), epsilon = 1e-12);

        // p=2, q=1: 1*1 + 0.25*1.5 + 0.04*0.6 + 9*3
        let m21 = f.moments[&MomentOrder::new(2, 1)];
        let expected = 1.0 + 0.375 + 0.024 + 27.0;
        assert_abs_diff_eq!(m21.sum, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(m21.mean, expected / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_persistence_propagates_nan() {
        let f = features(&[(0.3, 0.3)], &[0.0, 1.0]);
        assert_eq!(f.sum_pers, 0.0);
        assert!(f.ent_pers.is_nan());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = process_barcodes(&Barcode::empty(), &[], &default_pq_pairs());
        assert!(matches!(err, Err(TdaError::InvalidArgument(_))));
    }

    #[test]
    fn test_feature_keys() {
        let f = features(&[(0.0, 1.0)], &[0.0, 1.0]);
        let keys = f.keys();
        assert_eq!(keys.len(), 8 + 2 * 5);
        assert_eq!(FeatureKey::AlgSum(MomentOrder::new(1, 3)).to_string(), "alg_p1_q3_sum");
        assert_eq!(f.get(FeatureKey::BettiNum).unwrap().len(), 2);
        assert!(f.get(FeatureKey::AlgMean(MomentOrder::new(4, 4))).is_none());
    }
}
