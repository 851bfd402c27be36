//! Run configuration for the barcode pipeline and the pairwise distances.

use serde::{Deserialize, Serialize};

use crate::features::MomentOrder;

/// Default (p, q) exponents for the algebraic moments of a barcode.
pub const DEFAULT_PQ_PAIRS: [(u32, u32); 5] = [(1, 1), (1, 2), (2, 1), (1, 3), (3, 1)];

/// Options for [`crate::process_dmatrix`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Convert births/deaths from distances to edge densities
    pub process_edgedensity: bool,
    /// Lowest homology dimension to summarise
    pub min_k: usize,
    /// Keep the (converted) barcodes next to the features
    pub save_barcodes: bool,
    /// Exponents of the algebraic moments
    pub pq_pairs: Vec<MomentOrder>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            process_edgedensity: true,
            min_k: 1,
            save_barcodes: false,
            pq_pairs: default_pq_pairs(),
        }
    }
}

impl FeatureConfig {
    /// Configuration that keeps raw distances as the filtration parameter
    pub fn raw_distances() -> Self {
        Self {
            process_edgedensity: false,
            ..Self::default()
        }
    }

    pub fn with_barcodes(mut self) -> Self {
        self.save_barcodes = true;
        self
    }
}

pub fn default_pq_pairs() -> Vec<MomentOrder> {
    DEFAULT_PQ_PAIRS
        .iter()
        .map(|&(p, q)| MomentOrder::new(p, q))
        .collect()
}

/// Options for [`crate::get_pairwise_bottleneck`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseConfig {
    /// Value left on the diagonal of the trial matrix
    pub diag_val: f64,
    /// Return the trial matrix alongside the label matrix when grouping
    pub return_trial_and_label_dist: bool,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self {
            diag_val: f64::NAN,
            return_trial_and_label_dist: false,
        }
    }
}
