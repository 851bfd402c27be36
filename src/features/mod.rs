//! Features Module: From Distance Matrices to Trial-Level Summaries
//!
//! - `barcode_stats`: one barcode → Betti curve, persistence statistics,
//!   algebraic moments
//! - `pipeline`: distance matrix → barcodes per dimension → features
//! - `aggregate`: per-trial features → trial × feature matrices
//! - `pairwise`: trial barcodes → bottleneck distance matrices

mod aggregate;
mod barcode_stats;
mod pairwise;
mod pipeline;

pub use aggregate::{concat_barfeats, StackedFeatures};
pub use barcode_stats::{process_barcodes, AlgebraicMoment, BarFeatures, FeatureKey, MomentOrder};
pub use pairwise::{
    get_pairwise_bottleneck,
    group_by_labels,
    pairwise_bottleneck,
    LabelGroups,
    PairwiseBottleneck,
    PairwiseProgress,
    TrialBarcodes,
};
pub use pipeline::{process_dmatrix, process_dmatrix_with, DmatrixFeatures};
