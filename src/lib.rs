//! # TDA-Barfeats
//!
//! Topological Summaries of Pairwise Distance Matrices: Barcodes, Betti
//! Curves and Bottleneck Distances
//!
//! ## Framework
//!
//! Many recordings (calcium imaging, EEG, fMRI) reduce to a dissimilarity
//! matrix D over N regions of interest per trial. This crate turns each D
//! into a fixed-length description of its shape and compares trials with
//! each other.
//!
//! ### Pipeline
//!
//! 1. **Filtration**: the Vietoris-Rips complex of D, optionally
//!    re-parametrised by edge density ρ(x) = fraction of the N(N−1)
//!    off-diagonal entries ≤ x
//!
//! 2. **Persistent Homology**: barcodes {(bᵢ, dᵢ)} per homology dimension
//!    via boundary matrix reduction over Z/2
//!
//! 3. **Barcode Features**: Betti curves on a grid ρ₁ < … < ρ_m, their
//!    integral, persistence mean/median/sum/max, persistent entropy and
//!    algebraic moments Σ (d − b)ᵖ (b + d)^q
//!
//! 4. **Comparison**: all-pairs bottleneck distances between trials,
//!    averaged into label × label matrices
//!
//! Peripheral tools produce the matrices (histogram mutual information,
//! correlation distance, weighted stochastic block models) and draw the
//! results.
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Giusti et al., PNAS 112, 13455 (2015) - Clique topology of neural correlations
//! - Atienza et al., "Persistent entropy for separating topological features" (2017)
//! - Aktas, Akbas & El Fatmaoui, "Persistence homology of networks" (2019)

pub mod config;
pub mod error;
pub mod features;
pub mod information;
pub mod plot;
pub mod systems;
pub mod topology;
pub mod utils;

pub use config::{default_pq_pairs, FeatureConfig, PairwiseConfig};
pub use error::{Result, TdaError};

// Re-exports from topology
pub use topology::{
    // Barcodes
    Bar,
    Barcode,
    Dimension,
    // Filtration and persistence
    compute_persistence,
    EdgeDensity,
    PersistenceBackend,
    PersistenceDiagram,
    RipsPersistence,
    VietorisRips,
    // Summaries and metrics
    bottleneck_distance,
    BettiCurve,
};

// Re-exports from features
pub use features::{
    concat_barfeats,
    get_pairwise_bottleneck,
    process_barcodes,
    process_dmatrix,
    process_dmatrix_with,
    BarFeatures,
    DmatrixFeatures,
    FeatureKey,
    LabelGroups,
    MomentOrder,
    PairwiseBottleneck,
    PairwiseProgress,
};

// Re-exports from information
pub use information::{calc_info_measures, calc_pairwise_corr, calc_pairwise_info};

// Re-exports from systems
pub use systems::{gen_wsbm, BlockModel, WsbmParams};

pub use plot::{plot_persistent_diagrams, PlotOptions};
