//! Topology Module: Persistent Homology of Distance Matrices
//!
//! Implements the mathematical structures the barcode features are built on:
//! - Vietoris-Rips (clique) filtration of a distance matrix
//! - Exact persistent homology by boundary matrix reduction
//! - Bottleneck distance between barcodes
//! - Edge-density reparametrisation of the filtration
//! - Betti curves on a sampled filtration grid
//!
//! ## Mathematical Background
//!
//! For a distance matrix D over N entities (e.g. ROIs), the Rips complex
//! VR_ε(D) contains every clique whose pairwise distances are ≤ ε.
//! Persistent homology tracks the birth and death of topological features
//! (connected components, loops, voids) as ε grows.

mod barcode;
mod betti;
mod bottleneck;
mod density;
mod persistence;
mod vietoris_rips;

pub use barcode::{Bar, Barcode, Dimension};
pub use betti::{trapezoid, BettiCurve};
pub use bottleneck::bottleneck_distance;
pub use density::EdgeDensity;
pub use persistence::{
    compute_persistence,
    PersistenceBackend,
    PersistenceDiagram,
    PersistenceInterval,
    RipsPersistence,
};
pub use vietoris_rips::{FilteredSimplex, VietorisRips};
