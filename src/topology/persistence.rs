//! Exact Persistent Homology via Standard Algorithm
//!
//! This module implements the standard algorithm for computing exact
//! persistent homology of a Rips filtration.
//!
//! ## Algorithm Overview
//!
//! 1. Build filtered simplicial complex (all cliques with their entry values)
//! 2. Sort simplices by (filtration value, dimension, vertices)
//! 3. Reduce boundary matrix using column operations over Z/2Z
//! 4. Extract persistence pairs from reduced matrix
//!
//! ## Backend Seam
//!
//! The barcode statistics never talk to this module directly: they go
//! through [`PersistenceBackend`], so a fake backend returning fixed
//! barcodes can stand in for the real computation.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::barcode::{Bar, Barcode};
use super::bottleneck::bottleneck_distance;
use super::vietoris_rips::VietorisRips;
use crate::error::Result;

/// Persistence interval tagged with its homology dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceInterval {
    pub birth: f64,
    pub death: f64,
    pub dimension: usize,
}

/// Result of a persistence computation
#[derive(Debug, Clone, Default)]
pub struct PersistenceDiagram {
    pub intervals: Vec<PersistenceInterval>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, birth: f64, death: f64, dimension: usize) {
        self.intervals.push(PersistenceInterval {
            birth,
            death,
            dimension,
        });
    }

    /// Birth-death pairs of dimension d, in the order they were found
    pub fn intervals_in_dimension(&self, d: usize) -> Barcode {
        self.intervals
            .iter()
            .filter(|i| i.dimension == d)
            .map(|i| Bar::new(i.birth, i.death))
            .collect()
    }
}

/// Persistent-homology engine consumed by the barcode pipeline
pub trait PersistenceBackend {
    /// Persistence of the Rips complex of `distances` with simplices up to
    /// `max_dimension`; intervals of dimension below `max_dimension` are
    /// complete.
    fn persistence(&self, distances: &Array2<f64>, max_dimension: usize)
        -> Result<PersistenceDiagram>;

    /// Bottleneck distance between two barcodes of the same dimension
    fn bottleneck_distance(&self, a: &Barcode, b: &Barcode) -> f64;
}

/// Default backend: clique filtration + standard reduction
#[derive(Debug, Clone, Copy, Default)]
pub struct RipsPersistence;

impl PersistenceBackend for RipsPersistence {
    fn persistence(
        &self,
        distances: &Array2<f64>,
        max_dimension: usize,
    ) -> Result<PersistenceDiagram> {
        compute_persistence(distances, max_dimension)
    }

    fn bottleneck_distance(&self, a: &Barcode, b: &Barcode) -> f64 {
        bottleneck_distance(a, b)
    }
}

/// Sparse column representation for boundary matrix
#[derive(Debug, Clone)]
struct SparseColumn {
    /// Non-zero row indices
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn new() -> Self {
        Self { rows: BTreeSet::new() }
    }

    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the lowest (maximum) non-zero index
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    /// Flip a single entry - addition in Z/2Z
    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// Symmetric difference with another column
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Compute exact persistent homology of the Rips filtration of a distance
/// matrix
///
/// # Arguments
/// * `distance_matrix` - Pairwise distances between points
/// * `max_dimension` - Largest simplex dimension in the complex
///
/// # Returns
/// * `PersistenceDiagram` with birth/death pairs for dimensions
///   `0..=max_dimension`; zero-length pairs are dropped
pub fn compute_persistence(
    distance_matrix: &Array2<f64>,
    max_dimension: usize,
) -> Result<PersistenceDiagram> {
    let vr = VietorisRips::from_distance_matrix(distance_matrix, max_dimension)?;
    let simplices = vr.simplices();
    let m = simplices.len();

    debug!(
        n_points = vr.n_points(),
        max_dimension,
        n_simplices = m,
        "reducing boundary matrix"
    );

    let simplex_index: HashMap<&[usize], usize> = simplices
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.vertices.as_slice(), idx))
        .collect();

    let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
    let mut low_to_col: HashMap<usize, usize> = HashMap::new();

    for (col_idx, simplex) in simplices.iter().enumerate() {
        let mut boundary = SparseColumn::new();

        if simplex.dimension() > 0 {
            // Boundary of [v0, v1, ..., vk] = sum of [v0, ..., v̂i, ..., vk]
            for i in 0..simplex.vertices.len() {
                let mut face = simplex.vertices.clone();
                face.remove(i);
                if let Some(&face_idx) = simplex_index.get(face.as_slice()) {
                    boundary.toggle(face_idx);
                }
            }
        }

        while let Some(low_idx) = boundary.low() {
            match low_to_col.get(&low_idx) {
                Some(&pivot_col) => boundary.add_assign(&columns[pivot_col]),
                None => break,
            }
        }

        if let Some(low_idx) = boundary.low() {
            low_to_col.insert(low_idx, col_idx);
        }

        columns.push(boundary);
    }

    let mut diagram = PersistenceDiagram::new();
    let mut paired = vec![false; m];

    for (col_idx, column) in columns.iter().enumerate() {
        if let Some(low_idx) = column.low() {
            // This column kills the class created by the simplex at low_idx
            let birth_simplex = &simplices[low_idx];
            let death_simplex = &simplices[col_idx];

            paired[low_idx] = true;
            paired[col_idx] = true;

            if death_simplex.value > birth_simplex.value {
                diagram.add(
                    birth_simplex.value,
                    death_simplex.value,
                    birth_simplex.dimension(),
                );
            }
        }
    }

    // Essential classes: unpaired simplices with a zero reduced column
    for (idx, simplex) in simplices.iter().enumerate() {
        if !paired[idx] && columns[idx].is_zero() {
            diagram.add(simplex.value, f64::INFINITY, simplex.dimension());
        }
    }

    Ok(diagram)
}
