//! Edge Density: Data-Driven Filtration Parameter
//!
//! For a distance matrix with N rows, the edge density of a threshold x is
//! the fraction of the N·(N−1) off-diagonal entries that are ≤ x:
//!
//!   ρ(x) = (#{dᵢⱼ ≤ x} − N) / (N·(N−1))
//!
//! The table is keyed on the exact values observed in the matrix. Looking
//! up anything else is an error rather than an interpolation; ∞ always maps
//! to density 1.

use ndarray::Array2;
use std::collections::HashMap;

use super::barcode::Barcode;
use super::vietoris_rips::validate_distance_matrix;
use crate::error::{Result, TdaError};

/// Exact-match lookup table from distance to edge density
#[derive(Debug, Clone)]
pub struct EdgeDensity {
    /// Sorted (distance, density) pairs
    table: Vec<(f64, f64)>,
    /// Bit pattern of each distance → density
    lookup: HashMap<u64, f64>,
}

/// `-0.0` and `0.0` must share a key
fn key(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

impl EdgeDensity {
    /// Build the table from every distinct value of `distances`
    pub fn from_distance_matrix(distances: &Array2<f64>) -> Result<Self> {
        validate_distance_matrix(distances)?;
        let n = distances.nrows();
        if n < 2 {
            return Err(TdaError::InvalidMatrix(format!(
                "edge density needs at least 2 points, got {}",
                n
            )));
        }

        let mut values: Vec<f64> = distances.iter().copied().collect();
        values.sort_by(f64::total_cmp);

        let n_offdiag = (n * (n - 1)) as f64;
        let mut table: Vec<(f64, f64)> = Vec::new();
        let mut idx = 0;
        while idx < values.len() {
            let x = values[idx];
            // Advance past every entry equal to x: idx becomes #{d ≤ x}
            while idx < values.len() && values[idx] == x {
                idx += 1;
            }
            let density = (idx as f64 - n as f64) / n_offdiag;
            table.push((x, density));
        }

        let lookup = table.iter().map(|&(x, rho)| (key(x), rho)).collect();
        Ok(Self { table, lookup })
    }

    /// Density of an observed distance value
    pub fn density(&self, d: f64) -> Result<f64> {
        if d.is_infinite() {
            return Ok(1.0);
        }
        self.lookup
            .get(&key(d))
            .copied()
            .ok_or(TdaError::ValueNotFound { value: d })
    }

    /// Convert every birth and death of a barcode; empty barcodes pass
    /// through without any lookup
    pub fn map_barcode(&self, barcode: &Barcode) -> Result<Barcode> {
        if barcode.is_empty() {
            return Ok(barcode.clone());
        }
        barcode.try_map(|d| self.density(d))
    }

    /// Sorted (distance, density) table
    pub fn values(&self) -> &[(f64, f64)] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small() -> Array2<f64> {
        array![
            [0.0, 1.0, 2.0],
            [1.0, 0.0, 3.0],
            [2.0, 3.0, 0.0]
        ]
    }

    #[test]
    fn test_known_densities() {
        let ed = EdgeDensity::from_distance_matrix(&small()).unwrap();
        // 6 off-diagonal entries, each distance appears twice
        assert_abs_diff_eq!(ed.density(0.0).unwrap(), 0.0);
        assert_abs_diff_eq!(ed.density(1.0).unwrap(), 2.0 / 6.0);
        assert_abs_diff_eq!(ed.density(2.0).unwrap(), 4.0 / 6.0);
        assert_abs_diff_eq!(ed.density(3.0).unwrap(), 1.0);
        assert_eq!(ed.len(), 4);
    }

    #[test]
    fn test_infinity_maps_to_one() {
        let ed = EdgeDensity::from_distance_matrix(&small()).unwrap();
        assert_eq!(ed.density(f64::INFINITY).unwrap(), 1.0);
    }

    #[test]
    fn test_unobserved_value_fails() {
        let ed = EdgeDensity::from_distance_matrix(&small()).unwrap();
        match ed.density(1.5) {
            Err(TdaError::ValueNotFound { value }) => assert_eq!(value, 1.5),
            other => panic!("expected ValueNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_zero_shares_key() {
        let ed = EdgeDensity::from_distance_matrix(&small()).unwrap();
        assert_eq!(ed.density(-0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_monotonic_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 12;
        let mut dm = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in i + 1..n {
                let d: f64 = rng.random_range(0.0..5.0);
                dm[[i, j]] = d;
                dm[[j, i]] = d;
            }
        }

        let ed = EdgeDensity::from_distance_matrix(&dm).unwrap();
        let table = ed.values();
        assert!(table.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
        assert!(table.iter().all(|&(_, rho)| (0.0..=1.0).contains(&rho)));
        assert_abs_diff_eq!(table.last().unwrap().1, 1.0);
    }

    #[test]
    fn test_map_barcode() {
        let ed = EdgeDensity::from_distance_matrix(&small()).unwrap();
        let bc = Barcode::from_pairs(&[(1.0, 3.0), (2.0, f64::INFINITY)]);
        let mapped = ed.map_barcode(&bc).unwrap();
        assert_abs_diff_eq!(mapped.bars[0].birth, 1.0 / 3.0);
        assert_abs_diff_eq!(mapped.bars[0].death, 1.0);
        assert_eq!(mapped.bars[1].death, 1.0);

        assert!(ed.map_barcode(&Barcode::empty()).unwrap().is_empty());
        assert!(ed.map_barcode(&Barcode::from_pairs(&[(0.5, 1.0)])).is_err());
    }

    #[test]
    fn test_too_small() {
        let one = array![[0.0]];
        assert!(EdgeDensity::from_distance_matrix(&one).is_err());
    }
}
