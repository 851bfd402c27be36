//! Distance Matrix → Barcodes → Features
//!
//! 1. Optionally build the edge-density table of the matrix
//! 2. Compute persistence of its Rips complex up to simplex dimension `max_k`
//! 3. Take the barcodes of dimensions `min_k..max_k`
//! 4. Optionally re-express births/deaths as edge densities
//! 5. Summarise each barcode on the grid `vec_rhos`

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::barcode_stats::{process_barcodes, BarFeatures};
use crate::config::FeatureConfig;
use crate::error::Result;
use crate::topology::{Barcode, Dimension, EdgeDensity, PersistenceBackend, RipsPersistence};

/// Features of one distance matrix, keyed by homology dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmatrixFeatures {
    pub features: BTreeMap<Dimension, BarFeatures>,
    /// Post-conversion barcodes, kept when `save_barcodes` is set
    pub barcodes: Option<BTreeMap<Dimension, Barcode>>,
}

/// [`process_dmatrix_with`] using the built-in Rips backend
pub fn process_dmatrix(
    dx: &Array2<f64>,
    max_k: usize,
    vec_rhos: &[f64],
    config: &FeatureConfig,
) -> Result<DmatrixFeatures> {
    process_dmatrix_with(&RipsPersistence, dx, max_k, vec_rhos, config)
}

/// Barcode features of a difference (or distance) matrix
///
/// # Arguments
/// * `backend` - persistent-homology engine
/// * `dx` - square, symmetric, zero-diagonal distance matrix
/// * `max_k` - maximum simplex dimension; barcodes are taken for
///   dimensions `config.min_k..max_k`
/// * `vec_rhos` - filtration grid, in edge-density units when
///   `config.process_edgedensity` is set and in distance units otherwise
pub fn process_dmatrix_with<B: PersistenceBackend + ?Sized>(
    backend: &B,
    dx: &Array2<f64>,
    max_k: usize,
    vec_rhos: &[f64],
    config: &FeatureConfig,
) -> Result<DmatrixFeatures> {
    let density = if config.process_edgedensity {
        Some(EdgeDensity::from_distance_matrix(dx)?)
    } else {
        None
    };

    let diagram = backend.persistence(dx, max_k)?;

    let mut barcodes = BTreeMap::new();
    for k in config.min_k..max_k {
        let bars = diagram.intervals_in_dimension(k);
        let bars = match &density {
            Some(table) => table.map_barcode(&bars)?,
            None => bars,
        };
        debug!(dimension = %Dimension(k), n_bars = bars.len(), "extracted barcode");
        barcodes.insert(Dimension(k), bars);
    }

    let features = barcodes
        .iter()
        .map(|(&dim, bars)| Ok((dim, process_barcodes(bars, vec_rhos, &config.pq_pairs)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(DmatrixFeatures {
        features,
        barcodes: config.save_barcodes.then_some(barcodes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TdaError;
    use crate::topology::PersistenceDiagram;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Returns a fixed diagram regardless of input
    struct StubBackend {
        diagram: PersistenceDiagram,
    }

    impl PersistenceBackend for StubBackend {
        fn persistence(&self, _: &Array2<f64>, _: usize) -> Result<PersistenceDiagram> {
            Ok(self.diagram.clone())
        }

        fn bottleneck_distance(&self, _: &Barcode, _: &Barcode) -> f64 {
            0.0
        }
    }

    fn square() -> Array2<f64> {
        let s2 = 2.0_f64.sqrt();
        array![
            [0.0, 1.0, s2,  1.0],
            [1.0, 0.0, 1.0, s2 ],
            [s2,  1.0, 0.0, 1.0],
            [1.0, s2,  1.0, 0.0]
        ]
    }

    fn small() -> Array2<f64> {
        array![
            [0.0, 1.0, 2.0],
            [1.0, 0.0, 3.0],
            [2.0, 3.0, 0.0]
        ]
    }

    #[test]
    fn test_square_in_distance_units() {
        let grid = [0.0, 1.0, 1.2, 1.5];
        let out = process_dmatrix(&square(), 2, &grid, &FeatureConfig::raw_distances()).unwrap();

        assert_eq!(out.features.len(), 1);
        let b1 = &out.features[&Dimension(1)];
        assert_eq!(b1.betti_num, array![0, 1, 1, 0]);
        assert_abs_diff_eq!(b1.sum_pers, 2.0_f64.sqrt() - 1.0, epsilon = 1e-12);
        assert!(out.barcodes.is_none());
    }

    #[test]
    fn test_square_in_density_units() {
        // 8 of 12 off-diagonal entries are 1, the other 4 are sqrt(2)
        let grid = [0.0, 0.5, 1.0];
        let cfg = FeatureConfig::default().with_barcodes();
        let out = process_dmatrix(&square(), 2, &grid, &cfg).unwrap();

        let barcodes = out.barcodes.unwrap();
        let b1 = &barcodes[&Dimension(1)];
        assert_eq!(b1.len(), 1);
        assert_abs_diff_eq!(b1.bars[0].birth, 8.0 / 12.0);
        assert_abs_diff_eq!(b1.bars[0].death, 1.0);

        let f = &out.features[&Dimension(1)];
        assert_eq!(f.betti_num, array![0, 0, 1]);
        assert_abs_diff_eq!(f.max_pers, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_range() {
        let cfg = FeatureConfig {
            min_k: 0,
            ..FeatureConfig::raw_distances()
        };
        let out = process_dmatrix(&square(), 3, &[0.0, 1.0], &cfg).unwrap();
        let dims: Vec<_> = out.features.keys().copied().collect();
        assert_eq!(dims, vec![Dimension(0), Dimension(1), Dimension(2)]);

        let out = process_dmatrix(&square(), 1, &[0.0, 1.0], &FeatureConfig::default()).unwrap();
        assert!(out.features.is_empty());
    }

    #[test]
    fn test_stub_backend_empty_barcode() {
        // No H1 intervals at all: density conversion must not be attempted
        let mut diagram = PersistenceDiagram::new();
        diagram.add(0.0, 1.0, 0);
        let backend = StubBackend { diagram };

        let out = process_dmatrix_with(
            &backend,
            &small(),
            2,
            &[0.0, 0.5, 1.0],
            &FeatureConfig::default().with_barcodes(),
        )
        .unwrap();

        assert!(out.barcodes.unwrap()[&Dimension(1)].is_empty());
        let f = &out.features[&Dimension(1)];
        assert_eq!(f.sum_pers, 0.0);
        assert_eq!(f.int_betti, 0.0);
    }

    #[test]
    fn test_stub_backend_known_barcode() {
        let mut diagram = PersistenceDiagram::new();
        diagram.add(1.0, 3.0, 1);
        diagram.add(2.0, f64::INFINITY, 1);
        let backend = StubBackend { diagram };

        let grid = [0.0, 0.5, 1.0];
        let out = process_dmatrix_with(&backend, &small(), 2, &grid, &FeatureConfig::default())
            .unwrap();
        let f = &out.features[&Dimension(1)];
        // densities: 1 -> 1/3, 2 -> 2/3, 3 -> 1, inf -> 1
        assert_eq!(f.betti_num, array![0, 1, 2]);
        assert_abs_diff_eq!(f.sum_pers, 2.0 / 3.0 + 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unobserved_value_surfaces() {
        let mut diagram = PersistenceDiagram::new();
        diagram.add(1.5, 3.0, 1);
        let backend = StubBackend { diagram };

        let err = process_dmatrix_with(&backend, &small(), 2, &[0.0, 1.0], &FeatureConfig::default());
        assert!(matches!(err, Err(TdaError::ValueNotFound { .. })));
    }
}
