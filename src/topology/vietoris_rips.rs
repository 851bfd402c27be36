//! Vietoris-Rips Complex Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Sweeping ε over all pairwise distances gives the Rips filtration: every
//! clique of the distance graph enters at the largest distance among its
//! vertices. Pairs at infinite distance are never connected.

use ndarray::Array2;

use crate::error::{Result, TdaError};

/// Rips filtration builder over a precomputed distance matrix
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix (upper triangle is read)
    distances: Array2<f64>,
    /// Largest simplex dimension to generate
    max_dimension: usize,
}

/// A simplex together with the filtration value at which it appears
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSimplex {
    /// Vertex indices (sorted)
    pub vertices: Vec<usize>,
    /// Filtration value when the simplex appears
    pub value: f64,
}

impl FilteredSimplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// Reject non-square matrices and NaN entries
pub fn validate_distance_matrix(distances: &Array2<f64>) -> Result<()> {
    let (rows, cols) = distances.dim();
    if rows != cols {
        return Err(TdaError::InvalidMatrix(format!(
            "distance matrix must be square, got {}x{}",
            rows, cols
        )));
    }
    if distances.iter().any(|d| d.is_nan()) {
        return Err(TdaError::InvalidMatrix(
            "distance matrix contains NaN".to_string(),
        ));
    }
    Ok(())
}

impl VietorisRips {
    /// Create from precomputed distance matrix
    pub fn from_distance_matrix(distances: &Array2<f64>, max_dimension: usize) -> Result<Self> {
        validate_distance_matrix(distances)?;
        Ok(Self {
            distances: distances.clone(),
            max_dimension,
        })
    }

    fn distance(&self, i: usize, j: usize) -> f64 {
        if i < j {
            self.distances[[i, j]]
        } else {
            self.distances[[j, i]]
        }
    }

    /// Neighbours with a larger index and a finite connecting distance
    fn upper_neighbours(&self) -> Vec<Vec<usize>> {
        let n = self.n_points();
        (0..n)
            .map(|i| {
                (i + 1..n)
                    .filter(|&j| self.distances[[i, j]].is_finite())
                    .collect()
            })
            .collect()
    }

    /// All simplices up to `max_dimension`, sorted by
    /// (filtration value, dimension, vertices)
    pub fn simplices(&self) -> Vec<FilteredSimplex> {
        let n = self.n_points();
        let neighbours = self.upper_neighbours();
        let mut simplices = Vec::new();

        for v in 0..n {
            let mut clique = vec![v];
            self.expand(&mut clique, 0.0, &neighbours[v], &neighbours, &mut simplices);
        }

        simplices.sort_by(|a, b| {
            a.value
                .total_cmp(&b.value)
                .then(a.dimension().cmp(&b.dimension()))
                .then(a.vertices.cmp(&b.vertices))
        });
        simplices
    }

    fn expand(
        &self,
        clique: &mut Vec<usize>,
        value: f64,
        candidates: &[usize],
        neighbours: &[Vec<usize>],
        out: &mut Vec<FilteredSimplex>,
    ) {
        out.push(FilteredSimplex {
            vertices: clique.clone(),
            value,
        });
        if clique.len() > self.max_dimension {
            return;
        }

        for (idx, &w) in candidates.iter().enumerate() {
            // w must be adjacent to every vertex already in the clique; the
            // candidate list is already restricted to common neighbours
            let entry = clique
                .iter()
                .map(|&u| self.distance(u, w))
                .fold(value, f64::max);
            let next: Vec<usize> = candidates[idx + 1..]
                .iter()
                .copied()
                .filter(|x| neighbours[w].binary_search(x).is_ok())
                .collect();

            clique.push(w);
            self.expand(clique, entry, &next, neighbours, out);
            clique.pop();
        }
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_simplex_counts() {
        // 4 points, all pairwise connected: 4 vertices, 6 edges, 4 triangles
        let dm = array![
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 0.0, 4.0, 5.0],
            [2.0, 4.0, 0.0, 6.0],
            [3.0, 5.0, 6.0, 0.0]
        ];
        let vr = VietorisRips::from_distance_matrix(&dm, 2).unwrap();
        let simplices = vr.simplices();
        let count = |d: usize| simplices.iter().filter(|s| s.dimension() == d).count();
        assert_eq!(count(0), 4);
        assert_eq!(count(1), 6);
        assert_eq!(count(2), 4);
        assert_eq!(count(3), 0);

        // Triangle [0,1,2] enters with its longest edge
        let tri = simplices.iter().find(|s| s.vertices == vec![0, 1, 2]).unwrap();
        assert_eq!(tri.value, 4.0);

        // Filtration order is non-decreasing
        assert!(simplices.windows(2).all(|w| w[0].value <= w[1].value));
    }

    #[test]
    fn test_infinite_distance_not_connected() {
        let dm = array![
            [0.0, 1.0, f64::INFINITY],
            [1.0, 0.0, f64::INFINITY],
            [f64::INFINITY, f64::INFINITY, 0.0]
        ];
        let vr = VietorisRips::from_distance_matrix(&dm, 1).unwrap();
        let edges = vr.simplices().into_iter().filter(|s| s.dimension() == 1).count();
        assert_eq!(edges, 1);
    }

    #[test]
    fn test_rejects_non_square_and_nan() {
        let rect = Array2::<f64>::zeros((2, 3));
        assert!(VietorisRips::from_distance_matrix(&rect, 1).is_err());

        let nan = array![[0.0, f64::NAN], [f64::NAN, 0.0]];
        assert!(matches!(
            VietorisRips::from_distance_matrix(&nan, 1),
            Err(TdaError::InvalidMatrix(_))
        ));
    }
}
