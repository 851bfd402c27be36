//! Betti Curves: Topological Invariants Across the Filtration
//!
//! The k-th Betti number βₖ(x) counts the k-dimensional features alive at
//! filtration value x. Sampled on a grid of filtration values it gives a
//! non-negative integer step function, the Betti curve.

use ndarray::Array1;

use super::barcode::Barcode;

/// Betti numbers of one barcode sampled on a filtration grid
#[derive(Debug, Clone, PartialEq)]
pub struct BettiCurve {
    /// Filtration values
    pub grid: Array1<f64>,
    /// Bars alive at each grid value
    pub values: Array1<usize>,
}

impl BettiCurve {
    /// Count bars with birth ≤ x ≤ death at every grid value
    ///
    /// Infinite deaths are compared as-is, so essential bars stay alive
    /// from their birth onwards.
    pub fn compute(barcode: &Barcode, grid: &[f64]) -> Self {
        let values = grid
            .iter()
            .map(|&x| barcode.iter().filter(|bar| bar.contains(x)).count())
            .collect();

        Self {
            grid: Array1::from_vec(grid.to_vec()),
            values,
        }
    }

    /// Area under the curve by the trapezoidal rule
    pub fn integrated(&self) -> f64 {
        trapezoid(self.values.iter().map(|&v| v as f64), self.grid.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trapezoidal integral of samples `y` over abscissae `x`
pub fn trapezoid(y: impl IntoIterator<Item = f64>, x: impl IntoIterator<Item = f64>) -> f64 {
    let points: Vec<(f64, f64)> = x.into_iter().zip(y).collect();
    if points.len() < 2 {
        return 0.0;
    }

    let mut integral = 0.0;
    for i in 1..points.len() {
        let dx = points[i].0 - points[i - 1].0;
        let avg = (points[i].1 + points[i - 1].1) / 2.0;
        integral += dx * avg;
    }
    integral
}
