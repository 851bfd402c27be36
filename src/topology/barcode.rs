//! Barcodes: Birth-Death Pairs of a Single Homology Dimension
//!
//! A bar [b, d] records a topological feature that is "born" at
//! filtration value b and "dies" at d. Features that never die carry
//! d = ∞ (essential classes).

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Homology dimension label, displayed as `B{k}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dimension(pub usize);

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// A persistence interval [birth, death]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub birth: f64,
    pub death: f64,
}

impl Bar {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    /// Is this an essential feature (infinite persistence)?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }

    /// Alive at filtration value x (closed on both ends)
    pub fn contains(&self, x: f64) -> bool {
        self.birth <= x && self.death >= x
    }
}

/// Ordered sequence of bars for one homology dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub bars: Vec<Bar>,
}

impl Barcode {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            bars: pairs.iter().map(|&(b, d)| Bar::new(b, d)).collect(),
        }
    }

    /// Build from an [M, 2] matrix of (birth, death) rows
    pub fn from_array(arr: &Array2<f64>) -> Self {
        Self {
            bars: arr.rows().into_iter().map(|r| Bar::new(r[0], r[1])).collect(),
        }
    }

    /// [M, 2] matrix of (birth, death) rows
    pub fn to_array(&self) -> Array2<f64> {
        let mut arr = Array2::<f64>::zeros((self.bars.len(), 2));
        for (i, bar) in self.bars.iter().enumerate() {
            arr[[i, 0]] = bar.birth;
            arr[[i, 1]] = bar.death;
        }
        arr
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Apply `f` to every birth and death value
    pub fn try_map<E>(&self, mut f: impl FnMut(f64) -> Result<f64, E>) -> Result<Self, E> {
        let bars = self
            .bars
            .iter()
            .map(|bar| Ok(Bar::new(f(bar.birth)?, f(bar.death)?)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { bars })
    }

    /// Bars with both ends clipped to [lo, hi]
    pub fn clipped(&self, lo: f64, hi: f64) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .map(|bar| Bar::new(bar.birth.clamp(lo, hi), bar.death.clamp(lo, hi)))
                .collect(),
        }
    }
}

impl FromIterator<Bar> for Barcode {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self {
            bars: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Barcode {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dimension_label() {
        assert_eq!(Dimension(1).to_string(), "B1");
        assert_eq!(Dimension(12).to_string(), "B12");
    }

    #[test]
    fn test_array_conversion() {
        let arr = array![[0.0, 1.0], [0.5, f64::INFINITY]];
        let bc = Barcode::from_array(&arr);
        assert_eq!(bc.len(), 2);
        assert!(bc.bars[1].is_essential());
        assert_eq!(bc.to_array(), arr);
        assert_eq!(Barcode::empty().to_array().shape(), &[0, 2]);
    }

    #[test]
    fn test_clipped_caps_infinity() {
        let bc = Barcode::from_pairs(&[(-0.1, f64::INFINITY)]).clipped(0.0, 2.0);
        assert_eq!(bc.bars[0], Bar::new(0.0, 2.0));
    }
}
