//! Small list and array helpers used around the pipeline.

use ndarray::{Array1, ArrayView1};

use crate::error::{Result, TdaError};

/// Elements of `list` at the given indices, in index order
pub fn get_list_at<T: Clone>(list: &[T], indices: &[usize]) -> Result<Vec<T>> {
    indices
        .iter()
        .map(|&i| {
            list.get(i).cloned().ok_or(TdaError::IndexOutOfRange {
                index: i,
                len: list.len(),
            })
        })
        .collect()
}

/// Concatenate a list of lists
pub fn flatten_list<T, I>(nested: I) -> Vec<T>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = T>,
{
    nested.into_iter().flatten().collect()
}

/// Min-max normalization rescaled into [vmin, vmax]
///
/// A constant input has zero range and yields NaN.
pub fn minmax_norm(v: ArrayView1<f64>, vmin: f64, vmax: f64) -> Array1<f64> {
    let lo = v.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    v.mapv(|x| vmin + (vmax - vmin) * (x - lo) / (hi - lo))
}

/// Centred moving average over a window of `2 * span + 1` samples
///
/// Samples past either end count as zero, so the edges are damped. The
/// output has the same length as the input.
pub fn smooth(arr: ArrayView1<f64>, span: usize) -> Array1<f64> {
    let n = arr.len();
    let width = (2 * span + 1) as f64;
    Array1::from_shape_fn(n, |i| {
        let lo = i.saturating_sub(span);
        let hi = (i + span + 1).min(n);
        arr.slice(ndarray::s![lo..hi]).sum() / width
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_get_list_at() {
        let list = vec!["a", "b", "c", "d"];
        assert_eq!(get_list_at(&list, &[3, 0, 3]).unwrap(), vec!["d", "a", "d"]);
        assert!(matches!(
            get_list_at(&list, &[4]),
            Err(TdaError::IndexOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_flatten_list() {
        let nested = vec![vec![1, 2], vec![], vec![3]];
        assert_eq!(flatten_list(nested), vec![1, 2, 3]);

        let rows = array![[1.0, 2.0], [3.0, 4.0]];
        let flat: Vec<f64> = flatten_list(rows.rows().into_iter().map(|r| r.to_vec()));
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_minmax_norm() {
        let v = array![2.0, 4.0, 6.0];
        let unit = minmax_norm(v.view(), 0.0, 1.0);
        assert_abs_diff_eq!(unit, array![0.0, 0.5, 1.0], epsilon = 1e-12);

        let scaled = minmax_norm(v.view(), -1.0, 1.0);
        assert_abs_diff_eq!(scaled, array![-1.0, 0.0, 1.0], epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_same_length_zero_padded() {
        let v = array![3.0, 3.0, 3.0, 3.0, 3.0];
        let s = smooth(v.view(), 1);
        assert_eq!(s.len(), 5);
        assert_abs_diff_eq!(s, array![2.0, 3.0, 3.0, 3.0, 2.0], epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_zero_span_is_identity() {
        let v = array![1.0, -2.0, 5.0];
        assert_abs_diff_eq!(smooth(v.view(), 0), v, epsilon = 1e-12);
    }
}
