//! Histogram Mutual Information and Correlation Between Time Series
//!
//! For two signals X, Y binned on a common grid:
//!
//!   I(X;Y) = H(X) + H(Y) − H(X,Y)      (mutual information)
//!   V(X;Y) = H(X,Y) − I(X;Y)           (variation of information)
//!
//! Entropies use the natural logarithm. The correlation distance
//! sqrt(2(1 − r)) turns Pearson correlation into a metric suitable as
//! input to the barcode pipeline.

use ndarray::{Array2, ArrayView1, Axis};

use super::entropy::shannon_entropy;
use crate::error::{Result, TdaError};

/// Histogram range per axis: [(x_min, x_max), (y_min, y_max)]
pub type HistRange = [(f64, f64); 2];

fn bin_index(v: f64, (lo, hi): (f64, f64), n_bins: usize) -> Option<usize> {
    if !(v >= lo && v <= hi) {
        return None;
    }
    if v == hi {
        // The last bin is closed on the right
        return Some(n_bins - 1);
    }
    let idx = ((v - lo) / (hi - lo) * n_bins as f64).floor() as usize;
    Some(idx.min(n_bins - 1))
}

/// Joint histogram with `n_bins` uniform bins per axis; samples outside the
/// range are dropped. Rows index X bins, columns Y bins.
pub fn histogram2d(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    n_bins: usize,
    range: HistRange,
) -> Result<Array2<f64>> {
    if x.len() != y.len() {
        return Err(TdaError::InvalidArgument(format!(
            "signals differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if n_bins == 0 {
        return Err(TdaError::InvalidArgument("histogram needs at least one bin".to_string()));
    }
    for (lo, hi) in range {
        if !(hi > lo) {
            return Err(TdaError::InvalidArgument(format!(
                "histogram range ({}, {}) is empty",
                lo, hi
            )));
        }
    }

    let mut counts = Array2::<f64>::zeros((n_bins, n_bins));
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        if let (Some(i), Some(j)) = (
            bin_index(xv, range[0], n_bins),
            bin_index(yv, range[1], n_bins),
        ) {
            counts[[i, j]] += 1.0;
        }
    }
    Ok(counts)
}

/// Mutual information and variation of information of two signals
pub fn calc_info_measures(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    hist_nbin: usize,
    hist_range: HistRange,
) -> Result<(f64, f64)> {
    let c_xy = histogram2d(x, y, hist_nbin, hist_range)?;

    let marginal_a = c_xy.sum_axis(Axis(0));
    let marginal_b = c_xy.sum_axis(Axis(1));
    let joint: Vec<f64> = c_xy.iter().copied().collect();

    let h_x = shannon_entropy(&marginal_a.to_vec());
    let h_y = shannon_entropy(&marginal_b.to_vec());
    let h_xy = shannon_entropy(&joint);

    let i_xy = h_x + h_y - h_xy;
    let v_xy = h_xy - i_xy;
    Ok((i_xy, v_xy))
}

/// Mutual information and variation of information between every pair of
/// columns of `x` ([times × rois]); V has a zero diagonal
pub fn calc_pairwise_info(
    x: &Array2<f64>,
    hist_nbin: usize,
    hist_range: HistRange,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let n_rois = x.ncols();
    let mut info = Array2::<f64>::zeros((n_rois, n_rois));
    let mut vinfo = Array2::<f64>::zeros((n_rois, n_rois));

    for i in 0..n_rois {
        for j in i..n_rois {
            let (iv, vv) = calc_info_measures(x.column(i), x.column(j), hist_nbin, hist_range)?;
            info[[i, j]] = iv;
            info[[j, i]] = iv;
            vinfo[[i, j]] = vv;
            vinfo[[j, i]] = vv;
        }
        vinfo[[i, i]] = 0.0;
    }

    Ok((info, vinfo))
}

/// Pearson correlation between the columns of `x` ([times × rois]) and the
/// correlation distance sqrt(2(1 − r))
pub fn calc_pairwise_corr(x: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let n_rois = x.ncols();
    let centered = x - &x.mean_axis(Axis(0)).unwrap_or_else(|| ndarray::Array1::zeros(n_rois));
    let cov = centered.t().dot(&centered);

    let mut corr = Array2::<f64>::zeros((n_rois, n_rois));
    for i in 0..n_rois {
        for j in 0..n_rois {
            let r = cov[[i, j]] / (cov[[i, i]] * cov[[j, j]]).sqrt();
            corr[[i, j]] = r.clamp(-1.0, 1.0);
        }
    }

    let dist = corr.mapv(|r| (2.0 * (1.0 - r)).sqrt());
    (corr, dist)
}
