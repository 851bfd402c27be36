//! Pairwise Bottleneck Distances Across Trials
//!
//! Every unordered pair of trials is compared at one homology dimension,
//! giving a symmetric trials × trials matrix whose diagonal holds a
//! sentinel (NaN by default). With label groups, the matrix is averaged
//! block-wise into a groups × groups matrix, skipping NaN entries.
//!
//! The O(n²) loop dominates the cost of a whole analysis; an optional
//! callback is told after each finished row.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::PairwiseConfig;
use crate::error::{Result, TdaError};
use crate::topology::{Barcode, Dimension, PersistenceBackend};

/// Barcodes of one trial, keyed by homology dimension
pub type TrialBarcodes = BTreeMap<Dimension, Barcode>;

/// Insertion-ordered map from label name to trial indices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelGroups {
    groups: Vec<(String, Vec<usize>)>,
}

impl LabelGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, or replace the indices of an existing one
    pub fn insert(&mut self, label: impl Into<String>, indices: Vec<usize>) {
        let label = label.into();
        match self.groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, existing)) => *existing = indices,
            None => self.groups.push((label, indices)),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(name, idx)| (name.as_str(), idx.as_slice()))
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<usize>)> for LabelGroups {
    fn from_iter<I: IntoIterator<Item = (S, Vec<usize>)>>(iter: I) -> Self {
        let mut groups = LabelGroups::new();
        for (label, indices) in iter {
            groups.insert(label, indices);
        }
        groups
    }
}

/// Progress of the pairwise loop, reported once per finished row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseProgress {
    pub dimension: Dimension,
    pub completed: usize,
    pub total: usize,
}

/// Outcome of [`get_pairwise_bottleneck`]
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseBottleneck {
    /// Trial × trial distances; absent when only the label matrix was asked for
    pub trial_mat: Option<Array2<f64>>,
    /// Label × label mean distances; present when groups were given
    pub label_mat: Option<Array2<f64>>,
    /// Row/column names of `label_mat`
    pub labels: Vec<String>,
}

/// Symmetric matrix of bottleneck distances between trial barcodes
pub fn pairwise_bottleneck<B: PersistenceBackend + ?Sized>(
    backend: &B,
    barcode_list: &[TrialBarcodes],
    barcode_key: Dimension,
    diag_val: f64,
    mut progress: Option<&mut dyn FnMut(PairwiseProgress)>,
) -> Result<Array2<f64>> {
    let n = barcode_list.len();
    let bars: Vec<&Barcode> = barcode_list
        .iter()
        .enumerate()
        .map(|(trial, b)| {
            b.get(&barcode_key).ok_or(TdaError::MissingDimension {
                dimension: barcode_key.to_string(),
                trial,
            })
        })
        .collect::<Result<_>>()?;

    let mut pw_bn = Array2::from_elem((n, n), diag_val);
    let total = n.saturating_sub(1);

    for i in 0..total {
        for j in i + 1..n {
            let d = backend.bottleneck_distance(bars[i], bars[j]);
            pw_bn[[i, j]] = d;
            pw_bn[[j, i]] = d;
        }

        debug!(dimension = %barcode_key, row = i + 1, total, "bottleneck row done");
        if let Some(cb) = progress.as_deref_mut() {
            cb(PairwiseProgress {
                dimension: barcode_key,
                completed: i + 1,
                total,
            });
        }
    }

    Ok(pw_bn)
}

/// Mean of the finite-or-infinite entries, ignoring NaN; NaN if none remain
fn nanmean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Average a trial matrix over label groups
///
/// Entry (g1, g2) is the NaN-aware mean of `trial_mat[g1 rows, g2 cols]`.
pub fn group_by_labels(trial_mat: &Array2<f64>, label_groups: &LabelGroups) -> Result<Array2<f64>> {
    let n = trial_mat.nrows();
    for (_, indices) in label_groups.iter() {
        if let Some(&index) = indices.iter().find(|&&i| i >= n) {
            return Err(TdaError::IndexOutOfRange { index, len: n });
        }
    }

    let groups: Vec<&[usize]> = label_groups.iter().map(|(_, idx)| idx).collect();
    let g = groups.len();
    let mut pw_labels = Array2::<f64>::zeros((g, g));

    for i in 0..g {
        for j in i..g {
            let block = groups[i]
                .iter()
                .flat_map(|&r| groups[j].iter().map(move |&c| trial_mat[[r, c]]));
            let mean = nanmean(block);
            pw_labels[[i, j]] = mean;
            pw_labels[[j, i]] = mean;
        }
    }

    Ok(pw_labels)
}

/// Pairwise bottleneck distances of a list of trial barcodes
///
/// # Arguments
/// * `backend` - engine providing the bottleneck distance
/// * `barcode_list` - per-trial barcodes keyed by dimension
/// * `barcode_key` - homology dimension to compare
/// * `label_groups` - optional label → trial indices; enables the label matrix
/// * `config` - diagonal sentinel and whether to keep the trial matrix
/// * `progress` - optional per-row callback
pub fn get_pairwise_bottleneck<B: PersistenceBackend + ?Sized>(
    backend: &B,
    barcode_list: &[TrialBarcodes],
    barcode_key: Dimension,
    label_groups: Option<&LabelGroups>,
    config: &PairwiseConfig,
    progress: Option<&mut dyn FnMut(PairwiseProgress)>,
) -> Result<PairwiseBottleneck> {
    let trial_mat = pairwise_bottleneck(backend, barcode_list, barcode_key, config.diag_val, progress)?;

    let Some(groups) = label_groups else {
        return Ok(PairwiseBottleneck {
            trial_mat: Some(trial_mat),
            label_mat: None,
            labels: Vec::new(),
        });
    };

    let label_mat = group_by_labels(&trial_mat, groups)?;
    Ok(PairwiseBottleneck {
        trial_mat: config.return_trial_and_label_dist.then_some(trial_mat),
        label_mat: Some(label_mat),
        labels: groups.labels(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{PersistenceDiagram, RipsPersistence};
    use approx::assert_abs_diff_eq;

    /// Distance = |#bars(a) − #bars(b)|
    struct CountBackend;

    impl PersistenceBackend for CountBackend {
        fn persistence(&self, _: &Array2<f64>, _: usize) -> Result<PersistenceDiagram> {
            Ok(PersistenceDiagram::new())
        }

        fn bottleneck_distance(&self, a: &Barcode, b: &Barcode) -> f64 {
            (a.len() as f64 - b.len() as f64).abs()
        }
    }

    fn trial(pairs: &[(f64, f64)]) -> TrialBarcodes {
        BTreeMap::from([(Dimension(1), Barcode::from_pairs(pairs))])
    }

    fn trials_with_counts(counts: &[usize]) -> Vec<TrialBarcodes> {
        counts
            .iter()
            .map(|&c| trial(&vec![(0.0, 1.0); c]))
            .collect()
    }

    #[test]
    fn test_symmetric_with_sentinel_diagonal() {
        let trials = trials_with_counts(&[0, 1, 3, 6]);
        let mat = pairwise_bottleneck(&CountBackend, &trials, Dimension(1), f64::NAN, None).unwrap();

        assert_eq!(mat.shape(), &[4, 4]);
        for i in 0..4 {
            assert!(mat[[i, i]].is_nan());
            for j in 0..4 {
                if i != j {
                    assert_eq!(mat[[i, j]], mat[[j, i]]);
                }
            }
        }
        assert_eq!(mat[[0, 3]], 6.0);
        assert_eq!(mat[[1, 2]], 2.0);
    }

    #[test]
    fn test_identical_trials_have_zero_distance() {
        let bars = [(0.1, 0.6), (0.2, 0.9), (0.3, f64::INFINITY)];
        let trials = vec![trial(&bars), trial(&[(0.0, 0.5)]), trial(&bars)];
        let mat = pairwise_bottleneck(&RipsPersistence, &trials, Dimension(1), -1.0, None).unwrap();

        assert_eq!(mat[[0, 2]], 0.0);
        assert_eq!(mat[[2, 0]], 0.0);
        assert_eq!(mat[[1, 1]], -1.0);
    }

    #[test]
    fn test_label_groups_nanmean() {
        let trials = trials_with_counts(&[0, 2, 5, 9]);
        let groups: LabelGroups = [("a", vec![0, 1]), ("b", vec![2, 3])].into_iter().collect();

        let out = get_pairwise_bottleneck(
            &CountBackend,
            &trials,
            Dimension(1),
            Some(&groups),
            &PairwiseConfig::default(),
            None,
        )
        .unwrap();

        assert!(out.trial_mat.is_none());
        assert_eq!(out.labels, vec!["a".to_string(), "b".to_string()]);
        let label_mat = out.label_mat.unwrap();

        // within a: only the off-diagonal pair (0,1) and (1,0) = 2
        assert_abs_diff_eq!(label_mat[[0, 0]], 2.0);
        // within b: |5 - 9| = 4
        assert_abs_diff_eq!(label_mat[[1, 1]], 4.0);
        // across: |0-5|, |0-9|, |2-5|, |2-9| = 5, 9, 3, 7
        assert_abs_diff_eq!(label_mat[[0, 1]], 6.0);
        assert_eq!(label_mat[[0, 1]], label_mat[[1, 0]]);
    }

    #[test]
    fn test_return_both_matrices() {
        let trials = trials_with_counts(&[1, 2, 4]);
        let groups: LabelGroups = [("x", vec![0]), ("y", vec![1, 2])].into_iter().collect();
        let config = PairwiseConfig {
            return_trial_and_label_dist: true,
            ..PairwiseConfig::default()
        };

        let out = get_pairwise_bottleneck(&CountBackend, &trials, Dimension(1), Some(&groups), &config, None)
            .unwrap();
        assert_eq!(out.trial_mat.unwrap().shape(), &[3, 3]);
        let label_mat = out.label_mat.unwrap();
        // single-trial group: only the NaN diagonal
        assert!(label_mat[[0, 0]].is_nan());
        assert_abs_diff_eq!(label_mat[[0, 1]], 2.0);
    }

    #[test]
    fn test_without_groups_returns_trial_matrix() {
        let trials = trials_with_counts(&[1, 2]);
        let out = get_pairwise_bottleneck(
            &CountBackend,
            &trials,
            Dimension(1),
            None,
            &PairwiseConfig::default(),
            None,
        )
        .unwrap();
        assert!(out.label_mat.is_none());
        assert!(out.labels.is_empty());
        assert_eq!(out.trial_mat.unwrap()[[0, 1]], 1.0);
    }

    #[test]
    fn test_progress_callback() {
        let trials = trials_with_counts(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        let mut record = |p: PairwiseProgress| seen.push((p.completed, p.total));
        pairwise_bottleneck(&CountBackend, &trials, Dimension(1), f64::NAN, Some(&mut record)).unwrap();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_missing_dimension() {
        let trials = vec![trial(&[(0.0, 1.0)]), BTreeMap::new()];
        let err = pairwise_bottleneck(&CountBackend, &trials, Dimension(1), f64::NAN, None);
        assert!(matches!(err, Err(TdaError::MissingDimension { trial: 1, .. })));
    }

    #[test]
    fn test_group_index_out_of_range() {
        let mat = Array2::<f64>::zeros((2, 2));
        let groups: LabelGroups = [("a", vec![0, 5])].into_iter().collect();
        assert!(matches!(
            group_by_labels(&mat, &groups),
            Err(TdaError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }
}
