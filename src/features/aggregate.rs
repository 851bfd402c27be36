//! Stacking per-trial feature bundles into trial × feature matrices.

use ndarray::{Array2, ArrayView1, Axis};
use std::collections::BTreeMap;

use super::barcode_stats::{BarFeatures, FeatureKey};
use crate::error::{Result, TdaError};
use crate::topology::Dimension;

/// Stacked features: dimension → feature key → [trials × length]
pub type StackedFeatures = BTreeMap<Dimension, BTreeMap<FeatureKey, Array2<f64>>>;

/// Concatenate a list of per-trial bar features
///
/// For every dimension in `parent_keys` and feature in `feat_keys`, the
/// trial values become the rows of one matrix; scalar features give a
/// single column. Trials without the dimension or the feature are skipped.
pub fn concat_barfeats(
    barfeats_list: &[BTreeMap<Dimension, BarFeatures>],
    parent_keys: &[Dimension],
    feat_keys: &[FeatureKey],
) -> Result<StackedFeatures> {
    let mut cat_feats = BTreeMap::new();

    for &dim in parent_keys {
        let mut by_key = BTreeMap::new();
        for &key in feat_keys {
            let rows: Vec<_> = barfeats_list
                .iter()
                .filter_map(|trial| trial.get(&dim))
                .filter_map(|features| features.get(key))
                .collect();
            by_key.insert(key, stack_rows(&rows, &format!("{}/{}", dim, key))?);
        }
        cat_feats.insert(dim, by_key);
    }

    Ok(cat_feats)
}

fn stack_rows(rows: &[ndarray::Array1<f64>], name: &str) -> Result<Array2<f64>> {
    let first = rows.first().ok_or_else(|| TdaError::EmptyStack {
        key: name.to_string(),
    })?;

    if let Some(bad) = rows.iter().find(|r| r.len() != first.len()) {
        return Err(TdaError::ShapeMismatch {
            key: name.to_string(),
            expected: first.len(),
            found: bad.len(),
        });
    }

    let views: Vec<ArrayView1<f64>> = rows.iter().map(|r| r.view()).collect();
    ndarray::stack(Axis(0), &views)
        .map_err(|e| TdaError::InvalidArgument(format!("cannot stack `{}`: {}", name, e)))
}
