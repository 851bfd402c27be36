//! Information Module: Entropy and Similarity Between Signals
//!
//! ## Persistent Entropy
//!
//! Given a barcode D = {(bᵢ, dᵢ)}, the persistent entropy is
//!
//!   H_P = -Σᵢ pᵢ log(pᵢ)
//!
//! where pᵢ = lᵢ / L, lᵢ = dᵢ - bᵢ is the lifetime of bar i and
//! L = Σⱼ lⱼ is the total lifetime.
//!
//! ## Signal Similarity
//!
//! Histogram-based mutual information and variation of information, and
//! Pearson correlation distance, between the columns of a
//! [times × rois] activity matrix. These are peripheral to the barcode
//! pipeline but produce the distance matrices it consumes.

mod entropy;
mod mutual;

pub use entropy::{persistence_entropy, shannon_entropy};
pub use mutual::{
    calc_info_measures,
    calc_pairwise_corr,
    calc_pairwise_info,
    histogram2d,
    HistRange,
};
