//! Systems Module: Synthetic Models for TDA Validation
//!
//! Generators of difference matrices with known community structure:
//!
//! - **WSBM**: weighted stochastic block models (assortative,
//!   disassortative, core-periphery and its flip)
//!
//! These serve as ground truth for the barcode features and the
//! label-grouped bottleneck distances.

mod wsbm;

pub use wsbm::{gen_wsbm, BlockModel, WsbmParams};
