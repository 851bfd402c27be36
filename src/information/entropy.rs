//! Shannon Entropy of Discrete Distributions
//!
//! H = -Σᵢ pᵢ ln(pᵢ),  pᵢ = wᵢ / Σⱼ wⱼ
//!
//! Weights are normalised before use, so histogram counts and persistence
//! lifetimes can be passed directly. Zero weights contribute nothing.

/// Shannon entropy (natural log) of unnormalised non-negative weights
///
/// NaN weights, or a zero total with non-empty input, propagate as NaN
/// instead of being reported as zero entropy.
pub fn shannon_entropy(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if !weights.is_empty() && !(total > 0.0) {
        return f64::NAN;
    }

    let mut entropy = 0.0;
    for &w in weights {
        if w == 0.0 {
            continue;
        }
        let p = w / total;
        entropy -= p * p.ln();
    }
    entropy
}

/// Persistent entropy of a set of lifetimes
///
/// H_P = -Σᵢ (lᵢ/L) ln(lᵢ/L),  L = Σⱼ lⱼ
pub fn persistence_entropy(lifetimes: &[f64]) -> f64 {
    let total: f64 = lifetimes.iter().sum();
    let normalized: Vec<f64> = lifetimes.iter().map(|l| l / total).collect();
    shannon_entropy(&normalized)
}
