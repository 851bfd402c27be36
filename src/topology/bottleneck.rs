//! Bottleneck Distance Between Barcodes
//!
//! d_B(A, B) = min over matchings γ of max over matched pairs ‖a − γ(a)‖∞,
//! where bars may also be matched to their projection on the diagonal
//! at cost (d − b)/2.
//!
//! Essential bars (infinite death) can only be matched with each other.
//! If the two barcodes hold a different number of them the distance is
//! infinite; otherwise they contribute the largest gap between sorted
//! births.
//!
//! The finite part is solved as a bottleneck assignment: binary search
//! over the candidate costs, testing for a perfect matching with
//! augmenting paths at each threshold.

use super::barcode::{Bar, Barcode};

/// Bottleneck distance between two barcodes
pub fn bottleneck_distance(a: &Barcode, b: &Barcode) -> f64 {
    let (finite_a, mut essential_a) = split_essential(a);
    let (finite_b, mut essential_b) = split_essential(b);

    if essential_a.len() != essential_b.len() {
        return f64::INFINITY;
    }

    essential_a.sort_by(f64::total_cmp);
    essential_b.sort_by(f64::total_cmp);
    let essential = essential_a
        .iter()
        .zip(&essential_b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);

    essential.max(finite_bottleneck(&finite_a, &finite_b))
}

fn split_essential(barcode: &Barcode) -> (Vec<Bar>, Vec<f64>) {
    let mut finite = Vec::new();
    let mut essential = Vec::new();
    for bar in barcode {
        if bar.is_essential() {
            essential.push(bar.birth);
        } else {
            finite.push(*bar);
        }
    }
    (finite, essential)
}

/// Assignment problem between `a ∪ Δ(b)` (left) and `b ∪ Δ(a)` (right)
struct DiagramMatching<'a> {
    a: &'a [Bar],
    b: &'a [Bar],
}

impl<'a> DiagramMatching<'a> {
    fn size(&self) -> usize {
        self.a.len() + self.b.len()
    }

    /// Matching cost, `None` where no edge exists
    fn cost(&self, left: usize, right: usize) -> Option<f64> {
        let (n, m) = (self.a.len(), self.b.len());
        match (left < n, right < m) {
            (true, true) => {
                let (x, y) = (self.a[left], self.b[right]);
                Some((x.birth - y.birth).abs().max((x.death - y.death).abs()))
            }
            (true, false) => (right - m == left).then(|| half_persistence(&self.a[left])),
            (false, true) => (left - n == right).then(|| half_persistence(&self.b[right])),
            (false, false) => Some(0.0),
        }
    }

    fn candidates(&self) -> Vec<f64> {
        let size = self.size();
        let mut values: Vec<f64> = (0..size)
            .flat_map(|l| (0..size).filter_map(move |r| self.cost(l, r)))
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values
    }

    fn has_perfect_matching(&self, eps: f64) -> bool {
        let size = self.size();
        let adjacency: Vec<Vec<usize>> = (0..size)
            .map(|l| {
                (0..size)
                    .filter(|&r| self.cost(l, r).is_some_and(|c| c <= eps))
                    .collect()
            })
            .collect();

        let mut match_right: Vec<Option<usize>> = vec![None; size];
        for left in 0..size {
            let mut visited = vec![false; size];
            if !augment(left, &adjacency, &mut match_right, &mut visited) {
                return false;
            }
        }
        true
    }
}

fn half_persistence(bar: &Bar) -> f64 {
    (bar.death - bar.birth).abs() / 2.0
}

/// Kuhn's augmenting-path step
fn augment(
    left: usize,
    adjacency: &[Vec<usize>],
    match_right: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &right in &adjacency[left] {
        if visited[right] {
            continue;
        }
        visited[right] = true;
        let free = match match_right[right] {
            None => true,
            Some(other) => augment(other, adjacency, match_right, visited),
        };
        if free {
            match_right[right] = Some(left);
            return true;
        }
    }
    false
}

fn finite_bottleneck(a: &[Bar], b: &[Bar]) -> f64 {
    let problem = DiagramMatching { a, b };
    if problem.size() == 0 {
        return 0.0;
    }

    let candidates = problem.candidates();
    // Matching everything to the diagonal always works at the largest cost
    let (mut lo, mut hi) = (0usize, candidates.len() - 1);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if problem.has_perfect_matching(candidates[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    candidates[lo]
}
