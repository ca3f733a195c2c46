//! Ranking utilities.
//!
//! Scores are ranked descending; equal scores are ranked by ascending vertex
//! id, so the output never depends on map iteration order. NaN scores are
//! skipped.

use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::vector::SparseVec;

/// The `vcount` best `(vertex, score)` pairs of a sparse score vector.
///
/// ```
/// use proxwalk::{sortcut, SparseVec};
/// let scores: SparseVec =
///     [(45, 0.2), (180, 0.08), (20, 0.12), (21, 0.102), (255, 0.85), (12, 0.0021)]
///         .into_iter()
///         .collect();
/// assert_eq!(sortcut(&scores, 3), vec![(255, 0.85), (45, 0.2), (20, 0.12)]);
/// ```
pub fn sortcut(scores: &SparseVec, vcount: usize) -> Vec<(usize, f64)> {
    top_k(scores.iter().map(|(&v, &s)| (v, s)), vcount)
}

/// [`sortcut`] over a dense vector indexed by vertex id.
pub fn sortcut_dense(scores: &[f64], vcount: usize) -> Vec<(usize, f64)> {
    top_k(scores.iter().copied().enumerate(), vcount)
}

fn top_k<I: Iterator<Item = (usize, f64)>>(scores: I, k: usize) -> Vec<(usize, f64)> {
    if k == 0 {
        return Vec::new();
    }
    // min-heap on (score, Reverse(id)): the root is the entry to evict first
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (i, score) in scores {
        let Ok(s) = NotNan::new(score) else { continue };
        let key = (s, Reverse(i));
        if heap.len() < k {
            heap.push(Reverse(key));
        } else if let Some(Reverse(min_key)) = heap.peek() {
            if key > *min_key {
                heap.pop();
                heap.push(Reverse(key));
            }
        }
    }
    let mut results: Vec<(NotNan<f64>, Reverse<usize>)> =
        heap.into_iter().map(|Reverse(key)| key).collect();
    results.sort_unstable_by(|a, b| b.cmp(a));
    results.into_iter().map(|(s, Reverse(i))| (i, s.into_inner())).collect()
}

/// Scales `scores` in place to sum to one (no-op on a zero sum).
pub fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in scores {
            *s /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_sortcut() {
        let scores = [0.02, 0.12, 0.82, 0.001, 0.18];
        assert_eq!(sortcut_dense(&scores, 3), vec![(2, 0.82), (4, 0.18), (1, 0.12)]);
    }

    #[test]
    fn ties_go_to_the_smaller_id() {
        let scores: SparseVec = [(9, 0.5), (3, 0.5), (5, 0.5), (1, 0.1)].into_iter().collect();
        assert_eq!(sortcut(&scores, 2), vec![(3, 0.5), (5, 0.5)]);
        assert_eq!(sortcut(&scores, 10), vec![(3, 0.5), (5, 0.5), (9, 0.5), (1, 0.1)]);
    }

    #[test]
    fn zero_scores_are_kept() {
        assert_eq!(sortcut_dense(&[0.0, 0.0], 5), vec![(0, 0.0), (1, 0.0)]);
    }

    #[test]
    fn vcount_zero_is_empty() {
        assert!(sortcut_dense(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn nan_is_skipped() {
        assert_eq!(sortcut_dense(&[f64::NAN, 0.3], 2), vec![(1, 0.3)]);
    }

    #[test]
    fn normalize_sums_to_one() {
        let mut v = [1.0, 3.0];
        normalize(&mut v);
        assert_eq!(v, [0.25, 0.75]);
    }
}
