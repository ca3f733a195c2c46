//! Sparse probability vectors and starting distributions.

use std::collections::BTreeMap;

use crate::graph::Graph;
use crate::{Error, Result};

/// Walker mass per vertex. Absent keys are zero.
///
/// A `BTreeMap` keeps iteration in vertex order, which fixes the floating-point
/// summation order of every spreading step.
pub type SparseVec = BTreeMap<usize, f64>;

/// Starting distribution of a walk.
#[derive(Debug, Clone, PartialEq)]
pub enum PZero {
    /// Each listed id starts with `1/len` of the mass; repeated ids accumulate.
    /// An empty list means "every vertex of the graph".
    Vertices(Vec<usize>),
    /// Explicit non-negative weights, renormalized to sum to one.
    /// An empty map means "every vertex of the graph".
    Weighted(SparseVec),
}

impl PZero {
    /// Uniform over every vertex.
    pub fn all() -> Self {
        PZero::Vertices(Vec::new())
    }

    pub fn vertices<I: IntoIterator<Item = usize>>(ids: I) -> Self {
        PZero::Vertices(ids.into_iter().collect())
    }

    pub fn weighted<I: IntoIterator<Item = (usize, f64)>>(entries: I) -> Self {
        PZero::Weighted(entries.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PZero::Vertices(ids) => ids.is_empty(),
            PZero::Weighted(map) => map.is_empty(),
        }
    }
}

impl From<Vec<usize>> for PZero {
    fn from(ids: Vec<usize>) -> Self {
        PZero::Vertices(ids)
    }
}

impl From<&[usize]> for PZero {
    fn from(ids: &[usize]) -> Self {
        PZero::Vertices(ids.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for PZero {
    fn from(ids: [usize; N]) -> Self {
        PZero::Vertices(ids.to_vec())
    }
}

impl From<SparseVec> for PZero {
    fn from(map: SparseVec) -> Self {
        PZero::Weighted(map)
    }
}

/// Divides every entry by the sum of absolute values.
pub fn normalise(vect: &SparseVec) -> Result<SparseVec> {
    let total: f64 = vect.values().map(|v| v.abs()).sum();
    if !(total > 0.0) {
        return Err(Error::InvalidParameter(
            "starting weights must have a positive sum".to_string(),
        ));
    }
    Ok(vect.iter().map(|(&k, &v)| (k, v / total)).collect())
}

/// Turns a [`PZero`] into a unit-sum sparse vector over `graph`'s vertices.
///
/// An empty graph with an empty `p0` yields an empty vector.
pub fn normalize_pzero<G: Graph + ?Sized>(graph: &G, p0: &PZero) -> Result<SparseVec> {
    let n = graph.node_count();
    match p0 {
        PZero::Vertices(ids) if ids.is_empty() => uniform(n),
        PZero::Weighted(map) if map.is_empty() => uniform(n),
        PZero::Vertices(ids) => {
            let share = 1.0 / ids.len() as f64;
            let mut vect = SparseVec::new();
            for &id in ids {
                if id >= n {
                    return Err(Error::IndexOutOfBounds(id));
                }
                *vect.entry(id).or_insert(0.0) += share;
            }
            Ok(vect)
        }
        PZero::Weighted(map) => {
            for (&id, &w) in map {
                if id >= n {
                    return Err(Error::IndexOutOfBounds(id));
                }
                if !w.is_finite() || w < 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "starting weight for vertex {id} must be finite and non-negative (got {w})"
                    )));
                }
            }
            normalise(map)
        }
    }
}

fn uniform(n: usize) -> Result<SparseVec> {
    let share = 1.0 / n as f64;
    Ok((0..n).map(|v| (v, share)).collect())
}

/// Dense view of `vect` over `n` vertices.
pub fn to_dense(vect: &SparseVec, n: usize) -> Vec<f64> {
    let mut dense = vec![0.0; n];
    for (&k, &v) in vect {
        if k < n {
            dense[k] = v;
        }
    }
    dense
}
