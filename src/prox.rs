//! Exact Prox: iterated spreading from a starting distribution.
//!
//! This is power iteration of the row-stochastic walk operator, done on the
//! sparse vector directly. No global renormalization happens between steps, so
//! mass lost on dead vertices stays lost.

use crate::graph::{Graph, Mode};
use crate::spreading::{spreading, spreading_wgt};
use crate::vector::{normalize_pzero, to_dense, PZero, SparseVec};
use crate::weight::{LoopWeight, WeightSpec};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxConfig {
    /// Number of spreading steps. `0` returns the normalized `p0`.
    pub length: usize,
    pub mode: Mode,
    /// Walk as if every vertex held a self-loop.
    pub add_loops: bool,
}

impl Default for ProxConfig {
    fn default() -> Self {
        Self { length: 3, mode: Mode::Out, add_loops: false }
    }
}

impl ProxConfig {
    pub fn with_length(length: usize) -> Self {
        Self { length, ..Self::default() }
    }
}

/// Landing distribution of `config.length`-step walks started from `p0`.
///
/// ```
/// use proxwalk::{formula, prox_markov_dict, PZero, ProxConfig};
/// let g = formula("a--b--c--d", true).unwrap();
/// let p = prox_markov_dict(&g, &PZero::from([0]), ProxConfig::with_length(2)).unwrap();
/// assert_eq!(p.into_iter().collect::<Vec<_>>(), vec![(0, 0.5), (2, 0.5)]);
/// ```
pub fn prox_markov_dict<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ProxConfig,
) -> Result<SparseVec> {
    let mut vect = normalize_pzero(graph, p0)?;
    for _ in 0..config.length {
        vect = spreading(graph, &vect, config.mode, config.add_loops);
    }
    tracing::debug!(
        length = config.length,
        mode = ?config.mode,
        add_loops = config.add_loops,
        support = vect.len(),
        "prox walk done"
    );
    Ok(vect)
}

/// Same as [`prox_markov_dict`], as a dense vector of `node_count()` entries.
pub fn prox_markov_list<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ProxConfig,
) -> Result<Vec<f64>> {
    let vect = prox_markov_dict(graph, p0, config)?;
    Ok(to_dense(&vect, graph.node_count()))
}

/// Weighted Prox: each step splits a vertex's mass proportionally to the
/// weights of its incident edges.
///
/// With `config.add_loops`, `loops_weight` gives the weight of every virtual
/// self-loop (added even where a real loop exists). Weights are resolved once,
/// before the first step.
pub fn prox_markov_wgt<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ProxConfig,
    weight: &WeightSpec,
    loops_weight: &LoopWeight,
) -> Result<SparseVec> {
    let mut vect = normalize_pzero(graph, p0)?;
    let weights = weight.resolve(graph)?;
    let loops = if config.add_loops { Some(loops_weight.resolve(graph)?) } else { None };
    for _ in 0..config.length {
        vect = spreading_wgt(graph, &vect, config.mode, &weights, loops.as_deref());
    }
    tracing::debug!(
        length = config.length,
        mode = ?config.mode,
        add_loops = config.add_loops,
        support = vect.len(),
        "weighted prox walk done"
    );
    Ok(vect)
}

/// Same as [`prox_markov_wgt`], as a dense vector of `node_count()` entries.
pub fn prox_markov_wgt_list<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ProxConfig,
    weight: &WeightSpec,
    loops_weight: &LoopWeight,
) -> Result<Vec<f64>> {
    let vect = prox_markov_wgt(graph, p0, config, weight, loops_weight)?;
    Ok(to_dense(&vect, graph.node_count()))
}
