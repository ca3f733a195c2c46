//! Monte-Carlo Prox: approximate the exact landing distribution by
//! simulating independent random walks.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::graph::{Graph, Mode};
use crate::vector::{normalize_pzero, PZero, SparseVec};
use crate::weight::WeightSpec;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    /// Steps per walk.
    pub length: usize,
    /// Number of simulated walks.
    pub throws: usize,
    pub mode: Mode,
    pub add_loops: bool,
    /// Only used by [`prox_markov_mtcl_seeded`].
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self { length: 3, throws: 10, mode: Mode::Out, add_loops: false, seed: 42 }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<()> {
        if self.throws == 0 {
            return Err(Error::InvalidParameter("throws must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Result of a Monte-Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloRun {
    /// Landing frequency per vertex (landings / throws). Sums to `1 - died`.
    pub scores: SparseVec,
    /// Fraction of walks that hit a vertex with no neighbor.
    pub died: f64,
    pub throws: usize,
}

/// Simulates `config.throws` walks of `config.length` steps.
///
/// Each walk starts on a vertex drawn from the normalized `p0`, then moves to
/// a uniformly chosen neighbor at every step (the vertex itself is a candidate
/// when `add_loops` is set and it is not already its own neighbor). A walk
/// standing on a vertex with no candidate dies and lands nowhere.
///
/// Weighted walks are not supported: passing `weight` fails with
/// [`Error::NotImplemented`].
pub fn prox_markov_mtcl<G, R>(
    graph: &G,
    p0: &PZero,
    config: MonteCarloConfig,
    weight: Option<&WeightSpec>,
    rng: &mut R,
) -> Result<MonteCarloRun>
where
    G: Graph + ?Sized,
    R: Rng + ?Sized,
{
    if weight.is_some() {
        return Err(Error::NotImplemented("weighted Monte-Carlo prox"));
    }
    config.validate()?;
    let start: Vec<(usize, f64)> = normalize_pzero(graph, p0)?.into_iter().collect();

    let mut landings = SparseVec::new();
    let mut died = 0usize;
    for _ in 0..config.throws {
        match single_walk(graph, &start, config, rng) {
            Some(end) => *landings.entry(end).or_insert(0.0) += 1.0,
            None => died += 1,
        }
    }

    let throws = config.throws as f64;
    for count in landings.values_mut() {
        *count /= throws;
    }
    let died = died as f64 / throws;
    tracing::debug!(
        length = config.length,
        throws = config.throws,
        died,
        support = landings.len(),
        "monte-carlo prox done"
    );
    Ok(MonteCarloRun { scores: landings, died, throws: config.throws })
}

/// [`prox_markov_mtcl`] with a `ChaCha8Rng` seeded from `config.seed`.
pub fn prox_markov_mtcl_seeded<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: MonteCarloConfig,
) -> Result<MonteCarloRun> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    prox_markov_mtcl(graph, p0, config, None, &mut rng)
}

fn single_walk<G, R>(
    graph: &G,
    start: &[(usize, f64)],
    config: MonteCarloConfig,
    rng: &mut R,
) -> Option<usize>
where
    G: Graph + ?Sized,
    R: Rng + ?Sized,
{
    let mut curr = sample_start(rng, start)?;
    for _ in 0..config.length {
        let mut neighbors = graph.neighbors(curr, config.mode);
        if config.add_loops && !neighbors.contains(&curr) {
            neighbors.push(curr);
        }
        curr = *neighbors.choose(rng)?;
    }
    Some(curr)
}

fn sample_start<R: Rng + ?Sized>(rng: &mut R, start: &[(usize, f64)]) -> Option<usize> {
    let (&(first, _), rest) = start.split_first()?;
    if rest.is_empty() {
        return Some(first);
    }
    let mut r = rng.random::<f64>();
    for &(v, p) in start {
        if r < p {
            return Some(v);
        }
        r -= p;
    }
    start.last().map(|&(v, _)| v)
}
