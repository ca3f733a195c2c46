//! Prox layouts: one row of prox values per vertex.
//!
//! The `n x n` matrices returned here are raw coordinates; they still need a
//! dimension reduction before they can be drawn.

use crate::graph::{Graph, Mode};
use crate::prox::{prox_markov_list, ProxConfig};
use crate::vector::PZero;
use crate::{Error, Result};

/// Row `i` is the prox vector of a `length`-step walk from vertex `i`.
pub fn prox_layout<G: Graph + ?Sized>(
    graph: &G,
    length: usize,
    add_loops: bool,
) -> Result<Vec<Vec<f64>>> {
    let config = ProxConfig { length, mode: Mode::Out, add_loops };
    (0..graph.node_count())
        .map(|v| prox_markov_list(graph, &PZero::from([v]), config))
        .collect()
}

/// Bigraph layout: `type=True` vertices walk an even number of steps and the
/// others an odd number, so every row lands on the `type=True` side.
pub fn prox_bigraph_layout<G: Graph + ?Sized>(graph: &G, length: usize) -> Result<Vec<Vec<f64>>> {
    (0..graph.node_count())
        .map(|v| bigraph_row(graph, v, length))
        .collect()
}

/// [`prox_layout`] with rows computed in parallel.
#[cfg(feature = "parallel")]
pub fn prox_layout_parallel<G: Graph + Sync + ?Sized>(
    graph: &G,
    length: usize,
    add_loops: bool,
) -> Result<Vec<Vec<f64>>> {
    use rayon::prelude::*;

    let config = ProxConfig { length, mode: Mode::Out, add_loops };
    (0..graph.node_count())
        .into_par_iter()
        .map(|v| prox_markov_list(graph, &PZero::from([v]), config))
        .collect()
}

fn bigraph_row<G: Graph + ?Sized>(graph: &G, v: usize, length: usize) -> Result<Vec<f64>> {
    let is_top = graph
        .vertex_type(v)
        .ok_or_else(|| Error::MissingAttribute("type".to_string()))?;
    let even = length - length % 2;
    let v_length = if is_top { even } else { even + 1 };
    let config = ProxConfig { length: v_length, mode: Mode::Out, add_loops: false };
    prox_markov_list(graph, &PZero::from([v]), config)
}
