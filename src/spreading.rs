//! One step of walker-mass redistribution.
//!
//! Mass on a vertex with no usable neighbor (no neighbor under `mode`, no loop,
//! or zero total weight) is dropped: that walker is dead.

use crate::graph::{other_end, Graph, Mode};
use crate::vector::SparseVec;

/// Spreads each vertex's mass uniformly over its neighbors.
///
/// With `add_loops` every vertex behaves as if it held a self-loop; a vertex
/// that is already its own neighbor is not given a second one. The graph is
/// never modified.
pub fn spreading<G: Graph + ?Sized>(
    graph: &G,
    in_vect: &SparseVec,
    mode: Mode,
    add_loops: bool,
) -> SparseVec {
    let mut out = SparseVec::new();
    for (&vtx, &value) in in_vect {
        let mut neighborhood = graph.neighbors(vtx, mode);
        if add_loops && !neighborhood.contains(&vtx) {
            neighborhood.push(vtx);
        }
        if neighborhood.is_empty() {
            continue;
        }
        let share = value / neighborhood.len() as f64;
        for neighbor in neighborhood {
            *out.entry(neighbor).or_insert(0.0) += share;
        }
    }
    out
}

/// Spreads each vertex's mass proportionally to incident edge weights.
///
/// `weights` is indexed by edge id. When `loops` is given, vertex `v` also
/// keeps `loops[v] / total` of its own mass, on top of any real self-loop.
pub fn spreading_wgt<G: Graph + ?Sized>(
    graph: &G,
    in_vect: &SparseVec,
    mode: Mode,
    weights: &[f64],
    loops: Option<&[f64]>,
) -> SparseVec {
    let mut out = SparseVec::new();
    for (&from, &value) in in_vect {
        let incident = graph.incident(from, mode);
        let loop_wgt = loops.map_or(0.0, |l| l[from]);
        let total: f64 = incident.iter().map(|&e| weights[e]).sum::<f64>() + loop_wgt;
        if !(total > 0.0) {
            continue;
        }
        for &e in &incident {
            let neighbor = other_end(graph.edge_endpoints(e), from);
            *out.entry(neighbor).or_insert(0.0) += value * weights[e] / total;
        }
        if loop_wgt > 0.0 {
            *out.entry(from).or_insert(0.0) += value * loop_wgt / total;
        }
    }
    out
}
