//! Guards and trivial covers used before running a clustering.
//!
//! A cover is a list of clusters, each a list of vertex ids.

use crate::graph::{Graph, Mode, EDGE_WEIGHT_ATTR};

/// True when clustering `graph` is pointless: no vertex, no edge, or (with
/// `weighted`) only zero-weight edges. Each case logs a warning.
///
/// A weighted check on a graph without a `weight` attribute treats the
/// missing values as zero.
pub fn graph_is_trivial<G: Graph + ?Sized>(graph: &G, weighted: bool) -> bool {
    let n = graph.node_count();
    let m = graph.edge_count();
    if n == 0 {
        tracing::warn!("the graph has no vertices");
        return true;
    }
    if m == 0 {
        if n > 1 {
            tracing::warn!(vertices = n, "the graph has no edges");
        } else {
            tracing::warn!("the graph has only one vertex and no edge");
        }
        return true;
    }
    if weighted {
        let max = (0..m)
            .map(|e| graph.edge_attr(e, EDGE_WEIGHT_ATTR).unwrap_or(0.0))
            .fold(f64::NEG_INFINITY, f64::max);
        if max == 0.0 {
            tracing::warn!(edges = m, "the graph has only null weighted edges");
            return true;
        }
    }
    false
}

/// True when every vertex has a type and every edge joins the two types.
pub fn graph_is_bipartite<G: Graph + ?Sized>(graph: &G) -> bool {
    let types: Option<Vec<bool>> = (0..graph.node_count()).map(|v| graph.vertex_type(v)).collect();
    let ok = match types {
        Some(types) => (0..graph.edge_count()).all(|e| {
            let (s, t) = graph.edge_endpoints(e);
            types[s] != types[t]
        }),
        None => false,
    };
    if !ok {
        tracing::warn!("the graph is not bipartite");
    }
    ok
}

/// Every vertex in a single cluster.
pub fn one_cluster<G: Graph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    vec![(0..graph.node_count()).collect()]
}

/// Weakly connected components, ordered by smallest member, members sorted.
pub fn connected_components<G: Graph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut queue: Vec<usize> = Vec::new();
    let mut cover = Vec::new();

    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.clear();
        queue.push(start);
        let mut head = 0usize;
        while head < queue.len() {
            let cur = queue[head];
            head += 1;
            for next in graph.neighbors(cur, Mode::All) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push(next);
                }
            }
        }
        let mut cluster = queue.clone();
        cluster.sort_unstable();
        cover.push(cluster);
    }
    cover
}
