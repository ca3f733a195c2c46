//! Confluence: prox normalized by the degree-proportional background.
//!
//! For a walk from `a`, the confluence of `b` is `p / (p + limit(b))` where `p`
//! is the prox of `b` and `limit(b)` the probability a long walk ends on `b`.
//! Values near 1 mean `b` is much closer to `a` than chance; the result always
//! lies in `[0, 1)`.

use std::collections::BTreeMap;

use crate::graph::{degree_sum, Graph, Mode};
use crate::prox::{prox_markov_dict, prox_markov_list, ProxConfig};
use crate::vector::{PZero, SparseVec};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfluenceOptions {
    pub length: usize,
    /// Must be `true`; walking without loops is not supported.
    pub add_loops: bool,
    /// Must be `false`; removing the measured edge first is not supported.
    pub remove_edge: bool,
}

impl Default for ConfluenceOptions {
    fn default() -> Self {
        Self { length: 3, add_loops: true, remove_edge: false }
    }
}

/// Confluence of `target` seen from `source` in an undirected graph.
pub fn confluence<G: Graph + ?Sized>(
    graph: &G,
    source: usize,
    target: usize,
    options: ConfluenceOptions,
) -> Result<f64> {
    if options.remove_edge {
        return Err(Error::NotImplemented("confluence with edge removal"));
    }
    if !options.add_loops {
        return Err(Error::NotImplemented("confluence without self-loops"));
    }
    if graph.is_directed() {
        return Err(Error::Precondition("confluence needs an undirected graph".to_string()));
    }
    let n = graph.node_count();
    if target >= n {
        return Err(Error::IndexOutOfBounds(target));
    }

    let config = ProxConfig { length: options.length, mode: Mode::Out, add_loops: true };
    let sim = prox_markov_list(graph, &PZero::from([source]), config)?[target];
    // every vertex walks with one extra loop
    let lsum = (degree_sum(graph) + n) as f64;
    let limit = (graph.degree(target) as f64 + 1.0) / lsum;
    let value = sim / (sim + limit);
    if !(0.0..1.0).contains(&value) {
        return Err(Error::OutOfRange { what: "confluence", value });
    }
    Ok(value)
}

/// Confluence of every vertex reached by one prox walk from `p0`, using
/// `degree(v) / Σ degree` as the background of `v`.
///
/// Isolated vertices have no background and are left out, so a graph without
/// edges yields an empty vector.
pub fn confluence_simple<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ProxConfig,
) -> Result<SparseVec> {
    let total = degree_sum(graph);
    if total == 0 {
        return Ok(SparseVec::new());
    }
    let total = total as f64;
    let prox = prox_markov_dict(graph, p0, config)?;
    let mut conf = SparseVec::new();
    for (v, p) in prox {
        let degree = graph.degree(v);
        if degree == 0 {
            continue;
        }
        let limit = degree as f64 / total;
        let value = p / (p + limit);
        if !(0.0..1.0).contains(&value) {
            return Err(Error::OutOfRange { what: "confluence", value });
        }
        conf.insert(v, value);
    }
    Ok(conf)
}

/// Per-edge confluence of the target seen from the source, indexed by edge id.
///
/// Edges whose target is never reached get `0.0`. The graph is not modified.
pub fn edge_confluence<G: Graph + ?Sized>(graph: &G, config: ProxConfig) -> Result<Vec<f64>> {
    let mut by_source: BTreeMap<usize, SparseVec> = BTreeMap::new();
    let mut values = Vec::with_capacity(graph.edge_count());
    for e in 0..graph.edge_count() {
        let (s, t) = graph.edge_endpoints(e);
        if !by_source.contains_key(&s) {
            let conf = confluence_simple(graph, &PZero::from([s]), config)?;
            by_source.insert(s, conf);
        }
        values.push(by_source.get(&s).and_then(|c| c.get(&t)).copied().unwrap_or(0.0));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::formula;

    #[test]
    fn close_pairs_have_higher_confluence() {
        // two triangles joined by a bridge c--d
        let g = formula("a--b--c--a, c--d, d--e--f--d", true).unwrap();
        let opts = ConfluenceOptions::default();
        let near = confluence(&g, 0, 1, opts).unwrap();
        let far = confluence(&g, 0, 5, opts).unwrap();
        assert!(near > far, "near={near} far={far}");
        assert!((0.0..1.0).contains(&near));
        assert!((0.0..1.0).contains(&far));
    }

    #[test]
    fn matches_the_definition() {
        let g = formula("a--b--c", true).unwrap();
        let opts = ConfluenceOptions { length: 2, ..Default::default() };
        // from a with loops: step 1 {a: 1/2, b: 1/2}; step 2 b gets 1/4 + 1/6
        let sim = 0.25 + 1.0 / 6.0;
        let limit = 3.0 / 7.0;
        let expected = sim / (sim + limit);
        assert!((confluence(&g, 0, 1, opts).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn unreachable_target_has_zero_confluence() {
        let g = formula("a--b, c--d", true).unwrap();
        assert_eq!(confluence(&g, 0, 3, ConfluenceOptions::default()).unwrap(), 0.0);
    }

    #[test]
    fn unsupported_options_fail_loudly() {
        let g = formula("a--b", true).unwrap();
        let no_loops = ConfluenceOptions { add_loops: false, ..Default::default() };
        assert!(confluence(&g, 0, 1, no_loops).unwrap_err().is_not_implemented());
        let remove = ConfluenceOptions { remove_edge: true, ..Default::default() };
        assert!(confluence(&g, 0, 1, remove).unwrap_err().is_not_implemented());
    }

    #[test]
    fn directed_graphs_are_rejected() {
        let g = formula("a-->b", true).unwrap();
        let err = confluence(&g, 0, 1, ConfluenceOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn simple_confluence_uses_each_vertex_degree() {
        let g = formula("a--b--c", true).unwrap();
        let conf = confluence_simple(&g, &PZero::from([0]), ProxConfig::with_length(1)).unwrap();
        // prox {b: 1}, background of b = 2 / 4
        assert_eq!(conf.into_iter().collect::<Vec<_>>(), vec![(1, 1.0 / 1.5)]);
    }

    #[test]
    fn simple_confluence_skips_isolated_vertices() {
        let g = formula("a--b, c", true).unwrap();
        let config = ProxConfig { length: 3, add_loops: true, ..Default::default() };
        let conf = confluence_simple(&g, &PZero::from([0, 2]), config).unwrap();
        // a and b each hold 1/4 against a background of 1/2; c never counts
        assert_eq!(conf.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        for value in conf.values() {
            assert!((value - 1.0 / 3.0).abs() < 1e-12);
        }

        // c starting with zero mass must not turn into 0/0
        let p0 = PZero::weighted([(0, 1.0), (2, 0.0)]);
        let conf = confluence_simple(&g, &p0, ProxConfig::with_length(0)).unwrap();
        assert_eq!(conf.len(), 1);
        assert!((conf[&0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn simple_confluence_on_edgeless_graph_is_empty() {
        let g = formula("a, b", true).unwrap();
        assert!(confluence_simple(&g, &PZero::all(), ProxConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn edge_confluence_is_per_edge() {
        let g = formula("a--b--c", true).unwrap();
        let values = edge_confluence(&g, ProxConfig::with_length(1)).unwrap();
        assert_eq!(values.len(), 2);
        // a -> b: prox 1, background 2/4
        assert!((values[0] - 1.0 / 1.5).abs() < 1e-12);
        // b -> c: prox 1/2, background 1/4
        assert!((values[1] - 0.5 / 0.75).abs() < 1e-12);
    }
}
