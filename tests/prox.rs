use proptest::prelude::*;
use proxwalk::{
    bigraph_projection, confluence, formula, normalise, normalize_pzero, prox_markov_dict,
    prox_markov_list, sortcut, vertex_ids, AttrGraph, ConfluenceOptions, ExtractConfig, Graph,
    Mode, PZero, ProjectionWeight, ProxConfig, ProxExtractGlobal, ProxMethod, SparseVec,
    EDGE_WEIGHT_ATTR, NULL_EDGE_EPSILON,
};

/// Zachary's karate club, 34 vertices and 78 edges.
const ZACHARY: [(usize, usize); 78] = [
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 10), (0, 11), (0, 12),
    (0, 13), (0, 17), (0, 19), (0, 21), (0, 31), (1, 2), (1, 3), (1, 7), (1, 13), (1, 17),
    (1, 19), (1, 21), (1, 30), (2, 3), (2, 7), (2, 27), (2, 28), (2, 32), (2, 9), (2, 8),
    (2, 13), (3, 7), (3, 12), (3, 13), (4, 6), (4, 10), (5, 6), (5, 10), (5, 16), (6, 16),
    (8, 30), (8, 32), (8, 33), (9, 33), (13, 33), (14, 32), (14, 33), (15, 32), (15, 33),
    (18, 32), (18, 33), (19, 33), (20, 32), (20, 33), (22, 32), (22, 33), (23, 25), (23, 27),
    (23, 32), (23, 33), (23, 29), (24, 25), (24, 27), (24, 31), (25, 31), (26, 29), (26, 33),
    (27, 33), (28, 31), (28, 33), (29, 32), (29, 33), (30, 32), (30, 33), (31, 32), (31, 33),
    (32, 33),
];

fn zachary() -> AttrGraph {
    AttrGraph::from_edges(34, &ZACHARY, false).unwrap()
}

/// Minimal undirected backend: the walk engines only see the `Graph` trait.
#[derive(Debug, Clone)]
struct EdgeListGraph {
    n: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph for EdgeListGraph {
    fn node_count(&self) -> usize {
        self.n
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn is_directed(&self) -> bool {
        false
    }

    fn edge_endpoints(&self, edge: usize) -> (usize, usize) {
        self.edges[edge]
    }

    fn incident(&self, node: usize, _mode: Mode) -> Vec<usize> {
        let mut inc: Vec<(usize, usize)> = Vec::new();
        for (e, &(s, t)) in self.edges.iter().enumerate() {
            if s == node {
                inc.push((t, e));
            }
            if t == node {
                inc.push((s, e));
            }
        }
        inc.sort_unstable();
        inc.into_iter().map(|(_, e)| e).collect()
    }
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "{a} != {b}");
}

fn lowercase(name: &str) -> bool {
    name.chars().all(|c| c.is_lowercase())
}

#[test]
fn path_walks() {
    let g = formula("a--b--c--d", true).unwrap();
    let p = prox_markov_dict(&g, &PZero::from([0]), ProxConfig::with_length(2)).unwrap();
    assert_eq!(p, [(0, 0.5), (2, 0.5)].into_iter().collect::<SparseVec>());

    let p0 = PZero::weighted([(0, 1.0), (3, 1.0)]);
    let p = prox_markov_dict(&g, &p0, ProxConfig::with_length(0)).unwrap();
    assert_eq!(p, [(0, 0.5), (3, 0.5)].into_iter().collect::<SparseVec>());
    let p = prox_markov_dict(&g, &p0, ProxConfig::with_length(1)).unwrap();
    assert_eq!(p, [(1, 0.5), (2, 0.5)].into_iter().collect::<SparseVec>());
}

#[test]
fn sortcut_keeps_the_best() {
    let scores: SparseVec =
        [(45, 0.2), (180, 0.08), (20, 0.12), (21, 0.102), (255, 0.85), (12, 0.0021)]
            .into_iter()
            .collect();
    assert_eq!(sortcut(&scores, 3), vec![(255, 0.85), (45, 0.2), (20, 0.12)]);
}

#[test]
fn projection_counts_common_neighbors() {
    let mut g = formula("a:b:c--A:B:C:D, d--D:E, c:d--F", true).unwrap();
    g.set_types_from_names(lowercase);
    let (g, _) = g.types_first().unwrap();
    let pg = bigraph_projection(&g, ProjectionWeight::Count, EDGE_WEIGHT_ATTR).unwrap();
    assert_eq!(pg.edges(), &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    assert_eq!(pg.edge_attr_values(EDGE_WEIGHT_ATTR).unwrap(), &[4.0, 4.0, 1.0, 4.0, 1.0, 2.0]);
}

#[test]
fn zachary_prox_from_one_vertex() {
    let g = zachary();
    let p = prox_markov_dict(&g, &PZero::from([0]), ProxConfig::with_length(4)).unwrap();
    assert_eq!(p.len(), 34);
    assert_close(p[&0], 0.20139916513480394);
    assert_close(p[&2], 0.06625652318218955);
    assert_close(p.values().sum::<f64>(), 1.0);
}

#[test]
fn zachary_prox_from_everyone() {
    let g = zachary();
    let p = prox_markov_list(&g, &PZero::all(), ProxConfig::with_length(3)).unwrap();
    assert_close(p[33], 0.13770778867102398);
    assert_close(p[2], 0.06485593331491094);
    assert_close(p[1], 0.0648100735494361);
}

#[test]
fn zachary_extraction() {
    let g = zachary();
    let config = ExtractConfig { vcount: 5, length: 3 };
    let markov = ProxExtractGlobal::new(&g, ProxMethod::Markov);
    assert_eq!(vertex_ids(&markov.extract(&PZero::all(), config).unwrap()), vec![33, 0, 32, 2, 1]);

    let mtcl = ProxExtractGlobal::new(&g, ProxMethod::MonteCarlo { throws: 10_000, seed: 42 });
    let config = ExtractConfig { vcount: 3, length: 3 };
    assert_eq!(vertex_ids(&mtcl.extract(&PZero::all(), config).unwrap()), vec![33, 0, 32]);
}

#[test]
fn custom_backend_matches_attr_graph() {
    let edges = vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 3)];
    let custom = EdgeListGraph { n: 4, edges: edges.clone() };
    let attr = AttrGraph::from_edges(4, &edges, false).unwrap();
    for add_loops in [false, true] {
        let config = ProxConfig { length: 3, add_loops, ..Default::default() };
        assert_eq!(
            prox_markov_dict(&custom, &PZero::from([0]), config).unwrap(),
            prox_markov_dict(&attr, &PZero::from([0]), config).unwrap(),
        );
    }
}

#[test]
fn walking_isolated_vertices_is_not_an_error() {
    let g = AttrGraph::new(3, false);
    let p = prox_markov_dict(&g, &PZero::all(), ProxConfig::with_length(2)).unwrap();
    assert!(p.is_empty());
    let p = prox_markov_dict(&g, &PZero::all(), ProxConfig { length: 2, add_loops: true, ..Default::default() })
        .unwrap();
    assert_close(p.values().sum::<f64>(), 1.0);
}

fn undirected_graph() -> impl Strategy<Value = AttrGraph> {
    (1usize..8, prop::collection::vec((0usize..8, 0usize..8), 0..16)).prop_map(|(n, edges)| {
        let edges: Vec<(usize, usize)> = edges.into_iter().map(|(s, t)| (s % n, t % n)).collect();
        AttrGraph::from_edges(n, &edges, false).unwrap()
    })
}

/// Bipartite graph with its `k` top vertices first.
fn bipartite_graph() -> impl Strategy<Value = AttrGraph> {
    (1usize..6, 1usize..6, prop::collection::vec((0usize..6, 0usize..6), 1..20)).prop_map(
        |(k, b, edges)| {
            let edges: Vec<(usize, usize)> =
                edges.into_iter().map(|(t, d)| (t % k, k + d % b)).collect();
            let mut g = AttrGraph::from_edges(k + b, &edges, false).unwrap();
            let types = (0..k + b).map(|v| v < k).collect();
            g.set_types(types).unwrap();
            g
        },
    )
}

fn shares_a_neighbor(g: &AttrGraph, a: usize, b: usize) -> bool {
    let na = g.neighbors(a, Mode::All);
    g.neighbors(b, Mode::All).iter().any(|t| na.contains(t))
}

proptest! {
    // Property: a zero-length walk is the normalized starting distribution.
    #[test]
    fn prop_length_zero_is_identity(
        g in undirected_graph(),
        starts in prop::collection::vec(0usize..8, 0..5),
    ) {
        let n = g.node_count();
        let p0 = PZero::vertices(starts.into_iter().map(|v| v % n));
        let p = prox_markov_dict(&g, &p0, ProxConfig::with_length(0)).unwrap();
        prop_assert_eq!(p, normalize_pzero(&g, &p0).unwrap());
    }

    // Property: with virtual loops nobody dies, so the mass is conserved.
    #[test]
    fn prop_loops_conserve_mass(g in undirected_graph(), start in 0usize..8, length in 0usize..6) {
        let p0 = PZero::from([start % g.node_count()]);
        let config = ProxConfig { length, mode: Mode::Out, add_loops: true };
        let p = prox_markov_dict(&g, &p0, config).unwrap();
        prop_assert!((p.values().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_confluence_is_bounded(
        g in undirected_graph(),
        a in 0usize..8,
        b in 0usize..8,
        length in 0usize..5,
    ) {
        let n = g.node_count();
        let opts = ConfluenceOptions { length, ..Default::default() };
        let c = confluence(&g, a % n, b % n, opts).unwrap();
        prop_assert!((0.0..1.0).contains(&c));
    }

    #[test]
    fn prop_normalise_is_idempotent(
        entries in prop::collection::btree_map(0usize..20, 0.01f64..10.0, 1..8),
    ) {
        let once = normalise(&entries).unwrap();
        let twice = normalise(&once).unwrap();
        for (v, p) in &once {
            prop_assert!((p - twice[v]).abs() < 1e-12);
        }
    }

    // Property: every policy yields the same edges, exactly the pairs of top
    // vertices sharing a bottom neighbor, all weighing more than the epsilon.
    #[test]
    fn prop_projection_topology(g in bipartite_graph()) {
        let k = g.types().unwrap().iter().filter(|&&t| t).count();
        let expected: Vec<(usize, usize)> = (0..k)
            .flat_map(|a| (a + 1..k).map(move |b| (a, b)))
            .filter(|&(a, b)| shares_a_neighbor(&g, a, b))
            .collect();
        for policy in ProjectionWeight::ALL {
            let pg = bigraph_projection(&g, policy, EDGE_WEIGHT_ATTR).unwrap();
            prop_assert_eq!(pg.node_count(), k);
            prop_assert_eq!(pg.edges(), expected.as_slice());
            let weights = pg.edge_attr_values(EDGE_WEIGHT_ATTR).unwrap();
            prop_assert!(weights.iter().all(|&w| w > NULL_EDGE_EPSILON));
        }
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_is_thread_count_invariant() {
    use proxwalk::{bigraph_projection_parallel, prox_layout, prox_layout_parallel};

    let mut g = formula("a:b:c--A:B:C:D, d--D:E, c:d--F", true).unwrap();
    g.set_types_from_names(lowercase);
    let (g, _) = g.types_first().unwrap();

    let pool1 = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let pool4 = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();

    let serial = bigraph_projection(&g, ProjectionWeight::PAvg, EDGE_WEIGHT_ATTR).unwrap();
    for pool in [&pool1, &pool4] {
        let par = pool
            .install(|| bigraph_projection_parallel(&g, ProjectionWeight::PAvg, EDGE_WEIGHT_ATTR))
            .unwrap();
        assert_eq!(par.edges(), serial.edges());
        assert_eq!(par.edge_attr_values(EDGE_WEIGHT_ATTR), serial.edge_attr_values(EDGE_WEIGHT_ATTR));
    }

    let zk = zachary();
    let serial = prox_layout(&zk, 3, true).unwrap();
    let par = pool4.install(|| prox_layout_parallel(&zk, 3, true)).unwrap();
    assert_eq!(serial, par);
}
