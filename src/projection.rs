//! Bipartite to unipartite projection.
//!
//! Two `type=True` vertices are joined whenever they share at least one
//! `type=False` neighbor. The policy only decides the edge weight; the edge
//! set is the same for every policy, up to the null-edge pruning below.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::graph::{AttrGraph, Graph, Mode};
use crate::prox::{prox_markov_dict, prox_markov_wgt, ProxConfig};
use crate::vector::{PZero, SparseVec};
use crate::weight::{LoopWeight, WeightSpec};
use crate::{Error, Result};

/// Projected edges whose weight is not above this are deleted.
pub const NULL_EDGE_EPSILON: f64 = 1e-6;

/// Edge weighting policy of [`bigraph_projection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProjectionWeight {
    /// Every edge weighs 1.
    No,
    /// Number of common neighbors.
    Count,
    /// `P[a][b] * degree(a)`.
    #[default]
    P,
    PMin,
    PMax,
    PAvg,
    /// `P[a][b]` against the degree background of `b`.
    Confl,
}

impl ProjectionWeight {
    pub const ALL: [ProjectionWeight; 7] = [
        ProjectionWeight::No,
        ProjectionWeight::Count,
        ProjectionWeight::P,
        ProjectionWeight::PMin,
        ProjectionWeight::PMax,
        ProjectionWeight::PAvg,
        ProjectionWeight::Confl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionWeight::No => "no",
            ProjectionWeight::Count => "count",
            ProjectionWeight::P => "p",
            ProjectionWeight::PMin => "pmin",
            ProjectionWeight::PMax => "pmax",
            ProjectionWeight::PAvg => "pavg",
            ProjectionWeight::Confl => "confl",
        }
    }

    fn needs_prox(&self) -> bool {
        !matches!(self, ProjectionWeight::No | ProjectionWeight::Count)
    }
}

impl fmt::Display for ProjectionWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectionWeight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown projection weight: {s:?}")))
    }
}

/// Projects a bipartite graph onto its `type=True` vertices.
///
/// Preconditions: every vertex has a type, the `type=True` vertices are
/// exactly `0..k` (see [`AttrGraph::types_first`]) and no edge joins two
/// vertices of the same type. The result has `k` vertices (names and types
/// carried over) and stores edge weights under `wgt_attr`. The 2-step prox
/// tables are weighted by `wgt_attr` when the input graph carries it.
///
/// ```
/// use proxwalk::{bigraph_projection, formula, ProjectionWeight};
/// let mut g = formula("a:b:c--A:B:C:D, d--D:E, c:d--F", true).unwrap();
/// g.set_types_from_names(|name| name.chars().all(|c| c.is_lowercase()));
/// let (g, _) = g.types_first().unwrap();
/// let pg = bigraph_projection(&g, ProjectionWeight::Count, "weight").unwrap();
/// assert_eq!(pg.edges(), &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
/// assert_eq!(pg.edge_attr_values("weight").unwrap(), &[4.0, 4.0, 1.0, 4.0, 1.0, 2.0]);
/// ```
pub fn bigraph_projection<G: Graph + ?Sized>(
    graph: &G,
    policy: ProjectionWeight,
    wgt_attr: &str,
) -> Result<AttrGraph> {
    let k = check_types_first(graph)?;
    let tables = if policy.needs_prox() {
        (0..k).map(|v| two_step_prox(graph, v, wgt_attr)).collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };
    project(graph, k, policy, &tables, wgt_attr)
}

/// [`bigraph_projection`] with the per-vertex prox tables computed in parallel.
#[cfg(feature = "parallel")]
pub fn bigraph_projection_parallel<G: Graph + Sync + ?Sized>(
    graph: &G,
    policy: ProjectionWeight,
    wgt_attr: &str,
) -> Result<AttrGraph> {
    use rayon::prelude::*;

    let k = check_types_first(graph)?;
    let tables = if policy.needs_prox() {
        (0..k)
            .into_par_iter()
            .map(|v| two_step_prox(graph, v, wgt_attr))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };
    project(graph, k, policy, &tables, wgt_attr)
}

/// Number of `type=True` vertices, after checking they come first.
fn check_types_first<G: Graph + ?Sized>(graph: &G) -> Result<usize> {
    let n = graph.node_count();
    let mut types = Vec::with_capacity(n);
    for v in 0..n {
        types.push(graph.vertex_type(v).ok_or_else(|| Error::MissingAttribute("type".to_string()))?);
    }
    let k = types.iter().take_while(|&&t| t).count();
    if let Some(v) = types[k..].iter().position(|&t| t) {
        return Err(Error::Precondition(format!(
            "type=True vertices must come first (vertex {} is True after {k} leading True vertices)",
            k + v
        )));
    }
    for e in 0..graph.edge_count() {
        let (s, t) = graph.edge_endpoints(e);
        if types[s] == types[t] {
            return Err(Error::Precondition(format!(
                "edge {e} ({s}, {t}) joins two vertices of the same type"
            )));
        }
    }
    Ok(k)
}

fn two_step_prox<G: Graph + ?Sized>(graph: &G, vertex: usize, wgt_attr: &str) -> Result<SparseVec> {
    let config = ProxConfig { length: 2, mode: Mode::All, add_loops: false };
    let p0 = PZero::from([vertex]);
    let weighted = graph.edge_count() > 0 && graph.edge_attr(0, wgt_attr).is_some();
    if weighted {
        let spec = WeightSpec::attribute(wgt_attr);
        prox_markov_wgt(graph, &p0, config, &spec, &LoopWeight::default())
    } else {
        prox_markov_dict(graph, &p0, config)
    }
}

fn project<G: Graph + ?Sized>(
    graph: &G,
    k: usize,
    policy: ProjectionWeight,
    tables: &[SparseVec],
    wgt_attr: &str,
) -> Result<AttrGraph> {
    let degree: Vec<f64> = (0..k).map(|v| graph.degree(v) as f64).collect();
    let top_degree_sum: f64 = degree.iter().sum();
    let p = |a: usize, b: usize| tables[a].get(&b).copied().unwrap_or(0.0);

    let mut out = AttrGraph::new(k, false);
    let mut weights = Vec::new();
    let mut deleted = 0usize;
    for a in 0..k {
        for (b, common) in common_neighbors(graph, a, k) {
            let w = match policy {
                ProjectionWeight::No => 1.0,
                ProjectionWeight::Count => common as f64,
                ProjectionWeight::P => p(a, b) * degree[a],
                ProjectionWeight::PMin => p(a, b).min(p(b, a)),
                ProjectionWeight::PMax => p(a, b).max(p(b, a)),
                ProjectionWeight::PAvg => (p(a, b) + p(b, a)) / 2.0,
                ProjectionWeight::Confl => {
                    let pab = p(a, b);
                    pab / (pab + degree[b] / top_degree_sum)
                }
            };
            if w - NULL_EDGE_EPSILON <= 0.0 {
                deleted += 1;
                continue;
            }
            out.add_edge(a, b)?;
            weights.push(w);
        }
    }
    if deleted > 0 {
        tracing::info!(deleted, policy = %policy, "projection: removed null edges");
    }

    out.set_edge_attr(wgt_attr, weights)?;
    out.set_types(vec![true; k])?;
    for v in 0..k {
        if let Some(name) = graph.vertex_name(v) {
            out.set_name(v, name)?;
        }
    }
    tracing::debug!(
        vertices = k,
        edges = out.edge_count(),
        policy = %policy,
        "bigraph projection done"
    );
    Ok(out)
}

/// `(b, count)` for every `type=True` vertex `b > a` sharing `count` distinct
/// neighbors with `a`, by increasing `b`.
fn common_neighbors<G: Graph + ?Sized>(graph: &G, a: usize, k: usize) -> Vec<(usize, usize)> {
    let mut counts = vec![0usize; k];
    let middles: BTreeSet<usize> = graph.neighbors(a, Mode::All).into_iter().collect();
    for t in middles {
        let ends: BTreeSet<usize> = graph
            .neighbors(t, Mode::All)
            .into_iter()
            .filter(|&b| b > a && b < k)
            .collect();
        for b in ends {
            counts[b] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, c)| c > 0)
        .collect()
}
