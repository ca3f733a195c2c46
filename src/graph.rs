//! Graph adapter trait and an in-memory attributed graph.
//!
//! Everything in this crate reads graphs through [`Graph`]. Vertex ids are
//! `0..node_count()`, edge ids are `0..edge_count()`.
//!
//! Neighbor conventions (shared by all backends shipped here):
//! - neighbors are reported sorted by neighbor id, ties by edge id;
//! - in an undirected graph `mode` is ignored and a self-loop is reported twice
//!   (so it counts 2 toward the degree);
//! - in a directed graph a self-loop appears once for `Out`, once for `In`
//!   and twice for `All`.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Default edge attribute holding edge weights.
pub const EDGE_WEIGHT_ATTR: &str = "weight";

/// Which edges a vertex's neighborhood is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Follow outgoing edges.
    #[default]
    Out,
    /// Follow incoming edges.
    In,
    /// Follow both.
    All,
}

pub trait Graph {
    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn is_directed(&self) -> bool;

    /// `(source, target)` of an edge.
    fn edge_endpoints(&self, edge: usize) -> (usize, usize);

    /// Ids of the edges incident to `node` under `mode`, ordered by the id of
    /// the vertex on the other side.
    fn incident(&self, node: usize, mode: Mode) -> Vec<usize>;

    fn neighbors(&self, node: usize, mode: Mode) -> Vec<usize> {
        self.incident(node, mode)
            .into_iter()
            .map(|e| other_end(self.edge_endpoints(e), node))
            .collect()
    }

    /// Number of incident edges, both directions.
    fn degree(&self, node: usize) -> usize {
        self.incident(node, Mode::All).len()
    }

    fn edge_attr(&self, _edge: usize, _name: &str) -> Option<f64> {
        None
    }

    fn vertex_attr(&self, _node: usize, _name: &str) -> Option<f64> {
        None
    }

    /// Bipartite class of a vertex (`true` for documents/objects).
    fn vertex_type(&self, _node: usize) -> Option<bool> {
        None
    }

    fn vertex_name(&self, _node: usize) -> Option<&str> {
        None
    }
}

/// The vertex on the other side of `edge` as seen from `node`.
#[inline]
pub(crate) fn other_end((source, target): (usize, usize), node: usize) -> usize {
    if source == node {
        target
    } else {
        source
    }
}

/// Sum of all vertex degrees (each vertex counted once).
pub(crate) fn degree_sum<G: Graph + ?Sized>(graph: &G) -> usize {
    (0..graph.node_count()).map(|v| graph.degree(v)).sum()
}

/// In-memory graph with numeric attributes and an optional bipartite `type`.
///
/// Multi-edges and self-loops are allowed.
#[derive(Debug, Clone, Default)]
pub struct AttrGraph {
    directed: bool,
    edges: Vec<(usize, usize)>,
    out_inc: Vec<Vec<usize>>,
    in_inc: Vec<Vec<usize>>,
    names: Vec<Option<String>>,
    types: Option<Vec<bool>>,
    vertex_attrs: BTreeMap<String, Vec<f64>>,
    edge_attrs: BTreeMap<String, Vec<f64>>,
}

impl AttrGraph {
    pub fn new(n: usize, directed: bool) -> Self {
        Self {
            directed,
            edges: Vec::new(),
            out_inc: vec![Vec::new(); n],
            in_inc: vec![Vec::new(); n],
            names: vec![None; n],
            types: None,
            vertex_attrs: BTreeMap::new(),
            edge_attrs: BTreeMap::new(),
        }
    }

    pub fn from_edges(n: usize, edges: &[(usize, usize)], directed: bool) -> Result<Self> {
        let mut graph = Self::new(n, directed);
        for &(s, t) in edges {
            graph.add_edge(s, t)?;
        }
        Ok(graph)
    }

    pub fn add_vertex(&mut self) -> usize {
        self.push_vertex(None)
    }

    pub fn add_named_vertex(&mut self, name: impl Into<String>) -> usize {
        self.push_vertex(Some(name.into()))
    }

    fn push_vertex(&mut self, name: Option<String>) -> usize {
        let id = self.out_inc.len();
        self.out_inc.push(Vec::new());
        self.in_inc.push(Vec::new());
        self.names.push(name);
        if let Some(types) = &mut self.types {
            types.push(false);
        }
        for values in self.vertex_attrs.values_mut() {
            values.push(0.0);
        }
        id
    }

    /// Adds `source -> target` (or `source -- target`) and returns its id.
    ///
    /// Existing edge attributes get `0.0` for the new edge.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize> {
        let n = self.out_inc.len();
        for v in [source, target] {
            if v >= n {
                return Err(Error::IndexOutOfBounds(v));
            }
        }
        let id = self.edges.len();
        self.edges.push((source, target));
        if self.directed {
            self.out_inc[source].push(id);
            self.in_inc[target].push(id);
        } else {
            self.out_inc[source].push(id);
            self.out_inc[target].push(id);
        }
        for values in self.edge_attrs.values_mut() {
            values.push(0.0);
        }
        Ok(id)
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Id of the first edge joining `a` and `b` (direction-aware when directed).
    pub fn get_eid(&self, a: usize, b: usize) -> Option<usize> {
        let list = self.out_inc.get(a)?;
        list.iter().copied().find(|&e| {
            let (s, t) = self.edges[e];
            if self.directed {
                s == a && t == b
            } else {
                (s == a && t == b) || (s == b && t == a)
            }
        })
    }

    pub fn name(&self, node: usize) -> Option<&str> {
        self.names.get(node).and_then(|n| n.as_deref())
    }

    pub fn set_name(&mut self, node: usize, name: impl Into<String>) -> Result<()> {
        let slot = self.names.get_mut(node).ok_or(Error::IndexOutOfBounds(node))?;
        *slot = Some(name.into());
        Ok(())
    }

    /// Finds a vertex by name (linear scan).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_deref() == Some(name))
    }

    pub fn types(&self) -> Option<&[bool]> {
        self.types.as_deref()
    }

    pub fn set_types(&mut self, types: Vec<bool>) -> Result<()> {
        if types.len() != self.node_count() {
            return Err(Error::InvalidParameter(format!(
                "types length must equal node_count (len={} node_count={})",
                types.len(),
                self.node_count()
            )));
        }
        self.types = Some(types);
        Ok(())
    }

    /// Sets `type` from vertex names; unnamed vertices get `false`.
    pub fn set_types_from_names<F: Fn(&str) -> bool>(&mut self, classify: F) {
        let types = self
            .names
            .iter()
            .map(|n| n.as_deref().is_some_and(&classify))
            .collect();
        self.types = Some(types);
    }

    pub fn edge_attr_values(&self, name: &str) -> Option<&[f64]> {
        self.edge_attrs.get(name).map(Vec::as_slice)
    }

    pub fn set_edge_attr(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.edges.len() {
            return Err(Error::InvalidParameter(format!(
                "edge attribute length must equal edge_count (len={} edge_count={})",
                values.len(),
                self.edges.len()
            )));
        }
        self.edge_attrs.insert(name.into(), values);
        Ok(())
    }

    pub fn vertex_attr_values(&self, name: &str) -> Option<&[f64]> {
        self.vertex_attrs.get(name).map(Vec::as_slice)
    }

    pub fn set_vertex_attr(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.node_count() {
            return Err(Error::InvalidParameter(format!(
                "vertex attribute length must equal node_count (len={} node_count={})",
                values.len(),
                self.node_count()
            )));
        }
        self.vertex_attrs.insert(name.into(), values);
        Ok(())
    }

    /// True when every vertex has a `type` and every edge joins two classes.
    pub fn is_bipartite(&self) -> bool {
        match &self.types {
            Some(types) => self.edges.iter().all(|&(s, t)| types[s] != types[t]),
            None => false,
        }
    }

    /// Subgraph induced by `keep`, renumbered in the order of `keep`.
    ///
    /// Names, types and attributes are carried over.
    pub fn induced_subgraph(&self, keep: &[usize]) -> Result<AttrGraph> {
        let n = self.node_count();
        let mut new_id: Vec<Option<usize>> = vec![None; n];
        for (i, &v) in keep.iter().enumerate() {
            if v >= n {
                return Err(Error::IndexOutOfBounds(v));
            }
            if new_id[v].is_some() {
                return Err(Error::InvalidParameter(format!("vertex {v} kept twice")));
            }
            new_id[v] = Some(i);
        }

        let mut sub = AttrGraph::new(keep.len(), self.directed);
        sub.names = keep.iter().map(|&v| self.names[v].clone()).collect();
        sub.types = self
            .types
            .as_ref()
            .map(|types| keep.iter().map(|&v| types[v]).collect());
        for (name, values) in &self.vertex_attrs {
            sub.vertex_attrs
                .insert(name.clone(), keep.iter().map(|&v| values[v]).collect());
        }

        let mut kept_edges = Vec::new();
        for (e, &(s, t)) in self.edges.iter().enumerate() {
            if let (Some(ns), Some(nt)) = (new_id[s], new_id[t]) {
                sub.add_edge(ns, nt)?;
                kept_edges.push(e);
            }
        }
        for (name, values) in &self.edge_attrs {
            sub.edge_attrs
                .insert(name.clone(), kept_edges.iter().map(|&e| values[e]).collect());
        }
        Ok(sub)
    }

    /// Stable reorder putting `type=True` vertices first.
    ///
    /// Returns the reordered graph and `order`, where `order[new] == old`.
    pub fn types_first(&self) -> Result<(AttrGraph, Vec<usize>)> {
        let types = self
            .types
            .as_ref()
            .ok_or_else(|| Error::MissingAttribute("type".to_string()))?;
        let mut order: Vec<usize> = (0..types.len()).filter(|&v| types[v]).collect();
        order.extend((0..types.len()).filter(|&v| !types[v]));
        Ok((self.induced_subgraph(&order)?, order))
    }
}

impl Graph for AttrGraph {
    fn node_count(&self) -> usize {
        self.out_inc.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn edge_endpoints(&self, edge: usize) -> (usize, usize) {
        self.edges[edge]
    }

    fn incident(&self, node: usize, mode: Mode) -> Vec<usize> {
        let mut inc: Vec<usize> = if !self.directed {
            self.out_inc[node].clone()
        } else {
            match mode {
                Mode::Out => self.out_inc[node].clone(),
                Mode::In => self.in_inc[node].clone(),
                Mode::All => {
                    let mut both = self.out_inc[node].clone();
                    both.extend_from_slice(&self.in_inc[node]);
                    both
                }
            }
        };
        inc.sort_by_key(|&e| (other_end(self.edges[e], node), e));
        inc
    }

    fn degree(&self, node: usize) -> usize {
        if self.directed {
            self.out_inc[node].len() + self.in_inc[node].len()
        } else {
            self.out_inc[node].len()
        }
    }

    fn edge_attr(&self, edge: usize, name: &str) -> Option<f64> {
        self.edge_attrs.get(name).and_then(|values| values.get(edge)).copied()
    }

    fn vertex_attr(&self, node: usize, name: &str) -> Option<f64> {
        self.vertex_attr_values(name).and_then(|values| values.get(node)).copied()
    }

    fn vertex_type(&self, node: usize) -> Option<bool> {
        self.types.as_ref().and_then(|types| types.get(node)).copied()
    }

    fn vertex_name(&self, node: usize) -> Option<&str> {
        self.name(node)
    }
}

/// `petgraph` adapter. Edge ids are `EdgeIndex::index()`; no attributes are
/// exposed, so weights must come from a list or a function.
#[cfg(feature = "petgraph")]
impl<N, E, Ty, Ix> Graph for petgraph::Graph<N, E, Ty, Ix>
where
    Ty: petgraph::EdgeType,
    Ix: petgraph::graph::IndexType,
{
    fn node_count(&self) -> usize {
        petgraph::Graph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        petgraph::Graph::edge_count(self)
    }

    fn is_directed(&self) -> bool {
        petgraph::Graph::is_directed(self)
    }

    fn edge_endpoints(&self, edge: usize) -> (usize, usize) {
        petgraph::Graph::edge_endpoints(self, petgraph::graph::EdgeIndex::new(edge))
            .map(|(s, t)| (s.index(), t.index()))
            .unwrap_or((usize::MAX, usize::MAX))
    }

    fn incident(&self, node: usize, mode: Mode) -> Vec<usize> {
        use petgraph::visit::EdgeRef;
        use petgraph::Direction;

        let idx = petgraph::graph::NodeIndex::new(node);
        let collect = |dir: Direction| -> Vec<usize> {
            self.edges_directed(idx, dir).map(|e| e.id().index()).collect()
        };
        let mut inc = if !petgraph::Graph::is_directed(self) {
            collect(Direction::Outgoing)
        } else {
            match mode {
                Mode::Out => collect(Direction::Outgoing),
                Mode::In => collect(Direction::Incoming),
                Mode::All => {
                    let mut both = collect(Direction::Outgoing);
                    both.extend(collect(Direction::Incoming));
                    both
                }
            }
        };
        inc.sort_by_key(|&e| (other_end(Graph::edge_endpoints(self, e), node), e));
        inc
    }
}
