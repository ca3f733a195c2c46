//! Incremental graph construction keyed by vertex identifiers, and a small
//! textual graph notation.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::graph::{AttrGraph, Graph};
use crate::{Error, Result};

/// Builds an [`AttrGraph`] from string identifiers.
///
/// Vertices are numbered in order of first appearance and named after their
/// identifier.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: AttrGraph,
    index: HashMap<String, usize>,
    edge_index: HashMap<(usize, usize), usize>,
    types: Vec<Option<bool>>,
    vertex_attrs: BTreeMap<String, Vec<f64>>,
    edge_attrs: BTreeMap<String, Vec<f64>>,
}

impl GraphBuilder {
    pub fn new(directed: bool) -> Self {
        Self {
            graph: AttrGraph::new(0, directed),
            index: HashMap::new(),
            edge_index: HashMap::new(),
            types: Vec::new(),
            vertex_attrs: BTreeMap::new(),
            edge_attrs: BTreeMap::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.types.len()
    }

    pub fn vertex_id(&self, ident: &str) -> Option<usize> {
        self.index.get(ident).copied()
    }

    /// Id of the vertex named `ident`, created if needed.
    pub fn add_get_vertex(&mut self, ident: &str) -> usize {
        if let Some(&vid) = self.index.get(ident) {
            return vid;
        }
        let vid = self.graph.add_named_vertex(ident);
        self.index.insert(ident.to_string(), vid);
        self.types.push(None);
        vid
    }

    /// Id of the edge `from -> to` (or `from -- to`), created if needed.
    pub fn add_get_edge(&mut self, from: usize, to: usize) -> Result<usize> {
        let key = self.edge_key(from, to);
        if let Some(&eid) = self.edge_index.get(&key) {
            return Ok(eid);
        }
        let eid = self.graph.add_edge(from, to)?;
        self.edge_index.insert(key, eid);
        Ok(eid)
    }

    /// Always adds a new edge, even if one already joins the two vertices.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<usize> {
        let eid = self.graph.add_edge(from, to)?;
        let key = self.edge_key(from, to);
        self.edge_index.entry(key).or_insert(eid);
        Ok(eid)
    }

    fn edge_key(&self, from: usize, to: usize) -> (usize, usize) {
        if self.graph.is_directed() {
            (from, to)
        } else {
            (from.min(to), from.max(to))
        }
    }

    pub fn set_type(&mut self, vid: usize, value: bool) -> Result<()> {
        let slot = self.types.get_mut(vid).ok_or(Error::IndexOutOfBounds(vid))?;
        *slot = Some(value);
        Ok(())
    }

    pub fn set_vertex_attr(&mut self, vid: usize, name: &str, value: f64) -> Result<()> {
        if vid >= self.types.len() {
            return Err(Error::IndexOutOfBounds(vid));
        }
        let values = self.vertex_attrs.entry(name.to_string()).or_default();
        if values.len() <= vid {
            values.resize(vid + 1, 0.0);
        }
        values[vid] = value;
        Ok(())
    }

    pub fn set_edge_attr(&mut self, eid: usize, name: &str, value: f64) -> Result<()> {
        *self.edge_slot(eid, name)? = value;
        Ok(())
    }

    pub fn incr_edge_attr(&mut self, eid: usize, name: &str, inc: f64) -> Result<()> {
        *self.edge_slot(eid, name)? += inc;
        Ok(())
    }

    pub fn get_edge_attr(&self, eid: usize, name: &str) -> Option<f64> {
        self.edge_attrs.get(name).and_then(|values| values.get(eid)).copied()
    }

    fn edge_slot(&mut self, eid: usize, name: &str) -> Result<&mut f64> {
        if eid >= self.graph.edge_count() {
            return Err(Error::IndexOutOfBounds(eid));
        }
        let values = self.edge_attrs.entry(name.to_string()).or_default();
        if values.len() <= eid {
            values.resize(eid + 1, 0.0);
        }
        Ok(&mut values[eid])
    }

    /// Finishes the graph. Unset attribute values are `0.0`; `type` is only
    /// set when at least one vertex was given one (others default to `false`).
    pub fn build(self) -> Result<AttrGraph> {
        let mut graph = self.graph;
        let n = graph.node_count();
        let m = graph.edge_count();
        if self.types.iter().any(Option::is_some) {
            graph.set_types(self.types.iter().map(|t| t.unwrap_or(false)).collect())?;
        }
        for (name, mut values) in self.vertex_attrs {
            values.resize(n, 0.0);
            graph.set_vertex_attr(name, values)?;
        }
        for (name, mut values) in self.edge_attrs {
            values.resize(m, 0.0);
            graph.set_edge_attr(name, values)?;
        }
        Ok(graph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Undirected,
    Forward,
    Backward,
    Both,
}

/// Builds a graph from a compact notation.
///
/// - terms are separated by `,`; a term is a chain `g1 op g2 op g3 ...`;
/// - a group is one or more names joined by `:` and links every member;
/// - `op` is `--` (undirected), `-->`, `<--` or `<->` (any number of dashes);
/// - any arrow makes the whole graph directed, and then `--` is rejected.
///
/// With `simplify`, self-loops and repeated edges are dropped.
///
/// ```
/// use proxwalk::{formula, Graph};
/// let g = formula("a:b--C, b-->b", false);
/// assert!(g.is_err()); // mixes `--` and arrows
/// let g = formula("a:b--C:D, d--D", true).unwrap();
/// assert_eq!(g.node_count(), 5);
/// assert_eq!(g.edge_count(), 5);
/// ```
pub fn formula(text: &str, simplify: bool) -> Result<AttrGraph> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<(Vec<String>, Link, Vec<String>)> = Vec::new();

    for term in text.split(',') {
        let (groups, ops) = parse_term(term)?;
        for group in &groups {
            for name in group {
                if seen.insert(name.clone()) {
                    names.push(name.clone());
                }
            }
        }
        for (i, op) in ops.into_iter().enumerate() {
            links.push((groups[i].clone(), op, groups[i + 1].clone()));
        }
    }

    let directed = links.iter().any(|(_, op, _)| *op != Link::Undirected);
    if directed && links.iter().any(|(_, op, _)| *op == Link::Undirected) {
        return Err(Error::InvalidParameter(
            "formula mixes undirected `--` with arrows".to_string(),
        ));
    }

    let mut builder = GraphBuilder::new(directed);
    for name in &names {
        builder.add_get_vertex(name);
    }
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (left, op, right) in &links {
        for l in left {
            for r in right {
                let (a, b) = (builder.add_get_vertex(l), builder.add_get_vertex(r));
                match op {
                    Link::Undirected | Link::Forward => pairs.push((a, b)),
                    Link::Backward => pairs.push((b, a)),
                    Link::Both => {
                        pairs.push((a, b));
                        pairs.push((b, a));
                    }
                }
            }
        }
    }
    for (a, b) in pairs {
        if simplify {
            if a == b {
                continue;
            }
            builder.add_get_edge(a, b)?;
        } else {
            builder.add_edge(a, b)?;
        }
    }
    builder.build()
}

fn parse_term(term: &str) -> Result<(Vec<Vec<String>>, Vec<Link>)> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut ops: Vec<Link> = Vec::new();
    let mut group: Vec<String> = Vec::new();
    let mut name = String::new();
    let mut chars = term.chars().peekable();

    let flush_name = |name: &mut String, group: &mut Vec<String>| -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidParameter(format!("empty vertex name in '{term}'")));
        }
        group.push(trimmed.to_string());
        name.clear();
        Ok(())
    };

    while let Some(c) = chars.next() {
        match c {
            ':' => flush_name(&mut name, &mut group)?,
            '<' | '-' => {
                flush_name(&mut name, &mut group)?;
                groups.push(std::mem::take(&mut group));
                let left = c == '<';
                let mut dashes = usize::from(c == '-');
                while chars.peek() == Some(&'-') {
                    chars.next();
                    dashes += 1;
                }
                let right = chars.peek() == Some(&'>');
                if right {
                    chars.next();
                }
                if dashes == 0 {
                    return Err(Error::InvalidParameter(format!("malformed link in '{term}'")));
                }
                ops.push(match (left, right) {
                    (false, false) => Link::Undirected,
                    (false, true) => Link::Forward,
                    (true, false) => Link::Backward,
                    (true, true) => Link::Both,
                });
            }
            '>' => return Err(Error::InvalidParameter(format!("malformed link in '{term}'"))),
            _ => name.push(c),
        }
    }
    if term.trim().is_empty() {
        return Ok((groups, ops));
    }
    flush_name(&mut name, &mut group)?;
    groups.push(group);
    Ok((groups, ops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Mode;

    #[test]
    fn path_formula() {
        let g = formula("a--b--c--d", true).unwrap();
        assert!(!g.is_directed());
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edges(), &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(g.name(3), Some("d"));
    }

    #[test]
    fn groups_link_every_member() {
        let g = formula("a:b:c--A:B:C:D, d--D:E, c:d--F", true).unwrap();
        let names: Vec<&str> = (0..g.node_count()).filter_map(|v| g.name(v)).collect();
        assert_eq!(names, vec!["a", "b", "c", "A", "B", "C", "D", "d", "E", "F"]);
        assert_eq!(g.edge_count(), 12 + 2 + 2);
        assert_eq!(g.degree(g.find("D").unwrap()), 4);
    }

    #[test]
    fn arrows_make_a_directed_graph() {
        let g = formula("a<->b<->c", false).unwrap();
        assert!(g.is_directed());
        assert_eq!(g.edges(), &[(0, 1), (1, 0), (1, 2), (2, 1)]);

        let g = formula("a<--b", false).unwrap();
        assert_eq!(g.edges(), &[(1, 0)]);
        assert_eq!(g.neighbors(1, Mode::Out), vec![0]);
    }

    #[test]
    fn simplify_drops_loops_and_repeats() {
        let g = formula("a--b, b--a, a--a", true).unwrap();
        assert_eq!(g.edge_count(), 1);
        let g = formula("a--b, b--a, a--a", false).unwrap();
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn isolated_vertices() {
        let g = formula("a, b, c", true).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn malformed_formulas_are_rejected() {
        assert!(formula("a--", true).is_err());
        assert!(formula("a>b", true).is_err());
        assert!(formula("a--b, c-->d", true).is_err());
    }

    #[test]
    fn builder_reuses_vertices_and_edges() {
        let mut b = GraphBuilder::new(false);
        let x = b.add_get_vertex("x");
        let y = b.add_get_vertex("y");
        assert_eq!(b.add_get_vertex("x"), x);
        let e = b.add_get_edge(x, y).unwrap();
        assert_eq!(b.add_get_edge(y, x).unwrap(), e);
        b.incr_edge_attr(e, "weight", 1.0).unwrap();
        b.incr_edge_attr(e, "weight", 2.0).unwrap();
        b.set_type(x, true).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.edge_attr(e, "weight"), Some(3.0));
        assert_eq!(g.types().unwrap(), &[true, false]);
        assert_eq!(g.name(x), Some("x"));
        assert_eq!(g.name(y), Some("y"));
    }

    #[test]
    fn unset_vertex_attributes_default_to_zero() {
        let mut b = GraphBuilder::new(false);
        for name in ["a", "b", "c"] {
            b.add_get_vertex(name);
        }
        b.set_vertex_attr(2, "loop", 4.0).unwrap();
        assert!(b.set_vertex_attr(3, "loop", 1.0).is_err());
        let g = b.build().unwrap();
        assert_eq!(g.vertex_attr_values("loop"), Some(&[0.0, 0.0, 4.0][..]));
        assert_eq!(g.vertex_attr(2, "loop"), Some(4.0));
        assert_eq!(g.vertex_attr_values("missing"), None);
    }
}
