//! Edge and loop weight specifications.
//!
//! A weight source is resolved once per call into a dense per-edge (or per-vertex)
//! vector, which the weighted spreading step indexes directly.

use std::fmt;
use std::sync::Arc;

use crate::graph::Graph;
use crate::{Error, Result};

pub type EdgeWeightFn = Arc<dyn Fn(usize, usize) -> f64 + Send + Sync>;
pub type VertexWeightFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Where edge weights come from.
#[derive(Clone)]
pub enum WeightSpec {
    /// A numeric edge attribute, e.g. [`crate::EDGE_WEIGHT_ATTR`].
    Attribute(String),
    /// One weight per edge id.
    List(Vec<f64>),
    /// Called with `(source, target)` of every edge.
    Function(EdgeWeightFn),
}

impl WeightSpec {
    pub fn attribute(name: impl Into<String>) -> Self {
        WeightSpec::Attribute(name.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Send + Sync + 'static,
    {
        WeightSpec::Function(Arc::new(f))
    }

    /// One weight per edge id.
    pub fn resolve<G: Graph + ?Sized>(&self, graph: &G) -> Result<Vec<f64>> {
        let m = graph.edge_count();
        match self {
            WeightSpec::Attribute(name) => (0..m)
                .map(|e| {
                    graph
                        .edge_attr(e, name)
                        .ok_or_else(|| Error::MissingAttribute(format!("edge {e} has no '{name}'")))
                })
                .collect(),
            WeightSpec::List(values) => {
                if values.len() != m {
                    return Err(Error::InvalidParameter(format!(
                        "weight list length must equal edge_count (len={} edge_count={})",
                        values.len(),
                        m
                    )));
                }
                Ok(values.clone())
            }
            WeightSpec::Function(f) => Ok((0..m)
                .map(|e| {
                    let (s, t) = graph.edge_endpoints(e);
                    f(s, t)
                })
                .collect()),
        }
    }
}

impl fmt::Debug for WeightSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSpec::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            WeightSpec::List(values) => f.debug_tuple("List").field(values).finish(),
            WeightSpec::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Weight of the virtual self-loop added when walking with loops.
#[derive(Clone)]
pub enum LoopWeight {
    Uniform(f64),
    /// A numeric vertex attribute.
    Attribute(String),
    /// One weight per vertex id.
    List(Vec<f64>),
    Function(VertexWeightFn),
}

impl Default for LoopWeight {
    fn default() -> Self {
        LoopWeight::Uniform(1.0)
    }
}

impl LoopWeight {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        LoopWeight::Function(Arc::new(f))
    }

    /// One weight per vertex id.
    pub fn resolve<G: Graph + ?Sized>(&self, graph: &G) -> Result<Vec<f64>> {
        let n = graph.node_count();
        match self {
            LoopWeight::Uniform(w) => Ok(vec![*w; n]),
            LoopWeight::Attribute(name) => (0..n)
                .map(|v| {
                    graph
                        .vertex_attr(v, name)
                        .ok_or_else(|| Error::MissingAttribute(format!("vertex {v} has no '{name}'")))
                })
                .collect(),
            LoopWeight::List(values) => {
                if values.len() != n {
                    return Err(Error::InvalidParameter(format!(
                        "loop weight list length must equal node_count (len={} node_count={})",
                        values.len(),
                        n
                    )));
                }
                Ok(values.clone())
            }
            LoopWeight::Function(f) => Ok((0..n).map(&**f).collect()),
        }
    }
}

impl fmt::Debug for LoopWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopWeight::Uniform(w) => f.debug_tuple("Uniform").field(w).finish(),
            LoopWeight::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            LoopWeight::List(values) => f.debug_tuple("List").field(values).finish(),
            LoopWeight::Function(_) => f.write_str("Function(..)"),
        }
    }
}
