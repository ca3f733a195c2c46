//! Pruning of badly connected bottom (`type=False`) vertices of a bigraph.

use crate::graph::{AttrGraph, Graph};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BottomFilterConfig {
    /// Bottom vertices with at most this many neighbors are removed.
    pub top_min: usize,
    /// Bottom vertices linked to more than this share of the top vertices are removed.
    pub top_max_ratio: f64,
}

impl Default for BottomFilterConfig {
    fn default() -> Self {
        Self { top_min: 0, top_max_ratio: 1.0 }
    }
}

impl BottomFilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_max_ratio.is_nan() || self.top_max_ratio < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "top_max_ratio must be >= 0 (got {})",
                self.top_max_ratio
            )));
        }
        Ok(())
    }
}

/// Copy of `graph` without the `type=False` vertices whose degree is
/// `<= top_min` or `> top_max_ratio * |top vertices|`.
///
/// Remaining vertices keep their relative order.
pub fn bottom_filter(graph: &AttrGraph, config: BottomFilterConfig) -> Result<AttrGraph> {
    config.validate()?;
    if !graph.is_bipartite() {
        return Err(Error::Precondition("bottom filter needs a bipartite graph".to_string()));
    }
    let types = graph.types().unwrap_or(&[]);
    let top_count = types.iter().filter(|&&t| t).count();
    let max_degree = config.top_max_ratio * top_count as f64;
    tracing::info!(
        top = top_count,
        bottom = types.len() - top_count,
        edges = graph.edge_count(),
        "bottom filter: before"
    );

    let mut too_poor = 0usize;
    let mut too_rich = 0usize;
    let mut keep = Vec::with_capacity(types.len());
    for (v, &is_top) in types.iter().enumerate() {
        if !is_top {
            let degree = graph.degree(v);
            if degree <= config.top_min {
                too_poor += 1;
                continue;
            }
            if degree as f64 > max_degree {
                too_rich += 1;
                continue;
            }
        }
        keep.push(v);
    }
    let filtered = graph.induced_subgraph(&keep)?;
    tracing::info!(
        too_poor,
        too_rich,
        top_min = config.top_min,
        max_degree,
        "bottom filter: removed bottom vertices"
    );
    tracing::info!(
        vertices = filtered.node_count(),
        edges = filtered.edge_count(),
        "bottom filter: after"
    );
    Ok(filtered)
}
