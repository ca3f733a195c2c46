//! `proxwalk`: Prox random walks over graphs.
//!
//! Proximity ("prox") scores are the landing distribution of short random walks
//! started from a set of vertices. On top of that this crate provides
//! confluence (prox normalized by the degree-proportional background),
//! bipartite-to-unipartite projection, and top-k extraction.
//!
//! Public invariants:
//! - **Purity**: no operator mutates its input graph; derived graphs and
//!   vectors are returned as new values.
//! - **Dead walkers**: mass sitting on a vertex with no usable neighbor is
//!   dropped, never redistributed. Output vectors may sum to less than one.
//! - **Determinism**: exact operators iterate sparse vectors in vertex-id order;
//!   Monte-Carlo operators are deterministic given the caller's RNG state.

pub mod builder;
pub mod clustering;
pub mod confluence;
pub mod extraction;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod projection;
pub mod prox;
pub mod random_walk;
pub mod spreading;
pub mod topk;
pub mod vector;
pub mod weight;

pub use builder::{formula, GraphBuilder};
pub use clustering::{connected_components, graph_is_bipartite, graph_is_trivial, one_cluster};
pub use confluence::{confluence, confluence_simple, edge_confluence, ConfluenceOptions};
pub use extraction::{
    extract_bigraph, extract_bipartite, vertex_ids, ExtractConfig, ProxExtract,
    ProxExtractGlobal, ProxMethod,
};
pub use filter::{bottom_filter, BottomFilterConfig};
pub use graph::{AttrGraph, Graph, Mode, EDGE_WEIGHT_ATTR};
pub use layout::{prox_bigraph_layout, prox_layout};
pub use projection::{bigraph_projection, ProjectionWeight, NULL_EDGE_EPSILON};
pub use prox::{
    prox_markov_dict, prox_markov_list, prox_markov_wgt, prox_markov_wgt_list, ProxConfig,
};
pub use random_walk::{prox_markov_mtcl, prox_markov_mtcl_seeded, MonteCarloConfig, MonteCarloRun};
pub use spreading::{spreading, spreading_wgt};
pub use topk::{normalize, sortcut, sortcut_dense};
pub use vector::{normalise, normalize_pzero, PZero, SparseVec};
pub use weight::{LoopWeight, WeightSpec};

#[cfg(feature = "parallel")]
pub use layout::prox_layout_parallel;
#[cfg(feature = "parallel")]
pub use projection::bigraph_projection_parallel;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("missing attribute: {0}")]
    MissingAttribute(String),
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

impl Error {
    /// True for parameter combinations that are deliberately unsupported.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
