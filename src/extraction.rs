//! Extraction: the `vcount` vertices most related to a query.
//!
//! A query is a starting distribution `p0`; the answer is a prox (or
//! confluence) vector cut down to its best entries by [`sortcut`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::confluence::confluence_simple;
use crate::graph::{Graph, Mode};
use crate::prox::{prox_markov_dict, prox_markov_wgt, ProxConfig};
use crate::random_walk::{prox_markov_mtcl, MonteCarloConfig};
use crate::topk::sortcut;
use crate::vector::{PZero, SparseVec};
use crate::weight::{LoopWeight, WeightSpec};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractConfig {
    /// Maximum number of vertices returned.
    pub vcount: usize,
    /// Random walk length.
    pub length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { vcount: 10, length: 3 }
    }
}

/// Scoring engine behind a [`ProxExtractGlobal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProxMethod {
    /// Exact prox.
    #[default]
    Markov,
    /// Monte-Carlo prox with a fresh `ChaCha8Rng` per query.
    MonteCarlo { throws: usize, seed: u64 },
    /// Confluence of every reached vertex.
    Confluence,
}

/// Extraction with a caller-supplied scoring function.
///
/// The scorer receives the graph, `p0` and the walk length; any other
/// parameter is captured by the closure.
///
/// ```
/// use proxwalk::{formula, prox_markov_dict, AttrGraph, ExtractConfig, PZero, ProxConfig, ProxExtract};
/// let g = formula("a--b--c--d", true).unwrap();
/// let extract = ProxExtract::new(|g: &AttrGraph, p0: &PZero, length: usize| {
///     prox_markov_dict(g, p0, ProxConfig::with_length(length))
/// });
/// let top = extract.extract(&g, &PZero::from([0]), ExtractConfig { vcount: 1, length: 2 }).unwrap();
/// assert_eq!(top, vec![(0, 0.5)]);
/// ```
pub struct ProxExtract<F> {
    scorer: F,
}

impl<F> ProxExtract<F> {
    pub fn new(scorer: F) -> Self {
        Self { scorer }
    }

    pub fn extract<G>(&self, graph: &G, p0: &PZero, config: ExtractConfig) -> Result<Vec<(usize, f64)>>
    where
        G: Graph + ?Sized,
        F: Fn(&G, &PZero, usize) -> Result<SparseVec>,
    {
        let scores = (self.scorer)(graph, p0, config.length)?;
        Ok(sortcut(&scores, config.vcount))
    }
}

/// Extraction bound to one global graph.
///
/// Built with [`ProxExtractGlobal::new`] and tuned with the `with_*` methods;
/// every query then only supplies `p0` and an [`ExtractConfig`].
pub struct ProxExtractGlobal<'g, G: Graph + ?Sized> {
    graph: &'g G,
    method: ProxMethod,
    mode: Mode,
    add_loops: bool,
    weight: Option<WeightSpec>,
    loops_weight: LoopWeight,
}

impl<'g, G: Graph + ?Sized> ProxExtractGlobal<'g, G> {
    pub fn new(graph: &'g G, method: ProxMethod) -> Self {
        Self {
            graph,
            method,
            mode: Mode::Out,
            add_loops: false,
            weight: None,
            loops_weight: LoopWeight::default(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_loops(mut self, add_loops: bool) -> Self {
        self.add_loops = add_loops;
        self
    }

    /// Weighted walks. Only [`ProxMethod::Markov`] supports them.
    pub fn with_weight(mut self, weight: WeightSpec, loops_weight: LoopWeight) -> Self {
        self.weight = Some(weight);
        self.loops_weight = loops_weight;
        self
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    fn prox_config(&self, length: usize) -> ProxConfig {
        ProxConfig { length, mode: self.mode, add_loops: self.add_loops }
    }

    /// Full score vector of a `length`-step query.
    pub fn scores(&self, p0: &PZero, length: usize) -> Result<SparseVec> {
        match self.method {
            ProxMethod::Markov => match &self.weight {
                Some(weight) => prox_markov_wgt(
                    self.graph,
                    p0,
                    self.prox_config(length),
                    weight,
                    &self.loops_weight,
                ),
                None => prox_markov_dict(self.graph, p0, self.prox_config(length)),
            },
            ProxMethod::MonteCarlo { throws, seed } => {
                let config = MonteCarloConfig {
                    length,
                    throws,
                    mode: self.mode,
                    add_loops: self.add_loops,
                    seed,
                };
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let run = prox_markov_mtcl(self.graph, p0, config, self.weight.as_ref(), &mut rng)?;
                Ok(run.scores)
            }
            ProxMethod::Confluence => {
                if self.weight.is_some() {
                    return Err(Error::NotImplemented("weighted confluence"));
                }
                confluence_simple(self.graph, p0, self.prox_config(length))
            }
        }
    }

    /// The `config.vcount` best vertices of a `config.length`-step query.
    pub fn extract(&self, p0: &PZero, config: ExtractConfig) -> Result<Vec<(usize, f64)>> {
        if config.vcount == 0 {
            return Ok(Vec::new());
        }
        let scores = self.scores(p0, config.length)?;
        let top = sortcut(&scores, config.vcount);
        tracing::debug!(
            method = ?self.method,
            length = config.length,
            vcount = config.vcount,
            reached = scores.len(),
            "extraction done"
        );
        Ok(top)
    }

    /// Bipartite-aware extraction: walks of length `2t - 1` and `2t` for
    /// `t = config.length`, each cut to `config.vcount`, concatenated in that
    /// order. A vertex may appear in both halves.
    pub fn extract_bigraph(&self, p0: &PZero, config: ExtractConfig) -> Result<Vec<(usize, f64)>> {
        if config.length == 0 {
            return Err(Error::InvalidParameter("bigraph extraction needs length >= 1".to_string()));
        }
        let odd = ExtractConfig { length: 2 * config.length - 1, ..config };
        let even = ExtractConfig { length: 2 * config.length, ..config };
        let mut top = self.extract(p0, odd)?;
        top.extend(self.extract(p0, even)?);
        Ok(top)
    }
}

/// [`ProxExtractGlobal::extract_bigraph`] with exact, unweighted, loop-free
/// walks along outgoing edges.
pub fn extract_bigraph<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ExtractConfig,
) -> Result<Vec<(usize, f64)>> {
    ProxExtractGlobal::new(graph, ProxMethod::Markov).extract_bigraph(p0, config)
}

/// Neighborhood of `p0` in a bipartite graph: prox vectors of length `t` and
/// `t + 1` merged (the longer walk wins on shared vertices), then cut to
/// `config.vcount`.
pub fn extract_bipartite<G: Graph + ?Sized>(
    graph: &G,
    p0: &PZero,
    config: ExtractConfig,
    mode: Mode,
    add_loops: bool,
) -> Result<Vec<(usize, f64)>> {
    let prox = |length| prox_markov_dict(graph, p0, ProxConfig { length, mode, add_loops });
    let mut merged = prox(config.length)?;
    merged.extend(prox(config.length + 1)?);
    Ok(sortcut(&merged, config.vcount))
}

/// Drops the scores of an extraction result.
pub fn vertex_ids(extracted: &[(usize, f64)]) -> Vec<usize> {
    extracted.iter().map(|&(v, _)| v).collect()
}
