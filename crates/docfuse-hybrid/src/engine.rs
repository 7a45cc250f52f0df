use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use docfuse_core::config::EngineConfig;
use docfuse_core::error::Result;
use docfuse_core::traits::{Encoder, Segmenter};
use docfuse_core::types::{rank_by_score, FitState, Record, SearchResult};
use docfuse_embed::encoder_from_config;
use docfuse_text::UnicodeSegmenter;
use docfuse_vector::VectorIndex;

use crate::fusion;
use crate::generation::Generation;

/// How a corpus replacement treats the vector index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplaceOptions {
    /// Fit vectors before publishing when the outgoing generation had them fitted.
    pub carry_vectors: bool,
    /// Skip the replacement if another caller already populated the corpus.
    pub only_if_empty: bool,
}

/// Retrieval orchestrator: owns the published generation and answers
/// `search` by fusing lexical and (optionally) vector rankings.
///
/// Replacements build the next generation off to the side and swap one
/// `Arc` under a write lock; searches clone the `Arc` under a read lock and
/// score without holding any lock.
pub struct HybridSearcher {
    config: EngineConfig,
    segmenter: Arc<dyn Segmenter>,
    encoder: Arc<dyn Encoder>,
    current: RwLock<Arc<Generation>>,
    /// Serialises replacements; holds the last issued generation number.
    replacing: Mutex<u64>,
}

impl HybridSearcher {
    pub fn new(config: EngineConfig, segmenter: Arc<dyn Segmenter>, encoder: Arc<dyn Encoder>) -> Result<Self> {
        config.validate()?;
        let current = RwLock::new(Arc::new(Generation::empty(&config)));
        Ok(Self { config, segmenter, encoder, current, replacing: Mutex::new(0) })
    }

    /// Unicode segmenter plus the encoder selected by `config.embedding`.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let encoder = encoder_from_config(&config.embedding);
        Self::new(config, Arc::new(UnicodeSegmenter::new()), encoder)
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn encoder(&self) -> &Arc<dyn Encoder> { &self.encoder }

    /// The currently published generation.
    pub fn snapshot(&self) -> Arc<Generation> { self.current.read().clone() }

    pub fn generation(&self) -> u64 { self.snapshot().number() }

    pub fn len(&self) -> usize { self.snapshot().len() }

    pub fn is_empty(&self) -> bool { self.snapshot().is_empty() }

    pub fn lexical_state(&self) -> FitState { self.snapshot().lexical_state() }

    pub fn vector_state(&self) -> FitState { self.snapshot().vector_state() }

    /// Replace the corpus with `records`; vectors stay unfitted until needed.
    pub fn load(&self, records: Vec<Record>) -> Arc<Generation> {
        self.replace(records, false)
    }

    pub(crate) fn replace(&self, records: Vec<Record>, carry_vectors: bool) -> Arc<Generation> {
        let mut last = self.replacing.lock();
        self.publish(&mut last, records, carry_vectors)
    }

    pub(crate) fn replace_with<F>(&self, options: ReplaceOptions, produce: F) -> Result<Option<Arc<Generation>>>
    where
        F: FnOnce() -> Result<Vec<Record>>,
    {
        let mut last = self.replacing.lock();
        if options.only_if_empty && !self.snapshot().is_empty() {
            return Ok(None);
        }
        let records = produce()?;
        Ok(Some(self.publish(&mut last, records, options.carry_vectors)))
    }

    /// Build the next generation fully, then swap it in. Caller holds the
    /// replace lock.
    fn publish(&self, last: &mut u64, records: Vec<Record>, carry_vectors: bool) -> Arc<Generation> {
        let previous = self.snapshot();
        let number = *last + 1;
        let next = Generation::build(number, records, &self.config, self.segmenter.as_ref());
        if carry_vectors && previous.vector_state().is_fitted() && !next.is_empty() {
            // a failure is memoized in the new generation and logged there
            let _ = next.ensure_vectors(self.encoder.as_ref(), self.config.embedding.batch_size);
        }
        let next = Arc::new(next);
        *self.current.write() = next.clone();
        *last = number;
        next
    }

    /// Fit the vector index of the current generation now instead of on the
    /// first vector query.
    pub fn warm_vectors(&self) -> Result<()> {
        self.snapshot()
            .ensure_vectors(self.encoder.as_ref(), self.config.embedding.batch_size)
            .map(|_| ())
    }

    /// Top `top_n` documents for `query`, lexical always, vector when requested
    /// and available. Never fails: problems degrade to fewer signals or `[]`.
    pub fn search(&self, query: &str, top_n: usize, use_vector: bool) -> Vec<SearchResult> {
        let generation = self.snapshot();
        self.search_in(&generation, query, top_n, use_vector)
    }

    /// Search a specific generation, e.g. a snapshot taken before an update.
    pub fn search_in(&self, generation: &Generation, query: &str, top_n: usize, use_vector: bool) -> Vec<SearchResult> {
        if !generation.lexical().is_fitted() || query.is_empty() || top_n == 0 {
            return vec![];
        }
        let tokens = self.segmenter.tokenize(query);
        let lexical_scores = match generation.lexical().score(&tokens) {
            Ok(scores) => scores,
            Err(e) => { warn!(error = %e, "lexical scoring failed"); return vec![]; }
        };
        let mut lists = vec![rank_by_score(&lexical_scores)];

        let mut vector_scores: Option<Vec<f32>> = None;
        if use_vector {
            match generation.ensure_vectors(self.encoder.as_ref(), self.config.embedding.batch_size) {
                Ok(index) => match index.score(query, self.encoder.as_ref()) {
                    Ok(scores) => {
                        lists.push(VectorIndex::rank_scores(&scores));
                        vector_scores = Some(scores);
                    }
                    Err(e) => warn!(error = %e, "query encoding failed, lexical-only for this query"),
                },
                Err(e) => debug!(generation = generation.number(), error = %e, "vector search unavailable"),
            }
        }

        let ranking = fusion::fuse(&lists, self.config.rrf_k);
        debug!(query, signals = lists.len(), hits = ranking.len().min(top_n), "search");
        ranking
            .into_iter()
            .take(top_n)
            .filter_map(|id| {
                let record = generation.store().record(id)?.clone();
                Some(SearchResult {
                    doc_id: id,
                    record,
                    lexical_score: lexical_scores[id],
                    vector_score: vector_scores.as_ref().map(|s| s[id]),
                })
            })
            .collect()
    }
}
