use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use docfuse_core::config::EngineConfig;
use docfuse_core::error::Result;
use docfuse_core::traits::{Encoder, Segmenter};
use docfuse_core::types::{Record, SearchResult};

use crate::engine::HybridSearcher;
use crate::generation::Generation;

/// Ephemeral index over a caller-supplied record list.
///
/// Cloning is cheap and shares the same corpus.
#[derive(Clone)]
pub struct InMemoryIndex {
    searcher: Arc<HybridSearcher>,
    vector_default: bool,
}

impl InMemoryIndex {
    pub fn new(records: Vec<Record>, config: EngineConfig, segmenter: Arc<dyn Segmenter>, encoder: Arc<dyn Encoder>) -> Result<Self> {
        let vector_default = config.vector_by_default;
        let searcher = HybridSearcher::new(config, segmenter, encoder)?;
        searcher.load(records);
        Ok(Self { searcher: Arc::new(searcher), vector_default })
    }

    pub fn from_config(records: Vec<Record>, config: EngineConfig) -> Result<Self> {
        let vector_default = config.vector_by_default;
        let searcher = HybridSearcher::from_config(config)?;
        searcher.load(records);
        Ok(Self { searcher: Arc::new(searcher), vector_default })
    }

    pub fn with_vector_default(mut self, enabled: bool) -> Self {
        self.vector_default = enabled;
        self
    }

    pub fn searcher(&self) -> &Arc<HybridSearcher> { &self.searcher }

    pub fn len(&self) -> usize { self.searcher.len() }

    pub fn is_empty(&self) -> bool { self.searcher.is_empty() }

    pub fn search(&self, query: &str, top_n: usize) -> Vec<SearchResult> {
        self.searcher.search(query, top_n, self.vector_default)
    }

    pub fn search_with(&self, query: &str, top_n: usize, use_vector: bool) -> Vec<SearchResult> {
        self.searcher.search(query, top_n, use_vector)
    }

    /// Replace the whole corpus. Old embeddings are dropped; if vectors were
    /// fitted before, the new generation is fitted before it is published.
    pub fn update(&self, records: Vec<Record>) -> Arc<Generation> {
        let count = records.len();
        let published = self.searcher.replace(records, true);
        info!(generation = published.number(), records = count, "in-memory corpus updated");
        published
    }

    pub fn warm_vectors(&self) -> Result<()> { self.searcher.warm_vectors() }

    /// `update` on the blocking pool.
    pub fn spawn_update(&self, records: Vec<Record>) -> JoinHandle<Arc<Generation>> {
        let index = self.clone();
        tokio::task::spawn_blocking(move || index.update(records))
    }

    /// `warm_vectors` on the blocking pool.
    pub fn spawn_warm(&self) -> JoinHandle<Result<()>> {
        let searcher = self.searcher.clone();
        tokio::task::spawn_blocking(move || searcher.warm_vectors())
    }
}
