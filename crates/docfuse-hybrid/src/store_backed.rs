use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use docfuse_core::config::EngineConfig;
use docfuse_core::error::{Error, Result};
use docfuse_core::traits::{Encoder, RecordSource, Segmenter};
use docfuse_core::types::{Record, SearchResult};

use crate::engine::{HybridSearcher, ReplaceOptions};
use crate::source::filter_window;

/// Index whose corpus is the recent window of an external record source.
///
/// Starts empty; the first search (or an explicit `reload`) pulls records.
#[derive(Clone)]
pub struct StoreBackedIndex {
    searcher: Arc<HybridSearcher>,
    source: Arc<dyn RecordSource>,
    vector_default: bool,
}

impl StoreBackedIndex {
    pub fn new(source: Arc<dyn RecordSource>, config: EngineConfig, segmenter: Arc<dyn Segmenter>, encoder: Arc<dyn Encoder>) -> Result<Self> {
        let vector_default = config.vector_by_default;
        let searcher = HybridSearcher::new(config, segmenter, encoder)?;
        Ok(Self { searcher: Arc::new(searcher), source, vector_default })
    }

    pub fn from_config(source: Arc<dyn RecordSource>, config: EngineConfig) -> Result<Self> {
        let vector_default = config.vector_by_default;
        let searcher = HybridSearcher::from_config(config)?;
        Ok(Self { searcher: Arc::new(searcher), source, vector_default })
    }

    pub fn with_vector_default(mut self, enabled: bool) -> Self {
        self.vector_default = enabled;
        self
    }

    pub fn searcher(&self) -> &Arc<HybridSearcher> { &self.searcher }

    pub fn len(&self) -> usize { self.searcher.len() }

    pub fn is_empty(&self) -> bool { self.searcher.is_empty() }

    /// Pull up to `limit` recent records, keep those inside `window`, and
    /// publish a new generation with a fitted lexical index. Vectors stay lazy.
    /// Returns the number of records kept.
    pub fn reload(&self, window: Duration, limit: usize) -> Result<usize> {
        self.reload_with(window, limit, false).map(|n| n.unwrap_or(0))
    }

    /// `reload` with the configured window and limit.
    pub fn reload_defaults(&self) -> Result<usize> {
        let (window, limit) = self.default_window();
        self.reload(window, limit)
    }

    fn default_window(&self) -> (Duration, usize) {
        let reload = &self.searcher.config().reload;
        (Duration::days(i64::from(reload.window_days)), reload.limit)
    }

    fn reload_with(&self, window: Duration, limit: usize, only_if_empty: bool) -> Result<Option<usize>> {
        let field = self.searcher.config().reload.timestamp_field.clone();
        let options = ReplaceOptions { carry_vectors: false, only_if_empty };
        let published = self.searcher.replace_with(options, || -> Result<Vec<Record>> {
            let fetched = self.source.fetch_recent(limit).map_err(|e| Error::SourceUnavailable(format!("{e:#}")))?;
            let fetched_count = fetched.len();
            let kept = filter_window(fetched, &field, window, Utc::now());
            info!(fetched = fetched_count, kept = kept.len(), window_days = window.num_days(), limit, "reloaded records");
            Ok(kept)
        })?;
        Ok(published.map(|generation| generation.len()))
    }

    /// Search with the configured vector default.
    pub fn search(&self, query: &str, top_n: usize) -> Vec<SearchResult> {
        self.search_with(query, top_n, self.vector_default)
    }

    pub fn search_with(&self, query: &str, top_n: usize, use_vector: bool) -> Vec<SearchResult> {
        if self.searcher.is_empty() {
            let (window, limit) = self.default_window();
            if let Err(e) = self.reload_with(window, limit, true) {
                warn!(error = %e, "implicit reload failed, returning no results");
                return vec![];
            }
        }
        self.searcher.search(query, top_n, use_vector)
    }

    pub fn warm_vectors(&self) -> Result<()> { self.searcher.warm_vectors() }

    /// `reload` on the blocking pool.
    pub fn spawn_reload(&self, window: Duration, limit: usize) -> JoinHandle<Result<usize>> {
        let index = self.clone();
        tokio::task::spawn_blocking(move || index.reload(window, limit))
    }

    /// `warm_vectors` on the blocking pool.
    pub fn spawn_warm(&self) -> JoinHandle<Result<()>> {
        let searcher = self.searcher.clone();
        tokio::task::spawn_blocking(move || searcher.warm_vectors())
    }
}
