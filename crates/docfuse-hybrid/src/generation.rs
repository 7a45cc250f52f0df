use std::sync::OnceLock;

use tracing::{info, warn};

use docfuse_core::config::EngineConfig;
use docfuse_core::error::{Error, Result};
use docfuse_core::traits::{Encoder, Segmenter};
use docfuse_core::types::{FitState, IndexKind, Record};
use docfuse_text::Bm25Index;
use docfuse_vector::VectorIndex;

use crate::store::DocumentStore;

#[derive(Debug)]
enum VectorSlot {
    Fitted(VectorIndex),
    Failed(String),
}

/// One immutable corpus snapshot: documents, lexical index and a vector slot
/// that is filled at most once.
///
/// The vector slot is only written when a fit attempt finishes, so readers
/// never see a partially populated embedding matrix.
#[derive(Debug)]
pub struct Generation {
    number: u64,
    store: DocumentStore,
    lexical: Bm25Index,
    vector: OnceLock<VectorSlot>,
}

impl Generation {
    pub fn empty(config: &EngineConfig) -> Self {
        Self { number: 0, store: DocumentStore::default(), lexical: Bm25Index::new(config.bm25), vector: OnceLock::new() }
    }

    /// Build the document store and fit the lexical index synchronously.
    pub fn build(number: u64, records: Vec<Record>, config: &EngineConfig, segmenter: &dyn Segmenter) -> Self {
        let store = DocumentStore::build(records, &config.text_fields, segmenter);
        let mut lexical = Bm25Index::new(config.bm25);
        lexical.fit(store.iter().map(|d| d.tokens.as_slice()));
        info!(generation = number, docs = store.len(), "corpus generation built");
        Self { number, store, lexical, vector: OnceLock::new() }
    }

    pub fn number(&self) -> u64 { self.number }

    pub fn store(&self) -> &DocumentStore { &self.store }

    pub fn lexical(&self) -> &Bm25Index { &self.lexical }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    pub fn lexical_state(&self) -> FitState {
        if self.lexical.is_fitted() { FitState::Fitted(self.number) } else { FitState::Unfitted }
    }

    pub fn vector_state(&self) -> FitState {
        match self.vector.get() {
            None => FitState::Unfitted,
            Some(VectorSlot::Fitted(_)) => FitState::Fitted(self.number),
            Some(VectorSlot::Failed(_)) => FitState::FitFailed(self.number),
        }
    }

    /// The fitted vector index, if a fit already succeeded.
    pub fn vector_index(&self) -> Option<&VectorIndex> {
        match self.vector.get() {
            Some(VectorSlot::Fitted(index)) => Some(index),
            _ => None,
        }
    }

    /// Fit the vector index on first use and memoize the outcome, success or
    /// failure, for the rest of this generation. Concurrent callers wait for
    /// the single attempt.
    pub fn ensure_vectors(&self, encoder: &dyn Encoder, batch_size: usize) -> Result<&VectorIndex> {
        if self.store.is_empty() {
            return Err(Error::NotFitted(IndexKind::Vector));
        }
        let slot = self.vector.get_or_init(|| match VectorIndex::fit(&self.store.texts(), encoder, batch_size) {
            Ok(index) => VectorSlot::Fitted(index),
            Err(e) => {
                warn!(generation = self.number, error = %e, "vector fit failed, falling back to lexical-only");
                VectorSlot::Failed(e.to_string())
            }
        });
        match slot {
            VectorSlot::Fitted(index) => Ok(index),
            VectorSlot::Failed(msg) => Err(Error::EncodingUnavailable(msg.clone())),
        }
    }
}
