//! docfuse-vector
//!
//! Dense in-memory vector index. One embedding per document id, all produced
//! by a single encoder; queries are scored by cosine similarity against every
//! stored vector.

use tracing::{debug, info};

use docfuse_core::error::{Error, Result};
use docfuse_core::traits::Encoder;
use docfuse_core::types::{rank_by_score, DocId, IndexKind, RankedList};

/// Cosine similarity `dot(a,b) / (|a||b|)`; 0.0 when either vector has zero
/// norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() { return 0.0; }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = l2_norm(a);
    let nb = l2_norm(b);
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

fn l2_norm(v: &[f32]) -> f32 { v.iter().map(|x| x * x).sum::<f32>().sqrt() }

fn all_finite(v: &[f32]) -> bool { v.iter().all(|x| x.is_finite()) }

/// A fully populated embedding matrix aligned to document ids.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    embeddings: Vec<Vec<f32>>,
    norms: Vec<f32>,
    dim: usize,
    encoder_id: String,
}

impl VectorIndex {
    /// Encode every text in batches of `batch_size`. The index is only returned
    /// once every document has a finite embedding of one consistent dimension;
    /// any encoder failure yields `EncodingUnavailable` and nothing is kept.
    pub fn fit(texts: &[String], encoder: &dyn Encoder, batch_size: usize) -> Result<Self> {
        if texts.is_empty() { return Err(Error::NotFitted(IndexKind::Vector)); }
        let batch_size = batch_size.max(1);
        info!(docs = texts.len(), encoder = encoder.id(), batch_size, "encoding documents");
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        for (batch_no, batch) in texts.chunks(batch_size).enumerate() {
            let vectors = encoder
                .encode(batch)
                .map_err(|e| Error::EncodingUnavailable(format!("{:#}", e)))?;
            if vectors.len() != batch.len() {
                return Err(Error::EncodingUnavailable(format!(
                    "encoder returned {} vectors for {} texts", vectors.len(), batch.len()
                )));
            }
            embeddings.extend(vectors);
            debug!(batch = batch_no + 1, encoded = embeddings.len(), "encoded batch");
        }
        let dim = embeddings[0].len();
        if dim == 0 { return Err(Error::EncodingUnavailable("encoder produced empty vectors".into())); }
        if let Some(bad) = embeddings.iter().position(|e| e.len() != dim) {
            return Err(Error::EncodingUnavailable(format!(
                "inconsistent dimension at doc {}: {} != {}", bad, embeddings[bad].len(), dim
            )));
        }
        if let Some(bad) = embeddings.iter().position(|e| !all_finite(e)) {
            return Err(Error::EncodingUnavailable(format!("non-finite embedding value at doc {}", bad)));
        }
        let norms = embeddings.iter().map(|e| l2_norm(e)).collect();
        info!(docs = embeddings.len(), dim, "vector index fitted");
        Ok(Self { embeddings, norms, dim, encoder_id: encoder.id().to_string() })
    }

    pub fn len(&self) -> usize { self.embeddings.len() }

    pub fn is_empty(&self) -> bool { self.embeddings.is_empty() }

    pub fn dim(&self) -> usize { self.dim }

    pub fn encoder_id(&self) -> &str { &self.encoder_id }

    pub fn embedding(&self, id: DocId) -> Option<&[f32]> { self.embeddings.get(id).map(Vec::as_slice) }

    /// Encode `query` once and return its cosine similarity to every document.
    pub fn score(&self, query: &str, encoder: &dyn Encoder) -> Result<Vec<f32>> {
        if encoder.id() != self.encoder_id {
            return Err(Error::EncodingUnavailable(format!(
                "index built with {} but queried with {}", self.encoder_id, encoder.id()
            )));
        }
        let mut encoded = encoder
            .encode(&[query.to_string()])
            .map_err(|e| Error::EncodingUnavailable(format!("{:#}", e)))?;
        let q = encoded.pop().ok_or_else(|| Error::EncodingUnavailable("encoder returned no query vector".into()))?;
        self.score_vector(&q)
    }

    pub fn score_vector(&self, q: &[f32]) -> Result<Vec<f32>> {
        if q.len() != self.dim {
            return Err(Error::EncodingUnavailable(format!("query dimension {} != index dimension {}", q.len(), self.dim)));
        }
        if !all_finite(q) {
            return Err(Error::EncodingUnavailable("non-finite value in query vector".into()));
        }
        let qn = l2_norm(q);
        Ok(self
            .embeddings
            .iter()
            .zip(&self.norms)
            .map(|(e, &n)| {
                if qn == 0.0 || n == 0.0 { return 0.0; }
                let dot: f32 = e.iter().zip(q).map(|(x, y)| x * y).sum();
                dot / (qn * n)
            })
            .collect())
    }

    pub fn rank(&self, query: &str, encoder: &dyn Encoder) -> Result<RankedList> {
        Ok(Self::rank_scores(&self.score(query, encoder)?))
    }

    /// Descending similarity, ties by ascending id.
    pub fn rank_scores(scores: &[f32]) -> RankedList {
        let widened: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
        rank_by_score(&widened)
    }
}
