//! Okapi BM25 over pre-tokenized documents.
//!
//! The index keeps, per term, a postings list of `(doc id, term frequency)`
//! alongside document lengths and the average document length. Scoring walks
//! only the postings of the query terms, so terms unseen in the corpus cost
//! nothing and contribute 0.
//!
//! ```text
//! score(q, d) = Σ_t∈q IDF(t) · tf·(k1+1) / (tf + k1·(1 − b + b·|d|/avgdl))
//! IDF(t)      = ln(1 + (N − df + 0.5) / (df + 0.5))
//! ```

use std::collections::HashMap;

use tracing::{debug, info};

use docfuse_core::config::Bm25Settings;
use docfuse_core::error::{Error, Result};
use docfuse_core::types::{rank_by_score, DocId, IndexKind, RankedList};

#[derive(Debug, Clone)]
struct Bm25Stats {
    doc_len: Vec<usize>,
    avg_doc_len: f64,
    postings: HashMap<String, Vec<(DocId, u32)>>,
}

/// BM25 scorer. Either fully fitted against one corpus or not fitted at all.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    params: Bm25Settings,
    stats: Option<Bm25Stats>,
}

impl Bm25Index {
    pub fn new(params: Bm25Settings) -> Self { Self { params, stats: None } }

    pub fn params(&self) -> Bm25Settings { self.params }

    /// Compute corpus statistics, replacing any previous fit. An empty corpus
    /// leaves the index unfitted.
    pub fn fit<I>(&mut self, corpus: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[String]>,
    {
        let mut doc_len = Vec::new();
        let mut postings: HashMap<String, Vec<(DocId, u32)>> = HashMap::new();
        let mut total = 0usize;
        for (doc_id, tokens) in corpus.into_iter().enumerate() {
            let tokens = tokens.as_ref();
            doc_len.push(tokens.len());
            total += tokens.len();
            let mut tf: HashMap<&str, u32> = HashMap::new();
            for token in tokens { *tf.entry(token.as_str()).or_insert(0) += 1; }
            for (term, freq) in tf {
                postings.entry(term.to_string()).or_default().push((doc_id, freq));
            }
        }
        if doc_len.is_empty() {
            self.stats = None;
            return;
        }
        let avg_doc_len = total as f64 / doc_len.len() as f64;
        info!(docs = doc_len.len(), terms = postings.len(), avg_doc_len, "BM25 index fitted");
        self.stats = Some(Bm25Stats { doc_len, avg_doc_len, postings });
    }

    pub fn is_fitted(&self) -> bool { self.stats.is_some() }

    pub fn doc_count(&self) -> usize { self.stats.as_ref().map_or(0, |s| s.doc_len.len()) }

    pub fn avg_doc_len(&self) -> Option<f64> { self.stats.as_ref().map(|s| s.avg_doc_len) }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.stats.as_ref().and_then(|s| s.postings.get(term)).map_or(0, Vec::len)
    }

    pub fn idf(&self, term: &str) -> f64 {
        let n = self.doc_count() as f64;
        let df = self.doc_freq(term);
        if df == 0 { return 0.0; }
        let df = df as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// BM25 score of every document for `query_tokens`, indexed by doc id.
    pub fn score(&self, query_tokens: &[String]) -> Result<Vec<f64>> {
        let stats = self.stats.as_ref().ok_or(Error::NotFitted(IndexKind::Lexical))?;
        let Bm25Settings { k1, b } = self.params;
        let mut scores = vec![0.0f64; stats.doc_len.len()];
        for token in query_tokens {
            let Some(list) = stats.postings.get(token) else { continue };
            let idf = self.idf(token);
            for &(doc_id, tf) in list {
                let tf = f64::from(tf);
                let len_ratio = if stats.avg_doc_len > 0.0 { stats.doc_len[doc_id] as f64 / stats.avg_doc_len } else { 0.0 };
                scores[doc_id] += idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * len_ratio));
            }
        }
        debug!(query_terms = query_tokens.len(), "BM25 scored");
        Ok(scores)
    }

    /// All doc ids by descending score, ties by ascending id.
    pub fn rank(&self, query_tokens: &[String]) -> Result<RankedList> {
        Ok(rank_by_score(&self.score(query_tokens)?))
    }
}

impl Default for Bm25Index {
    fn default() -> Self { Self::new(Bm25Settings::default()) }
}
