//! Domain types shared by the lexical, vector and hybrid engines.

use serde::{Deserialize, Serialize};

/// Caller-supplied record: an opaque field -> value mapping.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Position of a document in its corpus generation.
pub type DocId = usize;

/// Document ids ordered best-first by a single scorer.
pub type RankedList = Vec<DocId>;

/// Field injected into every result with the raw lexical score.
pub const LEXICAL_SCORE_KEY: &str = "_search_score";
/// Field injected into every result when vector search participated.
pub const VECTOR_SCORE_KEY: &str = "_vector_score";

/// A stored record plus the engine-owned derived fields.
///
/// - `record`: the original fields, untouched
/// - `text`: configured text fields joined with single spaces
/// - `tokens`: segmenter output over `text`
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub record: Record,
    pub text: String,
    pub tokens: Vec<String>,
}

/// Indicates which index an error or state refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Lexical,
    Vector,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Lexical => f.write_str("lexical"),
            IndexKind::Vector => f.write_str("vector"),
        }
    }
}

/// Fit state of one index, tagged with the corpus generation it refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FitState {
    Unfitted,
    Fitted(u64),
    FitFailed(u64),
}

impl FitState {
    pub fn is_fitted(&self) -> bool { matches!(self, FitState::Fitted(_)) }
}

/// One hit returned by a hybrid search.
///
/// Serializes flat: the record's own fields plus `_search_score` and, when
/// vector search took part, `_vector_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(skip)]
    pub doc_id: DocId,
    #[serde(flatten)]
    pub record: Record,
    #[serde(rename = "_search_score")]
    pub lexical_score: f64,
    #[serde(rename = "_vector_score", default, skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f32>,
}

impl SearchResult {
    /// Flatten into a plain record carrying the injected score fields.
    pub fn into_record(self) -> Record {
        let mut record = self.record;
        record.insert(LEXICAL_SCORE_KEY.to_string(), serde_json::json!(self.lexical_score));
        if let Some(sim) = self.vector_score {
            record.insert(VECTOR_SCORE_KEY.to_string(), serde_json::json!(sim));
        }
        record
    }
}

/// Total-order sort key for scores: NaN ranks below every number and `-0.0`
/// ties with `0.0`.
pub fn score_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Order document ids by descending score, breaking ties by ascending id.
/// NaN scores sort last.
pub fn rank_by_score(scores: &[f64]) -> RankedList {
    let mut ids: RankedList = (0..scores.len()).collect();
    ids.sort_by(|&a, &b| score_key(scores[b]).total_cmp(&score_key(scores[a])).then(a.cmp(&b)));
    ids
}
