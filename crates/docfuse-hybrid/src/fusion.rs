// Reciprocal Rank Fusion (RRF)

use std::collections::HashMap;

use docfuse_core::types::{score_key, DocId, RankedList};

/// Standard RRF k from Cormack, Clarke and Buettcher (SIGIR 2009).
pub const DEFAULT_RRF_K: usize = 60;

/// Fused `(doc id, score)` pairs, best first.
///
/// Each list contributes `1 / (k + rank + 1)` for every id it contains, with
/// `rank` the 0-based position. Ties are broken by ascending doc id.
pub fn fuse_scored(lists: &[RankedList], k: usize) -> Vec<(DocId, f64)> {
    let k = k as f64;
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for list in lists {
        for (rank, &id) in list.iter().enumerate() {
            *scores.entry(id).or_insert(0.0) += 1.0 / (k + rank as f64 + 1.0);
        }
    }
    let mut fused: Vec<(DocId, f64)> = scores.into_iter().collect();
    fused.sort_by(|a, b| score_key(b.1).total_cmp(&score_key(a.1)).then(a.0.cmp(&b.0)));
    fused
}

/// Merge any number of ranked lists into one ranking.
///
/// A single input list is returned unchanged.
pub fn fuse(lists: &[RankedList], k: usize) -> RankedList {
    if let [only] = lists {
        return only.clone();
    }
    fuse_scored(lists, k).into_iter().map(|(id, _)| id).collect()
}
