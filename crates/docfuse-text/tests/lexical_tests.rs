use docfuse_core::config::Bm25Settings;
use docfuse_core::traits::Segmenter;
use docfuse_core::{Error, IndexKind};
use docfuse_text::{Bm25Index, StopwordSegmenter, UnicodeSegmenter};

fn toks(s: &str) -> Vec<String> { s.split_whitespace().map(str::to_string).collect() }

fn fitted(docs: &[&str]) -> Bm25Index {
    let corpus: Vec<Vec<String>> = docs.iter().map(|d| toks(d)).collect();
    let mut index = Bm25Index::default();
    index.fit(&corpus);
    index
}

#[test]
fn unicode_segmenter_handles_latin_and_cjk() {
    let seg = UnicodeSegmenter::new();
    assert_eq!(seg.tokenize("Central Bank, raises RATES!"), vec!["central", "bank", "raises", "rates"]);
    assert_eq!(seg.tokenize("央行加息"), vec!["央", "行", "加", "息"]);
    assert_eq!(seg.tokenize("Fed加息 rate"), vec!["fed", "加", "息", "rate"]);
    assert!(seg.tokenize("  ... ").is_empty());
}

#[test]
fn unicode_segmenter_keeps_katakana_runs() {
    let seg = UnicodeSegmenter::new();
    assert_eq!(
        seg.tokenize("カタカナ ひらがな 東京タワー"),
        vec!["カタカナ", "ひ", "ら", "が", "な", "東", "京", "タワー"]
    );
}

#[test]
fn stopword_segmenter_drops_stop_words() {
    let seg = StopwordSegmenter::new();
    assert_eq!(seg.tokenize("The rate of the Bank"), vec!["rate", "bank"]);
}

#[test]
fn score_before_fit_is_not_fitted() {
    let index = Bm25Index::default();
    assert!(matches!(index.score(&toks("rate")), Err(Error::NotFitted(IndexKind::Lexical))));
    assert!(index.rank(&toks("rate")).is_err());
}

#[test]
fn empty_corpus_stays_unfitted() {
    let mut index = Bm25Index::default();
    index.fit(Vec::<Vec<String>>::new());
    assert!(!index.is_fitted());
}

#[test]
fn statistics_match_corpus() {
    let index = fitted(&["rate hike rate", "earnings beat", "rate cut"]);
    assert_eq!(index.doc_count(), 3);
    assert_eq!(index.doc_freq("rate"), 2);
    assert_eq!(index.doc_freq("missing"), 0);
    let avg = index.avg_doc_len().unwrap();
    assert!((avg - 7.0 / 3.0).abs() < 1e-12);
}

#[test]
fn score_matches_formula() {
    let index = fitted(&["rate hike rate", "earnings beat", "rate cut"]);
    let scores = index.score(&toks("rate")).unwrap();

    let (k1, b) = (1.5f64, 0.75f64);
    let avg = 7.0f64 / 3.0;
    let idf = (1.0f64 + (3.0 - 2.0 + 0.5) / (2.0 + 0.5)).ln();
    let expect = |tf: f64, len: f64| idf * tf * (k1 + 1.0) / (tf + k1 * (1.0 - b + b * len / avg));
    assert!((scores[0] - expect(2.0, 3.0)).abs() < 1e-12);
    assert_eq!(scores[1], 0.0);
    assert!((scores[2] - expect(1.0, 2.0)).abs() < 1e-12);
}

#[test]
fn empty_and_unknown_queries_score_zero() {
    let index = fitted(&["a b", "c d"]);
    assert_eq!(index.score(&[]).unwrap(), vec![0.0, 0.0]);
    assert_eq!(index.score(&toks("zzz")).unwrap(), vec![0.0, 0.0]);
}

#[test]
fn repeated_query_terms_count_each_time() {
    let index = fitted(&["rate hike", "beat"]);
    let once = index.score(&toks("rate")).unwrap()[0];
    let twice = index.score(&toks("rate rate")).unwrap()[0];
    assert!((twice - 2.0 * once).abs() < 1e-12);
}

#[test]
fn rank_breaks_ties_by_ascending_id() {
    let index = fitted(&["x", "rate", "y", "rate"]);
    assert_eq!(index.rank(&toks("rate")).unwrap(), vec![1, 3, 0, 2]);
    assert_eq!(index.rank(&[]).unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn refit_is_idempotent() {
    let corpus: Vec<Vec<String>> = ["rate hike", "earnings beat"].iter().map(|d| toks(d)).collect();
    let mut index = Bm25Index::new(Bm25Settings { k1: 1.2, b: 0.5 });
    index.fit(&corpus);
    let first = index.score(&toks("rate beat")).unwrap();
    index.fit(&corpus);
    assert_eq!(index.score(&toks("rate beat")).unwrap(), first);
}

#[test]
fn all_empty_documents_score_zero() {
    let index = fitted(&["", ""]);
    assert!(index.is_fitted());
    assert_eq!(index.score(&toks("rate")).unwrap(), vec![0.0, 0.0]);
}
