use docfuse_core::traits::Encoder;
use docfuse_core::{Error, IndexKind};
use docfuse_embed::HashEncoder;
use docfuse_vector::{cosine_similarity, VectorIndex};

/// Maps known words to fixed axes so similarities are easy to reason about.
struct AxisEncoder;

impl Encoder for AxisEncoder {
    fn id(&self) -> &str { "axis" }
    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; 3];
                for w in t.split_whitespace() {
                    match w {
                        "rate" => v[0] += 1.0,
                        "profit" => v[1] += 1.0,
                        "weather" => v[2] += 1.0,
                        _ => {}
                    }
                }
                v
            })
            .collect())
    }
}

struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn id(&self) -> &str { "failing" }
    fn encode(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { Err(anyhow::anyhow!("model offline")) }
}

struct RaggedEncoder;

impl Encoder for RaggedEncoder {
    fn id(&self) -> &str { "ragged" }
    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| vec![1.0; t.len().max(1)]).collect())
    }
}

/// Emits NaN for texts containing "bad".
struct NanEncoder;

impl Encoder for NanEncoder {
    fn id(&self) -> &str { "nan" }
    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| if t.contains("bad") { vec![f32::NAN, 1.0] } else { vec![1.0, 0.0] }).collect())
    }
}

fn texts(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

#[test]
fn cosine_handles_zero_vectors() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn fit_and_rank_by_similarity() {
    let index = VectorIndex::fit(&texts(&["rate rate", "profit", "weather", "rate profit"]), &AxisEncoder, 2).unwrap();
    assert_eq!(index.len(), 4);
    assert_eq!(index.dim(), 3);
    let scores = index.score("rate", &AxisEncoder).unwrap();
    assert!((scores[0] - 1.0).abs() < 1e-6);
    assert_eq!(scores[1], 0.0);
    assert_eq!(index.rank("rate", &AxisEncoder).unwrap(), vec![0, 3, 1, 2]);
}

#[test]
fn zero_query_scores_zero_and_keeps_id_order() {
    let index = VectorIndex::fit(&texts(&["rate", "profit", "nothing"]), &AxisEncoder, 8).unwrap();
    let scores = index.score("unknown words", &AxisEncoder).unwrap();
    assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    assert_eq!(VectorIndex::rank_scores(&scores), vec![0, 1, 2]);
}

#[test]
fn failing_encoder_is_encoding_unavailable() {
    let err = VectorIndex::fit(&texts(&["a", "b"]), &FailingEncoder, 1).unwrap_err();
    match err {
        Error::EncodingUnavailable(msg) => assert!(msg.contains("model offline")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn inconsistent_dimensions_are_rejected() {
    assert!(matches!(
        VectorIndex::fit(&texts(&["a", "bbb"]), &RaggedEncoder, 4),
        Err(Error::EncodingUnavailable(_))
    ));
}

#[test]
fn empty_corpus_is_not_fitted() {
    assert!(matches!(VectorIndex::fit(&[], &AxisEncoder, 4), Err(Error::NotFitted(IndexKind::Vector))));
}

#[test]
fn querying_with_another_encoder_is_rejected() {
    let index = VectorIndex::fit(&texts(&["rate"]), &AxisEncoder, 4).unwrap();
    assert!(index.score("rate", &HashEncoder::new(3)).is_err());
    assert!(index.score_vector(&[1.0, 0.0]).is_err());
}

#[test]
fn hash_encoder_prefers_overlapping_text() {
    let encoder = HashEncoder::new(256);
    let index = VectorIndex::fit(&texts(&["central bank raises rates", "company profits surge"]), &encoder, 16).unwrap();
    assert_eq!(index.encoder_id(), "hash:d256");
    let ranked = index.rank("company profits", &encoder).unwrap();
    assert_eq!(ranked[0], 1);
}

#[test]
fn non_finite_embeddings_are_rejected() {
    let err = VectorIndex::fit(&texts(&["good", "bad", "good"]), &NanEncoder, 2).unwrap_err();
    assert!(matches!(err, Error::EncodingUnavailable(ref msg) if msg.contains("doc 1")));

    let index = VectorIndex::fit(&texts(&["good", "good"]), &NanEncoder, 2).unwrap();
    assert!(matches!(index.score("bad query", &NanEncoder), Err(Error::EncodingUnavailable(_))));
    assert!(index.score_vector(&[f32::INFINITY, 0.0]).is_err());
}

#[test]
fn nan_scores_rank_last() {
    assert_eq!(VectorIndex::rank_scores(&[f32::NAN, 0.5, f32::NAN, 0.9, -0.0, 0.0]), vec![3, 1, 4, 5, 0, 2]);
}
