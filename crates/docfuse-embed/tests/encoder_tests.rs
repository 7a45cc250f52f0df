use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docfuse_core::config::EmbeddingSettings;
use docfuse_core::traits::Encoder;
use docfuse_embed::{encoder_from_config, HashEncoder, LazyEncoder};

#[test]
fn hash_encoder_shapes_and_determinism() {
    let encoder = HashEncoder::new(64);
    let texts = vec!["hello world".to_string(), "Hello World".to_string(), String::new()];
    let embs = encoder.encode(&texts).expect("encode");
    assert_eq!(embs.len(), 3);
    assert_eq!(embs[0].len(), 64);

    let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // case-insensitive and deterministic
    for (a, b) in embs[0].iter().zip(embs[1].iter()) { assert!((a - b).abs() <= 1e-6); }
    assert!(embs[2].iter().all(|x| *x == 0.0), "empty text encodes to zero vector");
    assert_eq!(encoder.id(), "hash:d64");
}

#[test]
fn fake_settings_select_hash_encoder() {
    let settings = EmbeddingSettings { use_fake_embeddings: true, dimension: 16, ..EmbeddingSettings::default() };
    let encoder = encoder_from_config(&settings);
    assert_eq!(encoder.id(), "hash:d16");
    assert_eq!(encoder.encode(&["x".to_string()]).unwrap()[0].len(), 16);
}

#[test]
fn lazy_encoder_loads_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let lazy = LazyEncoder::new("lazy-hash", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HashEncoder::new(8)) as Box<dyn Encoder>)
    });
    assert!(!lazy.is_loaded());
    lazy.encode(&["a".to_string()]).unwrap();
    lazy.encode(&["b".to_string()]).unwrap();
    assert!(lazy.is_loaded());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_encoder_remembers_failure() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let lazy = LazyEncoder::new("broken", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("no weights"))
    });
    let first = lazy.encode(&["a".to_string()]).unwrap_err();
    assert!(first.to_string().contains("no weights"));
    assert!(lazy.encode(&["a".to_string()]).is_err());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_model_surfaces_on_first_encode() {
    let settings = EmbeddingSettings {
        use_fake_embeddings: false,
        model_dir: Some("/nonexistent/docfuse-model".to_string()),
        ..EmbeddingSettings::default()
    };
    if docfuse_embed::fake_embeddings_requested() { return; }
    if docfuse_embed::resolve_model_dir(settings.model_dir.as_deref()).is_ok() { return; }
    let encoder = encoder_from_config(&settings);
    assert!(encoder.encode(&["text".to_string()]).is_err());
}
