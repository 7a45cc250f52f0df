//! Encoder adapters for the vector index.
//!
//! `encoder_from_config` never loads a model eagerly: the real model sits
//! behind a [`LazyEncoder`], so the first vector fit pays the load cost and a
//! missing model shows up as an encoding failure rather than a startup error.
//! Set `APP_USE_FAKE_EMBEDDINGS=1` (or `embedding.use_fake_embeddings`) to get
//! the deterministic [`HashEncoder`] instead.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use docfuse_core::config::{expand_path, EmbeddingSettings};
use docfuse_core::traits::Encoder;

pub mod device;
pub mod hash;
pub mod lazy;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEncoder;
pub use lazy::LazyEncoder;
pub use model::BgeM3Encoder;
pub use pool::masked_mean_l2;

pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn encoder_from_config(settings: &EmbeddingSettings) -> Arc<dyn Encoder> {
    if settings.use_fake_embeddings || fake_embeddings_requested() {
        info!(dim = settings.dimension, "using HashEncoder");
        return Arc::new(HashEncoder::new(settings.dimension));
    }
    let configured = settings.model_dir.clone();
    let max_len = settings.max_len;
    Arc::new(LazyEncoder::new(format!("bge-m3:len{}", max_len), move || {
        let dir = resolve_model_dir(configured.as_deref())?;
        Ok(Box::new(BgeM3Encoder::load(&dir, max_len)?) as Box<dyn Encoder>)
    }))
}

pub fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured { let p = expand_path(dir); if p.exists() { info!(dir = %p.display(), "using configured model dir"); return Ok(p); } }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(dir = %p.display(), "using APP_MODEL_DIR"); return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(dir = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    let root = Path::new("../models/bge-m3"); if root.exists() { return Ok(root.to_path_buf()); }
    let local = Path::new("models/bge-m3"); if local.exists() { return Ok(local.to_path_buf()); }
    Err(anyhow!("Could not locate BGE-M3 model directory"))
}
