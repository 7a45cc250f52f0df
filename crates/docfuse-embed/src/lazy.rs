use std::sync::OnceLock;

use anyhow::anyhow;
use tracing::{error, info};

use docfuse_core::traits::Encoder;

type Loader = Box<dyn Fn() -> anyhow::Result<Box<dyn Encoder>> + Send + Sync>;

/// Defers model loading to the first `encode` call.
///
/// The load runs at most once; a failed load is remembered and returned as an
/// error from every later call.
pub struct LazyEncoder {
    id: String,
    loader: Loader,
    inner: OnceLock<Result<Box<dyn Encoder>, String>>,
}

impl LazyEncoder {
    pub fn new<F>(id: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Encoder>> + Send + Sync + 'static,
    {
        Self { id: id.into(), loader: Box::new(loader), inner: OnceLock::new() }
    }

    pub fn is_loaded(&self) -> bool { matches!(self.inner.get(), Some(Ok(_))) }

    fn get(&self) -> anyhow::Result<&dyn Encoder> {
        let slot = self.inner.get_or_init(|| {
            info!(encoder = %self.id, "loading encoder");
            (self.loader)().map_err(|e| {
                error!(encoder = %self.id, error = %e, "encoder failed to load");
                e.to_string()
            })
        });
        match slot {
            Ok(encoder) => Ok(encoder.as_ref()),
            Err(msg) => Err(anyhow!("encoder {} unavailable: {}", self.id, msg)),
        }
    }
}

impl Encoder for LazyEncoder {
    fn id(&self) -> &str { &self.id }

    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.get()?.encode(texts)
    }
}
