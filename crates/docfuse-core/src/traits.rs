use crate::types::Record;

/// Splits free text into lexical tokens. Must cope with scripts that have no
/// whitespace word boundaries.
pub trait Segmenter: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Black-box text encoder producing fixed-dimension vectors.
pub trait Encoder: Send + Sync {
    /// Stable identifier for the model (e.g. `hash:d256`).
    fn id(&self) -> &str;
    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// External store that yields records most recent first.
pub trait RecordSource: Send + Sync {
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<Record>>;
}

impl<T: Segmenter + ?Sized> Segmenter for std::sync::Arc<T> {
    fn tokenize(&self, text: &str) -> Vec<String> { (**self).tokenize(text) }
}

impl<T: Encoder + ?Sized> Encoder for std::sync::Arc<T> {
    fn id(&self) -> &str { (**self).id() }
    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).encode(texts) }
}

impl<T: RecordSource + ?Sized> RecordSource for std::sync::Arc<T> {
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<Record>> { (**self).fetch_recent(limit) }
}
