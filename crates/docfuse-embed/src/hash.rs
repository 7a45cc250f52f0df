use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use docfuse_core::traits::Encoder;

/// Deterministic feature-hashing encoder for tests and offline use.
///
/// Each lowercased whitespace token is hashed into one of `dim` buckets; the
/// result is L2-normalised. Text without tokens encodes to the zero vector.
pub struct HashEncoder { dim: usize, id: String }

impl HashEncoder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("hash:d{}", dim) } }

    pub fn dim(&self) -> usize { self.dim }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        if self.dim == 0 { return v; }
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Encoder for HashEncoder {
    fn id(&self) -> &str { &self.id }

    fn encode(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
