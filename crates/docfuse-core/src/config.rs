//! Configuration loader, engine settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_ENGINE__RRF_K=30`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Build from an inline TOML document; environment overrides are not applied.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let config = Self { figment: Figment::new().merge(Toml::string(toml)) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Engine settings under the `engine` key; defaults when the key is absent.
    pub fn engine(&self) -> anyhow::Result<EngineConfig> {
        if self.figment.find_value("engine").is_err() {
            return Ok(EngineConfig::default());
        }
        let engine: EngineConfig = self.get("engine")?;
        engine.validate()?;
        Ok(engine)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.engine().map(|_| ())
    }
}

/// Okapi BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Settings {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Settings {
    fn default() -> Self { Self { k1: 1.5, b: 0.75 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Use the deterministic hash encoder instead of loading a model.
    pub use_fake_embeddings: bool,
    /// Directory holding `tokenizer.json`, `config.json` and `pytorch_model.bin`.
    pub model_dir: Option<String>,
    pub dimension: usize,
    pub max_len: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { use_fake_embeddings: false, model_dir: None, dimension: 1024, max_len: 256, batch_size: 32 }
    }
}

/// Defaults for store-backed reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadSettings {
    pub window_days: u32,
    pub limit: usize,
    pub timestamp_field: String,
}

impl Default for ReloadSettings {
    fn default() -> Self {
        Self { window_days: 30, limit: 1000, timestamp_field: "publish_time".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record fields concatenated (in order) into the indexed text.
    pub text_fields: Vec<String>,
    pub bm25: Bm25Settings,
    pub rrf_k: usize,
    pub default_top_n: usize,
    pub vector_by_default: bool,
    pub embedding: EmbeddingSettings,
    pub reload: ReloadSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            text_fields: vec!["title".to_string(), "content".to_string()],
            bm25: Bm25Settings::default(),
            rrf_k: 60,
            default_top_n: 5,
            vector_by_default: true,
            embedding: EmbeddingSettings::default(),
            reload: ReloadSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.text_fields.is_empty() {
            return Err(Error::InvalidConfig("text_fields must not be empty".into()));
        }
        if !(self.bm25.k1 >= 0.0) {
            return Err(Error::InvalidConfig(format!("bm25.k1 must be >= 0, got {}", self.bm25.k1)));
        }
        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(Error::InvalidConfig(format!("bm25.b must be within [0, 1], got {}", self.bm25.b)));
        }
        if self.embedding.batch_size == 0 || self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size and embedding.dimension must be > 0".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
