//! Lightweight configuration loader, typed sections and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys use `__` in the environment (`APP_RETRIEVAL__MIN_SCORE=0.2`).
//! Every section has documented defaults, so a missing file or key only
//! means "use the defaults".
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
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

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    /// Extract a whole section, falling back to its defaults when absent.
    pub fn section<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(T::default());
        }
        self.get(key)
    }

    pub fn retrieval(&self) -> Result<RetrievalConfig> {
        self.section("retrieval")
    }

    pub fn router(&self) -> Result<RouterConfig> {
        self.section("router")
    }

    pub fn capabilities(&self) -> Result<CapabilityConfig> {
        self.section("capabilities")
    }

    pub fn gemini(&self) -> Result<GeminiConfig> {
        self.section("gemini")
    }

    pub fn data(&self) -> Result<DataConfig> {
        self.section("data")
    }

    fn validate(&self) -> Result<()> {
        let retrieval = self.retrieval()?;
        for (name, w) in [("short_weights", retrieval.short_weights), ("long_weights", retrieval.long_weights)] {
            if w.semantic < 0.0 || w.keyword < 0.0 {
                return Err(Error::InvalidConfig(format!("retrieval.{name} must be non-negative")));
            }
        }
        if retrieval.gap < 0.0 {
            return Err(Error::InvalidConfig("retrieval.gap must be non-negative".to_string()));
        }
        if retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Blend of semantic and keyword evidence for one query-length regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub semantic: f32,
    pub keyword: f32,
}

impl Weights {
    pub const fn new(semantic: f32, keyword: f32) -> Self {
        Self { semantic, keyword }
    }

    /// Weights used when no query embedding is available.
    pub const KEYWORD_ONLY: Self = Self::new(0.0, 1.0);
}

/// Ranking and gating knobs.
///
/// Defaults: short queries (<= 2 tokens) blend 0.70/0.30, longer ones
/// 0.65/0.35; a 0.05 bonus for any verbatim token hit; `min_score` 0.10 and
/// `gap` 0.05 for the confidence gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub short_query_max_tokens: usize,
    pub short_weights: Weights,
    pub long_weights: Weights,
    pub overlap_bonus: f32,
    pub use_idf: bool,
    pub collapse_intents: bool,
    pub top_k: usize,
    pub min_score: f32,
    pub gap: f32,
    /// Rank on keywords alone when the query cannot be embedded.
    pub keyword_only_fallback: bool,
    /// List several answers for one-word queries instead of picking one.
    pub category_listing: bool,
    pub category_listing_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            short_query_max_tokens: 2,
            short_weights: Weights::new(0.70, 0.30),
            long_weights: Weights::new(0.65, 0.35),
            overlap_bonus: 0.05,
            use_idf: true,
            collapse_intents: true,
            top_k: 5,
            min_score: 0.10,
            gap: 0.05,
            keyword_only_fallback: true,
            category_listing: false,
            category_listing_limit: 5,
        }
    }
}

impl RetrievalConfig {
    pub fn weights_for(&self, query_tokens: usize) -> Weights {
        if query_tokens <= self.short_query_max_tokens { self.short_weights } else { self.long_weights }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub max_edit_distance: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { max_edit_distance: 2 }
    }
}

/// Timeouts applied at the external-call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    pub embed_timeout_ms: u64,
    pub validate_timeout_ms: u64,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self { embed_timeout_ms: 8_000, validate_timeout_ms: 8_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            embed_model: "text-embedding-004".to_string(),
            chat_model: "gemini-2.0-flash".to_string(),
            temperature: 0.15,
            max_output_tokens: 200,
        }
    }
}

impl GeminiConfig {
    /// Configured key, else `GEMINI_API_KEY` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub snapshot_path: String,
    pub raw_faq_path: String,
    pub panoramas_path: Option<String>,
    pub projects_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "data/embeddings.json".to_string(),
            raw_faq_path: "data/faq.json".to_string(),
            panoramas_path: None,
            projects_path: None,
        }
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
