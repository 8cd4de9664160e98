//! faqdb-embed
//!
//! Implementations of the `Embedder` and `MeaningValidator` capabilities:
//! a Gemini HTTP client for production and a deterministic hashing embedder
//! for tests and offline development (`APP_USE_FAKE_EMBEDDINGS=1`).
use std::sync::Arc;

use tracing::info;

use faqdb_core::config::GeminiConfig;
use faqdb_core::traits::{Embedder, MeaningValidator, NoValidator};

pub mod fake;
pub mod gemini;

pub use fake::{FakeEmbedder, FAKE_DIM};
pub use gemini::{parse_yes_no, GeminiClient};

/// The capability pair a session runs with.
#[derive(Clone)]
pub struct Capabilities {
    pub embedder: Arc<dyn Embedder>,
    pub validator: Arc<dyn MeaningValidator>,
}

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Fake embedder without validation when `APP_USE_FAKE_EMBEDDINGS` is set,
/// otherwise Gemini for both capabilities.
pub fn default_capabilities(config: GeminiConfig) -> Capabilities {
    if use_fake_embeddings() {
        info!("using FakeEmbedder; meaning validation disabled");
        return Capabilities { embedder: Arc::new(FakeEmbedder::default()), validator: Arc::new(NoValidator) };
    }
    let gemini = Arc::new(GeminiClient::new(reqwest::Client::new(), config));
    if !gemini.is_configured() {
        info!("GEMINI_API_KEY missing; queries will use keyword-only ranking");
    }
    Capabilities { embedder: gemini.clone(), validator: gemini }
}
