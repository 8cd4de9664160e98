//! Capability contracts the engine consumes from the language backend.
//!
//! Both capabilities are infallible at the type level: an unavailable
//! backend answers with an empty vector or `false`, and callers treat that
//! as "no signal" rather than as an error.
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `gemini:text-embedding-004`).
    fn embedder_id(&self) -> &str;
    /// Embed one text. Empty means no embedding is available.
    async fn embed(&self, text: &str) -> Vec<f32>;
}

#[async_trait]
pub trait MeaningValidator: Send + Sync {
    /// Whether `query` asks the same thing as `candidate`. `false` on any failure.
    async fn validate_same_meaning(&self, query: &str, candidate: &str) -> bool;
}

/// Validator used when no backend is configured: never confirms.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoValidator;

#[async_trait]
impl MeaningValidator for NoValidator {
    async fn validate_same_meaning(&self, _query: &str, _candidate: &str) -> bool {
        false
    }
}
