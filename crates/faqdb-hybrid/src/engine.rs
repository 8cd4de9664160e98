//! The answer pipeline: tokenize, embed (cached, time-bounded), rank, gate,
//! optionally validate, then accept or fall back.
//!
//! Nothing here returns an error to the caller. Every degraded path ends in
//! `FALLBACK_ANSWER` tagged with a `Via` reason.
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use faqdb_core::config::{CapabilityConfig, RetrievalConfig, RouterConfig};
use faqdb_core::traits::{Embedder, MeaningValidator};
use faqdb_core::types::{NamedTarget, QueryContext, ScoredCandidate, TargetKind};
use faqdb_core::FALLBACK_ANSWER;
use faqdb_text::route;
use faqdb_vector::EmbeddingCache;

use crate::corpus::CorpusHandle;
use crate::gate::{Confidence, ConfidenceGate};
use crate::ranker::rank;

/// Why an answer was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Via {
    SemanticMatch,
    KeywordMatch,
    LlmValidatedMatch,
    CategoryListing,
    LowScore,
    Ambiguous,
    NoMatch,
    NoEmbedding,
    EmptyCorpus,
    EmptyQuestion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub via: Via,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Answer {
    pub fn fallback(via: Via) -> Self {
        Self { text: FALLBACK_ANSWER.to_string(), via, id: None, score: None }
    }

    fn accept(candidate: &ScoredCandidate<'_>, via: Via) -> Self {
        Self { text: candidate.entry.answer.clone(), via, id: Some(candidate.entry.id.clone()), score: Some(candidate.score) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Response {
    Navigate { kind: TargetKind, target: NamedTarget },
    Answer(Answer),
}

pub struct FaqEngine {
    corpus: Arc<CorpusHandle>,
    cache: EmbeddingCache,
    embedder: Arc<dyn Embedder>,
    validator: Arc<dyn MeaningValidator>,
    retrieval: RetrievalConfig,
    router: RouterConfig,
    capabilities: CapabilityConfig,
}

impl FaqEngine {
    pub fn new(corpus: Arc<CorpusHandle>, embedder: Arc<dyn Embedder>, validator: Arc<dyn MeaningValidator>) -> Self {
        Self {
            corpus,
            cache: EmbeddingCache::new(),
            embedder,
            validator,
            retrieval: RetrievalConfig::default(),
            router: RouterConfig::default(),
            capabilities: CapabilityConfig::default(),
        }
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilityConfig) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn corpus(&self) -> &CorpusHandle {
        &self.corpus
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Navigation first (panoramas, then projects), otherwise a FAQ answer.
    pub async fn respond(&self, question: &str, panoramas: &[NamedTarget], projects: &[NamedTarget]) -> Response {
        if let Some(hit) = route(question, panoramas, projects, self.router.max_edit_distance) {
            debug!(kind = ?hit.kind, target = %hit.target.label, "navigation intent");
            return Response::Navigate { kind: hit.kind, target: hit.target.clone() };
        }
        Response::Answer(self.answer(question).await)
    }

    pub async fn answer(&self, question: &str) -> Answer {
        let ctx = QueryContext::new(question.trim());
        debug!(question = %ctx.raw, tokens = ?ctx.tokens, "answering");
        if ctx.tokens.is_empty() {
            return Answer::fallback(Via::EmptyQuestion);
        }

        let snapshot = self.corpus.snapshot();
        if snapshot.is_empty() {
            debug!("no corpus loaded");
            return Answer::fallback(Via::EmptyCorpus);
        }

        let vector = self.embed_cached(&ctx.normalized()).await;
        let ctx = ctx.with_vector(vector);
        let keyword_only = ctx.vector.is_none();
        if keyword_only && !self.retrieval.keyword_only_fallback {
            return Answer::fallback(Via::NoEmbedding);
        }

        if self.retrieval.category_listing && ctx.tokens.len() == 1 {
            let top = rank(&ctx, &snapshot, &self.retrieval, self.retrieval.category_listing_limit);
            if !top.is_empty() {
                let text = top
                    .iter()
                    .map(|c| format!("Q: {}\nA: {}", c.entry.question, c.entry.answer))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                return Answer { text, via: Via::CategoryListing, id: None, score: top.first().map(|c| c.score) };
            }
        }

        let ranked = rank(&ctx, &snapshot, &self.retrieval, self.retrieval.top_k);
        let Some(best) = ranked.first() else {
            debug!(keyword_only, "no candidates");
            return Answer::fallback(if keyword_only { Via::NoEmbedding } else { Via::NoMatch });
        };
        let second = ranked.get(1);
        let confidence = ConfidenceGate::from_config(&self.retrieval).classify(best, second);
        debug!(
            best = %best.entry.id,
            best_score = best.score,
            second_score = ?second.map(|c| c.score),
            ?confidence,
            "ranked"
        );

        if !confidence.needs_validation() {
            return Answer::accept(best, if keyword_only { Via::KeywordMatch } else { Via::SemanticMatch });
        }
        if self.validate(&ctx.raw, &best.entry.question).await {
            debug!("meaning validator confirmed the match");
            return Answer::accept(best, Via::LlmValidatedMatch);
        }
        Answer::fallback(if confidence == Confidence::Low { Via::LowScore } else { Via::Ambiguous })
    }

    async fn embed_cached(&self, normalized: &str) -> Vec<f32> {
        if let Some(hit) = self.cache.get(normalized) {
            debug!("embedding cache hit");
            return hit.to_vec();
        }
        let limit = Duration::from_millis(self.capabilities.embed_timeout_ms);
        match tokio::time::timeout(limit, self.embedder.embed(normalized)).await {
            Ok(vector) => {
                self.cache.insert(normalized, vector.clone());
                vector
            }
            Err(_) => {
                warn!(timeout_ms = self.capabilities.embed_timeout_ms, "embedding timed out");
                Vec::new()
            }
        }
    }

    async fn validate(&self, query: &str, candidate: &str) -> bool {
        let limit = Duration::from_millis(self.capabilities.validate_timeout_ms);
        tokio::time::timeout(limit, self.validator.validate_same_meaning(query, candidate))
            .await
            .unwrap_or_else(|_| {
                warn!(timeout_ms = self.capabilities.validate_timeout_ms, "meaning validation timed out");
                false
            })
    }
}
