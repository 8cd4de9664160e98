//! Gemini (Generative Language API, v1beta) backend for both capabilities.
//!
//! Every failure path (missing key, transport error, non-2xx status, bad
//! JSON) is logged and collapsed into the capability's "no signal" value:
//! an empty vector or `false`.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use faqdb_core::config::GeminiConfig;
use faqdb_core::traits::{Embedder, MeaningValidator};

const SAME_MEANING_INSTRUCTION: &str = "\
Decide whether the two questions below ask for the same information.
Treat these as not changing meaning: grammar, word order, spelling mistakes,
missing helper words (in, at, for) and common synonyms (school = campus,
mess food = hostel food).
Reply with exactly one word: yes or no.";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    api_key: Option<String>,
    id: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        let api_key = config.resolved_api_key();
        let id = format!("gemini:{}", config.embed_model);
        Self { client, config, api_key, id }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str, method: &str, key: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}?key={key}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post<Req: Serialize + Sync, Resp: serde::de::DeserializeOwned + Send>(&self, url: String, body: &Req) -> Option<Resp> {
        let resp = match self.client.post(url).json(body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "gemini request failed");
                return None;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "gemini returned non-success status");
            return None;
        }
        match resp.json::<Resp>().await {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, "gemini response was not valid JSON");
                None
            }
        }
    }

    /// One-shot text generation. Empty string on any failure.
    pub async fn generate(&self, instruction: &str, prompt: &str) -> String {
        let Some(key) = self.api_key.as_deref() else {
            warn!("GEMINI_API_KEY is not set; skipping generation");
            return String::new();
        };
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: format!("{instruction}\n\n{prompt}") }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };
        let url = self.endpoint(&self.config.chat_model, "generateContent", key);
        let parsed: Option<GenerateResponse> = self.post(url, &body).await;
        parsed
            .and_then(|r| r.candidates.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default()
    }
}

/// `yes`, `Yes.` or `yes - same topic` confirm; anything else rejects.
pub fn parse_yes_no(reply: &str) -> bool {
    reply.trim().to_lowercase().starts_with("yes")
}

#[async_trait]
impl Embedder for GeminiClient {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    async fn embed(&self, text: &str) -> Vec<f32> {
        let Some(key) = self.api_key.as_deref() else {
            warn!("GEMINI_API_KEY is not set; no embeddings available");
            return Vec::new();
        };
        let body = EmbedRequest { content: Content { role: None, parts: vec![Part { text: text.to_string() }] } };
        let url = self.endpoint(&self.config.embed_model, "embedContent", key);
        let parsed: Option<EmbedResponse> = self.post(url, &body).await;
        let values = parsed.map(|r| r.embedding.values).unwrap_or_default();
        debug!(dim = values.len(), "gemini embedding");
        values
    }
}

#[async_trait]
impl MeaningValidator for GeminiClient {
    async fn validate_same_meaning(&self, query: &str, candidate: &str) -> bool {
        let prompt = format!("User question: \"{query}\"\nFAQ question: \"{candidate}\"");
        let reply = self.generate(SAME_MEANING_INSTRUCTION, &prompt).await;
        debug!(%reply, "same-meaning check");
        parse_yes_no(&reply)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}
