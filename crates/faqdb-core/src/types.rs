//! Domain types shared by the text, vector and hybrid engines.

use serde::{Deserialize, Serialize};

use crate::text::tokenize;

pub type EntryId = String;

/// One retrievable FAQ unit, loaded from a corpus snapshot.
///
/// - `id`: stable identifier (`item_<n>` for generated snapshots)
/// - `question`/`answer`: canonical texts
/// - `keyword`: pre-extracted significant tokens, preferred over `question`
///   for lexical scoring when present
/// - `intent`: groups paraphrase variants that share one answer
/// - `vector`: embedding; empty means the entry cannot be ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: EntryId,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default)]
    pub vector: Vec<f32>,
}

impl CorpusEntry {
    /// Text used for lexical scoring: `keyword` when non-blank, else `question`.
    pub fn lexical_text(&self) -> &str {
        match self.keyword.as_deref() {
            Some(k) if !k.trim().is_empty() => k,
            _ => &self.question,
        }
    }

    pub fn lexical_tokens(&self) -> Vec<String> {
        tokenize(self.lexical_text())
    }

    pub fn has_vector(&self) -> bool {
        !self.vector.is_empty()
    }
}

/// A corpus entry paired with the score it earned for one query.
///
/// Borrows the entry; the score is transient and never written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub entry: &'a CorpusEntry,
    pub score: f32,
}

/// Per-request query state. Built fresh for every question.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub raw: String,
    pub tokens: Vec<String>,
    pub vector: Option<Vec<f32>>,
}

impl QueryContext {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = tokenize(&raw);
        Self { raw, tokens, vector: None }
    }

    /// Cache key for embeddings: tokens joined by single spaces.
    pub fn normalized(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = if vector.is_empty() { None } else { Some(vector) };
        self
    }
}

/// A navigation target: a panorama label or a project title (with URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTarget {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NamedTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), url: None }
    }

    pub fn with_url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self { label: label.into(), url: Some(url.into()) }
    }
}

/// Which catalog a navigation target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Panorama,
    Project,
}
