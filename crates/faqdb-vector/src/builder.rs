//! Snapshot builder: turns raw FAQ records into an embedded corpus snapshot.
//!
//! Vectors from a previous snapshot are reused when the content hash of the
//! embedding text is unchanged; everything else is embedded with bounded
//! concurrency. A failed embedding leaves the entry with an empty vector,
//! which the ranker later skips.
use anyhow::Result;
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use faqdb_core::snapshot::RawFaqEntry;
use faqdb_core::text::tokenize;
use faqdb_core::traits::Embedder;
use faqdb_core::types::CorpusEntry;

const MIN_KEYWORD_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { concurrency: 4, show_progress: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub total: usize,
    pub reused: usize,
    pub embedded: usize,
    pub failed: usize,
}

/// Distinct tokens of question + answer with at least four characters, in
/// first-seen order, joined by ", ".
pub fn derive_keywords(question: &str, answer: &str) -> String {
    let mut seen = HashSet::new();
    tokenize(&format!("{question} {answer}"))
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|t| seen.insert(t.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn embedding_text(entry: &CorpusEntry) -> String {
    format!(
        "QUESTION: {}\nANSWER: {}\n\nKEYWORDS: {}",
        entry.question.trim(),
        entry.answer.trim(),
        entry.keyword.as_deref().unwrap_or_default()
    )
}

fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

fn prepare(index: usize, raw: &RawFaqEntry) -> CorpusEntry {
    let question = raw.question.trim().to_string();
    let answer = raw.answer.trim().to_string();
    let keyword = raw
        .keyword
        .clone()
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| derive_keywords(&question, &answer));
    CorpusEntry {
        id: raw.id.clone().filter(|id| !id.trim().is_empty()).unwrap_or_else(|| format!("item_{index}")),
        question,
        answer,
        keyword: Some(keyword).filter(|k| !k.is_empty()),
        intent: raw.intent.clone().filter(|i| !i.trim().is_empty()),
        vector: Vec::new(),
    }
}

pub async fn build_snapshot(
    raw: &[RawFaqEntry],
    provider: &dyn Embedder,
    previous: &[CorpusEntry],
    options: &BuildOptions,
) -> Result<(Vec<CorpusEntry>, BuildReport)> {
    let reusable: HashMap<String, &[f32]> = previous
        .iter()
        .filter(|e| e.has_vector())
        .map(|e| (content_hash(&embedding_text(e)), e.vector.as_slice()))
        .collect();

    let mut report = BuildReport { total: raw.len(), ..BuildReport::default() };
    let mut entries = Vec::with_capacity(raw.len());
    let mut pending = Vec::new();
    for (i, r) in raw.iter().enumerate() {
        let mut entry = prepare(i, r);
        let text = embedding_text(&entry);
        if let Some(v) = reusable.get(&content_hash(&text)) {
            entry.vector = v.to_vec();
            report.reused += 1;
        } else {
            pending.push((i, text));
        }
        entries.push(entry);
    }

    let pb = if options.show_progress { ProgressBar::new(pending.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    info!(provider = provider.embedder_id(), pending = pending.len(), reused = report.reused, "embedding FAQ entries");

    let results: Vec<(usize, Vec<f32>)> = stream::iter(pending)
        .map(|(i, text)| {
            let pb = pb.clone();
            async move {
                let vector = provider.embed(&text).await;
                pb.inc(1);
                (i, vector)
            }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;
    pb.finish_with_message("done");

    for (i, vector) in results {
        if vector.is_empty() {
            warn!(id = %entries[i].id, "embedding failed; entry will be excluded from ranking");
            report.failed += 1;
        } else {
            report.embedded += 1;
        }
        entries[i].vector = vector;
    }
    Ok((entries, report))
}
