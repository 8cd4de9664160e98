//! Corpus snapshots and their load/reload lifecycle.
//!
//! Entries and the statistics derived from them live in one immutable
//! `CorpusSnapshot`, so scoring can never pair one snapshot's entries with
//! another's token counts. `CorpusHandle` swaps whole snapshots; queries
//! clone the current `Arc` and score without holding any lock.
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use faqdb_core::error::Result;
use faqdb_core::snapshot::read_snapshot;
use faqdb_core::types::CorpusEntry;
use faqdb_text::CorpusStatistics;

#[derive(Debug, Default)]
pub struct CorpusSnapshot {
    entries: Vec<CorpusEntry>,
    lexical_tokens: Vec<Vec<String>>,
    statistics: CorpusStatistics,
    malformed: usize,
}

impl CorpusSnapshot {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        let statistics = CorpusStatistics::build(&entries);
        let lexical_tokens = entries.iter().map(CorpusEntry::lexical_tokens).collect();
        let malformed = entries.iter().filter(|e| !e.has_vector()).count();
        for entry in entries.iter().filter(|e| !e.has_vector()) {
            warn!(id = %entry.id, "corpus entry has no vector; excluded from ranking");
        }
        Self { entries, lexical_tokens, statistics, malformed }
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Entries paired with their precomputed lexical tokens, in corpus order.
    pub fn iter_with_tokens(&self) -> impl Iterator<Item = (&CorpusEntry, &[String])> {
        self.entries.iter().zip(self.lexical_tokens.iter().map(Vec::as_slice))
    }

    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries without a vector; they are never ranked.
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

#[derive(Debug, Default)]
pub struct CorpusHandle {
    current: RwLock<Option<Arc<CorpusSnapshot>>>,
}

impl CorpusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CorpusEntry>) -> Self {
        let handle = Self::new();
        handle.replace(entries);
        handle
    }

    /// Current snapshot; an empty one when nothing has been loaded.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone().unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Load from `path` unless a snapshot is already in place.
    pub fn load_once(&self, path: &Path) -> Result<Arc<CorpusSnapshot>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = current.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(load(path)?);
        *current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Always re-read `path`. On failure the previous snapshot stays active.
    pub fn reload(&self, path: &Path) -> Result<Arc<CorpusSnapshot>> {
        let snapshot = Arc::new(load(path)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn replace(&self, entries: Vec<CorpusEntry>) -> Arc<CorpusSnapshot> {
        let snapshot = Arc::new(CorpusSnapshot::new(entries));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        snapshot
    }
}

fn load(path: &Path) -> Result<CorpusSnapshot> {
    let snapshot = CorpusSnapshot::new(read_snapshot(path)?);
    info!(
        path = %path.display(),
        entries = snapshot.len(),
        malformed = snapshot.malformed(),
        documents = snapshot.statistics().total_documents(),
        "corpus snapshot loaded"
    );
    Ok(snapshot)
}
