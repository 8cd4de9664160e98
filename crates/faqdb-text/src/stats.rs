//! Document frequencies and IDF weights for one corpus snapshot.
use std::collections::{HashMap, HashSet};

use faqdb_core::types::CorpusEntry;

/// Document frequency per token plus the number of contributing documents.
///
/// Built from a single snapshot and never mixed with another: for every
/// token `1 <= df <= total_documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStatistics {
    document_frequency: HashMap<String, usize>,
    total_documents: usize,
}

impl CorpusStatistics {
    /// Count each entry's distinct lexical tokens (keyword, else question).
    /// Entries without any token do not count as documents.
    pub fn build(entries: &[CorpusEntry]) -> Self {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut total_documents = 0;
        for entry in entries {
            let unique: HashSet<String> = entry.lexical_tokens().into_iter().collect();
            if unique.is_empty() {
                continue;
            }
            total_documents += 1;
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }
        Self { document_frequency, total_documents }
    }

    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.document_frequency.get(token).copied().unwrap_or(0)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.document_frequency.len()
    }

    /// `ln((N + 1) / (df + 1)) + 1`. Unseen tokens get the corpus maximum.
    pub fn idf(&self, token: &str) -> f32 {
        let n = self.total_documents as f32;
        let df = self.document_frequency(token) as f32;
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    }
}
