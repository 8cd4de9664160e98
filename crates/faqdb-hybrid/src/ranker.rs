//! Hybrid ranking: cosine similarity blended with IDF-weighted keyword overlap.
use std::collections::HashMap;

use faqdb_core::config::{RetrievalConfig, Weights};
use faqdb_core::types::{QueryContext, ScoredCandidate};
use faqdb_text::{has_verbatim_hit, keyword_overlap_score};
use faqdb_vector::cosine_similarity;

use crate::corpus::CorpusSnapshot;

/// Rank `snapshot` against `query`, best first, at most `limit` candidates.
///
/// Entries without a vector are skipped. With a query vector the blend
/// follows the query-length regime; without one only keyword evidence
/// counts and zero-score entries are dropped. Paraphrases sharing an intent
/// collapse to their best variant. Ties keep corpus order.
pub fn rank<'a>(
    query: &QueryContext,
    snapshot: &'a CorpusSnapshot,
    config: &RetrievalConfig,
    limit: usize,
) -> Vec<ScoredCandidate<'a>> {
    let weights = match query.vector {
        Some(_) => config.weights_for(query.tokens.len()),
        None => Weights::KEYWORD_ONLY,
    };
    let idf = config.use_idf.then(|| snapshot.statistics());

    let scored = snapshot.iter_with_tokens().enumerate().filter(|(_, (e, _))| e.has_vector()).filter_map(|(pos, (entry, tokens))| {
        let semantic = query.vector.as_deref().map_or(0.0, |q| cosine_similarity(q, &entry.vector));
        let keyword = keyword_overlap_score(&query.tokens, tokens, idf);
        let mut score = semantic * weights.semantic + keyword * weights.keyword;
        if has_verbatim_hit(&query.tokens, tokens) {
            score += config.overlap_bonus;
        }
        if query.vector.is_none() && score <= 0.0 {
            return None;
        }
        Some((pos, ScoredCandidate { entry, score }))
    });

    let mut ranked: Vec<(usize, ScoredCandidate<'a>)> = if config.collapse_intents {
        collapse_intents(scored)
    } else {
        scored.collect()
    };
    ranked.sort_by(|(pa, a), (pb, b)| b.score.total_cmp(&a.score).then(pa.cmp(pb)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, c)| c).collect()
}

/// Keep only the highest-scoring entry per intent; the first one wins ties.
fn collapse_intents<'a>(scored: impl Iterator<Item = (usize, ScoredCandidate<'a>)>) -> Vec<(usize, ScoredCandidate<'a>)> {
    let mut kept: Vec<(usize, ScoredCandidate<'a>)> = Vec::new();
    let mut slot_by_intent: HashMap<&'a str, usize> = HashMap::new();
    for (pos, candidate) in scored {
        let Some(intent) = candidate.entry.intent.as_deref() else {
            kept.push((pos, candidate));
            continue;
        };
        match slot_by_intent.get(intent) {
            Some(&slot) if candidate.score > kept[slot].1.score => kept[slot] = (pos, candidate),
            Some(_) => {}
            None => {
                slot_by_intent.insert(intent, kept.len());
                kept.push((pos, candidate));
            }
        }
    }
    kept
}
