use std::collections::HashSet;

use crate::stats::CorpusStatistics;

/// Share of the query's tokens that appear in the entry, in `[0, 1]`.
///
/// Without statistics every query token counts once per occurrence. With
/// statistics each distinct query token is weighted by its IDF, so a hit on
/// a rare word counts for more than a hit on a common one.
pub fn keyword_overlap_score(user_tokens: &[String], entry_tokens: &[String], idf: Option<&CorpusStatistics>) -> f32 {
    if user_tokens.is_empty() || entry_tokens.is_empty() {
        return 0.0;
    }
    let entry_set: HashSet<&str> = entry_tokens.iter().map(String::as_str).collect();
    match idf {
        None => {
            let matches = user_tokens.iter().filter(|t| entry_set.contains(t.as_str())).count();
            matches as f32 / user_tokens.len() as f32
        }
        Some(stats) => {
            let mut seen = HashSet::new();
            let (mut hit, mut total) = (0.0f32, 0.0f32);
            for token in user_tokens.iter().filter(|t| seen.insert(t.as_str())) {
                let w = stats.idf(token);
                total += w;
                if entry_set.contains(token.as_str()) {
                    hit += w;
                }
            }
            if total > 0.0 { hit / total } else { 0.0 }
        }
    }
}

/// Whether any query token appears verbatim among the entry tokens.
pub fn has_verbatim_hit(user_tokens: &[String], entry_tokens: &[String]) -> bool {
    user_tokens.iter().any(|t| entry_tokens.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqdb_core::text::tokenize;
    use faqdb_core::types::CorpusEntry;

    fn entry(keyword: &str) -> CorpusEntry {
        CorpusEntry {
            id: keyword.to_string(),
            question: String::new(),
            answer: String::new(),
            keyword: Some(keyword.to_string()),
            intent: None,
            vector: vec![1.0],
        }
    }

    #[test]
    fn plain_ratio_counts_query_tokens() {
        let score = keyword_overlap_score(&tokenize("hostel food menu"), &tokenize("hostel food"), None);
        assert!((score - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(keyword_overlap_score(&[], &tokenize("hostel"), None), 0.0);
        assert_eq!(keyword_overlap_score(&tokenize("hostel"), &[], None), 0.0);
    }

    #[test]
    fn idf_weighting_prefers_rare_hits() {
        let corpus = [entry("campus canteen"), entry("campus hostel"), entry("campus library")];
        let stats = CorpusStatistics::build(&corpus);
        let query = tokenize("campus canteen");

        let rare_hit = keyword_overlap_score(&query, &tokenize("canteen"), Some(&stats));
        let common_hit = keyword_overlap_score(&query, &tokenize("campus"), Some(&stats));
        assert!(rare_hit > 0.5 && common_hit < 0.5, "rare={rare_hit} common={common_hit}");
        assert!((rare_hit + common_hit - 1.0).abs() < 1e-6);
    }

    #[test]
    fn idf_denominator_uses_distinct_query_tokens() {
        let stats = CorpusStatistics::build(&[entry("fees")]);
        let score = keyword_overlap_score(&tokenize("fees fees"), &tokenize("fees"), Some(&stats));
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn verbatim_hit_detection() {
        assert!(has_verbatim_hit(&tokenize("mess food"), &tokenize("hostel food")));
        assert!(!has_verbatim_hit(&tokenize("drinking"), &tokenize("hostel food")));
    }
}
