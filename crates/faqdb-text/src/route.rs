//! Fuzzy resolution of navigation queries ("go to library") to catalog targets.
use serde::Serialize;

use faqdb_core::types::{NamedTarget, TargetKind};

/// Navigation verbs and filler phrases removed before matching.
/// Matched on whole words, longest phrase first.
const STRIP_PHRASES: &[&str] = &[
    "take me to", "go to", "take me", "look at", "can you", "could you",
    "goto", "go", "open", "show", "view", "navigate", "visit", "see", "check",
    "the", "a", "an", "please", "pls", "kindly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteMatch<'a> {
    pub kind: TargetKind,
    pub target: &'a NamedTarget,
}

/// Reduce a navigation query to the bare place name.
///
/// Punctuation inside a word is dropped without splitting it
/// (`"guest-room"` -> `"guestroom"`), navigation phrases and fillers are
/// removed on word boundaries, then digits go.
pub fn clean_navigation_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let words: Vec<String> = lowered
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();

    let mut kept = Vec::with_capacity(words.len());
    let mut i = 0;
    'words: while i < words.len() {
        for phrase in longest_first() {
            let parts: Vec<&str> = phrase.split(' ').collect();
            let end = i + parts.len();
            if end <= words.len() && words[i..end].iter().zip(&parts).all(|(w, p)| w == p) {
                i = end;
                continue 'words;
            }
        }
        kept.push(words[i].as_str());
        i += 1;
    }

    kept.iter()
        .map(|w| w.chars().filter(|c| !c.is_ascii_digit() && *c != '_').collect::<String>())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn longest_first() -> impl Iterator<Item = &'static str> {
    let mut phrases = STRIP_PHRASES.to_vec();
    phrases.sort_by_key(|p| std::cmp::Reverse(p.split(' ').count()));
    phrases.into_iter()
}

/// Classic Levenshtein distance over chars (insert, delete, substitute cost 1).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1).min(dp[i][j - 1] + 1).min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[a.len()][b.len()]
}

/// Same number of words and every query word within `max_distance` edits of
/// the label word at its position (capped at half that word's length).
///
/// Catches typos spread over several words ("gest rum") whose whole-string
/// distance exceeds the bound.
fn words_within(label: &str, cleaned: &str, max_distance: usize) -> bool {
    let label_words: Vec<&str> = label.split_whitespace().collect();
    let query_words: Vec<&str> = cleaned.split_whitespace().collect();
    label_words.len() > 1
        && label_words.len() == query_words.len()
        && label_words.iter().zip(&query_words).all(|(l, q)| {
            let bound = max_distance.min(l.chars().count() / 2);
            edit_distance(l, q) <= bound
        })
}

/// Exact (case-insensitive) label match first, then the first label that
/// contains the query, is contained in it, or is within `max_distance` edits
/// as a whole or word by word.
pub fn resolve<'a>(cleaned: &str, catalog: &'a [NamedTarget], max_distance: usize) -> Option<&'a NamedTarget> {
    if cleaned.is_empty() {
        return None;
    }
    let labelled = || catalog.iter().filter(|t| !t.label.trim().is_empty());
    if let Some(exact) = labelled().find(|t| t.label.to_lowercase() == cleaned) {
        return Some(exact);
    }
    labelled().find(|t| {
        let label = t.label.to_lowercase();
        label.contains(cleaned)
            || cleaned.contains(&label)
            || edit_distance(&label, cleaned) <= max_distance
            || words_within(&label, cleaned, max_distance)
    })
}

/// Panoramas are tried before projects; the first catalog with a hit wins.
pub fn route<'a>(
    query: &str,
    panoramas: &'a [NamedTarget],
    projects: &'a [NamedTarget],
    max_distance: usize,
) -> Option<RouteMatch<'a>> {
    let cleaned = clean_navigation_query(query);
    if cleaned.is_empty() {
        return None;
    }
    [(TargetKind::Panorama, panoramas), (TargetKind::Project, projects)]
        .into_iter()
        .find_map(|(kind, catalog)| resolve(&cleaned, catalog, max_distance).map(|target| RouteMatch { kind, target }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(labels: &[&str]) -> Vec<NamedTarget> {
        labels.iter().map(|l| NamedTarget::new(*l)).collect()
    }

    #[test]
    fn cleaning_strips_verbs_fillers_and_digits() {
        assert_eq!(clean_navigation_query("Go to gest rum"), "gest rum");
        assert_eq!(clean_navigation_query("Please take me to the Library!"), "library");
        assert_eq!(clean_navigation_query("open lab 2"), "lab");
        assert_eq!(clean_navigation_query("show me the guest-room"), "me guestroom");
        assert_eq!(clean_navigation_query("go, see"), "");
    }

    #[test]
    fn cleaning_keeps_only_ascii_word_characters() {
        assert_eq!(clean_navigation_query("visit the café"), "caf");
        assert_eq!(clean_navigation_query("go to ñ"), "");
        assert_eq!(clean_navigation_query("open science_lab"), "sciencelab");
    }

    #[test]
    fn phrases_only_match_whole_words() {
        assert_eq!(clean_navigation_query("gothic hall"), "gothic hall");
        assert_eq!(clean_navigation_query("seminar"), "seminar");
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("guest room", "gest rum"), 3);
        assert_eq!(edit_distance("guest room", "gust room"), 1);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn typo_resolves_to_guest_room() {
        let panos = catalog(&["Guest Room", "Library"]);
        let hit = route("go to gest rum", &panos, &[], 2).expect("match");
        assert_eq!(hit.kind, TargetKind::Panorama);
        assert_eq!(hit.target.label, "Guest Room");
    }

    #[test]
    fn word_by_word_typos_respect_short_words() {
        let panos = catalog(&["Art Room"]);
        assert!(resolve("art rum", &panos, 2).is_some());
        assert!(resolve("cat rum", &panos, 2).is_none(), "3-letter words allow one edit");
    }

    #[test]
    fn exact_match_beats_earlier_fuzzy_candidate() {
        let panos = catalog(&["Science Lab Block", "Lab"]);
        assert_eq!(resolve("lab", &panos, 2).map(|t| t.label.as_str()), Some("Lab"));
    }

    #[test]
    fn containment_both_ways() {
        let panos = catalog(&["Main Auditorium"]);
        assert!(resolve("auditorium", &panos, 2).is_some());
        assert!(resolve("main auditorium hall", &panos, 2).is_some());
    }

    #[test]
    fn panoramas_shadow_projects() {
        let panos = catalog(&["Robotics Lab"]);
        let projects = vec![NamedTarget::with_url("Robotics", "https://example.org/robotics")];
        let hit = route("robotics", &panos, &projects, 2).expect("match");
        assert_eq!(hit.kind, TargetKind::Panorama);
    }

    #[test]
    fn projects_resolve_when_no_panorama_matches() {
        let panos = catalog(&["Library"]);
        let projects = vec![NamedTarget::with_url("Solar Car", "https://example.org/solar")];
        let hit = route("visit solar kar", &panos, &projects, 2).expect("match");
        assert_eq!(hit.kind, TargetKind::Project);
        assert_eq!(hit.target.url.as_deref(), Some("https://example.org/solar"));
    }

    #[test]
    fn unrelated_or_empty_queries_do_not_route() {
        let panos = catalog(&["Guest Room", "Library"]);
        assert!(route("what are the school fees", &panos, &[], 2).is_none());
        assert!(route("go to the", &panos, &[], 2).is_none());
        assert!(route("", &panos, &[], 2).is_none());
    }

    #[test]
    fn blank_labels_never_match() {
        let panos = catalog(&["", "Library"]);
        assert_eq!(resolve("anything", &panos, 2), None);
    }
}
