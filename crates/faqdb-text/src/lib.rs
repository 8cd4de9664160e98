//! faqdb-text
//!
//! Lexical side of retrieval: corpus statistics and IDF (`stats`), keyword
//! overlap scoring (`overlap`) and fuzzy navigation target resolution
//! (`route`). All of it runs on `faqdb_core::text::tokenize` output.
pub mod overlap;
pub mod route;
pub mod stats;

pub use overlap::{has_verbatim_hit, keyword_overlap_score};
pub use route::{clean_navigation_query, edit_distance, resolve, route, RouteMatch};
pub use stats::CorpusStatistics;
