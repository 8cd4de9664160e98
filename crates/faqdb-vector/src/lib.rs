//! faqdb-vector
//!
//! Vector side of retrieval: cosine similarity, the session embedding cache
//! and the snapshot builder that embeds raw FAQ records.
pub mod builder;
pub mod cache;
pub mod similarity;

pub use builder::{build_snapshot, derive_keywords, embedding_text, BuildOptions, BuildReport};
pub use cache::EmbeddingCache;
pub use similarity::cosine_similarity;
