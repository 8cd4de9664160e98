//! faqdb-hybrid
//!
//! Fuses the text and vector crates into the FAQ answering engine: the
//! corpus lifecycle (`corpus`), hybrid ranking (`ranker`), the confidence
//! gate (`gate`) and the end-to-end pipeline with navigation routing
//! (`engine`).
pub mod corpus;
pub mod engine;
pub mod gate;
pub mod ranker;

pub use corpus::{CorpusHandle, CorpusSnapshot};
pub use engine::{Answer, FaqEngine, Response, Via};
pub use gate::{Confidence, ConfidenceGate};
pub use ranker::rank;
