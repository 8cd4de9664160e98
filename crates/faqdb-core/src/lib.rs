#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod text;
pub mod traits;
pub mod types;

/// Literal answer surfaced whenever no confident match is found.
///
/// Every fallback path returns exactly this text; callers may assert on it.
pub const FALLBACK_ANSWER: &str = "I don\u{2019}t have that information in my data. Please visit https://montforticse.in/ or contact the school office for official details.";
