//! Corpus snapshot IO.
//!
//! A snapshot is a JSON array of `{id, question, answer, keyword?, intent?, vector}`
//! records in corpus order. Raw FAQ files (the input of the embedding job)
//! use the same shape without vectors.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::CorpusEntry;

/// A FAQ record before embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFaqEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
}

pub fn read_snapshot(path: &Path) -> Result<Vec<CorpusEntry>> {
    read_json_array(path)
}

pub fn read_raw_faq(path: &Path) -> Result<Vec<RawFaqEntry>> {
    read_json_array(path)
}

pub fn write_snapshot(path: &Path, entries: &[CorpusEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::Snapshot { path: path.to_path_buf(), reason: e.to_string() })
}
