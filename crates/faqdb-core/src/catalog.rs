//! Loaders for navigation target catalogs.
//!
//! Panorama labels come from a locale file (`panorama_<ID>.label = <Label>`
//! per line); projects from a links JSON (`{"projects": [{"title", "url"}]}`).
//! Both loaders keep declaration order and drop case-insensitive duplicates,
//! since resolution picks the first matching entry.
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::NamedTarget;

pub fn parse_panorama_labels(locale: &str) -> Vec<NamedTarget> {
    let labels = locale.lines().filter_map(|line| {
        let (key, value) = line.split_once('=')?;
        let id = key.trim().strip_prefix("panorama_")?.strip_suffix(".label")?;
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') {
            return None;
        }
        Some(NamedTarget::new(value.trim()))
    });
    dedup_targets(labels)
}

pub fn load_panoramas(path: &Path) -> Result<Vec<NamedTarget>> {
    Ok(parse_panorama_labels(&fs::read_to_string(path)?))
}

#[derive(Debug, Deserialize)]
struct LinksFile {
    #[serde(default)]
    projects: Vec<ProjectLink>,
}

#[derive(Debug, Deserialize)]
struct ProjectLink {
    title: String,
    #[serde(default)]
    url: Option<String>,
}

pub fn parse_projects(json: &str) -> Result<Vec<NamedTarget>> {
    let links: LinksFile = serde_json::from_str(json)?;
    let projects = links.projects.into_iter().map(|p| NamedTarget { label: p.title.trim().to_string(), url: p.url });
    Ok(dedup_targets(projects))
}

pub fn load_projects(path: &Path) -> Result<Vec<NamedTarget>> {
    parse_projects(&fs::read_to_string(path)?)
}

fn dedup_targets(targets: impl Iterator<Item = NamedTarget>) -> Vec<NamedTarget> {
    let mut seen = HashSet::new();
    targets
        .filter(|t| !t.label.is_empty())
        .filter(|t| seen.insert(t.label.to_lowercase()))
        .collect()
}
