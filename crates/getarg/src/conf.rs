//! Config-file reader.
//!
//! One `name=value` (or bare `name`) per line. `#` starts a comment, blank
//! lines and `[section]` headers are ignored, and names may be written with
//! or without leading dashes. Lines that cannot name a flag are skipped with a
//! warning rather than failing the whole file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::table::canonical_name;

/// A single config line. `name` is canonical when produced by [`parse_conf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfEntry {
    pub name: String,
    pub value: Option<String>,
}

pub fn parse_conf(text: &str) -> Vec<ConfEntry> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((head, _)) => head,
            None => line,
        }
        .trim();
        if line.is_empty() || (line.starts_with('[') && line.ends_with(']')) {
            continue;
        }

        let (name, value) = match line.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (line, None),
        };
        if name.chars().any(char::is_whitespace) {
            tracing::warn!(line = idx + 1, name, "skipping config line with whitespace in name");
            continue;
        }
        match canonical_name(name) {
            Some(name) => entries.push(ConfEntry { name, value }),
            None => tracing::warn!(line = idx + 1, "skipping config line without a name"),
        }
    }
    entries
}

pub fn read_conf_file(path: &Path) -> Result<Vec<ConfEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let entries = parse_conf(&text);
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded config file");
    Ok(entries)
}
