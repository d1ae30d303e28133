//! Side files keyed by figure id
//!
//! The OCR and description processes run outside the build and persist
//! their output as flat JSON objects (`ocr.json`, `descriptions.json`)
//! mapping figure id to text. Both only fill keys that are missing unless
//! forced, so re-running them is idempotent per key.

use crate::json_output::write_json;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

static RE_HEIGHT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)_h\d+$").expect("Invalid regex"));

static RE_INLINE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Invalid regex"));

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// Figure id for a rendered image: `w0001-p0001-f01_h2400.webp` → `w0001-p0001-f01`
pub fn figure_id_from_image(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let id = RE_HEIGHT_SUFFIX.replace(stem, "");
    (!id.is_empty()).then(|| id.into_owned())
}

/// Tidy OCR output: single spaces within lines, at most one blank line
pub fn clean_ocr_text(text: &str) -> String {
    let spaced = RE_INLINE_SPACE.replace_all(text, " ");
    RE_BLANK_LINES.replace_all(&spaced, "\n\n").trim().to_string()
}

/// Collapse every whitespace run to one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Figure id → text map backed by a JSON file
#[derive(Debug)]
pub struct SidecarStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    updated: usize,
}

impl SidecarStore {
    /// Load the side file at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            load_entries(&path)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened side file");
        Ok(Self {
            path,
            entries,
            updated: 0,
        })
    }

    /// Whether `figure_id` should be (re)generated
    pub fn needs(&self, figure_id: &str, force: bool) -> bool {
        force || !self.entries.contains_key(figure_id)
    }

    pub fn get(&self, figure_id: &str) -> Option<&str> {
        self.entries.get(figure_id).map(String::as_str)
    }

    pub fn insert(&mut self, figure_id: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(figure_id.into(), text.into());
        self.updated += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the file if anything was inserted; returns the update count.
    pub fn save(&mut self) -> Result<usize> {
        let updated = self.updated;
        if updated > 0 {
            write_json(&self.path, &self.entries)?;
            self.updated = 0;
        }
        Ok(updated)
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let Value::Object(map) = value else {
        return Err(Error::InvalidSidecar {
            path: path.to_path_buf(),
            reason: "expected a JSON object keyed by figure id".to_string(),
        });
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
