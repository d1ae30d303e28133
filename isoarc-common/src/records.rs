//! Work and Figure records
//!
//! Field order in these structs is the key order of the published JSON.
//! Optional values serialize as `null`; keys are always present.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One published source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    /// `w` + zero-padded number, or a passed-through raw token
    pub work_id: String,
    pub year: Option<i64>,
    pub title: String,
    pub series: Option<String>,
    pub language: Option<String>,
    /// "First Last" order
    pub authors: Vec<String>,
    pub information_designers: Vec<String>,
    pub publisher: Option<String>,
    pub publisher_city: Option<String>,
    pub height_cm: Option<i64>,
    pub oclc_number: Option<String>,
    pub isbn: Option<String>,
    pub scan_source: Option<String>,
    pub first_edition: Option<String>,
}

/// One chart or image embedded in a Work
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub id: String,
    /// Soft reference into the Work set; may dangle
    pub work_id: Option<String>,
    pub page: Option<i64>,
    pub figure_code: Option<i64>,
    pub thumb: String,
    pub view: String,
    pub title: Option<String>,
    pub types: Vec<String>,
    pub types_flat: Vec<String>,
    pub is_combo: bool,
    pub features_by_type: ScopedFeatures,
    pub features_flat: Vec<String>,
    pub colors: Vec<String>,
    pub only_black: bool,
    pub themes: Vec<String>,
    pub ai_description: Option<String>,
    pub ocr_text: Option<String>,
    /// Copy of the referenced Work's year
    pub work_year: Option<i64>,
    pub type_tokens: Vec<String>,
}

impl Figure {
    /// Thumbnail path for a figure id
    pub fn thumb_path(id: &str) -> String {
        format!("/webp/thumbs/{}_h0500.webp", id)
    }

    /// Full view path for a figure id
    pub fn view_path(id: &str) -> String {
        format!("/webp/views/{}_h2400.webp", id)
    }
}

/// Feature lists keyed by type token, in insertion order
///
/// A type with no entry has no features; `get` returns an empty slice for
/// it rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedFeatures {
    entries: Vec<(String, Vec<String>)>,
}

impl ScopedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the features for a type, replacing an earlier entry in place
    pub fn insert(&mut self, type_key: String, features: Vec<String>) {
        match self.entries.iter_mut().find(|(key, _)| *key == type_key) {
            Some((_, existing)) => *existing = features,
            None => self.entries.push((type_key, features)),
        }
    }

    pub fn get(&self, type_key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(key, _)| key == type_key)
            .map(|(_, features)| features.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == type_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScopedFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, features) in &self.entries {
            map.serialize_entry(key, features)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_paths_follow_id() {
        assert_eq!(
            Figure::thumb_path("w0001-p0001-f01"),
            "/webp/thumbs/w0001-p0001-f01_h0500.webp"
        );
        assert_eq!(
            Figure::view_path("w0001-p0001-f01"),
            "/webp/views/w0001-p0001-f01_h2400.webp"
        );
    }

    #[test]
    fn test_scoped_features_keeps_insertion_order() {
        let mut scoped = ScopedFeatures::new();
        scoped.insert("line".to_string(), vec!["trend".to_string()]);
        scoped.insert("bar".to_string(), vec!["stacked".to_string()]);
        scoped.insert("line".to_string(), vec!["dashed".to_string()]);

        assert_eq!(scoped.keys().collect::<Vec<_>>(), vec!["line", "bar"]);
        assert_eq!(
            serde_json::to_string(&scoped).unwrap(),
            r#"{"line":["dashed"],"bar":["stacked"]}"#
        );
    }

    #[test]
    fn test_missing_type_reads_as_empty() {
        let scoped = ScopedFeatures::new();
        assert!(scoped.get("bar").is_empty());
        assert!(!scoped.contains("bar"));
    }

    #[test]
    fn test_work_serializes_camel_case_with_nulls() {
        let work = Work {
            work_id: "w0001".to_string(),
            year: Some(1936),
            title: "International Picture Language".to_string(),
            series: None,
            language: None,
            authors: vec!["Otto Neurath".to_string()],
            information_designers: vec![],
            publisher: None,
            publisher_city: None,
            height_cm: None,
            oclc_number: None,
            isbn: None,
            scan_source: None,
            first_edition: None,
        };
        let value = serde_json::to_value(&work).unwrap();
        assert_eq!(value["workId"], json!("w0001"));
        assert_eq!(value["publisherCity"], json!(null));
        assert_eq!(value["informationDesigners"], json!([]));
    }
}
