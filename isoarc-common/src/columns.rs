//! Column alias table and normalized rows
//!
//! Spreadsheet headers drift between exports ("Pub Year", "year",
//! "publication year"). Each logical field maps to an ordered list of
//! accepted header spellings; the first non-empty cell wins.

use crate::normalize::norm_key;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Logical input fields for Work and Figure rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    WorkId,
    WorkTitle,
    Year,
    Series,
    Language,
    Authors,
    InformationDesigners,
    Publisher,
    PublisherCity,
    HeightCm,
    OclcNumber,
    Isbn,
    ScanSource,
    FirstEdition,
    FigureId,
    FigureWorkId,
    Page,
    FigureCode,
    FigureTitle,
    Types,
    Features,
    Colors,
    OcrText,
    AiDescription,
    Themes,
}

/// Accepted header spellings per field, in priority order.
///
/// Older figure exports used `figure_type` / `basic chart` / `chart facets`;
/// they are kept here as aliases of the current `types` / `features`.
const ALIASES: &[(Field, &[&str])] = &[
    (Field::WorkId, &["work_id", "work", "workid", "work key", "work_key"]),
    (Field::WorkTitle, &["title"]),
    (Field::Year, &["pub year", "year", "publication year", "pub_year"]),
    (Field::Series, &["series"]),
    (Field::Language, &["language"]),
    (Field::Authors, &["author(s)", "authors", "author"]),
    (
        Field::InformationDesigners,
        &["information designers", "information_designers", "designers"],
    ),
    (Field::Publisher, &["publisher"]),
    (Field::PublisherCity, &["publisher city", "publisher_city", "city"]),
    (Field::HeightCm, &["height (cm)", "height_cm", "height"]),
    (Field::OclcNumber, &["oclc_number", "oclc"]),
    (Field::Isbn, &["isbn"]),
    (Field::ScanSource, &["scan_source"]),
    (Field::FirstEdition, &["1st ed.", "1st_ed", "first_edition"]),
    (Field::FigureId, &["figure_id", "id", "figure", "filename"]),
    (Field::FigureWorkId, &["work_id", "work", "workid"]),
    (Field::Page, &["page", "page_number"]),
    (Field::FigureCode, &["figure_code", "fig_code", "f"]),
    (Field::FigureTitle, &["figure_title", "title"]),
    (
        Field::Types,
        &["types", "figure_type", "basic chart", "chart_type", "chart type", "type"],
    ),
    (
        Field::Features,
        &["features", "chart facets", "facets", "chart_types", "chart types"],
    ),
    (Field::Colors, &["colors", "color", "palette"]),
    (Field::OcrText, &["ocr_text", "ocr", "figure_text", "figure text"]),
    (Field::AiDescription, &["ai_description", "ai description"]),
    (Field::Themes, &["themes", "topic themes", "topic_themes"]),
];

/// Alias table with every spelling already passed through `norm_key`
static NORMALIZED_ALIASES: Lazy<HashMap<Field, Vec<String>>> = Lazy::new(|| {
    ALIASES
        .iter()
        .map(|(field, spellings)| {
            let mut keys: Vec<String> = Vec::new();
            for key in spellings.iter().map(|s| norm_key(s)) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            (*field, keys)
        })
        .collect()
});

/// Normalized header keys accepted for a field
pub fn aliases(field: Field) -> &'static [String] {
    NORMALIZED_ALIASES
        .get(&field)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// One data row keyed by normalized header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell under the normalized form of `header`.
    ///
    /// A later header that normalizes to the same key replaces the earlier
    /// cell.
    pub fn insert(&mut self, header: &str, value: &str) {
        self.cells.insert(norm_key(header), value.trim().to_string());
    }

    /// First non-empty cell among the field's aliases, or `""`
    pub fn first(&self, field: Field) -> &str {
        aliases(field)
            .iter()
            .filter_map(|key| self.cells.get(key))
            .map(String::as_str)
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    /// Like [`Row::first`], with empty mapped to `None`
    pub fn optional(&self, field: Field) -> Option<String> {
        let value = self.first(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

impl<H: AsRef<str>, V: AsRef<str>> FromIterator<(H, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (header, value) in iter {
            row.insert(header.as_ref(), value.as_ref());
        }
        row
    }
}
