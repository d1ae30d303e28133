//! Field normalizers
//!
//! Pure transforms from raw spreadsheet cell text into canonical scalar and
//! list forms. None of these functions fail: unparseable input degrades to
//! an empty string, an empty list, or `None`.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::records::ScopedFeatures;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_KEY_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-/().]+").expect("Invalid regex"));

static RE_KEY_FORBIDDEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_]").expect("Invalid regex"));

static RE_UNDERSCORE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("Invalid regex"));

static RE_NON_ALNUM_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

static RE_LIST_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[;,]+").expect("Invalid regex"));

static RE_WORK_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^w(\d+)$").expect("Invalid regex"));

static RE_IMAGE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|webp|jpg|jpeg|tif|tiff)$").expect("Invalid regex")
});

/// `w####-p###-f##`, page may carry four digits
static RE_STRUCTURED_FIGURE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(w\d{4})-p(\d{3,4})-f(\d{2})$").expect("Invalid regex")
});

/// Spellings that all mean "the figure is printed in black only"
const ONLY_BLACK_VARIANTS: &[&str] = &["onlyblack", "only-black", "only"];

/// Canonical token for black-only figures
pub const ONLY_BLACK: &str = "only-black";

/// Normalize a CSV header so lookups tolerate formatting drift.
///
/// `" Height (cm) "` and `"height_cm"` both become `"height_cm"`.
pub fn norm_key(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace('\u{feff}', "");
    let separated = RE_KEY_SEPARATORS.replace_all(&lowered, "_");
    let stripped = RE_KEY_FORBIDDEN.replace_all(&separated, "");
    let collapsed = RE_UNDERSCORE_RUNS.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

/// Trimmed string form of a cell; missing cells become the empty string.
pub fn clean_cell(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parse an integer out of free-form cell text.
///
/// Every character other than an ASCII digit or `-` is dropped first, so
/// `"1936 (approx.)"` parses as 1936 and `"ca. 20 cm"` as 20.
pub fn parse_int(raw: &str) -> Option<i64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Lowercase, hyphen-delimited slug. `&` reads as "and".
pub fn slugify(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace('&', " and ");
    RE_NON_ALNUM_RUNS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Canonical work id: `1`, `w1`, `W001` all become `w0001`.
///
/// Anything that is neither `w<digits>` nor pure digits passes through
/// lowercased, as a fallback identifier.
pub fn normalize_work_id(raw: &str) -> String {
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return compact;
    }
    if let Some(caps) = RE_WORK_ID.captures(&compact) {
        return format!("w{:0>4}", &caps[1]);
    }
    if compact.chars().all(|c| c.is_ascii_digit()) {
        return format!("w{:0>4}", compact);
    }
    compact
}

/// Canonical figure id: trimmed, image extension removed, lowercased.
pub fn normalize_figure_id(raw: &str) -> String {
    RE_IMAGE_EXTENSION
        .replace(raw.trim(), "")
        .to_lowercase()
}

/// Split on runs of commas or semicolons (features, colors, themes).
pub fn split_list(raw: &str) -> Vec<String> {
    RE_LIST_SEPARATORS
        .split(raw.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on semicolons only.
///
/// Person lists use this: a comma inside an entry is the "Last, First"
/// separator, not a list separator.
pub fn split_semicolons(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reorder `"Last, First Middle"` into `"First Middle Last"`.
pub fn flip_last_first(name: &str) -> String {
    let name = name.trim();
    match name.split_once(',') {
        None => name.to_string(),
        Some((last, rest)) => {
            let last = last.trim();
            let rest = rest.trim();
            if rest.is_empty() {
                last.to_string()
            } else {
                format!("{} {}", rest, last).trim().to_string()
            }
        }
    }
}

/// Decomposed `w####-p###-f##` figure id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureIdParts {
    pub work_id: String,
    pub page: Option<i64>,
    pub figure_code: Option<i64>,
}

/// Decompose a structured figure id; `None` when the id does not match.
pub fn parse_figure_id(figure_id: &str) -> Option<FigureIdParts> {
    let caps = RE_STRUCTURED_FIGURE_ID.captures(figure_id)?;
    Some(FigureIdParts {
        work_id: normalize_work_id(&caps[1]),
        page: parse_int(&caps[2]),
        figure_code: parse_int(&caps[3]),
    })
}

/// Type tokens: slugified, de-duplicated, `combo` dropped.
///
/// "combo" is implied by having more than one type and is never stored.
pub fn parse_types(raw: &str) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for token in split_list(raw).iter().map(|t| slugify(t)) {
        if token.is_empty() || token == "combo" || types.contains(&token) {
            continue;
        }
        types.push(token);
    }
    types
}

/// Feature tokens: slugified, empties dropped, order kept.
pub fn parse_features(raw: &str) -> Vec<String> {
    split_list(raw)
        .iter()
        .map(|t| slugify(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse `"bar: stacked, grouped; line: trend"` into features per type.
///
/// Only groups whose type is declared in `types` are kept. Anything dropped
/// is reported through `diagnostics`.
pub fn parse_scoped_features(
    raw: &str,
    types: &[String],
    figure_id: &str,
    diagnostics: &mut Diagnostics,
) -> ScopedFeatures {
    let mut scoped = ScopedFeatures::new();
    if raw.trim().is_empty() {
        return scoped;
    }

    let groups = split_semicolons(raw);
    if !groups.iter().any(|g| g.contains(':')) {
        diagnostics.push(Diagnostic::UnscopedFeatures {
            figure_id: figure_id.to_string(),
        });
        return scoped;
    }

    for group in &groups {
        let Some((type_raw, features_raw)) = group.split_once(':') else {
            diagnostics.push(Diagnostic::MalformedFeatureGroup {
                figure_id: figure_id.to_string(),
                group: group.clone(),
            });
            continue;
        };
        let type_key = slugify(type_raw);
        if type_key.is_empty() {
            continue;
        }
        if !types.contains(&type_key) {
            diagnostics.push(Diagnostic::UnknownScopedType {
                figure_id: figure_id.to_string(),
                type_key,
            });
            continue;
        }
        scoped.insert(type_key, parse_features(features_raw));
    }
    scoped
}

/// Normalize one color token. Separators become hyphens; only an exact
/// `grey` is respelled as `gray`.
pub fn normalize_color_token(raw: &str) -> String {
    let token = raw.trim().to_lowercase().replace(['_', ' '], "-");
    if token == "grey" {
        return "gray".to_string();
    }
    if ONLY_BLACK_VARIANTS.contains(&token.as_str()) {
        return ONLY_BLACK.to_string();
    }
    token
}

/// Parse a color cell into `(colors, only_black)`.
///
/// Black itself is never listed as a color; a figure with nothing but black
/// is flagged as `only_black` with an empty list.
pub fn parse_colors(raw: &str) -> (Vec<String>, bool) {
    let tokens: Vec<String> = split_list(raw)
        .iter()
        .map(|t| normalize_color_token(t))
        .collect();
    if tokens.iter().any(|t| t == ONLY_BLACK) {
        return (Vec::new(), true);
    }

    let mut colors: Vec<String> = Vec::new();
    for token in tokens.iter().filter(|t| !t.is_empty() && *t != "black") {
        if !colors.contains(token) {
            colors.push(token.clone());
        }
    }
    if colors.is_empty() && !tokens.is_empty() {
        return (Vec::new(), true);
    }
    (colors, false)
}

/// Flatten per-type features in type order, keeping first occurrences.
pub fn flatten_features(types: &[String], scoped: &ScopedFeatures) -> Vec<String> {
    let mut flat: Vec<String> = Vec::new();
    for feature in types.iter().flat_map(|t| scoped.get(t)) {
        if !flat.contains(feature) {
            flat.push(feature.clone());
        }
    }
    flat
}
