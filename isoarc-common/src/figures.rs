//! Figure builder
//!
//! Resolves each figure row against the finished Work index:
//! identity from the (possibly structured) figure id, chart types and
//! per-type features, colors, derived image paths, and the work year.

use crate::columns::{Field, Row};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::normalize::{
    flatten_features, normalize_figure_id, normalize_work_id, parse_colors, parse_features,
    parse_figure_id, parse_int, parse_scoped_features, parse_types, split_list,
};
use crate::records::{Figure, ScopedFeatures};
use crate::works::WorkIndex;
use tracing::debug;

/// Build Figure records from normalized rows, sorted by `id`.
pub fn build_figures(
    rows: &[Row],
    works: &WorkIndex<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<Figure> {
    let mut figures: Vec<Figure> = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match figure_from_row(row, works, diagnostics) {
            Some(figure) => figures.push(figure),
            None => debug!(row = index + 1, "Skipping figure row without id"),
        }
    }

    figures.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(figures = figures.len(), "Built figures");
    figures
}

/// Map one row to a Figure; `None` when the figure id is missing
pub fn figure_from_row(
    row: &Row,
    works: &WorkIndex<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<Figure> {
    let id = normalize_figure_id(row.first(Field::FigureId));
    if id.is_empty() {
        return None;
    }

    let parts = parse_figure_id(&id);
    let column_work_id = normalize_work_id(row.first(Field::FigureWorkId));
    if let Some(parts) = &parts {
        if !column_work_id.is_empty() && parts.work_id != column_work_id {
            diagnostics.push(Diagnostic::WorkIdMismatch {
                figure_id: id.clone(),
                from_figure_id: parts.work_id.clone(),
                from_column: column_work_id.clone(),
            });
        }
    }

    // The id is authoritative; columns fill in only what it lacks.
    let work_id = parts
        .as_ref()
        .map(|p| p.work_id.clone())
        .filter(|w| !w.is_empty())
        .or_else(|| (!column_work_id.is_empty()).then_some(column_work_id));
    let page = parts
        .as_ref()
        .and_then(|p| p.page)
        .or_else(|| parse_int(row.first(Field::Page)));
    let figure_code = parts
        .as_ref()
        .and_then(|p| p.figure_code)
        .or_else(|| parse_int(row.first(Field::FigureCode)));

    let types = parse_types(row.first(Field::Types));
    let features_by_type = resolve_features(&id, &types, row.first(Field::Features), diagnostics);
    let features_flat = flatten_features(&types, &features_by_type);
    let (colors, only_black) = parse_colors(row.first(Field::Colors));

    let work_year = work_id
        .as_deref()
        .and_then(|w| works.get(w))
        .and_then(|work| work.year);

    Some(Figure {
        thumb: Figure::thumb_path(&id),
        view: Figure::view_path(&id),
        work_id,
        page,
        figure_code,
        title: row.optional(Field::FigureTitle),
        types_flat: types.clone(),
        type_tokens: types.clone(),
        is_combo: types.len() > 1,
        types,
        features_by_type,
        features_flat,
        colors,
        only_black,
        themes: split_list(row.first(Field::Themes)),
        ai_description: row.optional(Field::AiDescription),
        ocr_text: row.optional(Field::OcrText),
        work_year,
        id,
    })
}

/// Assign features to types.
///
/// A single-type figure takes the whole feature list. A combo figure needs
/// `type: features` groups; declared types left without a group are
/// reported.
fn resolve_features(
    figure_id: &str,
    types: &[String],
    raw: &str,
    diagnostics: &mut Diagnostics,
) -> ScopedFeatures {
    let mut scoped = ScopedFeatures::new();
    match types {
        [] => {}
        [only] => scoped.insert(only.clone(), parse_features(raw)),
        _ => {
            scoped = parse_scoped_features(raw, types, figure_id, diagnostics);
            for type_key in types {
                if !scoped.contains(type_key) {
                    diagnostics.push(Diagnostic::MissingScopedFeatures {
                        figure_id: figure_id.to_string(),
                        type_key: type_key.clone(),
                    });
                }
            }
        }
    }
    scoped
}
