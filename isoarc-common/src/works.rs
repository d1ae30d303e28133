//! Work builder

use crate::columns::{Field, Row};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::normalize::{flip_last_first, normalize_work_id, parse_int, split_semicolons};
use crate::records::Work;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Read-only lookup from work id to Work
pub type WorkIndex<'a> = HashMap<&'a str, &'a Work>;

/// Build Work records from normalized rows.
///
/// Rows without a work id or title are skipped. A repeated work id keeps the
/// first row and reports the rest. The result is sorted by `work_id`.
pub fn build_works(rows: &[Row], diagnostics: &mut Diagnostics) -> Vec<Work> {
    let mut works: Vec<Work> = Vec::with_capacity(rows.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(work) = work_from_row(row) else {
            debug!(row = index + 1, "Skipping work row without id or title");
            continue;
        };
        if !seen.insert(work.work_id.clone()) {
            diagnostics.push(Diagnostic::DuplicateWork {
                work_id: work.work_id,
            });
            continue;
        }
        works.push(work);
    }

    works.sort_by(|a, b| a.work_id.cmp(&b.work_id));
    debug!(works = works.len(), "Built works");
    works
}

/// Map one row to a Work; `None` when the id or title is missing
pub fn work_from_row(row: &Row) -> Option<Work> {
    let work_id = normalize_work_id(row.first(Field::WorkId));
    let title = row.first(Field::WorkTitle);
    if work_id.is_empty() || title.is_empty() {
        return None;
    }

    Some(Work {
        work_id,
        year: parse_int(row.first(Field::Year)),
        title: title.to_string(),
        series: row.optional(Field::Series),
        language: row.optional(Field::Language),
        authors: split_semicolons(row.first(Field::Authors))
            .iter()
            .map(|name| flip_last_first(name))
            .collect(),
        information_designers: split_semicolons(row.first(Field::InformationDesigners)),
        publisher: row.optional(Field::Publisher),
        publisher_city: row.optional(Field::PublisherCity),
        height_cm: parse_int(row.first(Field::HeightCm)),
        oclc_number: row.optional(Field::OclcNumber),
        isbn: row.optional(Field::Isbn),
        scan_source: row.optional(Field::ScanSource),
        first_edition: row.optional(Field::FirstEdition),
    })
}

/// Index works by id for figure resolution
pub fn index_works(works: &[Work]) -> WorkIndex<'_> {
    works.iter().map(|w| (w.work_id.as_str(), w)).collect()
}
