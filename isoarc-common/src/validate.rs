//! Cross-reference validation
//!
//! Diagnostic only: records are never removed or altered here.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::records::Figure;
use crate::works::WorkIndex;
use std::collections::BTreeSet;

/// Distinct work ids referenced by figures but absent from `works`, ascending
pub fn unknown_work_refs(figures: &[Figure], works: &WorkIndex<'_>) -> Vec<String> {
    figures
        .iter()
        .filter_map(|f| f.work_id.as_deref())
        .filter(|work_id| !works.contains_key(work_id))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// One [`Diagnostic::UnknownWork`] per distinct dangling work id
pub fn check_work_refs(figures: &[Figure], works: &WorkIndex<'_>) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for work_id in unknown_work_refs(figures, works) {
        diagnostics.push(Diagnostic::UnknownWork { work_id });
    }
    diagnostics
}
