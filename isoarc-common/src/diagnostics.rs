//! Build diagnostics
//!
//! Non-fatal anomalies found while building records. They are collected and
//! returned with the records; the caller decides whether to log them, fail,
//! or ignore them.

use std::fmt;

/// One non-fatal anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A later Work row repeats an id that was already built
    DuplicateWork { work_id: String },

    /// Work id embedded in the figure id disagrees with the work column
    WorkIdMismatch {
        figure_id: String,
        from_figure_id: String,
        from_column: String,
    },

    /// Multi-type figure whose feature text has no `type:` groups at all
    UnscopedFeatures { figure_id: String },

    /// A feature group without a `:` separator
    MalformedFeatureGroup { figure_id: String, group: String },

    /// A feature group names a type the figure does not declare
    UnknownScopedType { figure_id: String, type_key: String },

    /// A declared type received no feature group
    MissingScopedFeatures { figure_id: String, type_key: String },

    /// Figures reference a work id that is not in the Work set
    UnknownWork { work_id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateWork { work_id } => {
                write!(f, "duplicate work id {}, keeping first row", work_id)
            }
            Diagnostic::WorkIdMismatch {
                figure_id,
                from_figure_id,
                from_column,
            } => write!(
                f,
                "work mismatch for {}: figure_id={} csv={}",
                figure_id, from_figure_id, from_column
            ),
            Diagnostic::UnscopedFeatures { figure_id } => {
                write!(f, "multi-type figure without scoped features: {}", figure_id)
            }
            Diagnostic::MalformedFeatureGroup { figure_id, group } => write!(
                f,
                "invalid scoped features (missing ':') for {}: {}",
                figure_id, group
            ),
            Diagnostic::UnknownScopedType {
                figure_id,
                type_key,
            } => write!(
                f,
                "scoped features type not in types for {}: {}",
                figure_id, type_key
            ),
            Diagnostic::MissingScopedFeatures {
                figure_id,
                type_key,
            } => write!(
                f,
                "missing scoped features for type '{}' in {}",
                type_key, figure_id
            ),
            Diagnostic::UnknownWork { work_id } => {
                write!(f, "figures reference work id not present in works: {}", work_id)
            }
        }
    }
}

/// Ordered collection of diagnostics from one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
