//! # Isotype Archive Common Library
//!
//! Data pipeline shared by the archive tooling:
//! - Work and Figure record types
//! - Field normalizers for spreadsheet cell text
//! - CSV reading and JSON writing
//! - Work/Figure builders with collected diagnostics
//! - Cross-reference validation
//! - Path and logging configuration
//! - Side-file helpers for the OCR and description processes

pub mod columns;
pub mod config;
pub mod csv_source;
pub mod diagnostics;
pub mod error;
pub mod figures;
pub mod json_output;
pub mod normalize;
pub mod pipeline;
pub mod records;
pub mod sidecar;
pub mod validate;
pub mod works;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use records::{Figure, ScopedFeatures, Work};
