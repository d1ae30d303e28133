//! CSV-to-JSON build pipeline
//!
//! CSV rows → normalized fields → records → validated records → JSON.

use crate::columns::Row;
use crate::config::BuildPaths;
use crate::csv_source::read_rows;
use crate::diagnostics::Diagnostics;
use crate::figures::build_figures;
use crate::json_output::write_json;
use crate::records::{Figure, Work};
use crate::validate::check_work_refs;
use crate::works::{build_works, index_works};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Built records plus everything worth warning about
#[derive(Debug, Clone)]
pub struct Catalog {
    pub works: Vec<Work>,
    pub figures: Vec<Figure>,
    pub diagnostics: Diagnostics,
}

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub works_written: usize,
    pub figures_written: usize,
    pub works_json: PathBuf,
    pub figures_json: PathBuf,
    pub diagnostics: Diagnostics,
}

/// Build both record lists from already-read rows. No I/O.
pub fn build_catalog(work_rows: &[Row], figure_rows: &[Row]) -> Catalog {
    let mut diagnostics = Diagnostics::new();

    let works = build_works(work_rows, &mut diagnostics);
    let index = index_works(&works);
    let figures = build_figures(figure_rows, &index, &mut diagnostics);
    diagnostics.extend(check_work_refs(&figures, &index));

    Catalog {
        works,
        figures,
        diagnostics,
    }
}

/// Read both CSV exports, build, validate, and write `works.json` and
/// `figures.json` into the output directory.
///
/// Fails before writing anything if either input file is missing.
pub fn run(paths: &BuildPaths) -> Result<BuildReport> {
    require_input("works CSV", &paths.works_csv)?;
    require_input("figures CSV", &paths.figures_csv)?;

    let work_rows = read_rows(&paths.works_csv)?;
    let figure_rows = read_rows(&paths.figures_csv)?;
    info!(
        work_rows = work_rows.len(),
        figure_rows = figure_rows.len(),
        "Loaded CSV exports"
    );

    let catalog = build_catalog(&work_rows, &figure_rows);

    let works_json = paths.works_json();
    let figures_json = paths.figures_json();
    write_json(&works_json, &catalog.works)?;
    write_json(&figures_json, &catalog.figures)?;

    info!(
        works = catalog.works.len(),
        figures = catalog.figures.len(),
        warnings = catalog.diagnostics.len(),
        "Build complete"
    );

    Ok(BuildReport {
        works_written: catalog.works.len(),
        figures_written: catalog.figures.len(),
        works_json,
        figures_json,
        diagnostics: catalog.diagnostics,
    })
}

fn require_input(label: &'static str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            label,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    #[test]
    fn test_catalog_links_figures_to_works() {
        let work_rows = vec![Row::from_iter([("work_id", "1"), ("title", "A"), ("year", "1936")])];
        let figure_rows = vec![
            Row::from_iter([("figure_id", "w0001-p0001-f01")]),
            Row::from_iter([("figure_id", "w0005-p0001-f01")]),
        ];

        let catalog = build_catalog(&work_rows, &figure_rows);

        assert_eq!(catalog.figures[0].work_year, Some(1936));
        assert_eq!(catalog.figures[1].work_year, None);
        assert_eq!(
            catalog.diagnostics.as_slice(),
            &[Diagnostic::UnknownWork { work_id: "w0005".to_string() }]
        );
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let paths = BuildPaths {
            works_csv: PathBuf::from("/nonexistent/isoarc/works.csv"),
            figures_csv: PathBuf::from("/nonexistent/isoarc/figures.csv"),
            out_dir: PathBuf::from("/nonexistent/isoarc/out"),
        };
        match run(&paths) {
            Err(Error::MissingInput { label, path }) => {
                assert_eq!(label, "works CSV");
                assert_eq!(path, paths.works_csv);
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }
}
