//! End-to-end tests for the CSV-to-JSON build
//!
//! Each test writes small CSV exports into a scratch directory, runs the
//! full pipeline, and inspects the published JSON.

use isoarc_common::config::BuildPaths;
use isoarc_common::pipeline::run;
use isoarc_common::{Diagnostic, Error, Work};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const WORKS_CSV: &str = "\u{feff}Work ID,Title,Pub Year,Author(s),Information Designers,Publisher,Publisher City,Height (cm),Series,Language
12,Modern Man in the Making,1939,\"Neurath, Otto\",\"Arntz, Gerd; Reidemeister, Marie\",Knopf,New York,26 cm,,English
w3,International Picture Language,1936,\"Neurath, Otto\",,Kegan Paul,London,,Psyche Miniatures,English
,Untitled draft,1940,,,,,,,
w4,,1941,,,,,,,
";

const FIGURES_CSV: &str = "figure_id,work_id,types,features,colors,figure_title,themes
w0012-p0038-f02.png,w12,Bar,\"stacked, horizontal\",\"Red, black, Blue\",Births,Population
w0003-p0010-f01,,\"bar, line\",bar: stacked; line: trend,Black,,
W0003-P0011-F01.webp,w3,\"bar, map\",grouped,only black,,
w0099-p0001-f01,,pictogram,,,,
,w3,bar,,,,
cover,w3,,,,,
";

struct Fixture {
    _dir: TempDir,
    paths: BuildPaths,
}

fn fixture(works_csv: &str, figures_csv: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("data-source");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("works.csv"), works_csv).unwrap();
    fs::write(source.join("figures.csv"), figures_csv).unwrap();

    let paths = BuildPaths {
        works_csv: source.join("works.csv"),
        figures_csv: source.join("figures.csv"),
        out_dir: dir.path().join("public").join("data"),
    };
    Fixture { _dir: dir, paths }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_works_json() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);
    let report = run(&fx.paths).unwrap();
    assert_eq!(report.works_written, 2);

    let works: Vec<Work> =
        serde_json::from_str(&fs::read_to_string(fx.paths.works_json()).unwrap()).unwrap();
    let ids: Vec<&str> = works.iter().map(|w| w.work_id.as_str()).collect();
    assert_eq!(ids, vec!["w0003", "w0012"]);

    let modern_man = &works[1];
    assert_eq!(modern_man.year, Some(1939));
    assert_eq!(modern_man.authors, vec!["Otto Neurath"]);
    assert_eq!(
        modern_man.information_designers,
        vec!["Arntz, Gerd", "Reidemeister, Marie"]
    );
    assert_eq!(modern_man.height_cm, Some(26));
    assert_eq!(modern_man.series, None);
    assert_eq!(works[0].series.as_deref(), Some("Psyche Miniatures"));
}

#[test]
fn test_figures_json() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);
    let report = run(&fx.paths).unwrap();
    assert_eq!(report.figures_written, 5);

    let figures = read_json(&fx.paths.figures_json());
    let ids: Vec<&str> = figures
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "cover",
            "w0003-p0010-f01",
            "w0003-p0011-f01",
            "w0012-p0038-f02",
            "w0099-p0001-f01"
        ]
    );

    let single = &figures[3];
    assert_eq!(single["workId"], json!("w0012"));
    assert_eq!(single["page"], json!(38));
    assert_eq!(single["figureCode"], json!(2));
    assert_eq!(single["featuresByType"], json!({"bar": ["stacked", "horizontal"]}));
    assert_eq!(single["colors"], json!(["red", "blue"]));
    assert_eq!(single["onlyBlack"], json!(false));
    assert_eq!(single["workYear"], json!(1939));
    assert_eq!(single["title"], json!("Births"));
    assert_eq!(single["themes"], json!(["Population"]));
    assert_eq!(single["ocrText"], json!(null));
    assert_eq!(single["thumb"], json!("/webp/thumbs/w0012-p0038-f02_h0500.webp"));

    let combo = &figures[1];
    assert_eq!(combo["isCombo"], json!(true));
    assert_eq!(combo["featuresByType"], json!({"bar": ["stacked"], "line": ["trend"]}));
    assert_eq!(combo["featuresFlat"], json!(["stacked", "trend"]));
    assert_eq!(combo["onlyBlack"], json!(true));
    assert_eq!(combo["colors"], json!([]));

    let unscoped = &figures[2];
    assert_eq!(unscoped["featuresByType"], json!({}));
    assert_eq!(unscoped["onlyBlack"], json!(true));

    let dangling = &figures[4];
    assert_eq!(dangling["workId"], json!("w0099"));
    assert_eq!(dangling["workYear"], json!(null));

    let cover = &figures[0];
    assert_eq!(cover["workId"], json!("w0003"));
    assert_eq!(cover["page"], json!(null));
    assert_eq!(cover["workYear"], json!(1936));
}

#[test]
fn test_figure_key_order() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);
    run(&fx.paths).unwrap();

    let text = fs::read_to_string(fx.paths.figures_json()).unwrap();
    let keys = [
        "\"id\"",
        "\"workId\"",
        "\"page\"",
        "\"figureCode\"",
        "\"thumb\"",
        "\"view\"",
        "\"title\"",
        "\"types\"",
        "\"typesFlat\"",
        "\"isCombo\"",
        "\"featuresByType\"",
        "\"featuresFlat\"",
        "\"colors\"",
        "\"onlyBlack\"",
        "\"themes\"",
        "\"aiDescription\"",
        "\"ocrText\"",
        "\"workYear\"",
        "\"typeTokens\"",
    ];
    let first_object = &text[..text.find("\n  }").unwrap()];
    let positions: Vec<usize> = keys
        .iter()
        .map(|k| first_object.find(k).unwrap_or_else(|| panic!("missing {k}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_diagnostics() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);
    let report = run(&fx.paths).unwrap();
    let diagnostics = report.diagnostics.as_slice();

    assert!(diagnostics.contains(&Diagnostic::UnscopedFeatures {
        figure_id: "w0003-p0011-f01".to_string(),
    }));
    assert!(diagnostics.contains(&Diagnostic::MissingScopedFeatures {
        figure_id: "w0003-p0011-f01".to_string(),
        type_key: "map".to_string(),
    }));

    let unknown: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::UnknownWork { .. }))
        .collect();
    assert_eq!(
        unknown,
        vec![&Diagnostic::UnknownWork {
            work_id: "w0099".to_string()
        }]
    );
    assert!(!diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::WorkIdMismatch { .. })));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);

    run(&fx.paths).unwrap();
    let works_first = fs::read(fx.paths.works_json()).unwrap();
    let figures_first = fs::read(fx.paths.figures_json()).unwrap();

    run(&fx.paths).unwrap();
    assert_eq!(fs::read(fx.paths.works_json()).unwrap(), works_first);
    assert_eq!(fs::read(fx.paths.figures_json()).unwrap(), figures_first);
    assert!(works_first.ends_with(b"]\n"));
}

#[test]
fn test_row_order_does_not_matter() {
    let reversed_figures: String = {
        let mut lines: Vec<&str> = FIGURES_CSV.lines().collect();
        lines[1..].reverse();
        lines.join("\n") + "\n"
    };
    let fx_a = fixture(WORKS_CSV, FIGURES_CSV);
    let fx_b = fixture(WORKS_CSV, &reversed_figures);

    run(&fx_a.paths).unwrap();
    run(&fx_b.paths).unwrap();

    assert_eq!(
        fs::read(fx_a.paths.figures_json()).unwrap(),
        fs::read(fx_b.paths.figures_json()).unwrap()
    );
}

#[test]
fn test_missing_figures_csv_writes_nothing() {
    let fx = fixture(WORKS_CSV, FIGURES_CSV);
    fs::remove_file(&fx.paths.figures_csv).unwrap();

    let result = run(&fx.paths);
    assert!(matches!(
        result,
        Err(Error::MissingInput {
            label: "figures CSV",
            ..
        })
    ));
    assert!(!fx.paths.works_json().exists());
}

#[test]
fn test_header_only_inputs() {
    let fx = fixture("work_id,title\n", "figure_id\n");
    let report = run(&fx.paths).unwrap();

    assert_eq!(report.works_written, 0);
    assert_eq!(report.figures_written, 0);
    assert!(report.diagnostics.is_empty());
    assert_eq!(fs::read_to_string(fx.paths.works_json()).unwrap(), "[]\n");
}
