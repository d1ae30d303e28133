//! CSV reader for spreadsheet exports

use crate::columns::Row;
use crate::normalize::clean_cell;
use crate::Result;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a CSV export into normalized rows.
///
/// The first record is the header. Headers are normalized with
/// [`norm_key`](crate::normalize::norm_key); short rows read missing cells
/// as empty; cells beyond the header width are ignored. Rows whose cells
/// are all blank are dropped.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let file = std::fs::File::open(path)?;
    let rows = read_rows_from(file)?;
    debug!(path = %path.display(), rows = rows.len(), "Read CSV rows");
    Ok(rows)
}

/// Same as [`read_rows`], from any reader
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header, clean_cell(record.get(index))))
            .collect();
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}
