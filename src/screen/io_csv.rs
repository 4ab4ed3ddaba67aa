// Reader for score sheets in CSV format.

use log::debug;
use snafu::prelude::*;

use score_table::CellValue;

use crate::screen::io_common::cell_from_str;
use crate::screen::*;

pub fn read_csv_sheet(path: &str) -> ScreenResult<RawSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let columns: Vec<String> = rdr
        .headers()
        .context(CsvLineSnafu { lineno: 1usize })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("read_csv_sheet: headers: {:?}", columns);
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        // Line 1 is the header row.
        let lineno = idx + 2;
        let record = record.context(CsvLineSnafu { lineno })?;
        rows.push(record.iter().map(cell_from_str).collect());
    }
    debug!("read_csv_sheet: read {} rows", rows.len());
    Ok(RawSheet { columns, rows })
}
