// Reader for score sheets in Excel format (.xlsx or .xls).

use calamine::{open_workbook_auto, DataType, Range, Reader};
use log::debug;
use snafu::prelude::*;

use score_table::CellValue;

use crate::screen::*;

pub fn read_excel_sheet(path: &str, worksheet: Option<&str>) -> ScreenResult<RawSheet> {
    let range = open_range(path, worksheet)?;
    let mut row_iter = range.rows();
    let header = row_iter.next().context(EmptySheetSnafu { path })?;
    let columns: Vec<String> = header
        .iter()
        .map(|cell| cell_from_excel(cell).to_string())
        .collect();
    debug!("read_excel_sheet: headers: {:?}", columns);
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for row in row_iter {
        rows.push(row.iter().map(cell_from_excel).collect());
    }
    debug!("read_excel_sheet: read {} rows", rows.len());
    Ok(RawSheet { columns, rows })
}

fn open_range(path: &str, worksheet: Option<&str>) -> ScreenResult<Range<DataType>> {
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;
    match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningWorkbookSnafu { path }),
        None => workbook
            .worksheet_range_at(0)
            .context(EmptySheetSnafu { path })?
            .context(OpeningWorkbookSnafu { path }),
    }
}

fn cell_from_excel(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) => CellValue::String(s.clone()),
        DataType::Int(i) => CellValue::Int(*i),
        DataType::Float(f) => CellValue::Float(*f),
        DataType::Bool(b) => CellValue::Bool(*b),
        // Date cells keep their serial number, as in a raw sheet read.
        DataType::DateTime(f) => CellValue::Float(*f),
        // Formula errors and empty cells read as missing.
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_cells_are_mapped() {
        assert_eq!(
            cell_from_excel(&DataType::String("EMP-001".to_string())),
            CellValue::String("EMP-001".to_string())
        );
        assert_eq!(cell_from_excel(&DataType::Int(3)), CellValue::Int(3));
        assert_eq!(cell_from_excel(&DataType::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(cell_from_excel(&DataType::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_from_excel(&DataType::Empty), CellValue::Empty);
    }

    #[test]
    fn a_missing_workbook_is_an_error() {
        let res = read_excel_sheet("no_such_file.xlsx", None);
        assert!(res.is_err());
    }
}
