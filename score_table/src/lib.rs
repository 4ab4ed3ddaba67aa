//! Validation, filtering, ranking and comparison over candidate score
//! sheets.
//!
//! The entry point is [`ScoreTable::from_rows`], which takes the raw
//! header and cells of a sheet and returns a validated table. See the
//! [`quick_start`] module for a worked example and [`manual`] for the
//! full description of the screening rules.

use std::cmp::Ordering;

use log::{debug, info};

mod model;
pub mod manual;
pub mod quick_start;
pub mod summary;

pub use crate::model::*;
pub use crate::summary::{Histogram, HistogramBin, ScoreSummary, DEFAULT_BINS};

// **** Private structures ****

/// Role of each output column, aligned with `ScoreTable::columns`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum ColumnRole {
    Id,
    Score,
    Outliers,
    Flag,
    /// Passthrough column, with its index into `Record::extras`.
    Extra(usize),
}

/// A validated score sheet.
///
/// Construction coerces the raw cells into typed records and appends
/// the derived [`FLAGGED_COLUMN`]. All query methods return fresh
/// tables or borrowed records and leave `self` untouched.
///
/// ```
/// use score_table::{CellValue, ScoreTable};
///
/// let columns = vec!["id".to_string(), "score".to_string(), "outliers".to_string()];
/// let rows = vec![
///     vec![CellValue::String("A1".into()), CellValue::Int(10), CellValue::Int(0)],
///     vec![CellValue::String("A2".into()), CellValue::Int(20), CellValue::Int(1)],
///     vec![CellValue::String("A3".into()), CellValue::Int(20), CellValue::Int(0)],
/// ];
/// let table = ScoreTable::from_rows(columns, rows)?;
/// let top = table.top(2)?;
/// let ids: Vec<&str> = top.records().iter().map(|r| r.id.as_str()).collect();
/// assert_eq!(ids, vec!["A2", "A3"]);
/// # Ok::<(), score_table::TableError>(())
/// ```
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreTable {
    columns: Vec<String>,
    layout: Vec<ColumnRole>,
    records: Vec<Record>,
    dropped: usize,
}

impl ScoreTable {
    /// Validates a raw sheet into a table.
    ///
    /// `columns` must contain [`ID_COLUMN`] and [`SCORE_COLUMN`], in any
    /// position. Ids are coerced to text and scores to numbers; rows
    /// whose score cell cannot be coerced are dropped and only counted
    /// (see [`ScoreTable::dropped_rows`]). The optional
    /// [`OUTLIERS_COLUMN`] is coerced to an integer, with missing or
    /// invalid cells read as 0, and drives the derived flag.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<ScoreTable, TableError> {
        info!(
            "from_rows: validating a sheet of {} columns and {} rows",
            columns.len(),
            rows.len()
        );
        let id_pos = columns.iter().position(|c| c == ID_COLUMN);
        let score_pos = columns.iter().position(|c| c == SCORE_COLUMN);
        let (id_idx, score_idx) = match (id_pos, score_pos) {
            (Some(i), Some(s)) => (i, s),
            (i, s) => {
                let mut missing: Vec<String> = Vec::new();
                if i.is_none() {
                    missing.push(ID_COLUMN.to_string());
                }
                if s.is_none() {
                    missing.push(SCORE_COLUMN.to_string());
                }
                return Err(TableError::MissingColumns { missing });
            }
        };
        let outliers_idx = columns.iter().position(|c| c == OUTLIERS_COLUMN);

        let mut out_columns: Vec<String> = Vec::with_capacity(columns.len() + 1);
        let mut layout: Vec<ColumnRole> = Vec::with_capacity(columns.len() + 1);
        let mut extra_indices: Vec<usize> = Vec::new();
        let mut has_flag_column = false;
        for (idx, name) in columns.iter().enumerate() {
            let role = if idx == id_idx {
                ColumnRole::Id
            } else if idx == score_idx {
                ColumnRole::Score
            } else if Some(idx) == outliers_idx {
                ColumnRole::Outliers
            } else if name == FLAGGED_COLUMN {
                // A source column with the reserved name is replaced by
                // the derived flag, keeping its position.
                has_flag_column = true;
                ColumnRole::Flag
            } else {
                extra_indices.push(idx);
                ColumnRole::Extra(extra_indices.len() - 1)
            };
            layout.push(role);
            out_columns.push(name.clone());
        }
        if !has_flag_column {
            out_columns.push(FLAGGED_COLUMN.to_string());
            layout.push(ColumnRole::Flag);
        }

        let mut records: Vec<Record> = Vec::with_capacity(rows.len());
        let mut dropped: usize = 0;
        for (lineno, row) in rows.iter().enumerate() {
            let score_cell = row.get(score_idx).unwrap_or(&CellValue::Empty);
            let score = match score_cell.as_number() {
                Some(s) => s,
                None => {
                    debug!(
                        "from_rows: dropping row {}: score cell {:?} is not numeric",
                        lineno, score_cell
                    );
                    dropped += 1;
                    continue;
                }
            };
            let id = row.get(id_idx).unwrap_or(&CellValue::Empty).to_string();
            let outliers = outliers_idx
                .and_then(|idx| row.get(idx))
                .and_then(|cell| cell.as_number())
                .map(|v| v as i64)
                .unwrap_or(0);
            let extras = extra_indices
                .iter()
                .map(|idx| row.get(*idx).cloned().unwrap_or(CellValue::Empty))
                .collect();
            records.push(Record {
                id,
                score,
                outliers,
                flagged: Flag::from_outliers(outliers),
                extras,
            });
        }
        info!(
            "from_rows: loaded {} records, dropped {} rows with non-numeric scores",
            records.len(),
            dropped
        );
        Ok(ScoreTable {
            columns: out_columns,
            layout,
            records,
            dropped,
        })
    }

    /// Column names in output order: the source order with the derived
    /// flag column appended (or overwritten in place when the source
    /// already carried one).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows dropped during validation because their
    /// score cell was not numeric.
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    pub fn has_outliers(&self) -> bool {
        self.layout.iter().any(|r| matches!(r, ColumnRole::Outliers))
    }

    pub fn flagged_count(&self) -> usize {
        self.records.iter().filter(|r| r.flagged == Flag::Yes).count()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    /// Smallest and largest score, or `None` for an empty table. These
    /// are the default bounds for [`ScoreTable::filter`].
    pub fn score_bounds(&self) -> Option<(f64, f64)> {
        let mut scores = self.records.iter().map(|r| r.score);
        let first = scores.next()?;
        Some(scores.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
    }

    pub fn summary(&self) -> Option<ScoreSummary> {
        ScoreSummary::from_values(&self.scores())
    }

    pub fn histogram(&self, bin_count: usize) -> Option<Histogram> {
        Histogram::from_values(&self.scores(), bin_count)
    }

    /// Rows whose score falls within `[min_score, max_score]` (both ends
    /// inclusive) and whose id contains `id_needle` as a case-sensitive
    /// substring. The empty needle matches every id. Original row order
    /// is preserved.
    pub fn filter(&self, min_score: f64, max_score: f64, id_needle: &str) -> ScoreTable {
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.score >= min_score && r.score <= max_score && r.id.contains(id_needle))
            .cloned()
            .collect();
        debug!(
            "filter: kept {} of {} records in [{}, {}] with id containing {:?}",
            records.len(),
            self.records.len(),
            min_score,
            max_score,
            id_needle
        );
        self.derive(records)
    }

    /// The `count` highest-scoring records, in descending score order.
    /// Ties keep their sheet order. Asking for more records than the
    /// table holds returns the whole table, sorted.
    pub fn top(&self, count: usize) -> Result<ScoreTable, TableError> {
        if count < 1 {
            return Err(TableError::InvalidTopCount { count });
        }
        let mut records = self.records.clone();
        // Stable sort, so equal scores stay in sheet order.
        records.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        records.truncate(count);
        Ok(self.derive(records))
    }

    /// Looks up two candidates by id for side-by-side display. When an
    /// id appears several times, the first occurrence wins.
    pub fn compare(
        &self,
        first_id: &str,
        second_id: &str,
    ) -> Result<(&Record, &Record), TableError> {
        if first_id == second_id {
            return Err(TableError::SameId {
                id: first_id.to_string(),
            });
        }
        let first = self.find(first_id)?;
        let second = self.find(second_id)?;
        Ok((first, second))
    }

    fn find(&self, id: &str) -> Result<&Record, TableError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| TableError::UnknownId { id: id.to_string() })
    }

    /// Column names shown in the comparison view: every table column
    /// except the id itself.
    pub fn comparison_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .zip(self.layout.iter())
            .filter(|(_, role)| !matches!(role, ColumnRole::Id))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Renders the cell of `record` under the column at `column_index`
    /// as display text.
    pub fn cell_text(&self, record: &Record, column_index: usize) -> String {
        match self.layout.get(column_index) {
            Some(ColumnRole::Id) => record.id.clone(),
            Some(ColumnRole::Score) => CellValue::Float(record.score).to_string(),
            Some(ColumnRole::Outliers) => record.outliers.to_string(),
            Some(ColumnRole::Flag) => record.flagged.to_string(),
            Some(ColumnRole::Extra(k)) => record
                .extras
                .get(*k)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Serializes the table as UTF-8 CSV: a header row in table column
    /// order, then one line per record. No index column is written.
    pub fn to_csv(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter())
            .map_err(|_| TableError::CsvWrite)?;
        for record in &self.records {
            let cells: Vec<String> = (0..self.columns.len())
                .map(|idx| self.cell_text(record, idx))
                .collect();
            writer
                .write_record(&cells)
                .map_err(|_| TableError::CsvWrite)?;
        }
        writer.into_inner().map_err(|_| TableError::CsvWrite)
    }

    fn derive(&self, records: Vec<Record>) -> ScoreTable {
        ScoreTable {
            columns: self.columns.clone(),
            layout: self.layout.clone(),
            records,
            dropped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn s(x: &str) -> CellValue {
        CellValue::String(x.to_string())
    }

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    fn sample_table() -> ScoreTable {
        let columns = names(&["id", "score", "outliers"]);
        let rows = vec![
            vec![s("A1"), CellValue::Int(10), CellValue::Int(0)],
            vec![s("A2"), CellValue::Int(20), CellValue::Int(1)],
            vec![s("A3"), CellValue::Int(20), CellValue::Int(0)],
        ];
        ScoreTable::from_rows(columns, rows).unwrap()
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = ScoreTable::from_rows(names(&["name", "value"]), vec![]).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingColumns {
                missing: vec!["id".to_string(), "score".to_string()]
            }
        );
        let err = ScoreTable::from_rows(names(&["id", "points"]), vec![]).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingColumns {
                missing: vec!["score".to_string()]
            }
        );
    }

    #[test]
    fn non_numeric_scores_are_dropped() {
        init_logs();
        let columns = names(&["id", "score"]);
        let rows = vec![
            vec![s("A1"), s("50")],
            vec![s("A2"), s("abc")],
            vec![s("A3"), s("30")],
        ];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped_rows(), 1);
        let ids: Vec<&str> = table.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(table.records()[0].score, 50.0);
        assert_eq!(table.records()[1].score, 30.0);
    }

    #[test]
    fn outliers_drive_the_flag() {
        let table = sample_table();
        let flags: Vec<Flag> = table.records().iter().map(|r| r.flagged).collect();
        assert_eq!(flags, vec![Flag::No, Flag::Yes, Flag::No]);
        assert_eq!(table.flagged_count(), 1);
        assert!(table.has_outliers());

        // Invalid outlier cells read as 0.
        let columns = names(&["id", "score", "outliers"]);
        let rows = vec![vec![s("B1"), CellValue::Int(5), s("x")]];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(table.records()[0].outliers, 0);
        assert_eq!(table.records()[0].flagged, Flag::No);
    }

    #[test]
    fn missing_outliers_column_reads_as_zero() {
        let columns = names(&["id", "score"]);
        let rows = vec![vec![s("A1"), CellValue::Int(10)]];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert!(!table.has_outliers());
        assert_eq!(table.records()[0].outliers, 0);
        assert_eq!(table.records()[0].flagged, Flag::No);
        assert_eq!(table.columns(), names(&["id", "score", "Flagged"]));
    }

    #[test]
    fn flag_column_is_appended_last() {
        let table = sample_table();
        assert_eq!(
            table.columns(),
            names(&["id", "score", "outliers", "Flagged"])
        );
    }

    #[test]
    fn source_flag_column_is_overwritten_in_place() {
        let columns = names(&["id", "Flagged", "score"]);
        let rows = vec![vec![s("A1"), s("maybe"), CellValue::Int(10)]];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(table.columns(), names(&["id", "Flagged", "score"]));
        assert_eq!(table.cell_text(&table.records()[0], 1), "No");
    }

    #[test]
    fn filter_by_range_and_id() {
        init_logs();
        let table = sample_table();
        // Both bounds are inclusive.
        let view = table.filter(10.0, 20.0, "");
        assert_eq!(view.len(), 3);
        assert_eq!(view.dropped_rows(), 0);
        let view = table.filter(11.0, 20.0, "");
        let ids: Vec<&str> = view.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A2", "A3"]);
        // The id match is a case-sensitive substring.
        assert_eq!(table.filter(10.0, 20.0, "A1").len(), 1);
        assert_eq!(table.filter(10.0, 20.0, "a1").len(), 0);
        assert_eq!(table.filter(10.0, 20.0, "A").len(), 3);
        // A disjoint range matches nothing.
        assert!(table.filter(100.0, 200.0, "").is_empty());
    }

    #[test]
    fn top_keeps_sheet_order_on_ties() {
        let table = sample_table();
        let top = table.top(2).unwrap();
        let ids: Vec<&str> = top.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A2", "A3"]);
    }

    #[test]
    fn top_of_more_than_len_returns_everything_sorted() {
        let table = sample_table();
        let top = table.top(10).unwrap();
        let ids: Vec<&str> = top.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A2", "A3", "A1"]);
    }

    #[test]
    fn top_of_zero_is_an_error() {
        let table = sample_table();
        assert_eq!(table.top(0), Err(TableError::InvalidTopCount { count: 0 }));
    }

    #[test]
    fn compare_finds_the_first_match() {
        let columns = names(&["id", "score"]);
        let rows = vec![
            vec![s("A"), CellValue::Int(10)],
            vec![s("B"), CellValue::Int(20)],
            vec![s("B"), CellValue::Int(30)],
        ];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        let (first, second) = table.compare("A", "B").unwrap();
        assert_eq!(first.score, 10.0);
        assert_eq!(second.score, 20.0);
    }

    #[test]
    fn compare_rejects_same_and_unknown_ids() {
        let table = sample_table();
        assert_eq!(
            table.compare("A1", "A1"),
            Err(TableError::SameId {
                id: "A1".to_string()
            })
        );
        assert_eq!(
            table.compare("A1", "Z9"),
            Err(TableError::UnknownId {
                id: "Z9".to_string()
            })
        );
    }

    #[test]
    fn comparison_columns_exclude_the_id() {
        let table = sample_table();
        assert_eq!(
            table.comparison_columns(),
            vec!["score", "outliers", "Flagged"]
        );
    }

    #[test]
    fn csv_export() {
        let table = sample_table();
        let bytes = table.to_csv().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "id,score,outliers,Flagged\nA1,10,0,No\nA2,20,1,Yes\nA3,20,0,No\n"
        );
    }

    #[test]
    fn csv_export_renders_numeric_ids_as_integers() {
        let columns = names(&["id", "score"]);
        let rows = vec![vec![CellValue::Float(123.0), CellValue::Float(45.5)]];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(table.records()[0].id, "123");
        let text = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(text, "id,score,Flagged\n123,45.5,No\n");
    }

    #[test]
    fn exported_csv_reloads_identically() {
        let table = sample_table();
        let bytes = table.to_csv().unwrap();
        let mut rdr = csv::ReaderBuilder::new().from_reader(bytes.as_slice());
        let columns: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        let rows: Vec<Vec<CellValue>> = rdr
            .records()
            .map(|rec| rec.unwrap().iter().map(s).collect())
            .collect();
        let reloaded = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(reloaded.records(), table.records());
        assert_eq!(reloaded.columns(), table.columns());
    }

    #[test]
    fn extra_columns_pass_through() {
        let columns = names(&["id", "dept", "score"]);
        let rows = vec![
            vec![s("E1"), s("Sales"), CellValue::Int(50)],
            vec![s("E2"), CellValue::Empty, CellValue::Int(60)],
        ];
        let table = ScoreTable::from_rows(columns, rows).unwrap();
        assert_eq!(table.columns(), names(&["id", "dept", "score", "Flagged"]));
        let text = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(text, "id,dept,score,Flagged\nE1,Sales,50,No\nE2,,60,No\n");
    }

    #[test]
    fn empty_sheet_builds_an_empty_table() {
        let table = ScoreTable::from_rows(names(&["id", "score"]), vec![]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.score_bounds(), None);
        assert_eq!(table.summary(), None);
        assert_eq!(table.histogram(20), None);
    }

    #[test]
    fn score_bounds_span_the_table() {
        let table = sample_table();
        assert_eq!(table.score_bounds(), Some((10.0, 20.0)));
    }
}
