/*!

This is the long-form manual for `score_table` and `scorescreen`.

## Input formats

The following formats are supported:
* `excel` Excel workbooks (.xlsx, .xls)
* `csv` Comma Separated Values

When no input type is given, it is inferred from the file extension.

### `excel`

The first worksheet of the workbook is read, unless a worksheet name is
given (`--excel-worksheet-name` or `excelWorksheetName` in the
configuration). The first row is the header. Cells keep their native
spreadsheet type (text, number, boolean); formula error cells are read as
empty.

### `csv`

The first row is the header. Since CSV carries no cell types, each cell is
interpreted the way a spreadsheet would: integers, then decimal numbers,
then `true`/`false`, then plain text.

## Columns

Two columns are required, anywhere in the header:

* `id`: the candidate identifier. Coerced to text; numeric ids keep their
  integer spelling (`123`, not `123.0`).
* `score`: the assessment score. Coerced to a number; rows whose score
  cannot be read as a number are dropped from the table. The report states
  how many rows were dropped.

If either column is missing, the run fails with the list of missing
columns.

One column is optional:

* `outliers`: whether the candidate's assessment was anomalous. Coerced to
  an integer; a missing column or an unreadable cell counts as 0.

The derived column `Flagged` is appended to the table, with the value
`Yes` exactly when `outliers` is 1 and `No` otherwise. If the sheet
already has a `Flagged` column, it is overwritten in place.

Every other column is kept untouched, in its original position, and shows
up in the comparison view and the CSV export.

## Screening operations

* **Filter**: keeps the rows whose score lies within `[minScore,
  maxScore]` (both bounds inclusive) and whose id contains `idContains` as
  a case-sensitive substring. The bounds default to the smallest and
  largest score of the sheet, and the empty substring matches every id,
  so the default filter keeps everything. Row order is preserved.
* **Top performers**: the `topCount` highest scores in descending order.
  Candidates with equal scores stay in sheet order. Asking for more rows
  than the sheet has returns the whole sheet, sorted. A count below 1 is
  rejected.
* **Comparison**: two candidates, looked up by id, shown attribute by
  attribute (every column except `id`). When an id appears several times
  in the sheet, the first row wins. Comparing an id with itself or with an
  unknown id is rejected.
* **Export**: the filtered view serialized as UTF-8 CSV, header first, in
  table column order, without an index column. By default the file is
  named `filtered_data.csv`.

The score distribution shown in the report (quartiles, histogram, whisker
fences at 1.5 IQR) is always computed over the whole sheet, as are the top
performers; the filter only drives the filtered view and the export.

## Configuration

`scorescreen` comes with sensible defaults but regular screenings are
easier to drive from a configuration file in JSON, passed with
`--config`. Command line flags override the file.

Fields of `source`:
 - `filePath` (string, required): the input file. Overridden by `-i`.
 - `provider` (string, optional): `excel` or `csv`. If not provided, it is
   inferred from the file extension. Overridden by `--input-type`.
 - `excelWorksheetName` (string, optional): for Excel inputs, the name of
   the worksheet to read instead of the first one.

Fields of `outputSettings` (all optional):
 - `reportTitle` (string): the title line of the report.
 - `outputDirectory` (string): when set, the filtered view is written to
   `filtered_data.csv` and the run summary to `summary.json` in this
   directory.
 - `topCount` (number, default 10): how many top performers to show.
 - `histogramBins` (number, default 20): number of histogram bins.

Fields of `filters` (all optional): `minScore`, `maxScore`, `idContains`,
as described above.

Fields of `comparison`: `first` and `second`, the two candidate ids to
compare. On the command line, pass `--compare` exactly twice.

## Run summary

With `--out` (a file path, or `stdout`), the program writes a JSON
summary of the run: the effective configuration, the table counts and
columns, the score statistics, the histogram, the filtered view counts,
the top performers and the comparison. Statistics are rendered as strings
with four decimal places so that summaries can be compared verbatim
across platforms.

A previously recorded summary can be given with `--reference`: the
program then compares the current run against it and fails with a diff if
anything changed. The test suite of the project is built on this check.

 */
