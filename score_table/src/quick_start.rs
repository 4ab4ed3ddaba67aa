/*!

# Quick start

This example shows you how to screen a sheet of candidate scores end to end,
starting from a spreadsheet export. Most applicant tracking tools (and of
course Google Sheets or Excel themselves) can export a worksheet in the
Excel format, which is what we use here.

**Preparing the sheet** The first worksheet of the workbook must have a
header row with at least an `id` column and a `score` column. An optional
`outliers` column marks candidates whose assessment was anomalous (the value
`1` means anomalous). Any other column is kept as-is and carried along into
the reports and exports. For this example, the file `candidates.xlsx` looks
like the following:

| id      | score | outliers | dept  |
|---------|-------|----------|-------|
| EMP-001 | 82    | 0        | Sales |
| EMP-002 | 91    | 1        | Eng   |
| EMP-003 | 77.5  | 0        | Eng   |
| EMP-004 | n/a   | 0        | Ops   |

Run `scorescreen` on the file:

```bash
scorescreen -i candidates.xlsx
```

The program validates the sheet, derives the `Flagged` column from
`outliers`, and prints the screening report. Note how the row with the
unreadable score (`n/a`) is dropped and accounted for:

```text
[2023-03-14T10:02:11Z INFO  score_table] from_rows: validating a sheet of 4 columns and 4 rows
[2023-03-14T10:02:11Z INFO  score_table] from_rows: loaded 3 records, dropped 1 rows with non-numeric scores
Candidate screening
3 records kept, 1 rows dropped (non-numeric score), 1 flagged
```

followed by the candidate grid, the score distribution and the top
performers.

**Filtering and ranking** The usual screening questions are available as
flags:

```bash
# Candidates scoring at least 80, whose id contains "EMP"
scorescreen -i candidates.xlsx --min-score 80 --id-contains EMP

# The 2 best scores
scorescreen -i candidates.xlsx --top 2

# Side by side comparison of two candidates
scorescreen -i candidates.xlsx --compare EMP-002 --compare EMP-003
```

The score bounds are inclusive and default to the smallest and largest
score of the sheet. The id match is a case-sensitive substring match.

**Exporting** The filtered view can be written out as a CSV file for the
next stage of the hiring pipeline:

```bash
scorescreen -i candidates.xlsx --min-score 80 --export shortlist.csv
```

**Repeated runs** When the same screening is run regularly, put the
parameters in a configuration file instead of flags:

```json
{
    "source": {
        "filePath": "candidates.xlsx",
        "excelWorksheetName": "Sheet1"
    },
    "outputSettings": {
        "reportTitle": "March intake",
        "topCount": 5
    },
    "filters": {
        "minScore": 80.0,
        "idContains": "EMP"
    },
    "comparison": {
        "first": "EMP-002",
        "second": "EMP-003"
    }
}
```

```bash
scorescreen --config march.json
```

`scorescreen` can also emit a machine-readable summary of the whole run
with `--out summary.json` (or `--out stdout`), and check a run against a
previously recorded summary with `--reference`. This is how the test suite
of the project pins down the screening results.

For the full description of the input formats, the coercion rules and the
configuration file, see the [manual](../manual/index.html).

*/
