pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use score_table::*;
use serde_json::{json, Map as JSMap, Value as JSValue};
use snafu::{prelude::*, Snafu};
use text_diff::print_diff;

use crate::args::Args;
use crate::screen::config_reader::*;

const DEFAULT_TITLE: &str = "Candidate screening";
const DEFAULT_TOP_COUNT: usize = 10;
const EXPORT_FILE_NAME: &str = "filtered_data.csv";
const SUMMARY_FILE_NAME: &str = "summary.json";

#[derive(Debug, Snafu)]
pub enum ScreenError {
    #[snafu(display("Error opening Excel workbook {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("No rows to read in the workbook {path}"))]
    EmptySheet { path: String },
    #[snafu(display("No worksheet named {name:?} in the workbook {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV content at line {lineno}"))]
    CsvLine { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not find the parent directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Table { source: TableError },
    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// The content of a score sheet before any interpretation: the header
/// row and the data rows, exactly as they appear in the file.
#[derive(PartialEq, Debug, Clone)]
pub struct RawSheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// **** Private structures ****

/// A fully resolved run: the configuration file values merged with the
/// command line overrides.
#[derive(PartialEq, Debug, Clone)]
struct RunPlan {
    title: String,
    source: FileSource,
    min_score: Option<f64>,
    max_score: Option<f64>,
    id_needle: String,
    top_count: usize,
    histogram_bins: usize,
    comparison: Option<(String, String)>,
    export_path: Option<PathBuf>,
    summary_path: Option<String>,
}

/// Everything computed in one screening pass, ready to be rendered or
/// serialized.
#[derive(PartialEq, Debug, Clone)]
struct ScreenOutcome {
    table: ScoreTable,
    filtered: ScoreTable,
    top: ScoreTable,
    summary: Option<ScoreSummary>,
    histogram: Option<Histogram>,
    // Effective filter bounds after applying the sheet defaults.
    bounds: (f64, f64),
    comparison: Option<(Record, Record)>,
}

fn resolve_plan(args: &Args) -> ScreenResult<RunPlan> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => ScreenConfig::default(),
    };
    info!("configuration: {:?}", config);
    let ScreenConfig {
        output_settings,
        source,
        filters,
        comparison,
    } = config;

    let mut source = match (source, &args.input) {
        (Some(source), _) => source,
        (None, Some(_)) => FileSource::default(),
        (None, None) => {
            whatever!("No input file was given: pass --input or a config file with a source section")
        }
    };
    // Paths in the configuration file are relative to the file itself.
    if args.input.is_none() {
        if let Some(config_path) = &args.config {
            let root_path = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?;
            source.file_path = root_path.join(&source.file_path).display().to_string();
        }
    }
    if let Some(path) = &args.input {
        source.file_path = path.clone();
    }
    if let Some(provider) = &args.input_type {
        source.provider = Some(provider.clone());
    }
    if let Some(name) = &args.excel_worksheet_name {
        source.excel_worksheet_name = Some(name.clone());
    }

    let comparison = match &args.compare {
        Some(ids) if ids.len() == 2 => Some((ids[0].clone(), ids[1].clone())),
        Some(ids) => {
            whatever!(
                "--compare takes exactly two candidate ids, but {} were given",
                ids.len()
            )
        }
        None => comparison.map(|c| (c.first, c.second)),
    };

    let export_path = match (&args.export, &output_settings.output_directory) {
        (Some(path), _) => Some(PathBuf::from(path)),
        (None, Some(dir)) => Some(Path::new(dir).join(EXPORT_FILE_NAME)),
        (None, None) => None,
    };
    let summary_path = match (&args.out, &output_settings.output_directory) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(Path::new(dir).join(SUMMARY_FILE_NAME).display().to_string()),
        (None, None) => None,
    };

    let filters = filters.unwrap_or_default();
    Ok(RunPlan {
        title: output_settings
            .report_title
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        source,
        min_score: args.min_score.or(filters.min_score),
        max_score: args.max_score.or(filters.max_score),
        id_needle: args
            .id_contains
            .clone()
            .or(filters.id_contains)
            .unwrap_or_default(),
        top_count: args
            .top
            .or(output_settings.top_count)
            .unwrap_or(DEFAULT_TOP_COUNT),
        histogram_bins: output_settings.histogram_bins.unwrap_or(DEFAULT_BINS),
        comparison,
        export_path,
        summary_path,
    })
}

fn read_sheet(source: &FileSource, provider: &str) -> ScreenResult<RawSheet> {
    info!(
        "Attempting to read the score sheet {:?} with the {} reader",
        source.file_path, provider
    );
    match provider {
        "excel" => io_excel::read_excel_sheet(
            source.file_path.as_str(),
            source.excel_worksheet_name.as_deref(),
        ),
        "csv" => io_csv::read_csv_sheet(source.file_path.as_str()),
        x => whatever!("Unknown input type {:?}: expected 'excel' or 'csv'", x),
    }
}

/// Applies every screening operation of the plan to the table.
fn screen_table(plan: &RunPlan, table: ScoreTable) -> ScreenResult<ScreenOutcome> {
    let (sheet_min, sheet_max) = table.score_bounds().unwrap_or((0.0, 0.0));
    let min_score = plan.min_score.unwrap_or(sheet_min);
    let max_score = plan.max_score.unwrap_or(sheet_max);
    let filtered = table.filter(min_score, max_score, plan.id_needle.as_str());
    let top = table.top(plan.top_count).context(TableSnafu)?;
    let comparison = match &plan.comparison {
        Some((first, second)) => {
            let (a, b) = table
                .compare(first.as_str(), second.as_str())
                .context(TableSnafu)?;
            Some((a.clone(), b.clone()))
        }
        None => None,
    };
    let summary = table.summary();
    let histogram = table.histogram(plan.histogram_bins);
    Ok(ScreenOutcome {
        table,
        filtered,
        top,
        summary,
        histogram,
        bounds: (min_score, max_score),
        comparison,
    })
}

fn format_stat(x: f64) -> String {
    format!("{:.4}", x)
}

fn record_js(table: &ScoreTable, record: &Record) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (idx, name) in table.columns().iter().enumerate() {
        m.insert(name.clone(), json!(table.cell_text(record, idx)));
    }
    JSValue::Object(m)
}

fn build_summary_js(plan: &RunPlan, provider: &str, outcome: &ScreenOutcome) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    js.insert(
        "config".to_string(),
        json!({"title": plan.title, "provider": provider}),
    );
    js.insert(
        "table".to_string(),
        json!({
            "recordCount": outcome.table.len(),
            "droppedRows": outcome.table.dropped_rows(),
            "flaggedCount": outcome.table.flagged_count(),
            "columns": outcome.table.columns(),
        }),
    );
    // The statistics are serialized as strings with a fixed precision so
    // that reference summaries compare exactly across platforms.
    if let Some(s) = &outcome.summary {
        js.insert(
            "score".to_string(),
            json!({
                "min": format_stat(s.min),
                "max": format_stat(s.max),
                "mean": format_stat(s.mean),
                "median": format_stat(s.median),
                "q1": format_stat(s.q1),
                "q3": format_stat(s.q3),
            }),
        );
    }
    if let Some(h) = &outcome.histogram {
        let bins_js: Vec<JSValue> = h
            .bins()
            .iter()
            .map(|b| {
                json!({
                    "left": format_stat(b.left),
                    "right": format_stat(b.right),
                    "count": b.count,
                })
            })
            .collect();
        js.insert(
            "histogram".to_string(),
            json!({"binCount": h.bins().len(), "bins": bins_js}),
        );
    }
    js.insert(
        "filtered".to_string(),
        json!({
            "recordCount": outcome.filtered.len(),
            "minScore": format_stat(outcome.bounds.0),
            "maxScore": format_stat(outcome.bounds.1),
            "idContains": plan.id_needle,
        }),
    );
    let top_js: Vec<JSValue> = outcome
        .top
        .records()
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "score": format_stat(r.score),
                "flagged": r.flagged.to_string(),
            })
        })
        .collect();
    js.insert("topPerformers".to_string(), JSValue::Array(top_js));
    if let Some((first, second)) = &outcome.comparison {
        js.insert(
            "comparison".to_string(),
            json!({
                "first": record_js(&outcome.table, first),
                "second": record_js(&outcome.table, second),
            }),
        );
    }
    JSValue::Object(js)
}

/// Runs a full screening pass: reads the sheet, builds the table, prints
/// the report and writes the requested outputs.
pub fn run_screening(args: &Args) -> ScreenResult<()> {
    let plan = resolve_plan(args)?;
    debug!("resolved plan: {:?}", plan);
    let provider = plan.source.resolved_provider()?;
    let raw = read_sheet(&plan.source, provider.as_str())?;
    let table = ScoreTable::from_rows(raw.columns, raw.rows).context(TableSnafu)?;
    info!(
        "Read {} records ({} rows dropped) from {:?}",
        table.len(),
        table.dropped_rows(),
        plan.source.file_path
    );

    let outcome = screen_table(&plan, table)?;
    report::print_report(plan.title.as_str(), plan.id_needle.as_str(), &outcome);

    if let Some(path) = &plan.export_path {
        let content = outcome.filtered.to_csv().context(TableSnafu)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(WritingFileSnafu {
                    path: path.display().to_string(),
                })?;
            }
        }
        fs::write(path, content).context(WritingFileSnafu {
            path: path.display().to_string(),
        })?;
        info!("Wrote the filtered view to {}", path.display());
    }

    let summary_js = build_summary_js(&plan, provider.as_str(), &outcome);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match plan.summary_path.as_deref() {
        Some("stdout") => println!("{}", pretty_js),
        Some(path) => {
            fs::write(path, &pretty_js).context(WritingFileSnafu { path })?;
            info!("Wrote the run summary to {}", path);
        }
        None => {}
    }

    if let Some(reference_path) = &args.reference {
        // The reference is reserialized so that the key order and the
        // indentation do not matter for the comparison.
        let reference = read_summary(reference_path.as_str())?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between the computed summary and the reference summary")
        }
        info!("The computed summary matches the reference summary");
    }
    Ok(())
}

// **** Test utilities ****

#[cfg(test)]
fn test_args() -> Args {
    Args {
        config: None,
        reference: None,
        out: None,
        input: None,
        input_type: None,
        excel_worksheet_name: None,
        min_score: None,
        max_score: None,
        id_contains: None,
        top: None,
        compare: None,
        export: None,
        verbose: false,
    }
}

#[cfg(test)]
fn test_dir() -> &'static str {
    // The path can be overriden when the fixtures live outside the crate.
    option_env!("SCREEN_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/test_data"))
}

#[cfg(test)]
fn run_screening_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    use snafu::ErrorCompat;

    info!("Running test {}", test_name);
    let mut args = test_args();
    args.config = Some(format!("{}/{}/{}", test_dir(), test_name, config_lpath));
    args.reference = Some(format!("{}/{}/{}", test_dir(), test_name, summary_lpath));
    let res = run_screening(&args);
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e) {
            eprintln!("trace: {}", bt);
        }
    }
    assert!(res.is_ok(), "the screening run failed for test {}", test_name);
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_screening_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_screening() {
        test_wrapper("basic_screening");
    }

    #[test]
    fn filtered_screening() {
        test_wrapper("filtered_screening");
    }

    #[test]
    fn missing_score_column_is_reported() {
        let mut args = test_args();
        args.config = Some(format!(
            "{}/missing_score/missing_score_config.json",
            test_dir()
        ));
        let res = run_screening(&args);
        match res {
            Err(ScreenError::Table {
                source: TableError::MissingColumns { missing },
            }) => {
                assert_eq!(missing, vec!["score".to_string()]);
            }
            other => panic!("expected a missing column error, got {:?}", other),
        }
    }

    #[test]
    fn compare_takes_exactly_two_ids() {
        let mut args = test_args();
        args.input = Some("whatever.csv".to_string());
        args.compare = Some(vec!["A1".to_string()]);
        let res = run_screening(&args);
        assert!(res.is_err());
    }

    #[test]
    fn an_input_is_required() {
        let args = test_args();
        let res = run_screening(&args);
        assert!(res.is_err());
    }

    #[test]
    fn flags_override_the_configuration() {
        let mut args = test_args();
        args.config = Some(format!(
            "{}/basic_screening/basic_screening_config.json",
            test_dir()
        ));
        args.top = Some(1);
        let plan = resolve_plan(&args).unwrap();
        assert_eq!(plan.top_count, 1);
        assert_eq!(plan.title, "basic screening".to_string());
        assert!(plan.source.file_path.ends_with("scores.csv"));
    }
}
