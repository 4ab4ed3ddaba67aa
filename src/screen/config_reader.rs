// Functions and structures related to reading the JSON configuration of
// a screening run.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::screen::*;

/// The description of the score sheet to read.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSource {
    /// The reader to use: 'excel' or 'csv'. When omitted, it is inferred
    /// from the extension of the file path.
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The explicit provider, or the one inferred from the file extension.
    pub fn resolved_provider(&self) -> ScreenResult<String> {
        if let Some(provider) = &self.provider {
            return Ok(provider.clone());
        }
        let extension = Path::new(self.file_path.as_str())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("xlsx") | Some("xls") => Ok("excel".to_string()),
            Some("csv") => Ok("csv".to_string()),
            _ => whatever!(
                "Cannot infer the input type of {:?}: pass --input-type or set the provider in the configuration",
                self.file_path
            ),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportTitle")]
    pub report_title: Option<String>,
    /// When set, the filtered view and the run summary are written into
    /// this directory.
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "topCount")]
    pub top_count: Option<usize>,
    #[serde(rename = "histogramBins")]
    pub histogram_bins: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(rename = "minScore")]
    pub min_score: Option<f64>,
    #[serde(rename = "maxScore")]
    pub max_score: Option<f64>,
    #[serde(rename = "idContains")]
    pub id_contains: Option<String>,
}

/// The two candidates to put side by side in the report.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub first: String,
    pub second: String,
}

/// The full content of a screening configuration file.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub source: Option<FileSource>,
    #[serde(default)]
    pub filters: Option<FilterSettings>,
    #[serde(default)]
    pub comparison: Option<ComparisonRequest>,
}

pub fn read_config(path: &str) -> ScreenResult<ScreenConfig> {
    debug!("read_config: attempting to read {}", path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: ScreenConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a summary file, keeping it as a JSON document. The summaries are
/// compared after reserialization, not as text.
pub fn read_summary(path: &str) -> ScreenResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
