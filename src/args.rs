use clap::Parser;

/// This is a screening and reporting program for candidate score sheets.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the screening run in JSON format.
    /// For more information about the file format, read the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of a run in JSON format. If provided, scorescreen will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The score sheet to read. Setting this option overrides the path that may be specified
    /// with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default inferred from the file extension) The type of the input: 'excel' or 'csv'.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use instead of the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (number, default the smallest score of the sheet) The lower score bound of the filter, inclusive.
    #[clap(long, value_parser)]
    pub min_score: Option<f64>,

    /// (number, default the largest score of the sheet) The upper score bound of the filter, inclusive.
    #[clap(long, value_parser)]
    pub max_score: Option<f64>,

    /// (string, default empty) Keeps only the candidates whose id contains this case-sensitive substring.
    #[clap(long, value_parser)]
    pub id_contains: Option<String>,

    /// (number, default 10) The number of top performers to show.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (candidate id, given exactly twice) The two candidates to compare side by side.
    #[clap(long, value_parser)]
    pub compare: Option<Vec<String>>,

    /// (file path) If specified, the filtered view is written as a CSV file to the given location.
    /// Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub export: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
