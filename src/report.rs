pub mod delimited;
pub mod workbook;

use crate::error::QcError;
use crate::extract::{extract_all, SampleRecord};
use crate::samples;
use crate::saturation::format_number_readable;
use crate::settings::{Settings, SettingsLayer};

use anyhow::{self, Context};
use clap::Args;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReportArgs {
    /// settings file (JSON); command-line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// pipeline results directory (holds `alignment/` and `qc_bam/`)
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// sample sheet (CSV with a header row)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// target mean coverage, in fold units (e.g., 30)
    #[arg(short, long)]
    target_coverage: Option<f64>,

    /// samples to leave out (repeat, or separate by commas)
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<Box<str>>,

    /// sample column of the sample sheet (default: sample)
    #[arg(long)]
    sample_column: Option<Box<str>>,

    /// CSV output file name (default: sample_metrics_summary.csv)
    #[arg(long)]
    csv_name: Option<Box<str>>,

    /// Excel output file name (default: sample_metrics_summary.xlsx)
    #[arg(long)]
    xlsx_name: Option<Box<str>>,

    /// number of threads
    #[arg(long)]
    threads: Option<usize>,
}

impl ReportArgs {
    fn to_layer(&self) -> SettingsLayer {
        SettingsLayer {
            results_root: self.results.clone(),
            manifest: self.manifest.clone(),
            output_dir: self.output.clone(),
            target_coverage: self.target_coverage,
            exclude: if self.exclude.is_empty() {
                None
            } else {
                Some(self.exclude.clone())
            },
            sample_column: self.sample_column.clone(),
            csv_name: self.csv_name.clone(),
            xlsx_name: self.xlsx_name.clone(),
            threads: self.threads,
        }
    }
}

/// Column names of the report table
pub const COLUMNS: [&str; 7] = [
    "sample_name",
    "total_reads",
    "aligned_reads",
    "mean_coverage",
    "percent_duplication",
    "saturation_fraction",
    "additional_reads",
];

/// Written in every column of a failed sample except its name
pub const ERROR_SENTINEL: &str = "Error";

/// A report cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(Box<str>),
    Number(f64),
    /// undefined value
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Text(x) => fmt.write_str(x),
            // keeps the decimal point of whole numbers (`10.0`)
            Cell::Number(x) => write!(fmt, "{:?}", x),
            Cell::Missing => fmt.write_str("NA"),
        }
    }
}

/// Display cells of one record, in the order of [`COLUMNS`]
pub fn row_cells(record: &SampleRecord) -> Vec<Cell> {
    let name = Cell::Text(record.sample_name.clone());
    match &record.metrics {
        Ok(m) => vec![
            name,
            Cell::Number(format_number_readable(m.total_reads)),
            Cell::Number(format_number_readable(m.aligned_reads)),
            Cell::Number(m.mean_coverage),
            Cell::Number(m.percent_duplication),
            Cell::Number(m.saturation_fraction),
            match &m.additional {
                Some(add) => Cell::Number(format_number_readable(add.reads_adjusted)),
                None => Cell::Missing,
            },
        ],
        Err(_) => {
            let mut ret = vec![name];
            ret.extend((1..COLUMNS.len()).map(|_| Cell::Text(ERROR_SENTINEL.into())));
            ret
        }
    }
}

/// All sample rows of a run
#[derive(Debug)]
pub struct ReportTable {
    pub rows: Vec<SampleRecord>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl ReportTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Collect per-sample records into a report table
pub fn assemble(records: Vec<SampleRecord>) -> ReportTable {
    let success_count = records.iter().filter(|r| r.is_ok()).count();
    let failure_count = records.len() - success_count;
    ReportTable {
        rows: records,
        success_count,
        failure_count,
    }
}

/// Output files of a finished run
#[derive(Debug)]
pub struct ReportFiles {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

/// Resolve samples, extract their metrics and write both report
/// files. Returns `None` if no sample is left to process.
pub fn generate(settings: &Settings) -> anyhow::Result<Option<(ReportTable, ReportFiles)>> {
    log::info!("Results path: {}", settings.results_root.display());
    log::info!("Output directory: {}", settings.output_dir.display());
    log::info!("Target coverage: {}x", settings.target_coverage);

    let sample_names = samples::resolve(
        &settings.manifest,
        &settings.sample_column,
        &settings.exclude,
    )?;

    if sample_names.is_empty() {
        log::warn!("No samples to process");
        return Ok(None);
    }

    let table = assemble(extract_all(&sample_names, settings)?);

    std::fs::create_dir_all(&settings.output_dir)
        .map_err(|e| QcError::sink(&settings.output_dir, e))?;

    let files = ReportFiles {
        csv: settings.csv_path(),
        xlsx: settings.xlsx_path(),
    };

    let timestamp = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    delimited::write_csv(&table, &files.csv)?;
    workbook::write_workbook(&table, settings, &timestamp, &files.xlsx)?;

    Ok(Some((table, files)))
}

pub fn run_report(args: &ReportArgs) -> anyhow::Result<()> {
    let file_layer = match &args.config {
        Some(path) => SettingsLayer::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => SettingsLayer::default(),
    };

    let settings = Settings::build(file_layer, args.to_layer())?;

    if let Some((table, files)) = generate(&settings)? {
        log::info!("CSV file saved to: {}", files.csv.display());
        log::info!("Excel file saved to: {}", files.xlsx.display());
        log::info!("Total samples processed: {}", table.row_count());
        log::info!("Successful: {}", table.success_count);
        log::info!("Failed: {}", table.failure_count);
    }

    Ok(())
}
