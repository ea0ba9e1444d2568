use crate::error::{QcError, QcResult};
use crate::report::*;
use crate::settings::Settings;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

const METRICS_SHEET: &str = "Sample_Metrics";
const COLUMNS_SHEET: &str = "Column_Descriptions";
const CALCULATIONS_SHEET: &str = "Calculations";
const SUMMARY_SHEET: &str = "Summary";

/// (description, units) of each report column, in the order of
/// [`COLUMNS`]
fn column_descriptions(target_coverage: f64) -> [(String, &'static str); 7] {
    [
        ("Sample identifier/name".into(), "Text"),
        (
            "Total number of sequencing reads generated for this sample".into(),
            "Number (M = millions)",
        ),
        (
            "Number of reads that successfully aligned to the reference genome".into(),
            "Number (M = millions)",
        ),
        (
            "Average sequencing depth/coverage across the genome".into(),
            "Fold coverage (e.g., 25.5x)",
        ),
        (
            "Fraction of reads identified as PCR duplicates".into(),
            "Decimal fraction (0.000-1.000)",
        ),
        (
            "Library saturation metric (1 - percent_duplication), indicates sequencing efficiency"
                .into(),
            "Decimal fraction (0.000-1.000)",
        ),
        (
            format!(
                "Additional reads needed to reach target coverage ({}x), adjusted for duplication rate",
                target_coverage
            ),
            "Number of reads (M = millions); NA if coverage is zero, inf if fully duplicated",
        ),
    ]
}

const CALCULATIONS: [(&str, &str); 2] = [
    (
        "Saturation Fraction",
        "saturation_fraction = 1 - percent_duplication",
    ),
    (
        "Additional Reads Needed",
        "additional_reads = (current_reads × (target_coverage - current_coverage) / current_coverage) / saturation_fraction",
    ),
];

/// (metric, value) rows of the Summary sheet
fn summary_rows(
    table: &ReportTable,
    settings: &Settings,
    timestamp: &str,
) -> [(&'static str, String); 7] {
    [
        ("Total Samples", table.row_count().to_string()),
        ("Successful Samples", table.success_count.to_string()),
        ("Failed Samples", table.failure_count.to_string()),
        ("Processing Date", timestamp.to_string()),
        ("Target Coverage", format!("{}x", settings.target_coverage)),
        ("Results Path", settings.results_root.display().to_string()),
        ("Samples Excluded", settings.exclude.join(", ")),
    ]
}

/// Write the report as an Excel workbook: the metrics table, a
/// column legend, a formula legend and a run summary
pub fn write_workbook(
    table: &ReportTable,
    settings: &Settings,
    timestamp: &str,
    path: &Path,
) -> QcResult<()> {
    let mut workbook =
        build_workbook(table, settings, timestamp).map_err(|e| QcError::sink(path, e))?;
    workbook.save(path).map_err(|e| QcError::sink(path, e))
}

fn build_workbook(
    table: &ReportTable,
    settings: &Settings,
    timestamp: &str,
) -> Result<Workbook, XlsxError> {
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    // Sheet 1. sample metrics
    let mut sheet = Worksheet::new();
    sheet.set_name(METRICS_SHEET)?;
    write_header(&mut sheet, &COLUMNS, &bold)?;
    for (i, rec) in table.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (j, cell) in row_cells(rec).iter().enumerate() {
            let col = j as u16;
            match cell {
                Cell::Number(x) if x.is_finite() => sheet.write_number(row, col, *x)?,
                _ => sheet.write_string(row, col, cell.to_string())?,
            };
        }
    }
    workbook.push_worksheet(sheet);

    // Sheet 2. column descriptions
    let mut sheet = Worksheet::new();
    sheet.set_name(COLUMNS_SHEET)?;
    write_header(&mut sheet, &["Column Name", "Description", "Units/Format"], &bold)?;
    for (i, (name, (desc, units))) in COLUMNS
        .iter()
        .zip(column_descriptions(settings.target_coverage))
        .enumerate()
    {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *name)?;
        sheet.write_string(row, 1, desc)?;
        sheet.write_string(row, 2, units)?;
    }
    workbook.push_worksheet(sheet);

    // Sheet 3. formulas
    let mut sheet = Worksheet::new();
    sheet.set_name(CALCULATIONS_SHEET)?;
    write_header(&mut sheet, &["Calculation", "Formula"], &bold)?;
    for (i, (name, formula)) in CALCULATIONS.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *name)?;
        sheet.write_string(row, 1, *formula)?;
    }
    workbook.push_worksheet(sheet);

    // Sheet 4. run summary
    let summary = summary_rows(table, settings, timestamp);

    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    write_header(&mut sheet, &["Metric", "Value"], &bold)?;
    for (i, (metric, value)) in summary.into_iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, metric)?;
        sheet.write_string(row, 1, value)?;
    }
    workbook.push_worksheet(sheet);

    Ok(workbook)
}

fn write_header(sheet: &mut Worksheet, names: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (j, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, j as u16, *name, bold)?;
    }
    Ok(())
}
