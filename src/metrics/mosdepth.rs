use crate::error::{QcError, QcResult};
use crate::metrics::*;

use std::path::Path;

const SUMMARY_HEADER: &str = "chrom";
const SUMMARY_ROW: &str = "total";
const SUMMARY_MIN_FIELDS: usize = 6;

/// Genome-wide depth of coverage summary
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    pub total_length: u64,
    pub total_bases: u64,
    pub mean_coverage: f64,
    pub min_coverage: u64,
    pub max_coverage: u64,
}

impl CoverageSummary {
    pub fn from_file<P: AsRef<Path>>(path: P) -> QcResult<Self> {
        let path = path.as_ref();
        Self::from_lines(&read_metric_lines(path)?, path)
    }

    /// Read the `total` row of a summary table
    pub fn from_lines(lines: &[Box<str>], path: &Path) -> QcResult<Self> {
        let mut header: Option<&str> = None;

        for line in lines {
            if starts_with_token(line, SUMMARY_HEADER) {
                header = Some(&line[..]);
            } else if starts_with_token(line, SUMMARY_ROW) {
                let row = MetricRow::new(path, line, header, SUMMARY_MIN_FIELDS)?;
                return Ok(Self {
                    total_length: row.count("length", 1)?,
                    total_bases: row.count("bases", 2)?,
                    mean_coverage: row.float("mean", 3)?,
                    min_coverage: row.count("min", 4)?,
                    max_coverage: row.count("max", 5)?,
                });
            }
        }

        Err(QcError::parse(path, "no total line"))
    }
}
