use crate::error::{QcError, QcResult};
use crate::metrics::*;

use std::collections::HashMap;
use std::path::Path;

const LIBRARY_HEADER: &str = "LIBRARY";
const PERCENT_DUPLICATION: &str = "PERCENT_DUPLICATION";

const ALIGNMENT_HEADER: &str = "CATEGORY";
const ALIGNMENT_ROW: &str = "PAIR";
const ALIGNMENT_MIN_FIELDS: usize = 16;

/// Duplicate marking metrics of one library
#[derive(Debug, Clone)]
pub struct DuplicationMetrics {
    /// every column of the library row, keyed by header name
    pub metrics: HashMap<Box<str>, Box<str>>,
    /// fraction of mapped reads flagged as duplicates
    pub percent_duplication: f64,
}

impl DuplicationMetrics {
    pub fn from_file<P: AsRef<Path>>(path: P) -> QcResult<Self> {
        let path = path.as_ref();
        Self::from_lines(&read_metric_lines(path)?, path)
    }

    /// The row following the `LIBRARY` header holds the values; the
    /// two are zipped column by column.
    pub fn from_lines(lines: &[Box<str>], path: &Path) -> QcResult<Self> {
        let at = lines
            .iter()
            .position(|x| starts_with_token(x, LIBRARY_HEADER))
            .ok_or_else(|| QcError::parse(path, "no LIBRARY header line"))?;

        let data = lines
            .get(at + 1)
            .ok_or_else(|| QcError::parse(path, "LIBRARY header has no data row"))?;

        let metrics: HashMap<Box<str>, Box<str>> = split_fields(&lines[at])
            .into_iter()
            .zip(split_fields(data))
            .map(|(k, v)| (Box::from(k), Box::from(v)))
            .collect();

        let percent_duplication = match metrics.get(PERCENT_DUPLICATION) {
            Some(x) => parse_float(path, PERCENT_DUPLICATION, x)?,
            None => return Err(QcError::parse(path, "no PERCENT_DUPLICATION value")),
        };

        Ok(Self {
            metrics,
            percent_duplication,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(|x| x.as_ref())
    }
}

/// Alignment summary of the `PAIR` category
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    pub total_reads: u64,
    pub pf_reads: u64,
    pub pct_pf_reads: f64,
    pub pf_reads_aligned: u64,
    pub pct_pf_reads_aligned: f64,
    pub mean_read_length: f64,
}

impl AlignmentSummary {
    pub fn from_file<P: AsRef<Path>>(path: P) -> QcResult<Self> {
        let path = path.as_ref();
        Self::from_lines(&read_metric_lines(path)?, path)
    }

    /// Read the `PAIR` row. Columns are looked up by name under a
    /// `CATEGORY` header; without one, the standard column offsets
    /// are assumed.
    pub fn from_lines(lines: &[Box<str>], path: &Path) -> QcResult<Self> {
        let mut header: Option<&str> = None;

        for line in lines {
            if starts_with_token(line, ALIGNMENT_HEADER) {
                header = Some(&line[..]);
            } else if starts_with_token(line, ALIGNMENT_ROW) {
                let row = MetricRow::new(path, line, header, ALIGNMENT_MIN_FIELDS)?;
                return Ok(Self {
                    total_reads: row.count("TOTAL_READS", 1)?,
                    pf_reads: row.count("PF_READS", 2)?,
                    pct_pf_reads: row.float("PCT_PF_READS", 3)?,
                    pf_reads_aligned: row.count("PF_READS_ALIGNED", 5)?,
                    pct_pf_reads_aligned: row.float("PCT_PF_READS_ALIGNED", 6)?,
                    mean_read_length: row.float("MEAN_READ_LENGTH", 15)?,
                });
            }
        }

        Err(QcError::parse(path, "no PAIR line"))
    }
}
