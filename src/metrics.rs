pub mod mosdepth;
pub mod picard;

pub use mosdepth::CoverageSummary;
pub use picard::{AlignmentSummary, DuplicationMetrics};

use crate::error::{QcError, QcResult};
use crate::util::file::read_lines;

use std::path::Path;

const SEP: char = '\t';

/// Read a metrics text file, reporting any I/O problem as a parse
/// error of that file
pub(crate) fn read_metric_lines(path: &Path) -> QcResult<Vec<Box<str>>> {
    read_lines(path).map_err(|e| QcError::parse(path, e))
}

/// Split one tab-separated line after trimming surrounding white space
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split(SEP).collect()
}

/// Does the first field of this line equal `token`?
pub(crate) fn starts_with_token(line: &str, token: &str) -> bool {
    line.trim_start().split(SEP).next() == Some(token)
}

pub(crate) fn parse_float(path: &Path, name: &str, word: &str) -> QcResult<f64> {
    fast_float::parse::<f64, _>(word.trim())
        .map_err(|_| QcError::parse(path, format!("{} is not a number: {:?}", name, word)))
}

pub(crate) fn parse_count(path: &Path, name: &str, word: &str) -> QcResult<u64> {
    word.trim()
        .parse::<u64>()
        .map_err(|_| QcError::parse(path, format!("{} is not a count: {:?}", name, word)))
}

///
/// A tab-separated data row. Fields are found by column name when
/// the file carries a header row, otherwise at a fixed offset.
///
pub(crate) struct MetricRow<'a> {
    path: &'a Path,
    fields: Vec<&'a str>,
    header: Option<Vec<&'a str>>,
}

impl<'a> MetricRow<'a> {
    ///
    /// * `path` - source file, for error messages
    /// * `line` - the data line
    /// * `header` - the header line, if the file has one
    /// * `min_fields` - the smallest acceptable number of fields
    ///
    pub fn new(
        path: &'a Path,
        line: &'a str,
        header: Option<&'a str>,
        min_fields: usize,
    ) -> QcResult<Self> {
        let fields = split_fields(line);
        if fields.len() < min_fields {
            return Err(QcError::parse(
                path,
                format!(
                    "expected at least {} fields, found {}",
                    min_fields,
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            path,
            fields,
            header: header.map(split_fields),
        })
    }

    fn field(&self, name: &str, offset: usize) -> QcResult<&'a str> {
        let at = match &self.header {
            Some(hdr) => hdr
                .iter()
                .position(|x| *x == name)
                .ok_or_else(|| QcError::parse(self.path, format!("no {} column", name)))?,
            None => offset,
        };
        self.fields
            .get(at)
            .copied()
            .ok_or_else(|| QcError::parse(self.path, format!("missing {} field", name)))
    }

    pub fn count(&self, name: &str, offset: usize) -> QcResult<u64> {
        parse_count(self.path, name, self.field(name, offset)?)
    }

    pub fn float(&self, name: &str, offset: usize) -> QcResult<f64> {
        parse_float(self.path, name, self.field(name, offset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_match_is_on_the_first_field() {
        assert!(starts_with_token("total\t10\t20", "total"));
        assert!(!starts_with_token("total_region\t10\t20", "total"));
        assert!(!starts_with_token("FIRST_OF_PAIR\t1", "PAIR"));
    }

    #[test]
    fn row_by_name_and_by_offset() {
        let path = Path::new("x.txt");
        let row = MetricRow::new(path, "total\t100\t2.5", Some("chrom\tlength\tmean"), 3).unwrap();
        assert_eq!(row.count("length", 7).unwrap(), 100);
        assert_eq!(row.float("mean", 7).unwrap(), 2.5);
        assert!(row.float("max", 1).is_err());

        let row = MetricRow::new(path, "total\t100\t2.5", None, 3).unwrap();
        assert_eq!(row.count("length", 1).unwrap(), 100);
        assert!(row.count("length", 5).is_err());
        assert!(row.count("mean", 2).is_err());
    }

    #[test]
    fn short_row_is_rejected() {
        let path = Path::new("x.txt");
        assert!(matches!(
            MetricRow::new(path, "total\t1", None, 6),
            Err(QcError::MetricsParse { .. })
        ));
    }
}
