use crate::error::{QcError, QcResult};
use crate::report::*;

use std::path::Path;

/// Write the report table as comma-separated values with a header row
pub fn write_csv(table: &ReportTable, path: &Path) -> QcResult<()> {
    let sink_err = |e: csv::Error| QcError::sink(path, e);

    let mut writer = csv::Writer::from_path(path).map_err(sink_err)?;
    writer.write_record(COLUMNS).map_err(sink_err)?;

    for rec in table.rows.iter() {
        let cells: Vec<String> = row_cells(rec).iter().map(|c| c.to_string()).collect();
        writer.write_record(&cells).map_err(sink_err)?;
    }

    writer.flush().map_err(|e| QcError::sink(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SampleRecord;

    #[test]
    fn header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = assemble(vec![SampleRecord {
            sample_name: "S,1".into(),
            metrics: Err(QcError::parse("x", "y")),
        }]);
        write_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("\"S,1\",Error,Error,Error,Error,Error,Error")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let table = assemble(vec![]);
        assert!(matches!(
            write_csv(&table, &path),
            Err(QcError::SinkWrite { .. })
        ));
    }
}
