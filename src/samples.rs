use crate::error::{QcError, QcResult};

use std::collections::HashSet;
use std::path::Path;

/// Read the sample column of a manifest, drop repeated identifiers and
/// remove the excluded ones.
///
/// Samples are returned in order of first appearance. Callers should
/// treat the result as a set.
///
/// * `manifest` - comma-separated sample sheet with a header row
/// * `column` - name of the sample identifier column
/// * `exclude` - identifiers to leave out
///
pub fn resolve<P: AsRef<Path>>(
    manifest: P,
    column: &str,
    exclude: &[Box<str>],
) -> QcResult<Vec<Box<str>>> {
    let manifest = manifest.as_ref();
    let all_samples = read_sample_column(manifest, column)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = vec![];
    for x in all_samples.iter() {
        if seen.insert(x) {
            unique.push(x.clone());
        }
    }

    let excluded: HashSet<&str> = exclude.iter().map(|x| &x[..]).collect();

    let samples: Vec<Box<str>> = unique
        .iter()
        .filter(|x| !excluded.contains(&x[..]))
        .cloned()
        .collect();

    log::info!("Original samples: {}", all_samples.len());
    log::info!("After removing duplicates: {}", unique.len());
    log::info!("Samples excluded: {:?}", exclude);
    log::info!("Final samples to process: {}", samples.len());

    Ok(samples)
}

fn read_sample_column(manifest: &Path, column: &str) -> QcResult<Vec<Box<str>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(manifest)
        .map_err(|e| QcError::manifest(manifest, e))?;

    let col = reader
        .headers()
        .map_err(|e| QcError::manifest(manifest, e))?
        .iter()
        .position(|x| x.trim() == column)
        .ok_or_else(|| QcError::manifest(manifest, format!("no `{}` column", column)))?;

    let mut ret = vec![];
    for rec in reader.records() {
        let rec = rec.map_err(|e| QcError::manifest(manifest, e))?;
        match rec.get(col).map(|x| x.trim()) {
            Some(x) if !x.is_empty() => ret.push(Box::from(x)),
            _ => {}
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn write_manifest(dir: &Path, text: &str) -> std::path::PathBuf {
        let path = dir.join("samples.csv");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn dedup_and_exclude() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            "sample,lane,fastq_1\nA,1,a.fq\nB,1,b.fq\nA,2,a2.fq\nC,1,c.fq\n",
        );
        let samples = resolve(&path, "sample", &["C".into()]).unwrap();
        let got: BTreeSet<&str> = samples.iter().map(|x| x.as_ref()).collect();
        assert_eq!(got, BTreeSet::from(["A", "B"]));
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn exclusion_of_absent_sample_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), "sample\nA\nB\n");
        let samples = resolve(&path, "sample", &["Z".into()]).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), "id,lane\nA,1\n");
        assert!(matches!(
            resolve(&path, "sample", &[]),
            Err(QcError::ManifestRead { .. })
        ));
    }

    #[test]
    fn missing_file_fails() {
        assert!(matches!(
            resolve("/nonexistent/samples.csv", "sample", &[]),
            Err(QcError::ManifestRead { .. })
        ));
    }
}
