use crate::error::QcResult;
use crate::metrics::{AlignmentSummary, CoverageSummary, DuplicationMetrics};
use crate::saturation::{self, AdditionalReads};
use crate::settings::{SampleFiles, Settings};
use crate::util::misc::num_threads;

use rayon::prelude::*;
use std::path::Path;

/// Raw and derived QC values of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMetrics {
    pub total_reads: f64,
    pub aligned_reads: f64,
    pub mean_coverage: f64,
    pub percent_duplication: f64,
    pub saturation_fraction: f64,
    /// `None` if the sample has no coverage to extrapolate from
    pub additional: Option<AdditionalReads>,
}

/// One report row. A sample whose files could not be read or parsed
/// keeps the error in place of its metrics.
#[derive(Debug)]
pub struct SampleRecord {
    pub sample_name: Box<str>,
    pub metrics: QcResult<SampleMetrics>,
}

impl SampleRecord {
    pub fn is_ok(&self) -> bool {
        self.metrics.is_ok()
    }
}

/// Read the three QC files of a sample and derive the saturation
/// statistics
pub fn sample_metrics(
    sample: &str,
    results_root: &Path,
    target_coverage: f64,
) -> QcResult<SampleMetrics> {
    let files = SampleFiles::locate(sample, results_root);

    let alignment = AlignmentSummary::from_file(&files.alignment_summary)?;
    let duplication = DuplicationMetrics::from_file(&files.mark_duplicates)?;
    let coverage = CoverageSummary::from_file(&files.mosdepth_summary)?;

    log::debug!(
        "{}: library {}, {} reads examined",
        sample,
        duplication.get("LIBRARY").unwrap_or("?"),
        duplication.get("READ_PAIRS_EXAMINED").unwrap_or("?")
    );

    let total_reads = cast::f64(alignment.total_reads);
    let aligned_reads = cast::f64(alignment.pf_reads_aligned);
    let percent_duplication = duplication.percent_duplication;
    let mean_coverage = coverage.mean_coverage;

    let saturation_fraction = saturation::saturation_fraction(percent_duplication);

    let additional = saturation::additional_reads(
        total_reads,
        mean_coverage,
        target_coverage,
        saturation_fraction,
    );

    Ok(SampleMetrics {
        total_reads,
        aligned_reads,
        mean_coverage,
        percent_duplication,
        saturation_fraction,
        additional,
    })
}

/// Build the report row of a sample. Errors stay inside the record
/// so that one broken sample never stops the batch.
pub fn extract(sample: &str, results_root: &Path, target_coverage: f64) -> SampleRecord {
    let metrics = sample_metrics(sample, results_root, target_coverage);

    match &metrics {
        Ok(m) => log::info!(
            "{}: {:.0} total, {:.0} aligned, {:.2}x coverage, {:.2}% dup",
            sample,
            m.total_reads,
            m.aligned_reads,
            m.mean_coverage,
            m.percent_duplication * 100.0
        ),
        Err(e) => log::warn!("{}: {}", sample, e),
    }

    SampleRecord {
        sample_name: sample.into(),
        metrics,
    }
}

/// Extract every sample on a worker pool. Records come back in the
/// order of `samples`.
pub fn extract_all(
    samples: &[Box<str>],
    settings: &Settings,
) -> anyhow::Result<Vec<SampleRecord>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads(settings.threads))
        .build()?;

    let records: Vec<SampleRecord> = pool.install(|| {
        samples
            .par_iter()
            .map(|s| extract(s, &settings.results_root, settings.target_coverage))
            .collect()
    });

    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::QcError;
    use std::fs;

    /// Write the three QC files of a sample under `root`
    pub(crate) fn write_sample(
        root: &Path,
        sample: &str,
        total_reads: u64,
        percent_duplication: f64,
        mean_coverage: f64,
    ) {
        let files = SampleFiles::locate(sample, root);
        fs::create_dir_all(files.mark_duplicates.parent().unwrap()).unwrap();
        fs::create_dir_all(files.alignment_summary.parent().unwrap()).unwrap();

        fs::write(
            &files.mark_duplicates,
            format!(
                "## METRICS CLASS\tpicard.sam.DuplicationMetrics\n\
LIBRARY\tREAD_PAIRS_EXAMINED\tPERCENT_DUPLICATION\tESTIMATED_LIBRARY_SIZE\n\
{}\t{}\t{}\t1000\n",
                sample,
                total_reads / 2,
                percent_duplication
            ),
        )
        .unwrap();

        let mut pair = vec![format!(
            "PAIR\t{}\t{}\t1\t0\t{}\t0.99",
            total_reads,
            total_reads,
            total_reads - 10
        )];
        pair.extend(std::iter::repeat("0".to_string()).take(8));
        pair.push("150".to_string());
        pair.push("0".to_string());
        fs::write(
            &files.alignment_summary,
            format!(
                "## METRICS CLASS\tpicard.analysis.AlignmentSummaryMetrics\n{}\n",
                pair.join("\t")
            ),
        )
        .unwrap();

        fs::write(
            &files.mosdepth_summary,
            format!(
                "chrom\tlength\tbases\tmean\tmin\tmax\ntotal\t1000\t{}\t{}\t0\t90\n",
                (mean_coverage * 1000.0) as u64,
                mean_coverage
            ),
        )
        .unwrap();
    }

    #[test]
    fn sample_metrics_are_derived() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "S1", 100, 0.2, 10.0);

        let m = sample_metrics("S1", dir.path(), 24.0).unwrap();
        assert_eq!(m.total_reads, 100.0);
        assert_eq!(m.aligned_reads, 90.0);
        assert_eq!(m.mean_coverage, 10.0);
        assert_eq!(m.percent_duplication, 0.2);
        assert!((m.saturation_fraction - 0.8).abs() < 1e-12);

        let add = m.additional.unwrap();
        assert!((add.reads_adjusted - 175.0).abs() < 1e-6);
    }

    #[test]
    fn zero_coverage_leaves_additional_reads_undefined() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), "S0", 100, 0.1, 0.0);
        let m = sample_metrics("S0", dir.path(), 24.0).unwrap();
        assert_eq!(m.additional, None);
    }

    #[test]
    fn missing_files_become_a_failed_record() {
        let dir = tempfile::tempdir().unwrap();
        let rec = extract("ghost", dir.path(), 24.0);
        assert_eq!(rec.sample_name.as_ref(), "ghost");
        assert!(matches!(rec.metrics, Err(QcError::MetricsParse { .. })));
        assert!(!rec.is_ok());
    }

    #[test]
    fn extract_all_keeps_sample_order() {
        let dir = tempfile::tempdir().unwrap();
        for (i, s) in ["A", "B", "C", "D"].iter().enumerate() {
            write_sample(dir.path(), s, 1000 + i as u64, 0.1, 20.0);
        }
        let settings = Settings {
            results_root: dir.path().to_path_buf(),
            manifest: dir.path().join("samples.csv"),
            output_dir: dir.path().join("out"),
            target_coverage: 30.0,
            exclude: vec![],
            sample_column: "sample".into(),
            csv_name: "x.csv".into(),
            xlsx_name: "x.xlsx".into(),
            threads: Some(2),
        };
        let samples: Vec<Box<str>> = vec!["D".into(), "missing".into(), "A".into(), "C".into()];
        let records = extract_all(&samples, &settings).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.sample_name.as_ref()).collect();
        assert_eq!(names, vec!["D", "missing", "A", "C"]);
        assert_eq!(records.iter().filter(|r| r.is_ok()).count(), 3);
    }
}
