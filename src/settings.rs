use crate::error::{QcError, QcResult};

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_COLUMN: &str = "sample";
pub const DEFAULT_CSV_NAME: &str = "sample_metrics_summary.csv";
pub const DEFAULT_XLSX_NAME: &str = "sample_metrics_summary.xlsx";

const MARK_DUPLICATES_PATTERN: &str = "{sample}_sorted_md.MarkDuplicates.metrics.txt";
const ALIGNMENT_SUMMARY_PATTERN: &str =
    "{sample}_multiplemetrics.CollectMultipleMetrics.alignment_summary_metrics";
const MOSDEPTH_SUMMARY_PATTERN: &str = "{sample}_mosdepth.mosdepth.summary.txt";

/// Everything a report run needs to know. Built once and shared by
/// reference with the resolver, extractor and assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub results_root: PathBuf,
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    pub target_coverage: f64,
    pub exclude: Vec<Box<str>>,
    pub sample_column: Box<str>,
    pub csv_name: Box<str>,
    pub xlsx_name: Box<str>,
    pub threads: Option<usize>,
}

/// A partially filled set of options, either from a JSON settings
/// file or from the command line
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(default)]
    pub results_root: Option<PathBuf>,
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub target_coverage: Option<f64>,
    #[serde(default)]
    pub exclude: Option<Vec<Box<str>>>,
    #[serde(default)]
    pub sample_column: Option<Box<str>>,
    #[serde(default)]
    pub csv_name: Option<Box<str>>,
    #[serde(default)]
    pub xlsx_name: Option<Box<str>>,
    #[serde(default)]
    pub threads: Option<usize>,
}

impl SettingsLayer {
    /// Load a settings layer from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> QcResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            QcError::InvalidConfig(format!("cannot open {}: {}", path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            QcError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Values set in `other` win over values set in `self`
    pub fn overlay(self, other: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            results_root: other.results_root.or(self.results_root),
            manifest: other.manifest.or(self.manifest),
            output_dir: other.output_dir.or(self.output_dir),
            target_coverage: other.target_coverage.or(self.target_coverage),
            exclude: other.exclude.or(self.exclude),
            sample_column: other.sample_column.or(self.sample_column),
            csv_name: other.csv_name.or(self.csv_name),
            xlsx_name: other.xlsx_name.or(self.xlsx_name),
            threads: other.threads.or(self.threads),
        }
    }
}

impl Settings {
    /// Merge the settings file layer with the command-line layer and
    /// check that every required value is present.
    ///
    /// * `file_layer` - options read from a settings file (may be empty)
    /// * `cli_layer` - options given on the command line, these win
    ///
    pub fn build(file_layer: SettingsLayer, cli_layer: SettingsLayer) -> QcResult<Self> {
        let merged = file_layer.overlay(cli_layer);

        let required = |x: Option<PathBuf>, name: &str| -> QcResult<PathBuf> {
            x.ok_or_else(|| QcError::InvalidConfig(format!("missing required `{}`", name)))
        };

        let target_coverage = merged.target_coverage.ok_or_else(|| {
            QcError::InvalidConfig("missing required `target_coverage`".to_string())
        })?;

        if !target_coverage.is_finite() || target_coverage <= 0.0 {
            return Err(QcError::InvalidConfig(format!(
                "target coverage must be a positive number, got {}",
                target_coverage
            )));
        }

        Ok(Settings {
            results_root: required(merged.results_root, "results_root")?,
            manifest: required(merged.manifest, "manifest")?,
            output_dir: required(merged.output_dir, "output_dir")?,
            target_coverage,
            exclude: merged.exclude.unwrap_or_default(),
            sample_column: merged
                .sample_column
                .unwrap_or_else(|| DEFAULT_SAMPLE_COLUMN.into()),
            csv_name: merged.csv_name.unwrap_or_else(|| DEFAULT_CSV_NAME.into()),
            xlsx_name: merged.xlsx_name.unwrap_or_else(|| DEFAULT_XLSX_NAME.into()),
            threads: merged.threads,
        })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(self.csv_name.as_ref())
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.output_dir.join(self.xlsx_name.as_ref())
    }
}

/// The three QC files produced upstream for one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFiles {
    pub mark_duplicates: PathBuf,
    pub alignment_summary: PathBuf,
    pub mosdepth_summary: PathBuf,
}

impl SampleFiles {
    pub fn locate(sample: &str, results_root: &Path) -> Self {
        let fill = |pattern: &str| pattern.replace("{sample}", sample);
        SampleFiles {
            mark_duplicates: results_root
                .join("alignment")
                .join(fill(MARK_DUPLICATES_PATTERN)),
            alignment_summary: results_root
                .join("qc_bam")
                .join(fill(ALIGNMENT_SUMMARY_PATTERN)),
            mosdepth_summary: results_root
                .join("qc_bam")
                .join(fill(MOSDEPTH_SUMMARY_PATTERN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_layer() -> SettingsLayer {
        SettingsLayer {
            results_root: Some("/data/results".into()),
            manifest: Some("/data/samples.csv".into()),
            output_dir: Some("/data/out".into()),
            target_coverage: Some(24.0),
            ..Default::default()
        }
    }

    #[test]
    fn build_fills_defaults() {
        let s = Settings::build(SettingsLayer::default(), cli_layer()).unwrap();
        assert_eq!(s.target_coverage, 24.0);
        assert_eq!(s.sample_column.as_ref(), "sample");
        assert!(s.exclude.is_empty());
        assert_eq!(
            s.csv_path(),
            PathBuf::from("/data/out/sample_metrics_summary.csv")
        );
        assert_eq!(
            s.xlsx_path(),
            PathBuf::from("/data/out/sample_metrics_summary.xlsx")
        );
    }

    #[test]
    fn target_coverage_has_no_default() {
        let mut cli = cli_layer();
        cli.target_coverage = None;
        assert!(matches!(
            Settings::build(SettingsLayer::default(), cli),
            Err(QcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn target_coverage_must_be_positive() {
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let mut cli = cli_layer();
            cli.target_coverage = Some(bad);
            assert!(Settings::build(SettingsLayer::default(), cli).is_err());
        }
    }

    #[test]
    fn command_line_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "results_root": "/file/results",
                "manifest": "/file/samples.csv",
                "output_dir": "/file/out",
                "target_coverage": 30,
                "exclude": ["hugelymodelbat"]
            }"#,
        )
        .unwrap();

        let file_layer = SettingsLayer::load(&path).unwrap();
        let cli = SettingsLayer {
            target_coverage: Some(24.0),
            ..Default::default()
        };

        let s = Settings::build(file_layer, cli).unwrap();
        assert_eq!(s.target_coverage, 24.0);
        assert_eq!(s.results_root, PathBuf::from("/file/results"));
        assert_eq!(s.exclude, vec![Box::<str>::from("hugelymodelbat")]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"target_covrage": 30}"#).unwrap();
        assert!(matches!(
            SettingsLayer::load(&path),
            Err(QcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn sample_files_follow_naming_templates() {
        let files = SampleFiles::locate("S1", Path::new("/res"));
        assert_eq!(
            files.mark_duplicates,
            PathBuf::from("/res/alignment/S1_sorted_md.MarkDuplicates.metrics.txt")
        );
        assert_eq!(
            files.alignment_summary,
            PathBuf::from(
                "/res/qc_bam/S1_multiplemetrics.CollectMultipleMetrics.alignment_summary_metrics"
            )
        );
        assert_eq!(
            files.mosdepth_summary,
            PathBuf::from("/res/qc_bam/S1_mosdepth.mosdepth.summary.txt")
        );
    }
}
