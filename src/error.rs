use std::path::PathBuf;

/// Errors raised while building a QC report
#[derive(Debug, thiserror::Error)]
pub enum QcError {
    #[error("failed to read sample manifest {path}: {reason}")]
    ManifestRead { path: PathBuf, reason: String },

    #[error("failed to parse metrics file {path}: {reason}")]
    MetricsParse { path: PathBuf, reason: String },

    #[error("failed to write report {path}: {reason}")]
    SinkWrite { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("gene list error: {0}")]
    GeneList(String),
}

impl QcError {
    pub fn manifest<P: Into<PathBuf>, E: ToString>(path: P, reason: E) -> Self {
        QcError::ManifestRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse<P: Into<PathBuf>, E: ToString>(path: P, reason: E) -> Self {
        QcError::MetricsParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn sink<P: Into<PathBuf>, E: ToString>(path: P, reason: E) -> Self {
        QcError::SinkWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type QcResult<T> = Result<T, QcError>;
