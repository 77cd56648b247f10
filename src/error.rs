//! Error types for the classification pipeline.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`PipelineError`]. The first group of variants is the domain taxonomy
//! (data integrity, vocabulary mismatch, fold configuration, undefined metric,
//! classifier training); the second group wraps the I/O and format crates.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source record is malformed or misses a required field.
    #[error("data integrity error in record {record}: {reason}")]
    DataIntegrity { record: usize, reason: String },

    /// A feature vector does not match the dimensionality the model or
    /// dataset expects.
    #[error("vocabulary mismatch: expected {expected} features, got {actual}")]
    VocabularyMismatch { expected: usize, actual: usize },

    /// The requested fold count cannot be honoured for this dataset.
    #[error("invalid fold configuration: {0}")]
    InvalidFoldConfiguration(String),

    /// A metric was required but its denominator is zero.
    #[error("metric `{0}` is undefined (zero denominator)")]
    UndefinedMetric(&'static str),

    /// The classifier could not be trained.
    #[error("classifier training failed: {0}")]
    ClassifierTraining(String),

    /// A label is not part of the class table.
    #[error("unknown class label `{0}`")]
    UnknownClass(String),

    /// Structural problem with a dataset, vocabulary or matrix.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A batch stage failed; wraps the underlying error with the stage name.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl PipelineError {
    /// Name of the batch stage this error was raised in, if it was wrapped.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            PipelineError::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Attaches a stage name to errors so batch failures say where they happened.
pub trait StageContext<T> {
    fn stage(self, stage: &'static str) -> Result<T>;
}

impl<T, E> StageContext<T> for std::result::Result<T, E>
where
    E: Into<PipelineError>,
{
    fn stage(self, stage: &'static str) -> Result<T> {
        self.map_err(|err| PipelineError::Stage {
            stage,
            source: Box::new(err.into()),
        })
    }
}
