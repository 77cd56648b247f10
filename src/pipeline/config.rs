//! Configuration structures for the news classification pipeline.
//!
//! This module provides strongly-typed configuration management using TOML files.
//! The configuration covers data paths, text normalization, cross-validation,
//! the classifier and output paths. Every section has defaults, so a config
//! file only needs the keys it wants to change.

use crate::dataset::Classes;
use crate::error::{PipelineError, Result};
use crate::normalize::{PluralLemmatizer, StopWords, TextNormalizer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and intermediate data files
    pub data: DataConfig,
    /// Text normalization settings
    pub features: FeaturesConfig,
    /// Cross-validation settings
    pub validation: ValidationConfig,
    /// Classifier hyperparameters
    pub model: ModelConfig,
    /// Output paths configuration
    pub output: OutputConfig,
}

/// Data file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV of fake articles (`title,text,subject,date`)
    pub fake_path: String,
    /// CSV of true articles (`title,text,subject,date`)
    pub true_path: String,
    /// Combined, labeled CSV written by the `combine` stage
    pub combined_path: String,
    /// Normalized CSV written by the `preprocess` stage
    pub preprocessed_path: String,
}

/// How user input is tokenized at prediction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceTokenization {
    /// Same normalizer as the training data.
    #[default]
    Normalized,
    /// Lowercased whitespace split only.
    Whitespace,
}

/// Text normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Stop-word file, one word per line. The built-in English list is used
    /// when unset.
    pub stopwords_path: Option<String>,
    /// Fold plural forms (`stories` -> `story`)
    pub lemmatize: bool,
    /// Tokenization applied to text typed at prediction time
    pub inference_tokenization: InferenceTokenization,
}

/// Cross-validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Number of folds (k)
    pub folds: usize,
    /// Shuffle each class before dealing examples into folds
    pub shuffle: bool,
    /// Seed for the shuffle
    pub seed: u64,
    /// Abort on the first failing fold instead of reporting partial results
    pub fail_fast: bool,
    /// Fixed class order; index 0 is the positive class for binary metrics.
    /// Classes are taken in first-seen order when unset.
    pub classes: Option<Vec<String>>,
}

/// Classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Additive smoothing for Naive Bayes (1.0 = Laplace)
    pub alpha: f64,
}

/// Output paths configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for every file written by the pipeline
    pub model_dir: String,
    /// Bag-of-words matrix with labels
    pub matrix_file: String,
    /// Vocabulary, one term per line
    pub vocabulary_csv: String,
    /// Frozen vocabulary used by prediction
    pub vocabulary_file: String,
    /// Trained model and its class table
    pub model_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            fake_path: "data/Fake.csv".to_string(),
            true_path: "data/True.csv".to_string(),
            combined_path: "data/CombinedNews.csv".to_string(),
            preprocessed_path: "data/PreprocessedNews.csv".to_string(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        FeaturesConfig {
            stopwords_path: None,
            lemmatize: true,
            inference_tokenization: InferenceTokenization::Normalized,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            folds: 10,
            shuffle: false,
            seed: 1,
            fail_fast: false,
            classes: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig { alpha: 1.0 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            model_dir: "models".to_string(),
            matrix_file: "BagOfWords_Feature_Matrix_with_Labels.csv".to_string(),
            vocabulary_csv: "Vocabulary.csv".to_string(),
            vocabulary_file: "vocabulary.json".to_string(),
            model_file: "naive_bayes.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Returns `Ok(Config)` if successful, or an error if the file cannot be
    /// read, parsed or holds invalid values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!(path = %path.display(), "loading configuration");
            Self::load(path)
        } else {
            info!(path = %path.display(), "configuration file not found, using defaults");
            Ok(Config::default())
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.validation.folds < 2 {
            return Err(PipelineError::Config(format!(
                "validation.folds must be at least 2, got {}",
                self.validation.folds
            )));
        }
        if !(self.model.alpha.is_finite() && self.model.alpha > 0.0) {
            return Err(PipelineError::Config(format!(
                "model.alpha must be a positive number, got {}",
                self.model.alpha
            )));
        }
        if let Some(classes) = &self.validation.classes {
            Classes::from_labels(classes.iter().cloned())
                .map_err(|e| PipelineError::Config(format!("validation.classes: {e}")))?;
        }
        Ok(())
    }

    /// The pinned class table, if one is configured.
    pub fn classes(&self) -> Result<Option<Classes>> {
        self.validation
            .classes
            .as_ref()
            .map(|labels| Classes::from_labels(labels.iter().cloned()))
            .transpose()
    }

    /// Stop words from the configured file, or the built-in list.
    pub fn stop_words(&self) -> Result<StopWords> {
        match &self.features.stopwords_path {
            Some(path) => {
                let stop_words = StopWords::load(path)?;
                info!(path = %path, count = stop_words.len(), "stop words loaded");
                Ok(stop_words)
            }
            None => Ok(StopWords::english()),
        }
    }

    /// Build the text normalizer described by `[features]`.
    pub fn normalizer(&self) -> Result<TextNormalizer> {
        let stop_words = self.stop_words()?;
        if self.features.lemmatize {
            TextNormalizer::with_lemmatizer(stop_words, PluralLemmatizer)
        } else {
            TextNormalizer::new(stop_words)
        }
    }
}

impl OutputConfig {
    fn path(&self, file: &str) -> PathBuf {
        Path::new(&self.model_dir).join(file)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.path(&self.matrix_file)
    }

    pub fn vocabulary_csv_path(&self) -> PathBuf {
        self.path(&self.vocabulary_csv)
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.path(&self.vocabulary_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.path(&self.model_file)
    }
}
