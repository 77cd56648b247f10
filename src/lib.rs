//! # newsclf - Fake News Classifier
//!
//! Bag-of-words text classification with multinomial Naive Bayes, evaluated
//! by stratified k-fold cross-validation, in pure Rust.
//!
//! ## Features
//!
//! - **Frozen vocabulary**: terms indexed in first-seen order, one matrix column each
//! - **Bag-of-words encoding**: raw term counts, unknown terms ignored
//! - **Stratified k-fold**: deterministic, optionally shuffled with a seed
//! - **Metrics**: confusion matrices, accuracy, precision, recall and F1, with an
//!   explicit `Undefined` value instead of a silent 0.0
//! - **Pipeline**: CSV stages from raw articles to a saved model, plus a prompt loop
//!
//! ## Quick Start
//!
//! ```
//! use newsclf::{
//!     BowEncoder, Classes, CrossValidator, Dataset, Model, MultinomialNaiveBayes,
//!     Normalizer, StopWords, StratifiedKFold, TextNormalizer, Trainer, Vocabulary,
//! };
//!
//! # fn main() -> newsclf::Result<()> {
//! let normalizer = TextNormalizer::new(StopWords::english())?;
//! let articles = [
//!     ("Shocking hoax", "The hoax spreads online", "fake"),
//!     ("Hoax exposed", "Shocking claims about the hoax", "fake"),
//!     ("Senate vote", "The senate held a vote", "true"),
//!     ("Budget vote", "Senate passes the budget", "true"),
//! ];
//! let docs: Vec<_> = articles.iter().map(|(t, b, _)| normalizer.normalize(t, b)).collect();
//! let labels: Vec<&str> = articles.iter().map(|(_, _, l)| *l).collect();
//!
//! let vocabulary = Vocabulary::build(&docs);
//! let vectors = BowEncoder::new(&vocabulary).encode_corpus(&docs);
//! let data = Dataset::assemble(&vocabulary, vectors, &labels, Classes::discover(&labels))?;
//!
//! let trainer = MultinomialNaiveBayes::default();
//! let report = CrossValidator::new(StratifiedKFold::new(2)).run(&trainer, &data)?;
//! println!("accuracy: {:.3}", report.accuracy());
//!
//! let model = trainer.train(&data)?;
//! let query = BowEncoder::new(&vocabulary).encode_tokens(normalizer.tokens("senate budget"));
//! assert_eq!(data.classes().label(model.predict(&query)?), Some("true"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`normalize`] - Raw text to tokens
//! - [`vocab`] - Frozen term index
//! - [`encoder`] - Bag-of-words feature vectors
//! - [`dataset`] - Labeled examples and the class table
//! - [`classifier`] - `Model` / `Trainer` traits
//! - [`naive_bayes`] - Multinomial Naive Bayes
//! - [`cross_validation`] - Stratified k-fold harness
//! - [`metrics`] - Confusion matrix and derived metrics
//! - [`matrix`] - Labeled matrix CSV files
//! - [`pipeline`] - Batch stages, persistence, prediction and CLI
//! - [`error`] - Error type

pub mod classifier;
pub mod cross_validation;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod naive_bayes;
pub mod normalize;
pub mod pipeline;
pub mod vocab;

// Re-export commonly used types for convenience
pub use classifier::{Model, Trainer};
pub use cross_validation::{CrossValidationReport, CrossValidator, StratifiedKFold};
pub use dataset::{Classes, Dataset, LabeledExample};
pub use encoder::{encode, BowEncoder, FeatureVector};
pub use error::{PipelineError, Result, StageContext};
pub use metrics::{BinaryMetrics, ClassMetrics, ConfusionMatrix, Metric};
pub use naive_bayes::{MultinomialNaiveBayes, NaiveBayesModel};
pub use normalize::{NormalizedDocument, Normalizer, StopWords, TextNormalizer};
pub use vocab::Vocabulary;
