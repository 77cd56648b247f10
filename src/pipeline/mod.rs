//! Fake News Classification Pipeline
//!
//! This module wires the library pieces into the batch pipeline that turns two
//! CSV files of news articles into a trained, cross-validated classifier:
//!
//! 1. **combine**: label `Fake.csv` and `True.csv` and concatenate them
//! 2. **preprocess**: drop incomplete records and normalize title and text
//! 3. **vectorize**: build the vocabulary and write the bag-of-words matrix
//! 4. **train**: stratified k-fold cross-validation of multinomial Naive Bayes,
//!    then a final model fitted on every document
//!
//! The trained model can then classify typed text, once or in a prompt loop.
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/newsclf combine
//! ./target/release/newsclf preprocess
//! ./target/release/newsclf vectorize
//! ./target/release/newsclf train --folds 10
//! ./target/release/newsclf predict "Senate passes the budget bill"
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use newsclf::pipeline::config::Config;
//! use newsclf::pipeline::train::{train_model, TrainOptions};
//!
//! let config = Config::load_or_default("config.toml")?;
//! let trained = train_model(&config, TrainOptions::default())?;
//! println!("accuracy: {}", trained.report.accuracy());
//! # Ok::<(), newsclf::PipelineError>(())
//! ```
//!
//! ## Configuration
//!
//! Every key is optional; see [`config`] for the defaults.
//!
//! ```toml
//! [data]
//! fake_path = "data/Fake.csv"
//! true_path = "data/True.csv"
//!
//! [validation]
//! folds = 10
//! shuffle = true
//! seed = 7
//!
//! [model]
//! alpha = 1.0
//!
//! [output]
//! model_dir = "models"
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Configuration structures and loading
//! - [`data`] - Article record structures and CSV I/O
//! - [`train`] - Batch stages
//! - [`evaluate`] - Result tables
//! - [`save`] - Model persistence
//! - [`predict`] - Prediction for typed text
//! - `cli` - Command-line interface (`cli` feature)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod data;
pub mod evaluate;
pub mod predict;
pub mod save;
pub mod train;

pub use config::Config;
pub use train::{train_model, TrainOptions, TrainedPipeline};
