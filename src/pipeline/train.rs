//! Batch stages of the fake news pipeline.
//!
//! `combine` -> `preprocess` -> `vectorize` -> `train`. Each stage reads the
//! files the previous one wrote, so any of them can be re-run on its own.
//! Errors leaving a stage carry the stage name.

use super::config::Config;
use super::data::{combine, read_records, write_records, Article, NewsRecord, PreprocessedRecord};
use super::evaluate::print_results;
use super::predict::{inference_tokenizer, Predictor};
use super::save::save_artifacts;
use crate::classifier::Trainer;
use crate::cross_validation::{CrossValidationReport, CrossValidator, StratifiedKFold};
use crate::dataset::{Classes, Dataset};
use crate::encoder::BowEncoder;
use crate::error::{Result, StageContext};
use crate::matrix::{load_matrix, save_matrix};
use crate::naive_bayes::{MultinomialNaiveBayes, NaiveBayesModel};
use crate::normalize::{NormalizedDocument, Normalizer};
use crate::vocab::Vocabulary;
use std::time::Instant;
use tracing::{info, warn};

const RULE: &str = "===================================================================";

/// Command-line overrides for the train stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainOptions {
    /// Replaces `validation.folds`
    pub folds: Option<usize>,
}

/// Everything the train stage produced.
#[derive(Debug)]
pub struct TrainedPipeline {
    pub vocabulary: Vocabulary,
    pub classes: Classes,
    pub model: NaiveBayesModel,
    pub report: CrossValidationReport,
}

impl TrainedPipeline {
    /// Turn the trained pieces into a predictor for user input.
    pub fn into_predictor(self, config: &Config) -> Result<Predictor<NaiveBayesModel>> {
        Predictor::new(
            self.vocabulary,
            self.classes,
            self.model,
            inference_tokenizer(config)?,
        )
    }
}

/// Label the fake and true sources and write the combined CSV.
pub fn combine_sources(config: &Config) -> Result<usize> {
    combine_stage(config).stage("combine")
}

fn combine_stage(config: &Config) -> Result<usize> {
    let fake: Vec<Article> = read_records(&config.data.fake_path)?;
    let real: Vec<Article> = read_records(&config.data.true_path)?;
    info!(fake = fake.len(), real = real.len(), "sources loaded");

    let records = combine(fake, real);
    write_records(&config.data.combined_path, &records)?;
    info!(
        records = records.len(),
        path = %config.data.combined_path,
        "combined dataset written"
    );
    Ok(records.len())
}

/// Normalize every valid record. Records missing a title, text or label are
/// dropped with a warning.
pub fn preprocess_records<N: Normalizer + ?Sized>(
    normalizer: &N,
    records: Vec<NewsRecord>,
) -> Vec<PreprocessedRecord> {
    let total = records.len();
    let kept: Vec<PreprocessedRecord> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match record.validate(i) {
            Ok(()) => Some(record),
            Err(error) => {
                warn!(%error, "dropping record");
                None
            }
        })
        .map(|record| {
            let doc = normalizer.normalize(&record.title, &record.text);
            PreprocessedRecord {
                title: doc.title_text(),
                text: doc.body_text(),
                subject: record.subject,
                date: record.date,
                label: record.label,
                text_length: doc.body().len(),
            }
        })
        .collect();

    if kept.len() < total {
        warn!(dropped = total - kept.len(), kept = kept.len(), "incomplete records removed");
    }
    kept
}

/// Read the combined CSV, normalize it and write the preprocessed CSV.
pub fn run_preprocess(config: &Config) -> Result<usize> {
    preprocess_stage(config).stage("preprocess")
}

fn preprocess_stage(config: &Config) -> Result<usize> {
    let normalizer = config.normalizer()?;
    let records: Vec<NewsRecord> = read_records(&config.data.combined_path)?;
    let start = Instant::now();
    let preprocessed = preprocess_records(&normalizer, records);
    write_records(&config.data.preprocessed_path, &preprocessed)?;
    info!(
        records = preprocessed.len(),
        path = %config.data.preprocessed_path,
        secs = start.elapsed().as_secs_f64(),
        "preprocessed dataset written"
    );
    Ok(preprocessed.len())
}

/// Split preprocessed records into normalized documents and their labels.
pub fn load_corpus(records: &[PreprocessedRecord]) -> (Vec<NormalizedDocument>, Vec<String>) {
    records
        .iter()
        .map(|r| {
            (
                NormalizedDocument::from_normalized_text(&r.title, &r.text),
                r.label.clone(),
            )
        })
        .unzip()
}

/// Build the vocabulary and encode every record.
///
/// Classes are discovered in first-seen order unless `classes` pins them.
pub fn build_features(
    records: &[PreprocessedRecord],
    classes: Option<Classes>,
) -> Result<(Vocabulary, Dataset)> {
    let (docs, labels) = load_corpus(records);
    let vocabulary = Vocabulary::build(&docs);
    let vectors = BowEncoder::new(&vocabulary).encode_corpus(&docs);
    let classes = classes.unwrap_or_else(|| Classes::discover(&labels));
    let data = Dataset::assemble(&vocabulary, vectors, &labels, classes)?;
    info!(
        documents = data.len(),
        terms = vocabulary.len(),
        classes = data.classes().len(),
        "features built"
    );
    Ok((vocabulary, data))
}

/// Write the bag-of-words matrix and the vocabulary list.
pub fn run_vectorize(config: &Config) -> Result<(Vocabulary, Dataset)> {
    vectorize_stage(config).stage("vectorize")
}

fn vectorize_stage(config: &Config) -> Result<(Vocabulary, Dataset)> {
    let records: Vec<PreprocessedRecord> = read_records(&config.data.preprocessed_path)?;
    let (vocabulary, data) = build_features(&records, config.classes()?)?;

    std::fs::create_dir_all(&config.output.model_dir)?;
    let matrix_path = config.output.matrix_path();
    save_matrix(&matrix_path, &vocabulary, &data)?;
    vocabulary.save_terms(config.output.vocabulary_csv_path())?;
    info!(path = %matrix_path.display(), "feature matrix written");
    Ok((vocabulary, data))
}

/// Run stratified k-fold cross-validation with the configured settings.
pub fn cross_validate<T: Trainer>(
    config: &Config,
    trainer: &T,
    data: &Dataset,
) -> Result<CrossValidationReport> {
    let mut splitter = StratifiedKFold::new(config.validation.folds);
    if config.validation.shuffle {
        splitter = splitter.with_shuffle(config.validation.seed);
    }
    CrossValidator::new(splitter)
        .fail_fast(config.validation.fail_fast)
        .run(trainer, data)
}

/// Cross-validate, fit the final model on all data and save it.
///
/// Reads the matrix written by the vectorize stage, building it first if it
/// does not exist yet.
pub fn train_model(config: &Config, options: TrainOptions) -> Result<TrainedPipeline> {
    let mut config = config.clone();
    if let Some(folds) = options.folds {
        config.validation.folds = folds;
        config.validate().stage("train")?;
        info!(folds, "fold count overridden on the command line");
    }

    let matrix_path = config.output.matrix_path();
    let (vocabulary, data) = if matrix_path.exists() {
        info!(path = %matrix_path.display(), "loading feature matrix");
        load_matrix(&matrix_path, config.classes().stage("train")?).stage("train")?
    } else {
        info!("feature matrix not found, running vectorize first");
        run_vectorize(&config)?
    };

    print_training_header(&config, &vocabulary, &data);

    let trainer = MultinomialNaiveBayes::new(config.model.alpha);
    let start = Instant::now();
    let report = cross_validate(&config, &trainer, &data).stage("train")?;
    print_results(&report, data.classes()).stage("train")?;
    info!(
        secs = start.elapsed().as_secs_f64(),
        partial = report.is_partial(),
        "cross-validation finished"
    );

    let model = trainer.train(&data).stage("train")?;
    save_artifacts(&config.output, &vocabulary, data.classes(), &model).stage("save")?;

    let classes = data.classes().clone();
    Ok(TrainedPipeline {
        vocabulary,
        classes,
        model,
        report,
    })
}

fn print_training_header(config: &Config, vocabulary: &Vocabulary, data: &Dataset) {
    println!("\n{RULE}");
    println!("  Fake News Classifier: Multinomial Naive Bayes");
    println!("{RULE}\n");

    println!("Configuration:");
    println!("  Documents: {}", data.len());
    println!("  Vocabulary: {} terms", vocabulary.len());
    let counts = data.class_counts();
    for (label, count) in data.classes().iter().zip(counts) {
        println!("  Class {label}: {count} documents");
    }
    println!("  Folds: {}", config.validation.folds);
    if config.validation.shuffle {
        println!("  Shuffle seed: {}", config.validation.seed);
    }
    println!("  Smoothing (alpha): {}\n", config.model.alpha);
}
