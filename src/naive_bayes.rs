//! Multinomial Naive Bayes over bag-of-words counts.
//!
//! Class priors and per-class term likelihoods are Laplace smoothed and kept in
//! log space. Prediction is an argmax over
//! `log P(c) + Σ count_i · log P(term_i | c)`; ties go to the lowest class
//! index, so an all-zero vector deterministically picks the class with the
//! most training examples.

use crate::classifier::{check_dimension, Model, Trainer};
use crate::dataset::Dataset;
use crate::encoder::FeatureVector;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trainer for [`NaiveBayesModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
}

impl MultinomialNaiveBayes {
    /// Trainer with additive smoothing `alpha` (1.0 = Laplace).
    pub fn new(alpha: f64) -> Self {
        MultinomialNaiveBayes { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for MultinomialNaiveBayes {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Trainer for MultinomialNaiveBayes {
    type Model = NaiveBayesModel;

    fn train(&self, data: &Dataset) -> Result<NaiveBayesModel> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(PipelineError::ClassifierTraining(format!(
                "smoothing must be a positive number, got {}",
                self.alpha
            )));
        }
        if data.is_empty() {
            return Err(PipelineError::ClassifierTraining(
                "training set is empty".into(),
            ));
        }
        let n_classes = data.classes().len();
        if n_classes == 0 {
            return Err(PipelineError::ClassifierTraining(
                "no classes to learn".into(),
            ));
        }

        let dimension = data.dimension();
        let mut doc_counts = vec![0u64; n_classes];
        let mut term_counts = vec![vec![0u64; dimension]; n_classes];
        let mut term_totals = vec![0u64; n_classes];

        for example in data {
            check_dimension(dimension, &example.features)?;
            doc_counts[example.label] += 1;
            for (i, count) in example.features.nonzero() {
                term_counts[example.label][i] += u64::from(count);
                term_totals[example.label] += u64::from(count);
            }
        }

        let n_docs = data.len() as f64;
        let log_priors = doc_counts
            .iter()
            .map(|&c| ((c as f64 + 1.0) / (n_docs + n_classes as f64)).ln())
            .collect();

        let vocab_mass = self.alpha * dimension as f64;
        let log_likelihoods = term_counts
            .iter()
            .zip(&term_totals)
            .map(|(counts, &total)| {
                let denom = total as f64 + vocab_mass;
                counts
                    .iter()
                    .map(|&c| ((c as f64 + self.alpha) / denom).ln())
                    .collect()
            })
            .collect();

        debug!(
            examples = data.len(),
            classes = n_classes,
            dimension,
            "trained naive bayes"
        );

        Ok(NaiveBayesModel {
            dimension,
            log_priors,
            log_likelihoods,
        })
    }
}

/// A trained multinomial Naive Bayes model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    dimension: usize,
    log_priors: Vec<f64>,
    log_likelihoods: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    /// Unnormalized log posterior of every class.
    pub fn log_scores(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        check_dimension(self.dimension, features)?;
        Ok(self
            .log_priors
            .iter()
            .zip(&self.log_likelihoods)
            .map(|(&prior, likelihoods)| {
                features
                    .nonzero()
                    .fold(prior, |acc, (i, c)| acc + f64::from(c) * likelihoods[i])
            })
            .collect())
    }

    /// Posterior probability of every class.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        Ok(softmax(&self.log_scores(features)?))
    }

    /// Check that the priors and likelihood rows agree with `dimension`.
    ///
    /// Models read from disk must pass this before they are used.
    pub fn validate(&self) -> Result<()> {
        if self.log_priors.is_empty() {
            return Err(PipelineError::InvalidDataset(
                "naive bayes model has no classes".into(),
            ));
        }
        if self.log_likelihoods.len() != self.log_priors.len() {
            return Err(PipelineError::InvalidDataset(format!(
                "naive bayes model has {} priors but {} likelihood rows",
                self.log_priors.len(),
                self.log_likelihoods.len()
            )));
        }
        if let Some((class, row)) = self
            .log_likelihoods
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.dimension)
        {
            return Err(PipelineError::InvalidDataset(format!(
                "likelihood row {class} has {} terms, expected {}",
                row.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

impl Model for NaiveBayesModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn num_classes(&self) -> usize {
        self.log_priors.len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let scores = self.log_scores(features)?;
        let mut best = 0;
        for (class, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = class;
            }
        }
        Ok(best)
    }
}

fn softmax(x: &[f64]) -> Vec<f64> {
    let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = x.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|&v| v / sum).collect()
}
