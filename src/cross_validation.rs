//! Stratified k-fold cross-validation.
//!
//! # Stratification policy
//!
//! Examples are grouped by class (class-index order, dataset order inside a
//! class, optionally shuffled with a fixed seed) and the grouped sequence is
//! dealt round-robin over the k folds. As a result:
//!
//! - fold sizes differ by at most one,
//! - for every class, its count in any two folds differs by at most one,
//! - every fold is non-empty whenever `k <= n`.
//!
//! Each fold keeps its examples in dataset order.

use crate::classifier::{Model, Trainer};
use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::metrics::{ConfusionMatrix, Metric};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// k disjoint groups of example indices covering a whole dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPartition {
    folds: Vec<Vec<usize>>,
}

impl FoldPartition {
    /// Number of folds.
    pub fn k(&self) -> usize {
        self.folds.len()
    }

    /// Held-out indices of fold `f`.
    pub fn test_indices(&self, f: usize) -> &[usize] {
        &self.folds[f]
    }

    /// Indices of every fold except `f`, in dataset order.
    pub fn train_indices(&self, f: usize) -> Vec<usize> {
        let mut train: Vec<usize> = self
            .folds
            .iter()
            .enumerate()
            .filter(|&(g, _)| g != f)
            .flat_map(|(_, fold)| fold.iter().copied())
            .collect();
        train.sort_unstable();
        train
    }

    pub fn folds(&self) -> &[Vec<usize>] {
        &self.folds
    }
}

/// Splits class labels into stratified folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    k: usize,
    shuffle: bool,
    seed: u64,
}

impl StratifiedKFold {
    /// Deterministic, unshuffled splitter with `k` folds.
    pub fn new(k: usize) -> Self {
        StratifiedKFold {
            k,
            shuffle: false,
            seed: 0,
        }
    }

    /// Shuffle within each class using a seeded generator before dealing.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Partition `labels` (one class index per example).
    pub fn partition(&self, labels: &[usize]) -> Result<FoldPartition> {
        let n = labels.len();
        if self.k < 2 {
            return Err(PipelineError::InvalidFoldConfiguration(format!(
                "at least 2 folds are required, got {}",
                self.k
            )));
        }
        if n < self.k {
            return Err(PipelineError::InvalidFoldConfiguration(format!(
                "{} folds requested but the dataset has only {n} examples",
                self.k
            )));
        }

        let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
        let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for (i, &label) in labels.iter().enumerate() {
            by_class[label].push(i);
        }

        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed);
            for members in &mut by_class {
                members.shuffle(&mut rng);
            }
        }

        let mut folds = vec![Vec::with_capacity(n / self.k + 1); self.k];
        for (slot, index) in by_class.into_iter().flatten().enumerate() {
            folds[slot % self.k].push(index);
        }
        for fold in &mut folds {
            fold.sort_unstable();
        }

        if let Some(f) = folds.iter().position(|fold| fold.is_empty()) {
            return Err(PipelineError::InvalidFoldConfiguration(format!(
                "fold {} would be empty",
                f + 1
            )));
        }
        if let Some(f) = folds.iter().position(|fold| fold.len() == n) {
            return Err(PipelineError::InvalidFoldConfiguration(format!(
                "training set for fold {} would be empty",
                f + 1
            )));
        }

        Ok(FoldPartition { folds })
    }
}

/// Outcome of one successfully evaluated fold.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldResult {
    /// Zero-based fold index.
    pub fold: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub matrix: ConfusionMatrix,
    pub accuracy: Metric,
}

/// A fold whose training or evaluation failed.
#[derive(Debug)]
pub struct FoldFailure {
    pub fold: usize,
    pub error: PipelineError,
}

/// Everything a cross-validation run produced.
#[derive(Debug)]
pub struct CrossValidationReport {
    pub folds: Vec<FoldResult>,
    pub failures: Vec<FoldFailure>,
    /// Element-wise sum of every successful fold's matrix.
    pub cumulative: ConfusionMatrix,
    /// Size of the dataset that was partitioned.
    pub examples: usize,
}

impl CrossValidationReport {
    /// True when at least one fold failed, so the aggregate does not cover
    /// the whole dataset.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn fold_accuracies(&self) -> Vec<Metric> {
        self.folds.iter().map(|f| f.accuracy).collect()
    }

    /// Mean of the per-fold accuracies.
    pub fn mean_fold_accuracy(&self) -> Metric {
        Metric::mean(self.fold_accuracies())
    }

    /// Accuracy of the cumulative matrix.
    pub fn accuracy(&self) -> Metric {
        self.cumulative.accuracy()
    }

    /// Number of examples that were actually evaluated.
    pub fn evaluated(&self) -> u64 {
        self.cumulative.total()
    }
}

/// Runs a [`Trainer`] through every fold of a [`StratifiedKFold`] partition.
///
/// Folds are processed one after another; only one model exists at a time and
/// it is dropped as soon as its fold has been scored.
#[derive(Debug, Clone, Copy)]
pub struct CrossValidator {
    splitter: StratifiedKFold,
    fail_fast: bool,
}

impl CrossValidator {
    pub fn new(splitter: StratifiedKFold) -> Self {
        CrossValidator {
            splitter,
            fail_fast: false,
        }
    }

    /// Return the first fold error instead of recording it and moving on.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn run<T: Trainer>(&self, trainer: &T, data: &Dataset) -> Result<CrossValidationReport> {
        // Validate the fold layout before any training starts.
        let partition = self.splitter.partition(&data.labels())?;
        let k = partition.k();
        info!(folds = k, examples = data.len(), "starting cross-validation");

        let mut report = CrossValidationReport {
            folds: Vec::with_capacity(k),
            failures: Vec::new(),
            cumulative: ConfusionMatrix::new(data.classes().len()),
            examples: data.len(),
        };

        for fold in 0..k {
            let train_idx = partition.train_indices(fold);
            let test_idx = partition.test_indices(fold);

            match run_fold(trainer, data, &train_idx, test_idx) {
                Ok(matrix) => {
                    report.cumulative.merge(&matrix)?;
                    let accuracy = matrix.accuracy();
                    debug!(fold = fold + 1, %accuracy, "fold evaluated");
                    report.folds.push(FoldResult {
                        fold,
                        train_size: train_idx.len(),
                        test_size: test_idx.len(),
                        matrix,
                        accuracy,
                    });
                }
                Err(error) if self.fail_fast => return Err(error),
                Err(error) => {
                    warn!(fold = fold + 1, %error, "fold failed, continuing");
                    report.failures.push(FoldFailure { fold, error });
                }
            }
        }

        if report.is_partial() {
            warn!(
                failed = report.failures.len(),
                folds = k,
                "cross-validation results are partial"
            );
        }
        Ok(report)
    }
}

fn run_fold<T: Trainer>(
    trainer: &T,
    data: &Dataset,
    train_idx: &[usize],
    test_idx: &[usize],
) -> Result<ConfusionMatrix> {
    let train = data.subset(train_idx)?;
    let test = data.subset(test_idx)?;
    let model = trainer.train(&train)?;
    model.evaluate(&test)
}
