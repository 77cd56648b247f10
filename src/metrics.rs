//! Confusion matrices and the metrics derived from them.
//!
//! A ratio with a zero denominator is [`Metric::Undefined`], never a silent
//! `0.0` or `NaN`, so callers can tell "computed as zero" from "could not be
//! computed".

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived ratio that may be undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Defined(f64),
    Undefined,
}

impl Metric {
    /// `numerator / denominator`, or `Undefined` when the denominator is zero.
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Metric::Undefined
        } else {
            Metric::Defined(numerator as f64 / denominator as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Defined(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Metric::Defined(_))
    }

    /// The value, or [`PipelineError::UndefinedMetric`] naming the metric.
    pub fn require(self, name: &'static str) -> Result<f64> {
        self.value().ok_or(PipelineError::UndefinedMetric(name))
    }

    /// Harmonic mean of precision and recall. Undefined when either input is
    /// undefined or both are zero.
    pub fn f1(precision: Metric, recall: Metric) -> Metric {
        match (precision, recall) {
            (Metric::Defined(p), Metric::Defined(r)) if p + r > 0.0 => {
                Metric::Defined(2.0 * p * r / (p + r))
            }
            _ => Metric::Undefined,
        }
    }

    /// Mean of the defined values; undefined if there are none.
    pub fn mean<I: IntoIterator<Item = Metric>>(metrics: I) -> Metric {
        let (sum, n) = metrics
            .into_iter()
            .filter_map(Metric::value)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if n == 0 {
            Metric::Undefined
        } else {
            Metric::Defined(sum / n as f64)
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Metric::Undefined => f.write_str("undefined"),
        }
    }
}

/// Square matrix of true class (row) × predicted class (column) counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    n_classes: usize,
    cells: Vec<u64>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        ConfusionMatrix {
            n_classes,
            cells: vec![0; n_classes * n_classes],
        }
    }

    /// Build from rows; every row must have as many cells as there are rows.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(PipelineError::InvalidDataset(format!(
                    "confusion matrix row {i} has {} cells, expected {n}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(ConfusionMatrix {
            n_classes: n,
            cells,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.n_classes
    }

    /// Count of examples of class `actual` predicted as `predicted`.
    pub fn get(&self, actual: usize, predicted: usize) -> u64 {
        if actual >= self.n_classes || predicted >= self.n_classes {
            return 0;
        }
        self.cells[actual * self.n_classes + predicted]
    }

    pub fn row(&self, actual: usize) -> &[u64] {
        let start = actual * self.n_classes;
        &self.cells[start..start + self.n_classes]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        // chunks(0) panics, so an empty matrix yields no rows
        self.cells.chunks(self.n_classes.max(1))
    }

    /// Count one prediction.
    pub fn record(&mut self, actual: usize, predicted: usize) -> Result<()> {
        if actual >= self.n_classes || predicted >= self.n_classes {
            return Err(PipelineError::UnknownClass(format!(
                "#{} (matrix has {} classes)",
                actual.max(predicted),
                self.n_classes
            )));
        }
        self.cells[actual * self.n_classes + predicted] += 1;
        Ok(())
    }

    /// Element-wise sum of `other` into `self`. Shapes must match.
    pub fn merge(&mut self, other: &ConfusionMatrix) -> Result<()> {
        if other.n_classes != self.n_classes {
            return Err(PipelineError::InvalidDataset(format!(
                "cannot add a {0}x{0} confusion matrix to a {1}x{1} one",
                other.n_classes, self.n_classes
            )));
        }
        for (cell, add) in self.cells.iter_mut().zip(&other.cells) {
            *cell += add;
        }
        Ok(())
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> u64 {
        (0..self.n_classes).map(|i| self.get(i, i)).sum()
    }

    /// Diagonal sum over total.
    pub fn accuracy(&self) -> Metric {
        Metric::ratio(self.correct(), self.total())
    }

    /// One-vs-rest metrics for `class`.
    pub fn class_metrics(&self, class: usize) -> ClassMetrics {
        let true_positives = self.get(class, class);
        let predicted: u64 = (0..self.n_classes).map(|i| self.get(i, class)).sum();
        let actual: u64 = (0..self.n_classes).map(|j| self.get(class, j)).sum();
        let precision = Metric::ratio(true_positives, predicted);
        let recall = Metric::ratio(true_positives, actual);

        ClassMetrics {
            class,
            true_positives,
            false_positives: predicted - true_positives,
            false_negatives: actual - true_positives,
            precision,
            recall,
            f1: Metric::f1(precision, recall),
        }
    }

    /// One-vs-rest metrics for every class.
    pub fn per_class(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes).map(|c| self.class_metrics(c)).collect()
    }

    /// Binary metrics with class 0 as the positive class and class 1 as the
    /// negative class. Fails unless the matrix is exactly 2×2.
    pub fn binary(&self) -> Result<BinaryMetrics> {
        if self.n_classes != 2 {
            return Err(PipelineError::InvalidDataset(format!(
                "binary metrics need exactly 2 classes, found {}",
                self.n_classes
            )));
        }
        let positive = self.class_metrics(0);
        Ok(BinaryMetrics {
            true_positives: self.get(0, 0),
            true_negatives: self.get(1, 1),
            false_positives: self.get(1, 0),
            false_negatives: self.get(0, 1),
            accuracy: self.accuracy(),
            precision: positive.precision,
            recall: positive.recall,
            f1: positive.f1,
        })
    }
}

/// One-vs-rest counts and ratios for a single class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub class: usize,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub precision: Metric,
    pub recall: Metric,
    pub f1: Metric,
}

/// Summary of a 2×2 matrix, positive class at index 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryMetrics {
    pub true_positives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub accuracy: Metric,
    pub precision: Metric,
    pub recall: Metric,
    pub f1: Metric,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_range(m: Metric) -> bool {
        m.value().map_or(true, |v| (0.0..=1.0).contains(&v))
    }

    #[test]
    fn test_record_and_accuracy() {
        let mut m = ConfusionMatrix::new(2);
        m.record(0, 0).unwrap();
        m.record(0, 1).unwrap();
        m.record(1, 1).unwrap();
        m.record(1, 1).unwrap();

        assert_eq!(m.total(), 4);
        assert_eq!(m.correct(), 3);
        assert_eq!(m.accuracy(), Metric::Defined(0.75));
        assert!(m.record(2, 0).is_err());
    }

    #[test]
    fn test_binary_metrics() {
        // 40 TP, 10 FN, 5 FP, 45 TN
        let m = ConfusionMatrix::from_rows(vec![vec![40, 10], vec![5, 45]]).unwrap();
        let b = m.binary().unwrap();

        assert_eq!(b.true_positives, 40);
        assert_eq!(b.false_negatives, 10);
        assert_eq!(b.false_positives, 5);
        assert_eq!(b.true_negatives, 45);
        assert_eq!(b.accuracy, Metric::Defined(0.85));
        let p = b.precision.value().unwrap();
        let r = b.recall.value().unwrap();
        assert!((p - 40.0 / 45.0).abs() < 1e-12);
        assert!((r - 0.8).abs() < 1e-12);
        let f1 = b.f1.value().unwrap();
        assert!((f1 - 2.0 * p * r / (p + r)).abs() < 1e-12);
    }

    #[test]
    fn test_no_predicted_positives_is_undefined() {
        let m = ConfusionMatrix::from_rows(vec![vec![0, 3], vec![0, 7]]).unwrap();
        let b = m.binary().unwrap();

        assert_eq!(b.precision, Metric::Undefined);
        assert_eq!(b.recall, Metric::Defined(0.0));
        assert_eq!(b.f1, Metric::Undefined);
        assert!(matches!(
            b.precision.require("precision"),
            Err(PipelineError::UndefinedMetric("precision"))
        ));
    }

    #[test]
    fn test_zero_precision_and_recall_makes_f1_undefined() {
        let m = ConfusionMatrix::from_rows(vec![vec![0, 4], vec![6, 0]]).unwrap();
        let b = m.binary().unwrap();
        assert_eq!(b.precision, Metric::Defined(0.0));
        assert_eq!(b.recall, Metric::Defined(0.0));
        assert_eq!(b.f1, Metric::Undefined);
        assert_eq!(b.accuracy, Metric::Defined(0.0));
    }

    #[test]
    fn test_binary_requires_two_classes() {
        assert!(ConfusionMatrix::new(3).binary().is_err());
        assert!(ConfusionMatrix::new(1).binary().is_err());
    }

    #[test]
    fn test_empty_matrix_accuracy_is_undefined() {
        assert_eq!(ConfusionMatrix::new(2).accuracy(), Metric::Undefined);
        assert_eq!(ConfusionMatrix::new(0).rows().count(), 0);
    }

    #[test]
    fn test_per_class_metrics_in_range() {
        let m = ConfusionMatrix::from_rows(vec![
            vec![5, 1, 0],
            vec![2, 3, 1],
            vec![0, 0, 0],
        ])
        .unwrap();
        for cm in m.per_class() {
            assert!(in_unit_range(cm.precision));
            assert!(in_unit_range(cm.recall));
            assert!(in_unit_range(cm.f1));
        }
        let third = m.class_metrics(2);
        assert_eq!(third.recall, Metric::Undefined);
        assert_eq!(third.precision, Metric::Defined(0.0));
        assert_eq!(third.false_positives, 1);
        assert!(in_unit_range(m.accuracy()));
    }

    #[test]
    fn test_merge_sums_cells() {
        let mut total = ConfusionMatrix::new(2);
        let a = ConfusionMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = ConfusionMatrix::from_rows(vec![vec![10, 0], vec![0, 10]]).unwrap();
        total.merge(&a).unwrap();
        total.merge(&b).unwrap();

        assert_eq!(total.row(0), &[11, 2]);
        assert_eq!(total.row(1), &[3, 14]);
        assert_eq!(total.total(), a.total() + b.total());
        assert!(total.merge(&ConfusionMatrix::new(3)).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(ConfusionMatrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_display_and_mean() {
        assert_eq!(format!("{:.2}", Metric::Defined(0.12345)), "0.12");
        assert_eq!(format!("{:.2}", Metric::Undefined), "undefined");
        let mean = Metric::mean([Metric::Defined(0.5), Metric::Undefined, Metric::Defined(1.0)]);
        assert_eq!(mean, Metric::Defined(0.75));
        assert_eq!(Metric::mean(std::iter::empty()), Metric::Undefined);
    }
}
