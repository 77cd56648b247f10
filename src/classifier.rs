//! Classifier capability traits.
//!
//! The cross-validation harness and the prediction loop only see these traits,
//! so any model that can be trained from a [`Dataset`] and predict a class
//! index from a [`FeatureVector`] can be plugged in.

use crate::dataset::Dataset;
use crate::encoder::FeatureVector;
use crate::error::{PipelineError, Result};
use crate::metrics::ConfusionMatrix;

/// A trained model.
pub trait Model {
    /// Feature-vector length the model was trained on.
    fn dimension(&self) -> usize;

    /// Number of classes the model can predict.
    fn num_classes(&self) -> usize;

    /// Predict the class index of one vector.
    fn predict(&self, features: &FeatureVector) -> Result<usize>;

    /// Predict every example of `data` and tally a confusion matrix.
    fn evaluate(&self, data: &Dataset) -> Result<ConfusionMatrix> {
        if data.dimension() != self.dimension() {
            return Err(PipelineError::VocabularyMismatch {
                expected: self.dimension(),
                actual: data.dimension(),
            });
        }
        let mut matrix = ConfusionMatrix::new(data.classes().len());
        for example in data {
            let predicted = self.predict(&example.features)?;
            matrix.record(example.label, predicted)?;
        }
        Ok(matrix)
    }
}

/// Builds a fresh [`Model`] from a dataset.
///
/// `train` takes `&self` and returns an owned model, so every call starts
/// from scratch and nothing learned on one dataset leaks into the next.
pub trait Trainer {
    type Model: Model;

    fn train(&self, data: &Dataset) -> Result<Self::Model>;
}

/// Check that `features` can be fed to a model of `dimension` inputs.
pub fn check_dimension(dimension: usize, features: &FeatureVector) -> Result<()> {
    if features.len() == dimension {
        Ok(())
    } else {
        Err(PipelineError::VocabularyMismatch {
            expected: dimension,
            actual: features.len(),
        })
    }
}
