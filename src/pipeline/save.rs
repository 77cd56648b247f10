//! Persistence of trained artifacts.

use super::config::OutputConfig;
use crate::classifier::Model;
use crate::dataset::Classes;
use crate::error::{PipelineError, Result};
use crate::naive_bayes::NaiveBayesModel;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A trained model together with the class table its indices refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub classes: Classes,
    pub model: NaiveBayesModel,
}

/// Save the vocabulary and model to the configured output directory.
///
/// Writes two JSON files, the frozen vocabulary and the model with its
/// class table, creating `model_dir` when needed.
pub fn save_artifacts(
    output: &OutputConfig,
    vocabulary: &Vocabulary,
    classes: &Classes,
    model: &NaiveBayesModel,
) -> Result<()> {
    std::fs::create_dir_all(&output.model_dir)?;

    let vocabulary_path = output.vocabulary_path();
    let model_path = output.model_path();

    vocabulary.save(&vocabulary_path)?;
    let saved = SavedModel {
        classes: classes.clone(),
        model: model.clone(),
    };
    std::fs::write(&model_path, serde_json::to_string_pretty(&saved)?)?;

    info!(
        vocabulary = %vocabulary_path.display(),
        model = %model_path.display(),
        "model saved"
    );
    println!("Model saved:");
    println!("  - {}", vocabulary_path.display());
    println!("  - {}", model_path.display());

    Ok(())
}

/// Load what [`save_artifacts`] wrote and check the pieces fit together.
pub fn load_artifacts(output: &OutputConfig) -> Result<(Vocabulary, SavedModel)> {
    let vocabulary = Vocabulary::load(output.vocabulary_path())?;
    let json = std::fs::read_to_string(output.model_path())?;
    let saved: SavedModel = serde_json::from_str(&json)?;
    saved.model.validate()?;

    if saved.model.dimension() != vocabulary.len() {
        return Err(PipelineError::VocabularyMismatch {
            expected: saved.model.dimension(),
            actual: vocabulary.len(),
        });
    }
    if saved.model.num_classes() != saved.classes.len() {
        return Err(PipelineError::InvalidDataset(format!(
            "model predicts {} classes but the class table has {}",
            saved.model.num_classes(),
            saved.classes.len()
        )));
    }
    info!(
        terms = vocabulary.len(),
        classes = saved.classes.len(),
        "model loaded"
    );

    Ok((vocabulary, saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Trainer;
    use crate::dataset::Dataset;
    use crate::encoder::FeatureVector;
    use crate::naive_bayes::MultinomialNaiveBayes;

    fn trained() -> (Vocabulary, Classes, NaiveBayesModel) {
        let vocabulary = Vocabulary::from_terms(["hoax", "senate"]).unwrap();
        let classes = Classes::from_labels(["fake", "true"]).unwrap();
        let mut data = Dataset::new(2, classes.clone());
        data.push(FeatureVector::from_counts(vec![2, 0]), 0).unwrap();
        data.push(FeatureVector::from_counts(vec![0, 2]), 1).unwrap();
        let model = MultinomialNaiveBayes::default().train(&data).unwrap();
        (vocabulary, classes, model)
    }

    #[test]
    fn test_save_and_load_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            model_dir: dir.path().join("models").to_string_lossy().into_owned(),
            ..OutputConfig::default()
        };
        let (vocabulary, classes, model) = trained();
        save_artifacts(&output, &vocabulary, &classes, &model).unwrap();

        let (loaded_vocab, saved) = load_artifacts(&output).unwrap();
        assert_eq!(loaded_vocab, vocabulary);
        assert_eq!(saved.classes, classes);
        let v = FeatureVector::from_counts(vec![1, 3]);
        assert_eq!(saved.model.predict(&v).unwrap(), model.predict(&v).unwrap());
        assert_eq!(saved.model.dimension(), 2);
    }

    #[test]
    fn test_load_rejects_mismatched_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            model_dir: dir.path().to_string_lossy().into_owned(),
            ..OutputConfig::default()
        };
        let (_, classes, model) = trained();
        let bigger = Vocabulary::from_terms(["hoax", "senate", "vote"]).unwrap();
        save_artifacts(&output, &bigger, &classes, &model).unwrap();

        assert!(matches!(
            load_artifacts(&output),
            Err(PipelineError::VocabularyMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_load_rejects_truncated_likelihoods() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            model_dir: dir.path().to_string_lossy().into_owned(),
            ..OutputConfig::default()
        };
        let (vocabulary, classes, model) = trained();
        save_artifacts(&output, &vocabulary, &classes, &model).unwrap();

        let truncated = serde_json::json!({
            "classes": classes,
            "model": {
                "dimension": 2,
                "log_priors": [-0.69, -0.69],
                "log_likelihoods": [[-0.5], [-0.5]],
            },
        });
        std::fs::write(output.model_path(), truncated.to_string()).unwrap();

        assert!(matches!(
            load_artifacts(&output),
            Err(PipelineError::InvalidDataset(_))
        ));
    }
}
