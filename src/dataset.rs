//! Labeled datasets: feature vectors bound to class indices.

use crate::encoder::FeatureVector;
use crate::error::{PipelineError, Result};
use crate::vocab::Vocabulary;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The fixed class table of a run. Class `i` is row/column `i` of every
/// confusion matrix produced for the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Classes {
    labels: IndexSet<String>,
}

impl Classes {
    /// Explicit class order. Fails on empty or repeated labels.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for label in labels {
            let label: String = label.into();
            if label.is_empty() {
                return Err(PipelineError::InvalidDataset("empty class label".into()));
            }
            if !set.insert(label.clone()) {
                return Err(PipelineError::InvalidDataset(format!(
                    "duplicate class label `{label}`"
                )));
            }
        }
        Ok(Classes { labels: set })
    }

    /// Classes in the order they first appear; empty labels are skipped.
    pub fn discover<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = IndexSet::new();
        for label in labels {
            let label = label.as_ref();
            if !label.is_empty() && !set.contains(label) {
                set.insert(label.to_string());
            }
        }
        Classes { labels: set }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get_index(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Classes {
    type Error = PipelineError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        Classes::from_labels(labels)
    }
}

impl From<Classes> for Vec<String> {
    fn from(classes: Classes) -> Self {
        classes.labels.into_iter().collect()
    }
}

/// One encoded document and its class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    pub features: FeatureVector,
    pub label: usize,
}

/// Ordered examples that all share one vocabulary and one class table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    dimension: usize,
    classes: Classes,
    examples: Vec<LabeledExample>,
}

impl Dataset {
    /// Empty dataset of the given dimension.
    pub fn new(dimension: usize, classes: Classes) -> Self {
        Dataset {
            dimension,
            classes,
            examples: Vec::new(),
        }
    }

    /// Bind `vectors[i]` to `labels[i]`, keeping input order.
    ///
    /// Every record contributes exactly one example. Count mismatches, empty
    /// labels, labels outside `classes` and vectors whose length differs from
    /// the vocabulary are all rejected.
    pub fn assemble<S: AsRef<str>>(
        vocabulary: &Vocabulary,
        vectors: Vec<FeatureVector>,
        labels: &[S],
        classes: Classes,
    ) -> Result<Self> {
        if vectors.len() != labels.len() {
            return Err(PipelineError::InvalidDataset(format!(
                "{} feature vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }

        let mut dataset = Dataset::new(vocabulary.len(), classes);
        dataset.examples.reserve(vectors.len());
        for (record, (features, label)) in vectors.into_iter().zip(labels).enumerate() {
            let label = label.as_ref();
            if label.is_empty() {
                return Err(PipelineError::DataIntegrity {
                    record,
                    reason: "missing label".into(),
                });
            }
            let class = dataset
                .classes
                .index_of(label)
                .ok_or_else(|| PipelineError::UnknownClass(label.to_string()))?;
            dataset.push(features, class)?;
        }
        Ok(dataset)
    }

    /// Append one example.
    pub fn push(&mut self, features: FeatureVector, label: usize) -> Result<()> {
        if features.len() != self.dimension {
            return Err(PipelineError::VocabularyMismatch {
                expected: self.dimension,
                actual: features.len(),
            });
        }
        if label >= self.classes.len() {
            return Err(PipelineError::UnknownClass(format!("#{label}")));
        }
        self.examples.push(LabeledExample { features, label });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Length shared by every feature vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    /// Class index of every example, in order.
    pub fn labels(&self) -> Vec<usize> {
        self.examples.iter().map(|e| e.label).collect()
    }

    /// Number of examples per class.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for example in &self.examples {
            counts[example.label] += 1;
        }
        counts
    }

    /// Copy of the examples at `indices`, in the order given.
    pub fn subset(&self, indices: &[usize]) -> Result<Dataset> {
        let mut examples = Vec::with_capacity(indices.len());
        for &i in indices {
            let example = self.examples.get(i).ok_or_else(|| {
                PipelineError::InvalidDataset(format!(
                    "index {i} out of range for dataset of {}",
                    self.examples.len()
                ))
            })?;
            examples.push(example.clone());
        }
        Ok(Dataset {
            dimension: self.dimension,
            classes: self.classes.clone(),
            examples,
        })
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::BowEncoder;
    use crate::normalize::NormalizedDocument;

    fn corpus() -> (Vec<NormalizedDocument>, Vec<&'static str>) {
        let docs = vec![
            NormalizedDocument::from_normalized_text("fake news title", "some fake text"),
            NormalizedDocument::from_normalized_text("true news title", "some true text"),
        ];
        (docs, vec!["fake", "true"])
    }

    #[test]
    fn test_assemble_two_row_matrix() {
        let (docs, labels) = corpus();
        let vocab = Vocabulary::build(&docs);
        assert!(vocab.contains("fake"));
        assert!(vocab.contains("true"));

        let vectors = BowEncoder::new(&vocab).encode_corpus(&docs);
        let classes = Classes::discover(&labels);
        let data = Dataset::assemble(&vocab, vectors, &labels, classes).unwrap();

        assert_eq!(data.len(), 2);
        for example in &data {
            let own = data.classes().label(example.label).unwrap();
            let col = vocab.index_of(own).unwrap();
            assert!(example.features.get(col).unwrap() >= 1);
            assert_eq!(example.features.len(), vocab.len());
        }
        assert_eq!(data.labels(), vec![0, 1]);
    }

    #[test]
    fn test_assemble_rejects_count_mismatch() {
        let (docs, _) = corpus();
        let vocab = Vocabulary::build(&docs);
        let vectors = BowEncoder::new(&vocab).encode_corpus(&docs);
        let classes = Classes::from_labels(["fake", "true"]).unwrap();

        let err = Dataset::assemble(&vocab, vectors, &["fake"], classes).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDataset(_)));
    }

    #[test]
    fn test_assemble_rejects_unknown_and_missing_labels() {
        let (docs, _) = corpus();
        let vocab = Vocabulary::build(&docs);
        let encoder = BowEncoder::new(&vocab);
        let classes = Classes::from_labels(["fake", "true"]).unwrap();

        let err = Dataset::assemble(
            &vocab,
            encoder.encode_corpus(&docs),
            &["fake", "satire"],
            classes.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownClass(ref l) if l == "satire"));

        let err =
            Dataset::assemble(&vocab, encoder.encode_corpus(&docs), &["fake", ""], classes)
                .unwrap_err();
        assert!(matches!(err, PipelineError::DataIntegrity { record: 1, .. }));
    }

    #[test]
    fn test_push_rejects_wrong_length() {
        let classes = Classes::from_labels(["a", "b"]).unwrap();
        let mut data = Dataset::new(3, classes);
        let err = data.push(FeatureVector::zeros(2), 0).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::VocabularyMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(data.push(FeatureVector::zeros(3), 2).is_err());
        assert!(data.push(FeatureVector::zeros(3), 1).is_ok());
    }

    #[test]
    fn test_empty_vocabulary_dataset() {
        let vocab = Vocabulary::default();
        let classes = Classes::from_labels(["a"]).unwrap();
        let vectors = vec![FeatureVector::zeros(0), FeatureVector::zeros(0)];
        let data = Dataset::assemble(&vocab, vectors, &["a", "a"], classes).unwrap();
        assert_eq!(data.dimension(), 0);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_subset_and_class_counts() {
        let classes = Classes::from_labels(["a", "b"]).unwrap();
        let mut data = Dataset::new(1, classes);
        for (i, label) in [0, 1, 0, 0].into_iter().enumerate() {
            data.push(FeatureVector::from_counts(vec![i as u32]), label)
                .unwrap();
        }
        assert_eq!(data.class_counts(), vec![3, 1]);

        let sub = data.subset(&[3, 1]).unwrap();
        assert_eq!(sub.labels(), vec![0, 1]);
        assert_eq!(sub.examples()[0].features.counts(), &[3]);
        assert!(data.subset(&[9]).is_err());
    }

    #[test]
    fn test_classes_discover_first_seen() {
        let classes = Classes::discover(["true", "fake", "true", ""]);
        assert_eq!(classes.iter().collect::<Vec<_>>(), vec!["true", "fake"]);
        assert!(Classes::from_labels(["x", "x"]).is_err());
    }
}
