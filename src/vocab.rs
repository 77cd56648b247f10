//! Vocabulary: the frozen term ↔ column index mapping.
//!
//! Indices are assigned in the order terms are first seen during a single pass
//! over the corpus. That order is stable for a given corpus but carries no
//! meaning (it is neither alphabetical nor frequency based).
//!
//! A [`Vocabulary`] has no mutating methods. New terms can only be added
//! through a [`VocabularyBuilder`], which is consumed by
//! [`VocabularyBuilder::finish`].

use crate::error::{PipelineError, Result};
use crate::normalize::{whitespace_tokens, NormalizedDocument};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Ordered, deduplicated set of terms with O(1) term → index lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: IndexSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from a corpus, visiting every document once.
    pub fn build<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedDocument>,
    {
        let mut builder = VocabularyBuilder::new();
        for doc in corpus {
            builder.add_document(doc);
        }
        builder.finish()
    }

    /// Rebuild a vocabulary from an explicit term list, keeping its order.
    ///
    /// Fails on empty or duplicate terms, since either would break the
    /// one-column-per-term layout.
    pub fn from_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for term in terms {
            let term: String = term.into();
            if term.is_empty() {
                return Err(PipelineError::InvalidDataset(format!(
                    "empty term at column {}",
                    set.len()
                )));
            }
            if !set.insert(term.clone()) {
                return Err(PipelineError::InvalidDataset(format!(
                    "duplicate vocabulary term `{term}`"
                )));
            }
        }
        Ok(Vocabulary { terms: set })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of `term`, if it is known.
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Term at column `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(String::as_str)
    }

    /// Terms in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Write the terms one per line, in column order.
    pub fn write_terms<W: Write>(&self, mut writer: W) -> Result<()> {
        for term in &self.terms {
            writeln!(writer, "{term}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the term list as a plain text file, one term per line.
    pub fn save_terms<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_terms(std::io::BufWriter::new(file))
    }

    /// Save the vocabulary to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a vocabulary from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = PipelineError;

    fn try_from(terms: Vec<String>) -> Result<Self> {
        Vocabulary::from_terms(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms.into_iter().collect()
    }
}

/// Collects terms for a [`Vocabulary`].
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    terms: IndexSet<String>,
    documents: usize,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every token of a document (title, then body).
    pub fn add_document(&mut self, doc: &NormalizedDocument) {
        for token in doc.tokens() {
            self.add_text(token);
        }
        self.documents += 1;
    }

    /// Add the whitespace-separated, lowercased tokens of `text`.
    pub fn add_text(&mut self, text: &str) {
        for token in whitespace_tokens(text) {
            self.terms.insert(token);
        }
    }

    /// Number of documents added so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Freeze the vocabulary.
    pub fn finish(self) -> Vocabulary {
        Vocabulary { terms: self.terms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn doc(title: &str, body: &str) -> NormalizedDocument {
        NormalizedDocument::from_normalized_text(title, body)
    }

    #[test]
    fn test_first_seen_order() {
        let corpus = vec![doc("fake news title", "some fake text"), doc("true news", "text")];
        let vocab = Vocabulary::build(&corpus);

        let terms: Vec<&str> = vocab.iter().collect();
        assert_eq!(terms, vec!["fake", "news", "title", "some", "text", "true"]);
        assert_eq!(vocab.index_of("fake"), Some(0));
        assert_eq!(vocab.index_of("true"), Some(5));
        assert_eq!(vocab.index_of("missing"), None);
    }

    #[test]
    fn test_size_equals_distinct_tokens() {
        let corpus = vec![
            doc("Breaking News", "the senate votes today"),
            doc("breaking", "SENATE   votes again"),
            doc("", ""),
        ];
        let vocab = Vocabulary::build(&corpus);

        let distinct: HashSet<String> = corpus
            .iter()
            .flat_map(|d| d.tokens().map(str::to_lowercase).collect::<Vec<_>>())
            .collect();
        assert_eq!(vocab.len(), distinct.len());
    }

    #[test]
    fn test_term_set_is_order_independent() {
        let a = doc("alpha beta", "gamma");
        let b = doc("delta", "beta epsilon");
        let forward = Vocabulary::build([&a, &b]);
        let backward = Vocabulary::build([&b, &a]);

        let f: HashSet<&str> = forward.iter().collect();
        let g: HashSet<&str> = backward.iter().collect();
        assert_eq!(f, g);
    }

    #[test]
    fn test_empty_corpus() {
        let vocab = Vocabulary::build(std::iter::empty());
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
    }

    #[test]
    fn test_from_terms_rejects_duplicates() {
        assert!(Vocabulary::from_terms(["a", "b", "c"]).is_ok());
        let err = Vocabulary::from_terms(["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDataset(_)));
        assert!(Vocabulary::from_terms(["a", ""]).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let vocab = Vocabulary::from_terms(["zeta", "alpha", "mu"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");

        vocab.save(&path).unwrap();
        let loaded = Vocabulary::load(&path).unwrap();
        assert_eq!(loaded, vocab);
        assert_eq!(loaded.term(0), Some("zeta"));
    }

    #[test]
    fn test_json_with_duplicates_is_rejected() {
        let err = serde_json::from_str::<Vocabulary>(r#"["a", "b", "a"]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_write_terms() {
        let vocab = Vocabulary::from_terms(["fake", "true"]).unwrap();
        let mut out = Vec::new();
        vocab.write_terms(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "fake\ntrue\n");
    }
}
