//! Bag-of-words encoding against a frozen [`Vocabulary`].
//!
//! Encoding is a pure function of the tokens and the vocabulary: every token
//! known to the vocabulary bumps the count in its column, unknown tokens are
//! skipped. The vocabulary is only borrowed, so encoding can never grow it.

use crate::normalize::NormalizedDocument;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};

/// Term counts aligned to vocabulary columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<u32>);

impl FeatureVector {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        FeatureVector(vec![0; len])
    }

    pub fn from_counts(counts: Vec<u32>) -> Self {
        FeatureVector(counts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// True when no vocabulary term occurred.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// `(column, count)` pairs for non-zero columns.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i, c))
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

/// Encodes token streams into [`FeatureVector`]s.
#[derive(Debug, Clone, Copy)]
pub struct BowEncoder<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> BowEncoder<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        BowEncoder { vocabulary }
    }

    /// Length of every vector this encoder produces.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    /// Encode a token stream. Tokens are lowercased and split on any
    /// whitespace they contain before lookup.
    pub fn encode_tokens<I, S>(&self, tokens: I) -> FeatureVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = vec![0u32; self.vocabulary.len()];
        for token in tokens {
            for piece in token.as_ref().split_whitespace() {
                if let Some(idx) = self.lookup(piece) {
                    counts[idx] = counts[idx].saturating_add(1);
                }
            }
        }
        FeatureVector(counts)
    }

    /// Encode a normalized document, title and body together.
    pub fn encode_document(&self, doc: &NormalizedDocument) -> FeatureVector {
        self.encode_tokens(doc.tokens())
    }

    /// Encode raw text by splitting it on whitespace.
    pub fn encode_text(&self, text: &str) -> FeatureVector {
        self.encode_tokens(std::iter::once(text))
    }

    /// Encode a corpus, keeping document order.
    pub fn encode_corpus(&self, corpus: &[NormalizedDocument]) -> Vec<FeatureVector> {
        corpus.iter().map(|doc| self.encode_document(doc)).collect()
    }

    #[inline]
    fn lookup(&self, token: &str) -> Option<usize> {
        if token.chars().any(char::is_uppercase) {
            self.vocabulary.index_of(&token.to_lowercase())
        } else {
            self.vocabulary.index_of(token)
        }
    }
}

/// Encode `tokens` against `vocabulary`.
pub fn encode<I, S>(tokens: I, vocabulary: &Vocabulary) -> FeatureVector
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    BowEncoder::new(vocabulary).encode_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_terms(["fake", "news", "title", "some", "text", "true"]).unwrap()
    }

    #[test]
    fn test_counts_known_tokens() {
        let vocab = vocab();
        let v = encode(["fake", "news", "fake", "FAKE"], &vocab);
        assert_eq!(v.counts(), &[3, 1, 0, 0, 0, 0]);
        assert_eq!(v.len(), vocab.len());
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let vocab = vocab();
        let tokens = ["fake", "unseen", "words", "text"];
        let v = encode(tokens, &vocab);

        let known = tokens.iter().filter(|t| vocab.contains(t)).count() as u64;
        assert_eq!(v.total(), known);
        assert_eq!(v.len(), 6);
        assert_eq!(vocab.len(), 6);
    }

    #[test]
    fn test_out_of_vocabulary_text_is_all_zero() {
        let vocab = vocab();
        let v = BowEncoder::new(&vocab).encode_text("completely unrelated words");
        assert!(v.is_zero());
        assert_eq!(v.len(), 6);
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let vocab = vocab();
        let doc = NormalizedDocument::from_normalized_text("true news", "some true text here");
        let encoder = BowEncoder::new(&vocab);
        assert_eq!(encoder.encode_document(&doc), encoder.encode_document(&doc));
    }

    #[test]
    fn test_text_with_mixed_whitespace() {
        let vocab = vocab();
        let v = BowEncoder::new(&vocab).encode_text("  True\tnews\n\nTRUE ");
        assert_eq!(v.get(5), Some(2));
        assert_eq!(v.get(1), Some(1));
        let nz: Vec<(usize, u32)> = v.nonzero().collect();
        assert_eq!(nz, vec![(1, 1), (5, 2)]);
    }

    #[test]
    fn test_empty_vocabulary_gives_empty_vectors() {
        let vocab = Vocabulary::default();
        let v = encode(["anything"], &vocab);
        assert!(v.is_empty());
        assert_eq!(v.total(), 0);
    }
}
