//! Text normalization: raw article text to lowercase alphabetic tokens.
//!
//! The pipeline only relies on the [`Normalizer`] contract: the same raw input
//! always yields the same tokens. [`TextNormalizer`] is the implementation used
//! by the preprocessing stage and, by default, by the prediction loop:
//!
//! 1. strip URLs
//! 2. split on whitespace
//! 3. lowercase and drop every non-alphabetic character
//! 4. drop stop words and empty tokens
//! 5. lemmatize what is left
//!
//! Stop words and the lemmatizer are plain values handed to the normalizer at
//! construction; nothing here is process-global.

use crate::error::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

const URL_PATTERN: &str =
    r"(https?://\S+|www\.[\w-]+\.[\w-]+|[\w-]+\.(com|org|net|io|gov|edu|info|co|uk))";

// Common English stop words
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "said", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// A document after normalization: title tokens followed by body tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDocument {
    title: Vec<String>,
    body: Vec<String>,
}

impl NormalizedDocument {
    pub fn new(title: Vec<String>, body: Vec<String>) -> Self {
        NormalizedDocument { title, body }
    }

    /// Rebuild a document from already-normalized text, e.g. a row of the
    /// preprocessed CSV.
    pub fn from_normalized_text(title: &str, body: &str) -> Self {
        NormalizedDocument {
            title: whitespace_tokens(title).collect(),
            body: whitespace_tokens(body).collect(),
        }
    }

    pub fn title(&self) -> &[String] {
        &self.title
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// All tokens, title first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.title.iter().chain(self.body.iter()).map(String::as_str)
    }

    /// Number of tokens in title and body together.
    pub fn len(&self) -> usize {
        self.title.len() + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }

    pub fn title_text(&self) -> String {
        self.title.join(" ")
    }

    pub fn body_text(&self) -> String {
        self.body.join(" ")
    }
}

/// Splits on whitespace and lowercases. Never yields empty tokens.
pub fn whitespace_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Turns raw text into tokens.
pub trait Normalizer {
    /// Normalize a single piece of raw text.
    fn tokens(&self, raw: &str) -> Vec<String>;

    /// Normalize an article's title and body.
    fn normalize(&self, raw_title: &str, raw_body: &str) -> NormalizedDocument {
        NormalizedDocument::new(self.tokens(raw_title), self.tokens(raw_body))
    }
}

/// Whitespace split plus lowercasing, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Normalizer for WhitespaceTokenizer {
    fn tokens(&self, raw: &str) -> Vec<String> {
        whitespace_tokens(raw).collect()
    }
}

/// Set of words removed during normalization. Matching is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// An empty set; nothing is removed.
    pub fn none() -> Self {
        StopWords::default()
    }

    /// Built-in English list.
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        StopWords { words }
    }

    /// Parse a stop-word list: one word per line, trimmed and lowercased,
    /// blank lines skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(content.lines())
    }

    /// Load a stop-word list from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Reduces a word to its base form.
pub trait Lemmatizer {
    fn lemmatize(&self, word: &str) -> String;
}

/// Leaves every word untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Rule-based plural folding.
///
/// `ies -> y`, `sses -> ss`, and a trailing `s` is dropped unless the word ends
/// in `ss`, `us` or `is`. Words of three letters or fewer are kept as-is.
/// Applying it twice gives the same result as applying it once.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralLemmatizer;

impl Lemmatizer for PluralLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if word.len() <= 3 {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("sses") {
            return format!("{stem}ss");
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }
}

/// The normalizer used for training data and, by default, for user input.
pub struct TextNormalizer {
    url_pattern: Regex,
    stop_words: StopWords,
    lemmatizer: Box<dyn Lemmatizer + Send + Sync>,
}

impl TextNormalizer {
    /// Normalizer without lemmatization.
    pub fn new(stop_words: StopWords) -> Result<Self> {
        Self::with_lemmatizer(stop_words, IdentityLemmatizer)
    }

    pub fn with_lemmatizer<L>(stop_words: StopWords, lemmatizer: L) -> Result<Self>
    where
        L: Lemmatizer + Send + Sync + 'static,
    {
        Ok(TextNormalizer {
            url_pattern: Regex::new(URL_PATTERN)?,
            stop_words,
            lemmatizer: Box::new(lemmatizer),
        })
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Remove URLs from raw text.
    pub fn strip_urls(&self, text: &str) -> String {
        self.url_pattern.replace_all(text, "").trim().to_string()
    }

    fn clean_token(token: &str) -> String {
        token
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("url_pattern", &self.url_pattern.as_str())
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl Normalizer for TextNormalizer {
    fn tokens(&self, raw: &str) -> Vec<String> {
        let without_urls = self.strip_urls(raw);
        without_urls
            .split_whitespace()
            .map(Self::clean_token)
            .filter(|t| !t.is_empty() && !self.stop_words.contains(t))
            .map(|t| self.lemmatizer.lemmatize(&t))
            .filter(|t| !t.is_empty())
            .collect()
    }
}
