//! Data structures and CSV helpers for news article records.

use crate::error::{PipelineError, Result};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Label given to articles from the fake news source.
pub const FAKE_LABEL: &str = "fake";
/// Label given to articles from the true news source.
pub const TRUE_LABEL: &str = "true";

/// An unlabeled article as found in the source CSVs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: String,
    pub text: String,
    pub subject: String,
    pub date: String,
}

/// An article with its class label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsRecord {
    pub title: String,
    pub text: String,
    pub subject: String,
    pub date: String,
    pub label: String,
}

/// A record whose title and text have been normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessedRecord {
    /// Normalized title tokens, space separated
    pub title: String,
    /// Normalized body tokens, space separated
    pub text: String,
    pub subject: String,
    pub date: String,
    pub label: String,
    /// Number of tokens in the normalized text
    pub text_length: usize,
}

impl Article {
    pub fn with_label(self, label: &str) -> NewsRecord {
        NewsRecord {
            title: self.title,
            text: self.text,
            subject: self.subject,
            date: self.date,
            label: label.to_string(),
        }
    }
}

impl NewsRecord {
    /// Check the fields every later stage relies on.
    ///
    /// `record` is the zero-based row number, used in the error.
    pub fn validate(&self, record: usize) -> Result<()> {
        let missing = [
            ("title", &self.title),
            ("text", &self.text),
            ("label", &self.label),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(PipelineError::DataIntegrity {
                record,
                reason: format!("missing {field}"),
            }),
            None => Ok(()),
        }
    }
}

/// Label fake and true articles and concatenate them, fake first.
pub fn combine(fake: Vec<Article>, real: Vec<Article>) -> Vec<NewsRecord> {
    fake.into_iter()
        .map(|a| a.with_label(FAKE_LABEL))
        .chain(real.into_iter().map(|a| a.with_label(TRUE_LABEL)))
        .collect()
}

/// Load records from a CSV file with a header row.
///
/// # Example
/// ```no_run
/// use newsclf::pipeline::data::{read_records, NewsRecord};
///
/// let records: Vec<NewsRecord> = read_records("data/CombinedNews.csv")?;
/// println!("Loaded {} records", records.len());
/// # Ok::<(), newsclf::PipelineError>(())
/// ```
pub fn read_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

/// Write records to a CSV file with a header row.
pub fn write_records<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, text: &str) -> Article {
        Article {
            title: title.to_string(),
            text: text.to_string(),
            subject: "politics".to_string(),
            date: "2017-01-01".to_string(),
        }
    }

    #[test]
    fn test_combine_labels_and_order() {
        let records = combine(vec![article("a", "x")], vec![article("b", "y"), article("c", "z")]);
        let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["fake", "true", "true"]);
        assert_eq!(records[1].title, "b");
    }

    #[test]
    fn test_validate_reports_missing_field() {
        let ok = article("a", "x").with_label("fake");
        assert!(ok.validate(0).is_ok());

        let no_text = article("a", "  ").with_label("fake");
        match no_text.validate(4) {
            Err(PipelineError::DataIntegrity { record, reason }) => {
                assert_eq!(record, 4);
                assert_eq!(reason, "missing text");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let no_label = article("a", "x").with_label("");
        assert!(no_label.validate(0).is_err());
    }

    #[test]
    fn test_csv_round_trip_with_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Fake.csv");
        std::fs::write(
            &path,
            "title,text,subject,date\n\"Hello, world\",body text,news,2017\nonly title\n",
        )
        .unwrap();

        let articles: Vec<Article> = read_records(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Hello, world");
        assert_eq!(articles[1].text, "");

        let out = dir.path().join("nested").join("combined.csv");
        let records = combine(articles, Vec::new());
        write_records(&out, &records).unwrap();
        let back: Vec<NewsRecord> = read_records(&out).unwrap();
        assert_eq!(back, records);
    }
}
