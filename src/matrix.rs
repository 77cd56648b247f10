//! Bag-of-words matrix files.
//!
//! Layout: a header row `DocumentID,Label,<term 0>,<term 1>,...` followed by
//! one row per document, `Doc<n>,<label>,<count 0>,<count 1>,...`, with `n`
//! starting at 1. Term columns appear in exact vocabulary order, so reading a
//! matrix back reproduces the same vocabulary indices.

use crate::dataset::{Classes, Dataset};
use crate::encoder::FeatureVector;
use crate::error::{PipelineError, Result};
use crate::vocab::Vocabulary;
use std::io::{Read, Write};
use std::path::Path;

const ID_COLUMN: &str = "DocumentID";
const LABEL_COLUMN: &str = "Label";

/// Write `data` as a labeled matrix.
pub fn write_matrix<W: Write>(writer: W, vocabulary: &Vocabulary, data: &Dataset) -> Result<()> {
    if vocabulary.len() != data.dimension() {
        return Err(PipelineError::VocabularyMismatch {
            expected: vocabulary.len(),
            actual: data.dimension(),
        });
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = Vec::with_capacity(vocabulary.len() + 2);
    header.push(ID_COLUMN);
    header.push(LABEL_COLUMN);
    header.extend(vocabulary.iter());
    wtr.write_record(&header)?;

    let mut row: Vec<String> = Vec::with_capacity(vocabulary.len() + 2);
    for (i, example) in data.iter().enumerate() {
        let label = data
            .classes()
            .label(example.label)
            .ok_or_else(|| PipelineError::UnknownClass(format!("#{}", example.label)))?;
        row.clear();
        row.push(format!("Doc{}", i + 1));
        row.push(label.to_string());
        row.extend(example.features.counts().iter().map(u32::to_string));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a labeled matrix to `path`.
pub fn save_matrix<P: AsRef<Path>>(path: P, vocabulary: &Vocabulary, data: &Dataset) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_matrix(std::io::BufWriter::new(file), vocabulary, data)
}

/// Read a labeled matrix.
///
/// When `classes` is `None` the class table is built from the labels in
/// first-seen order.
pub fn read_matrix<R: Read>(reader: R, classes: Option<Classes>) -> Result<(Vocabulary, Dataset)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.get(0) != Some(ID_COLUMN) || header.get(1) != Some(LABEL_COLUMN) {
        return Err(PipelineError::InvalidDataset(format!(
            "matrix header must start with `{ID_COLUMN},{LABEL_COLUMN}`"
        )));
    }
    let vocabulary = Vocabulary::from_terms(header.iter().skip(2))?;
    let dimension = vocabulary.len();

    let mut labels = Vec::new();
    let mut vectors = Vec::new();
    for (record_idx, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() != dimension + 2 {
            return Err(PipelineError::VocabularyMismatch {
                expected: dimension,
                actual: record.len().saturating_sub(2),
            });
        }
        let label = record.get(1).unwrap_or_default().trim();
        if label.is_empty() {
            return Err(PipelineError::DataIntegrity {
                record: record_idx,
                reason: "missing label".into(),
            });
        }
        let mut counts = Vec::with_capacity(dimension);
        for (col, cell) in record.iter().skip(2).enumerate() {
            let count = cell.trim().parse::<u32>().map_err(|e| PipelineError::DataIntegrity {
                record: record_idx,
                reason: format!("column `{}`: {e}", vocabulary.term(col).unwrap_or("?")),
            })?;
            counts.push(count);
        }
        labels.push(label.to_string());
        vectors.push(FeatureVector::from_counts(counts));
    }

    let classes = classes.unwrap_or_else(|| Classes::discover(&labels));
    let data = Dataset::assemble(&vocabulary, vectors, &labels, classes)?;
    Ok((vocabulary, data))
}

/// Read a labeled matrix from `path`.
pub fn load_matrix<P: AsRef<Path>>(path: P, classes: Option<Classes>) -> Result<(Vocabulary, Dataset)> {
    let file = std::fs::File::open(path)?;
    read_matrix(std::io::BufReader::new(file), classes)
}
