//! Prediction for freshly typed text, one-off or in an interactive loop.

use super::config::{Config, InferenceTokenization};
use super::save::load_artifacts;
use crate::classifier::Model;
use crate::dataset::Classes;
use crate::encoder::{BowEncoder, FeatureVector};
use crate::error::{PipelineError, Result};
use crate::naive_bayes::NaiveBayesModel;
use crate::normalize::{Normalizer, WhitespaceTokenizer};
use crate::vocab::Vocabulary;
use std::io::{BufRead, Write};
use tracing::{debug, info};

const PROMPT: &str = "Enter the text to classify (or type 'exit' to quit):";

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Class label, e.g. `fake`
    pub label: String,
    /// Index of the label in the class table
    pub class: usize,
    /// Tokens of the input found in the vocabulary
    pub known_tokens: u64,
}

/// A frozen vocabulary, a trained model and the tokenizer for user input.
///
/// Text without a single known token encodes to the all-zero vector and is
/// still classified.
pub struct Predictor<M: Model> {
    vocabulary: Vocabulary,
    classes: Classes,
    model: M,
    tokenizer: Box<dyn Normalizer>,
}

impl<M: Model> Predictor<M> {
    pub fn new(
        vocabulary: Vocabulary,
        classes: Classes,
        model: M,
        tokenizer: Box<dyn Normalizer>,
    ) -> Result<Self> {
        if model.dimension() != vocabulary.len() {
            return Err(PipelineError::VocabularyMismatch {
                expected: model.dimension(),
                actual: vocabulary.len(),
            });
        }
        if model.num_classes() != classes.len() {
            return Err(PipelineError::Config(format!(
                "model predicts {} classes but {} labels were given",
                model.num_classes(),
                classes.len()
            )));
        }
        Ok(Predictor {
            vocabulary,
            classes,
            model,
            tokenizer,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn encode(&self, text: &str) -> FeatureVector {
        BowEncoder::new(&self.vocabulary).encode_tokens(self.tokenizer.tokens(text))
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let features = self.encode(text);
        let class = self.model.predict(&features)?;
        let label = self
            .classes
            .label(class)
            .ok_or_else(|| PipelineError::UnknownClass(format!("#{class}")))?;
        debug!(class, known_tokens = features.total(), "classified text");
        Ok(Prediction {
            label: label.to_string(),
            class,
            known_tokens: features.total(),
        })
    }
}

/// Prompt for text on `output`, read lines from `input` and answer each with
/// its predicted class.
///
/// Ends on a line reading `exit` (any case) or at end of input. Lines that are
/// not valid UTF-8 are decoded lossily and still answered. Returns the number
/// of texts classified.
pub fn interactive_loop<M, R, W>(predictor: &Predictor<M>, mut input: R, mut output: W) -> Result<usize>
where
    M: Model,
    R: BufRead,
    W: Write,
{
    let mut buf = Vec::new();
    let mut answered = 0;
    loop {
        writeln!(output, "{PROMPT}")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // undecodable bytes become tokens the vocabulary does not know
        let line = String::from_utf8_lossy(&buf);
        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") {
            break;
        }

        let prediction = predictor.predict(text)?;
        writeln!(output, "Predicted class: {}", prediction.label)?;
        answered += 1;
    }
    Ok(answered)
}

/// Tokenizer for user input, as selected by `features.inference_tokenization`.
pub fn inference_tokenizer(config: &Config) -> Result<Box<dyn Normalizer>> {
    let tokenizer: Box<dyn Normalizer> = match config.features.inference_tokenization {
        InferenceTokenization::Normalized => Box::new(config.normalizer()?),
        InferenceTokenization::Whitespace => Box::new(WhitespaceTokenizer),
    };
    Ok(tokenizer)
}

/// Build a predictor from the artifacts written by the train stage.
pub fn load_predictor(config: &Config) -> Result<Predictor<NaiveBayesModel>> {
    let (vocabulary, saved) = load_artifacts(&config.output)?;
    Predictor::new(
        vocabulary,
        saved.classes,
        saved.model,
        inference_tokenizer(config)?,
    )
}

/// Classify a single text with the saved model and print the result.
pub fn predict_single(config: &Config, text: &str) -> Result<Prediction> {
    let predictor = load_predictor(config)?;
    let prediction = predictor.predict(text)?;

    let display = if text.chars().count() > 100 {
        format!("{}...", text.chars().take(100).collect::<String>())
    } else {
        text.to_string()
    };
    println!("Input text:");
    println!("  {display}\n");
    println!("Predicted class: {}", prediction.label);
    println!(
        "  ({} of the input's tokens are in the vocabulary)",
        prediction.known_tokens
    );

    Ok(prediction)
}

/// Run the interactive loop on stdin and stdout.
pub fn serve_stdin<M: Model>(predictor: &Predictor<M>) -> Result<usize> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let answered = interactive_loop(predictor, stdin.lock(), stdout.lock())?;
    info!(answered, "interactive session ended");
    Ok(answered)
}

/// Run the interactive loop with the saved model.
pub fn run_interactive(config: &Config) -> Result<usize> {
    let predictor = load_predictor(config)?;
    serve_stdin(&predictor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Trainer;
    use crate::dataset::Dataset;
    use crate::naive_bayes::MultinomialNaiveBayes;
    use crate::normalize::{StopWords, TextNormalizer};

    fn predictor(tokenizer: Box<dyn Normalizer>) -> Predictor<NaiveBayesModel> {
        // fake is the majority class
        let vocabulary = Vocabulary::from_terms(["hoax", "shocking", "senate", "vote"]).unwrap();
        let classes = Classes::from_labels(["fake", "true"]).unwrap();
        let mut data = Dataset::new(4, classes.clone());
        for (counts, label) in [
            (vec![2, 1, 0, 0], 0),
            (vec![1, 2, 0, 0], 0),
            (vec![3, 0, 0, 0], 0),
            (vec![0, 0, 2, 1], 1),
            (vec![0, 0, 1, 2], 1),
        ] {
            data.push(FeatureVector::from_counts(counts), label).unwrap();
        }
        let model = MultinomialNaiveBayes::default().train(&data).unwrap();
        Predictor::new(vocabulary, classes, model, tokenizer).unwrap()
    }

    fn normalizer() -> Box<dyn Normalizer> {
        Box::new(TextNormalizer::new(StopWords::english()).unwrap())
    }

    #[test]
    fn test_predicts_known_words() {
        let p = predictor(normalizer());
        let fake = p.predict("SHOCKING hoax!!! Read at http://x.co/y").unwrap();
        assert_eq!(fake.label, "fake");
        assert_eq!(fake.known_tokens, 2);

        let real = p.predict("The Senate will vote on Tuesday").unwrap();
        assert_eq!(real.label, "true");
        assert_eq!(real.class, 1);
    }

    #[test]
    fn test_unknown_words_predict_majority_class() {
        let p = predictor(normalizer());
        let prediction = p.predict("zebra quantum marmalade").unwrap();
        assert_eq!(prediction.known_tokens, 0);
        assert_eq!(prediction.label, "fake");
        assert!(p.encode("zebra quantum marmalade").is_zero());
    }

    #[test]
    fn test_whitespace_tokenizer_keeps_punctuation() {
        let p = predictor(Box::new(WhitespaceTokenizer));
        // "hoax!!!" is not a vocabulary term without normalization
        assert_eq!(p.predict("hoax!!!").unwrap().known_tokens, 0);
        assert_eq!(p.predict("Hoax").unwrap().known_tokens, 1);
    }

    #[test]
    fn test_construction_rejects_mismatched_vocabulary() {
        let p = predictor(normalizer());
        let Predictor { classes, model, .. } = p;
        let smaller = Vocabulary::from_terms(["hoax"]).unwrap();
        let err = Predictor::new(smaller, classes, model, normalizer())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            PipelineError::VocabularyMismatch {
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_interactive_loop_until_exit() {
        let p = predictor(normalizer());
        let input = "senate vote\nhoax\nEXIT\nnever read\n";
        let mut output = Vec::new();

        let answered = interactive_loop(&p, input.as_bytes(), &mut output).unwrap();
        assert_eq!(answered, 2);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                PROMPT,
                "Predicted class: true",
                PROMPT,
                "Predicted class: fake",
                PROMPT,
            ]
        );
    }

    #[test]
    fn test_interactive_loop_survives_invalid_utf8() {
        let p = predictor(normalizer());
        let input: &[u8] = b"\xff\xfe garbage\nhoax\nexit\n";
        let mut output = Vec::new();

        let answered = interactive_loop(&p, input, &mut output).unwrap();
        assert_eq!(answered, 2);

        let text = String::from_utf8(output).unwrap();
        let answers: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Predicted class:"))
            .collect();
        assert_eq!(answers, vec!["Predicted class: fake", "Predicted class: fake"]);
    }

    #[test]
    fn test_interactive_loop_ends_at_eof() {
        let p = predictor(normalizer());
        let mut output = Vec::new();
        let answered = interactive_loop(&p, "hoax".as_bytes(), &mut output).unwrap();
        assert_eq!(answered, 1);
        assert!(String::from_utf8(output).unwrap().ends_with(&format!("{PROMPT}\n")));
    }
}
