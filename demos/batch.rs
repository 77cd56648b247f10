/// Batch prediction example
///
/// Needs the artifacts written by `newsclf train`.
///
/// Run with:
/// ```
/// cargo run --example batch
/// ```
use newsclf::pipeline::config::Config;
use newsclf::pipeline::predict::inference_tokenizer;
use newsclf::pipeline::save::load_artifacts;
use newsclf::BowEncoder;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("newsclf Fake News Classifier - Batch Prediction Example\n");

    let config = Config::load_or_default("config.toml")?;
    let (vocabulary, saved) = load_artifacts(&config.output)?;
    let tokenizer = inference_tokenizer(&config)?;
    let encoder = BowEncoder::new(&vocabulary);
    println!("Model loaded ({} terms)\n", vocabulary.len());

    let texts = vec![
        "BREAKING: You won't believe what this senator said about aliens",
        "The Senate approved the defense spending bill on Thursday",
        "Shocking video proves the election was a hoax",
        "Reuters reports the central bank held interest rates steady",
        "Doctors hate him for this one weird trick",
    ];

    println!("Predicting {} texts in batch...\n", texts.len());

    let start = Instant::now();
    let mut rows = Vec::with_capacity(texts.len());
    for text in &texts {
        let features = encoder.encode_tokens(tokenizer.tokens(text));
        let proba = saved.model.predict_proba(&features)?;
        let (class, confidence) = proba
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });
        rows.push((class, confidence));
    }
    let elapsed = start.elapsed();

    println!("{}", "=".repeat(80));
    println!("{:<50} | {:^8} | {:>8}", "Text (truncated)", "Class", "Conf %");
    println!("{}", "=".repeat(80));

    for (text, (class, confidence)) in texts.iter().zip(&rows) {
        let truncated = if text.chars().count() > 47 {
            format!("{}...", text.chars().take(47).collect::<String>())
        } else {
            text.to_string()
        };
        println!(
            "{:<50} | {:^8} | {:>7.1}%",
            truncated,
            saved.classes.label(*class).unwrap_or("?"),
            confidence * 100.0
        );
    }

    println!("{}", "=".repeat(80));
    println!("\nBatch prediction complete");
    println!(
        "  Time: {:.2}ms ({:.2}ms per text)",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1000.0 / texts.len() as f64
    );

    Ok(())
}
