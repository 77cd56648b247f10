/// Simple example of using the newsclf library
///
/// Cross-validates a tiny in-memory corpus, then classifies a few headlines.
///
/// Run with:
/// ```
/// cargo run --example simple
/// ```
use newsclf::pipeline::evaluate::format_matrix;
use newsclf::{
    BowEncoder, Classes, CrossValidator, Dataset, Model, MultinomialNaiveBayes, Normalizer,
    StopWords, StratifiedKFold, TextNormalizer, Trainer, Vocabulary,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("newsclf Fake News Classifier - Simple Example\n");

    let articles = [
        ("SHOCKING: Celebrity hoax goes viral", "You won't believe this shocking hoax!", "fake"),
        ("Secret plot exposed", "Insiders reveal the shocking secret plot", "fake"),
        ("Miracle cure hidden", "Doctors hate this miracle cure they hid", "fake"),
        ("Viral video hoax", "The viral hoax fooled millions online", "fake"),
        ("Senate passes budget", "The senate voted to pass the annual budget", "true"),
        ("Court rules on appeal", "The court issued its ruling on the appeal", "true"),
        ("Minister visits summit", "The minister attended the trade summit", "true"),
        ("Senate debates bill", "Senators debated the budget bill on Tuesday", "true"),
    ];

    let normalizer = TextNormalizer::new(StopWords::english())?;
    let docs: Vec<_> = articles
        .iter()
        .map(|(title, body, _)| normalizer.normalize(title, body))
        .collect();
    let labels: Vec<&str> = articles.iter().map(|(_, _, label)| *label).collect();

    let vocabulary = Vocabulary::build(&docs);
    let encoder = BowEncoder::new(&vocabulary);
    let data = Dataset::assemble(
        &vocabulary,
        encoder.encode_corpus(&docs),
        &labels,
        Classes::discover(&labels),
    )?;
    println!("Vocabulary: {} terms, {} documents\n", vocabulary.len(), data.len());

    let trainer = MultinomialNaiveBayes::default();
    let report = CrossValidator::new(StratifiedKFold::new(4)).run(&trainer, &data)?;
    println!("Cumulative confusion matrix:");
    print!("{}", format_matrix(&report.cumulative, data.classes()));
    println!("Accuracy: {:.3}", report.accuracy());
    let binary = report.cumulative.binary()?;
    println!(
        "Precision: {:.3}  Recall: {:.3}  F1: {:.3}\n",
        binary.precision, binary.recall, binary.f1
    );

    let model = trainer.train(&data)?;
    println!("{}", "=".repeat(70));
    for text in [
        "Shocking hoax about a miracle cure",
        "The senate will vote on the budget",
        "Completely unrelated words here",
    ] {
        let features = encoder.encode_tokens(normalizer.tokens(text));
        let class = model.predict(&features)?;
        println!(
            "{:<45} -> {}",
            text,
            data.classes().label(class).unwrap_or("?")
        );
    }
    println!("{}", "=".repeat(70));

    Ok(())
}
