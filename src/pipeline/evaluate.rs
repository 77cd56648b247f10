//! Cross-validation results reporting.

use crate::cross_validation::{CrossValidationReport, FoldResult};
use crate::dataset::Classes;
use crate::error::Result;
use crate::metrics::{ConfusionMatrix, Metric};
use std::fmt::Write as _;

const RULE: &str = "===================================================================";

/// Render a confusion matrix as a text table, actual classes down the side
/// and predicted classes across the top.
pub fn format_matrix(matrix: &ConfusionMatrix, classes: &Classes) -> String {
    let names: Vec<String> = (0..matrix.num_classes())
        .map(|i| classes.label(i).unwrap_or("?").to_string())
        .collect();
    let width = names
        .iter()
        .map(String::len)
        .chain(matrix.rows().flatten().map(|c| c.to_string().len()))
        .chain(std::iter::once("actual".len()))
        .max()
        .unwrap_or(6);

    let mut out = String::new();
    let _ = write!(out, "  {:>width$} |", "actual");
    for name in &names {
        let _ = write!(out, " {name:>width$}");
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "  {}-+{}",
        "-".repeat(width),
        "-".repeat((width + 1) * names.len())
    );
    for (name, row) in names.iter().zip(matrix.rows()) {
        let _ = write!(out, "  {name:>width$} |");
        for count in row {
            let _ = write!(out, " {count:>width$}");
        }
        out.push('\n');
    }
    out
}

fn percent(metric: Metric) -> String {
    match metric.value() {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => metric.to_string(),
    }
}

/// Print one fold's confusion matrix and accuracy.
pub fn print_fold(fold: &FoldResult, classes: &Classes) {
    println!(
        "Fold {} (train {}, test {}):",
        fold.fold + 1,
        fold.train_size,
        fold.test_size
    );
    print!("{}", format_matrix(&fold.matrix, classes));
    println!("  Accuracy: {}\n", percent(fold.accuracy));
}

/// Print every fold, the cumulative matrix and the final metrics.
///
/// With exactly two classes the binary summary (class 0 positive) is shown;
/// otherwise one-vs-rest metrics are listed per class.
pub fn print_results(report: &CrossValidationReport, classes: &Classes) -> Result<()> {
    println!("{RULE}\n");
    println!("Cross-Validation\n");

    for fold in &report.folds {
        print_fold(fold, classes);
    }
    for failure in &report.failures {
        println!("Fold {}: FAILED ({})\n", failure.fold + 1, failure.error);
    }

    println!("{RULE}\n");
    println!("Final Results\n");
    if report.is_partial() {
        println!(
            "NOTE: {} of {} folds failed; {} of {} examples evaluated\n",
            report.failures.len(),
            report.failures.len() + report.folds.len(),
            report.evaluated(),
            report.examples
        );
    }

    println!("Cumulative confusion matrix:");
    print!("{}", format_matrix(&report.cumulative, classes));
    println!();

    println!("+-----------------------------+------------+");
    println!("| Metric                      | Value      |");
    println!("+-----------------------------+------------+");
    println!("| Accuracy                    | {:>10} |", percent(report.accuracy()));
    println!(
        "| Mean fold accuracy          | {:>10} |",
        percent(report.mean_fold_accuracy())
    );

    if report.cumulative.num_classes() == 2 {
        let binary = report.cumulative.binary()?;
        let positive = classes.label(0).unwrap_or("?");
        println!("| Precision ({positive:<16}) | {:>10} |", percent(binary.precision));
        println!("| Recall    ({positive:<16}) | {:>10} |", percent(binary.recall));
        println!("| F1        ({positive:<16}) | {:>10} |", percent(binary.f1));
    } else {
        for metrics in report.cumulative.per_class() {
            let name = classes.label(metrics.class).unwrap_or("?");
            println!("| Precision ({name:<16}) | {:>10} |", percent(metrics.precision));
            println!("| Recall    ({name:<16}) | {:>10} |", percent(metrics.recall));
            println!("| F1        ({name:<16}) | {:>10} |", percent(metrics.f1));
        }
    }
    println!("+-----------------------------+------------+\n");
    println!("{RULE}\n");

    Ok(())
}
