//! Command-line interface for the fake news classifier.

use super::config::Config;
use super::predict::{predict_single, run_interactive, serve_stdin};
use super::train::{combine_sources, run_preprocess, run_vectorize, train_model, TrainOptions};
use crate::error::{Result, StageContext};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "newsclf")]
#[command(about = "Bag-of-words fake news classifier with k-fold cross-validation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file; defaults are used when it does not exist
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Label the fake and true sources and write the combined CSV
    Combine,

    /// Normalize the combined CSV
    Preprocess,

    /// Build the vocabulary and write the bag-of-words matrix
    Vectorize,

    /// Cross-validate, then fit and save the final model
    Train {
        /// Number of folds (overrides validation.folds)
        #[arg(short = 'k', long)]
        folds: Option<usize>,

        /// Exit after saving instead of starting the prediction prompt
        #[arg(long)]
        no_interactive: bool,
    },

    /// Classify one text with the saved model
    Predict {
        /// Text to classify
        text: String,
    },

    /// Classify texts typed on stdin until `exit`
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config).stage("config")?;

    match cli.command {
        Command::Combine => {
            let records = combine_sources(&config)?;
            println!("Combined {records} records into {}", config.data.combined_path);
        }
        Command::Preprocess => {
            let records = run_preprocess(&config)?;
            println!(
                "Preprocessed {records} records into {}",
                config.data.preprocessed_path
            );
        }
        Command::Vectorize => {
            let (vocabulary, data) = run_vectorize(&config)?;
            println!(
                "Encoded {} documents over {} terms into {}",
                data.len(),
                vocabulary.len(),
                config.output.matrix_path().display()
            );
        }
        Command::Train {
            folds,
            no_interactive,
        } => {
            let trained = train_model(&config, TrainOptions { folds })?;
            if !no_interactive {
                let predictor = trained.into_predictor(&config).stage("interactive")?;
                serve_stdin(&predictor).stage("interactive")?;
            }
        }
        Command::Predict { text } => {
            predict_single(&config, &text).stage("predict")?;
        }
        Command::Interactive => {
            run_interactive(&config).stage("interactive")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_train_flags() {
        let cli = Cli::parse_from([
            "newsclf",
            "train",
            "-k",
            "5",
            "--no-interactive",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        match cli.command {
            Command::Train {
                folds,
                no_interactive,
            } => {
                assert_eq!(folds, Some(5));
                assert!(no_interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_predict_text() {
        let cli = Cli::parse_from(["newsclf", "--config", "alt.toml", "predict", "some text"]);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Command::Predict { ref text } if text == "some text"));
        assert_eq!(Level::from(cli.log_level), Level::INFO);
    }
}
