use clap::Parser;
use newsclf::pipeline::cli::{run, Cli};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.stage() {
                Some(stage) => tracing::error!(stage, error = %e, "pipeline failed"),
                None => tracing::error!(error = %e, "pipeline failed"),
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
