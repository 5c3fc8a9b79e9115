use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use covid_importer::{run, Cli, Config};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    setup_logging(&args)?;

    // One thread; every stage is awaited in turn.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    let outcome = Config::from_cli(&args).and_then(|config| runtime.block_on(run(&config)));

    match outcome {
        Ok(report) => {
            if let Some(line) = report.summary() {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            error!("Import failed ({:?}): {}", e.kind(), e);
            println!("{e}");
            std::process::exit(1);
        }
    }
}

// Log to the console, or to a file when one is configured
fn setup_logging(args: &Cli) -> Result<()> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(&filters);

    if let Some(path) = &args.log_file {
        let log_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        builder.target(pretty_env_logger::env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.try_init().context("Failed to initialise logging")?;
    Ok(())
}
