//! Opwar - Development Tools

use std::path::Path;

use clap::{Parser, Subcommand};
use opwar_tools::inspect::OutputFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "opwar-tools")]
#[command(about = "Development tools for the operational wargame unit core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "data")]
        path: String,
    },
    /// Spawn a template and print its save record
    Inspect {
        /// Path to data directory
        path: String,
        /// Template key
        template: String,
        /// Print JSON instead of RON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {path}");
            match opwar_tools::validate::validate_data_directory(Path::new(&path)) {
                Ok(report) if report.is_ok() => tracing::info!(
                    profiles = report.profiles,
                    templates = report.templates,
                    "Validation passed"
                ),
                Ok(report) => {
                    for failure in &report.failures {
                        tracing::error!(template = %failure.key, "{}", failure.error);
                    }
                    tracing::error!(
                        "Validation failed: {} of {} templates",
                        report.failures.len(),
                        report.templates
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Inspect {
            path,
            template,
            json,
        } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Ron
            };
            let result = opwar_tools::data::DataSet::load(Path::new(&path))
                .and_then(|data| opwar_tools::inspect::inspect_template(&data, &template, format));
            match result {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::error!("Inspect failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
