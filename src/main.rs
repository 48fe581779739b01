/// CLI для очистки датасета оттока

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use churn_prep::config::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use churn_prep::{PipelineConfig, Stage};

#[derive(Parser)]
#[command(name = "churn-prep")]
#[command(about = "Clean the telco churn dataset and derive model features")]
#[command(version)]
struct Cli {
    /// Raw CSV with a header row
    #[arg(long, env = "CHURN_PREP_INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Destination CSV; missing directories are created
    #[arg(long, env = "CHURN_PREP_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Also write a JSON summary of the run
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Логи идут в stderr, в stdout только сообщения о прогрессе
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        input: cli.input,
        output: cli.output,
        report: cli.report,
        ..PipelineConfig::default()
    };

    churn_prep::run(&config, |stage| match stage {
        Stage::Load => println!("Loading raw dataset from {}...", config.input.display()),
        Stage::Clean => println!("Cleaning dataset..."),
        Stage::Write => println!("Saving processed dataset to: {}", config.output.display()),
        Stage::Normalize | Stage::Derive => {}
    })
    .with_context(|| format!("failed to process {}", config.input.display()))?;

    println!("Dataset cleaned and saved!");
    Ok(())
}
