pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::{generate, report, verify, ConfigArgs};

#[derive(Debug, Parser)]
#[command(
    name = "retailscope",
    about = "Retailscope dataset and dashboard CLI",
    long_about = "Generate the deterministic retail dataset, verify its integrity, report dashboard views over it, and inspect effective configuration.",
    after_help = "Examples:\n  retailscope generate --seed 7 --output-dir data\n  retailscope verify\n  retailscope report --days 30 --category Electronics\n  retailscope config"
)]
pub struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate every collection and the merged dataset file")]
    Generate(generate::GenerateArgs),
    #[command(about = "Re-check schemas and foreign keys of a generated dataset")]
    Verify(verify::VerifyArgs),
    #[command(about = "Compute dashboard views over a dataset for a filter window")]
    Report(report::ReportArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Generate(args) => generate::run(&cli.config, args),
        Command::Verify(args) => verify::run(&cli.config, args),
        Command::Report(args) => report::run(&cli.config, args),
        Command::Config => commands::config::run(&cli.config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
