use std::path::PathBuf;

use clap::Args;
use retailscope_core::generator::output::MERGED_FILE;
use retailscope_core::{ApplicationError, Dataset, IntegrityReport};
use serde::Serialize;
use tracing::info;

use crate::commands::{load_config, CommandResult, ConfigArgs};

const COMMAND: &str = "verify";

#[derive(Debug, Clone, Default, Args)]
pub struct VerifyArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Merged dataset to check (default: <generator.output_dir>/mockData.json)"
    )]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Verification {
    dataset: String,
    total_records: usize,
    report: IntegrityReport,
}

pub fn run(config_args: &ConfigArgs, args: &VerifyArgs) -> CommandResult {
    let verification = match execute(config_args, args) {
        Ok(verification) => verification,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let failed_checks = verification.report.failed_checks();
    if failed_checks.is_empty() {
        let message = format!(
            "{} passed {} integrity checks",
            verification.dataset,
            verification.report.checks.len()
        );
        CommandResult::success(COMMAND, message, &verification)
    } else {
        CommandResult::failure(
            COMMAND,
            "integrity",
            format!("dataset verification failed for checks: {}", failed_checks.join(", ")),
            6,
        )
    }
}

fn execute(config_args: &ConfigArgs, args: &VerifyArgs) -> Result<Verification, ApplicationError> {
    let config = load_config(config_args, config_args.overrides())?;
    let path =
        args.dataset.clone().unwrap_or_else(|| config.generator.output_dir.join(MERGED_FILE));

    let dataset = Dataset::load(&path)?;
    let report = dataset.verify();
    info!(
        event_name = "cli.verify.completed",
        dataset = %path.display(),
        passed = report.all_passed(),
        "dataset verification finished"
    );

    Ok(Verification {
        dataset: path.display().to_string(),
        total_records: dataset.metadata.total_records,
        report,
    })
}
