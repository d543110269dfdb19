use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use retailscope_core::config::{parse_reference_time, ConfigOverrides};
use retailscope_core::{ApplicationError, DatasetGenerator, DatasetWriter};
use serde::Serialize;
use tracing::{info, warn};

use crate::commands::{load_config, CommandResult, ConfigArgs};

const COMMAND: &str = "generate";

#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    #[arg(long, help = "Override generator.seed")]
    pub seed: Option<u64>,
    #[arg(long, value_name = "DIR", help = "Override generator.output_dir")]
    pub output_dir: Option<PathBuf>,
    #[arg(
        long,
        value_name = "RFC3339",
        value_parser = parse_time,
        help = "Override generator.reference_time, the clock relative dates hang off"
    )]
    pub reference_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSummary {
    seed: u64,
    output_dir: String,
    merged_file: String,
    total_records: usize,
    collections: Vec<CollectionCount>,
    files_written: usize,
    integrity_passed: bool,
}

#[derive(Debug, Serialize)]
struct CollectionCount {
    name: &'static str,
    records: usize,
}

pub fn run(config_args: &ConfigArgs, args: &GenerateArgs) -> CommandResult {
    match execute(config_args, args) {
        Ok(summary) => {
            let message = format!(
                "generated {} records into {}",
                summary.total_records, summary.output_dir
            );
            CommandResult::success(COMMAND, message, &summary)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(
    config_args: &ConfigArgs,
    args: &GenerateArgs,
) -> Result<GenerationSummary, ApplicationError> {
    let overrides = ConfigOverrides {
        seed: args.seed,
        output_dir: args.output_dir.clone(),
        reference_time: args.reference_time,
        ..config_args.overrides()
    };
    let config = load_config(config_args, overrides)?;
    let settings = &config.generator;

    let mut generator = DatasetGenerator::new(settings)?;
    let mut writer = DatasetWriter::new(settings.output_dir.clone());
    let dataset = generator.generate_with_sink(&mut writer)?;

    let report = dataset.verify();
    if !report.all_passed() {
        warn!(
            event_name = "cli.generate.integrity_failed",
            failed_checks = ?report.failed_checks(),
            "generated dataset failed integrity checks"
        );
    }
    info!(
        event_name = "cli.generate.completed",
        seed = settings.seed,
        output_dir = %settings.output_dir.display(),
        total_records = dataset.metadata.total_records,
        "dataset generation finished"
    );

    Ok(GenerationSummary {
        seed: settings.seed,
        output_dir: settings.output_dir.display().to_string(),
        merged_file: writer.merged_path().display().to_string(),
        total_records: dataset.metadata.total_records,
        collections: dataset
            .collection_counts()
            .into_iter()
            .map(|(name, records)| CollectionCount { name, records })
            .collect(),
        files_written: writer.written().len(),
        integrity_passed: report.all_passed(),
    })
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    parse_reference_time(value).map_err(|error| error.to_string())
}
