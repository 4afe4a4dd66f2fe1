use anyhow::Context;
use clap::Parser;
use generator::profile::build_scan;
use generator::template::planck_store;
use log::info;
use std::fs;
use std::path::PathBuf;
use thermalcore::lut::{LutStore, Sensor};
use thermalcore::prelude::Channel;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for AVHRR thermal-channel conversions")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// JSON LUT store; overrides the workflow's `lut_path`
    #[arg(long)]
    lut: Option<PathBuf>,
    #[arg(long, default_value = "N18")]
    sensor: Sensor,
    #[arg(long, default_value = "4", value_parser = parse_channel)]
    channel: Channel,
    #[arg(long, default_value_t = 16)]
    rows: usize,
    #[arg(long, default_value_t = 409)]
    cols: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Use the measurement equation without the instrument-temperature term
    #[arg(long, default_value_t = false)]
    no_t: bool,
    /// Where to write the JSON summary
    #[arg(long, default_value = "tools/data/offline_report.json")]
    report: PathBuf,
}

fn parse_channel(raw: &str) -> Result<Channel, String> {
    let number: i64 = raw.parse().map_err(|err| format!("{}", err))?;
    Channel::try_from(number).map_err(|err| err.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let mut config = WorkflowConfig::from_args(args.sensor, args.channel, args.rows, args.cols, args.seed);
        config.no_t = args.no_t;
        config
    };
    if let Some(lut) = args.lut {
        workflow_config.lut_path = Some(lut);
    }

    let store = match &workflow_config.lut_path {
        Some(path) => LutStore::from_json_path(path)
            .with_context(|| format!("reading LUT store {}", path.display()))?,
        None => {
            info!("no LUT store given, using Planck tables for {}", workflow_config.sensor);
            planck_store(workflow_config.sensor)?
        }
    };

    let scan = build_scan(&workflow_config.generator, workflow_config.channel)
        .context("generating synthetic scan")?;
    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(&store, &scan)?;

    println!(
        "{} {} eq.{} -> pixels {}, out of range {}, mean BT {}",
        result.sensor,
        result.channel,
        result.equation,
        result.pixels,
        result.out_of_range,
        result
            .mean_bt
            .map(|bt| format!("{:.2} K", bt))
            .unwrap_or_else(|| "n/a".into())
    );

    if let Some(parent) = args.report.parent() {
        fs::create_dir_all(parent)?;
    }
    let report = serde_json::to_string_pretty(&result).context("serialising report")?;
    fs::write(&args.report, report)
        .with_context(|| format!("writing report {}", args.report.display()))?;

    Ok(())
}
