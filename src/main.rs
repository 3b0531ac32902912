use anyhow::{Context, Result};
use bookrec::{init_tracing, Config, Pipeline};
use clap::Parser;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Ratings CSV, overrides `data.path` from the config
    #[arg(short, long)]
    data: Option<String>,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write the full run report as JSON
    #[arg(short, long)]
    report: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    // Load configuration
    let mut config = if Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    if let Some(data) = args.data {
        config.data.path = data;
    }

    info!("Training configuration: {:?}", config.training);

    let report = Pipeline::new(config).run()?;

    println!("{}", report.metrics);
    for result in &report.predictions {
        println!("{}", result);
    }

    if let Some(path) = args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json).with_context(|| format!("writing report to {}", path))?;
        info!("Wrote run report to {}", path);
    }

    Ok(())
}
