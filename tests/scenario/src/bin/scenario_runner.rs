//! Replays the protocol scenario and prints the final report as JSON

use anyhow::{Context, Result};
use clap::Parser;
use protocol_config::ProtocolConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment overrides to layer on top (config/environments/<name>.toml)
    #[arg(short, long)]
    environment: Option<String>,

    /// Emit JSON log lines regardless of configuration
    #[arg(long)]
    json_logs: bool,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ProtocolConfig::load(args.config.as_deref(), args.environment.as_deref())
        .context("Failed to load protocol configuration")?;

    let json = args.json_logs || config.logging.json;
    let output = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(output)
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        fee_bps = config.exchange.fee_bps,
        lag = config.rebase.lag,
        reward_per_block = config.staking.reward_per_block,
        "replaying scenario"
    );

    let report = scenario::run(&config)?;
    let rendered = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", rendered);
    Ok(())
}
